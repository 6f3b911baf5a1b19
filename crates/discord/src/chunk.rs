//! Outbound message chunking.

/// Discord message size limit, in characters.
pub const DISCORD_MAX_MESSAGE_LEN: usize = 2000;

/// Split text into consecutive chunks of at most `max_len` characters.
///
/// Every chunk except possibly the last is exactly `max_len` characters;
/// concatenating the chunks reconstructs the input. Lengths are counted in
/// characters, so a chunk never splits a UTF-8 code point. Empty input (or
/// `max_len == 0`) yields no chunks.
pub fn chunk_message(text: &str, max_len: usize) -> Vec<String> {
    if max_len == 0 || text.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let split = rest
            .char_indices()
            .nth(max_len)
            .map_or(rest.len(), |(i, _)| i);
        chunks.push(rest[..split].to_string());
        rest = &rest[split..];
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_message("", 2000).is_empty());
    }

    #[test]
    fn zero_max_len_yields_no_chunks() {
        assert!(chunk_message("anything", 0).is_empty());
    }

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(chunk_message("hello", 2000), vec!["hello"]);
    }

    #[test]
    fn exact_multiple_has_no_trailing_empty_chunk() {
        let text = "a".repeat(4000);
        let chunks = chunk_message(&text, 2000);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 2000);
        assert_eq!(chunks[1].len(), 2000);
    }

    #[test]
    fn concatenation_reconstructs_input() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(100);
        for max_len in [1, 7, 100, 2000] {
            let chunks = chunk_message(&text, max_len);
            assert_eq!(chunks.concat(), text, "max_len = {max_len}");
            for chunk in &chunks[..chunks.len() - 1] {
                assert_eq!(chunk.chars().count(), max_len, "max_len = {max_len}");
            }
            assert!(chunks.last().unwrap().chars().count() <= max_len);
        }
    }

    #[test]
    fn never_splits_a_code_point() {
        let text = "héllo wörld 🦀".repeat(50);
        let chunks = chunk_message(&text, 7);
        assert_eq!(chunks.concat(), text);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 7);
        }
    }
}
