//! Completion error classification, used by the dispatcher's retry policy.

/// Broad category of a failed completion call, derived from the error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionErrorKind {
    /// 429 / rate limiting.
    RateLimit,
    /// 5xx / provider-side failure.
    ServerError,
    /// Connect/timeout/DNS level failure before any HTTP status.
    Network,
    /// 401/403; retrying cannot help.
    AuthError,
    /// 400-level request problem (includes content-policy rejections).
    InvalidRequest,
    Unknown,
}

impl CompletionErrorKind {
    /// Whether a bounded retry with backoff is worth attempting.
    #[must_use]
    pub fn is_transient(self) -> bool {
        matches!(self, Self::RateLimit | Self::ServerError | Self::Network)
    }
}

/// Classify an error from a provider's `complete` call by its message.
#[must_use]
pub fn classify_error(err: &anyhow::Error) -> CompletionErrorKind {
    let msg = err.to_string().to_lowercase();

    if msg.contains("429")
        || msg.contains("rate limit")
        || msg.contains("rate_limit")
        || msg.contains("too many requests")
    {
        return CompletionErrorKind::RateLimit;
    }

    if msg.contains("401")
        || msg.contains("403")
        || msg.contains("unauthorized")
        || msg.contains("forbidden")
        || msg.contains("invalid api key")
        || msg.contains("invalid_api_key")
    {
        return CompletionErrorKind::AuthError;
    }

    if msg.contains("500")
        || msg.contains("502")
        || msg.contains("503")
        || msg.contains("504")
        || msg.contains("internal server error")
        || msg.contains("bad gateway")
        || msg.contains("service unavailable")
        || msg.contains("overloaded")
    {
        return CompletionErrorKind::ServerError;
    }

    if msg.contains("timed out")
        || msg.contains("timeout")
        || msg.contains("connection refused")
        || msg.contains("connection reset")
        || msg.contains("dns error")
        || msg.contains("error sending request")
    {
        return CompletionErrorKind::Network;
    }

    if msg.contains("400") || msg.contains("bad request") || msg.contains("invalid_request") {
        return CompletionErrorKind::InvalidRequest;
    }

    CompletionErrorKind::Unknown
}
