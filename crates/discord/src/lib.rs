//! Discord transport: the serenity event handler and outbound message
//! chunking.

pub mod chunk;
pub mod handler;

pub use {
    chunk::{DISCORD_MAX_MESSAGE_LEN, chunk_message},
    handler::YumiHandler,
};
