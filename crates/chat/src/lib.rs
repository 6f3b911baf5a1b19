//! Conversation dispatch: session resolution, budget-gated summarization,
//! the completion call, and the append of the finished exchange. Also hosts
//! the weather report chain.

pub mod engine;
pub mod error;
pub mod prompt;
pub mod weather;

pub use {
    engine::{ChatEngine, EngineSettings},
    error::{Error, Result},
    weather::WeatherChain,
};
