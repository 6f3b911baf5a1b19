//! Session storage and management.
//!
//! Sessions live in process memory only: a concurrent map from session key
//! to an ordered turn history, with per-session async mutexes so concurrent
//! messages against the same conversation serialize instead of interleaving.
//! Over-budget histories are destructively collapsed into a single summary
//! turn (see [`compaction`]).

pub mod budget;
pub mod compaction;
pub mod error;
pub mod history;
pub mod store;

pub use {
    budget::TokenBudget,
    compaction::Summarizer,
    error::{Error, Result},
    history::{History, Role, Turn},
    store::{Session, SessionStore},
};
