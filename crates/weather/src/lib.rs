//! OpenWeatherMap lookups: one parameterized GET, a typed response model,
//! and the unit vocabulary shared with the extraction prompt.

pub mod client;
pub mod error;
pub mod types;

pub use {
    client::WeatherClient,
    error::{Error, Result},
    types::{CurrentConditions, Units, WeatherLookup},
};
