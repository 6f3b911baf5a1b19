//! Typed views of the OpenWeatherMap request vocabulary and response
//! payload. Only the fields the report chain actually reads are modeled;
//! everything else in the payload is ignored.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Measurement system for the lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Fahrenheit.
    #[default]
    Imperial,
    /// Celsius.
    Metric,
    /// Kelvin.
    Standard,
}

impl Units {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Imperial => "imperial",
            Self::Metric => "metric",
            Self::Standard => "standard",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "imperial" => Ok(Self::Imperial),
            "metric" => Ok(Self::Metric),
            "standard" => Ok(Self::Standard),
            other => Err(Error::Units(other.to_string())),
        }
    }
}

/// Location + units extracted from a user's weather query.
///
/// `city` follows the OpenWeatherMap `q` convention: city name, state code
/// (US only) and ISO 3166 country code, comma separated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherLookup {
    pub city: String,
    #[serde(default)]
    pub units: Units,
}

/// Current conditions for one location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Resolved location name.
    pub name: String,
    pub weather: Vec<Condition>,
    pub main: MainMetrics,
    #[serde(default)]
    pub wind: Option<Wind>,
}

impl CurrentConditions {
    /// First condition description ("light rain"), if any.
    pub fn description(&self) -> Option<&str> {
        self.weather.first().map(|c| c.description.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub main: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainMetrics {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    #[serde(default)]
    pub humidity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
}
