use {secrecy::ExposeSecret, tracing::debug};

use crate::{
    error::{Error, Result},
    types::{CurrentConditions, Units},
};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Client for the OpenWeatherMap current-weather endpoint.
pub struct WeatherClient {
    api_key: secrecy::Secret<String>,
    base_url: String,
    client: reqwest::Client,
}

impl WeatherClient {
    pub fn new(api_key: secrecy::Secret<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.into())
    }

    pub fn with_base_url(api_key: secrecy::Secret<String>, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Fetch current conditions for a city.
    ///
    /// `city` uses the API's `q` convention: city name, state code (US only)
    /// and ISO 3166 country code, comma separated.
    pub async fn current(&self, city: &str, units: Units) -> Result<CurrentConditions> {
        debug!(city, units = %units, "weather lookup");

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", city),
                ("units", units.as_str()),
                ("appid", self.api_key.expose_secret()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.json::<CurrentConditions>().await?)
    }
}
