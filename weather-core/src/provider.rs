use crate::{
    Config, Coordinates, CurrentConditions, ResolvedLocation, WeatherError,
    provider::accuweather::AccuWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod accuweather;

/// The two lookups the display needs from a weather vendor.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Reverse-geocode coordinates to a city and its location key.
    async fn geoposition(&self, coords: Coordinates) -> Result<ResolvedLocation, WeatherError>;

    /// Present-moment conditions for a location key.
    async fn current_conditions(
        &self,
        location_key: &str,
    ) -> Result<CurrentConditions, WeatherError>;
}

/// Construct the provider from config, failing early when no API key is known.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No AccuWeather API key configured.\n\
             Hint: set ACCUWEATHER_API_KEY or run `weather configure` and enter your API key."
        )
    })?;

    let provider = match config.base_url.as_deref() {
        Some(base) => AccuWeatherProvider::with_base_url(api_key, base),
        None => AccuWeatherProvider::new(api_key),
    };

    Ok(Box::new(provider))
}
