use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{Coordinates, CurrentConditions, ResolvedLocation, WeatherError};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "http://dataservice.accuweather.com";

#[derive(Debug, Clone)]
pub struct AccuWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl AccuWeatherProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    #[cfg(test)]
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<T, WeatherError> {
        tracing::debug!(url, what, "Sending AccuWeather request");

        let res = self
            .http
            .get(url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, what, "AccuWeather request failed");
            return Err(WeatherError::Api { status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body)
            .map_err(|e| WeatherError::data(format!("Unexpected {what} response: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct AwNamed {
    #[serde(rename = "LocalizedName")]
    localized_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AwGeoposition {
    #[serde(rename = "Key")]
    key: Option<String>,
    #[serde(rename = "LocalizedName")]
    localized_name: Option<String>,
    #[serde(rename = "AdministrativeArea")]
    administrative_area: Option<AwNamed>,
    #[serde(rename = "Country")]
    country: Option<AwNamed>,
}

#[derive(Debug, Deserialize)]
struct AwValue {
    #[serde(rename = "Value")]
    value: f64,
}

#[derive(Debug, Deserialize)]
struct AwMeasure {
    #[serde(rename = "Metric")]
    metric: AwValue,
}

#[derive(Debug, Deserialize)]
struct AwWind {
    #[serde(rename = "Speed")]
    speed: AwMeasure,
}

#[derive(Debug, Deserialize)]
struct AwConditions {
    #[serde(rename = "WeatherText")]
    weather_text: String,
    #[serde(rename = "Temperature")]
    temperature: AwMeasure,
    #[serde(rename = "RealFeelTemperature")]
    real_feel: AwMeasure,
    #[serde(rename = "Wind")]
    wind: AwWind,
    #[serde(rename = "RelativeHumidity")]
    relative_humidity: u8,
    #[serde(rename = "EpochTime")]
    epoch_time: Option<i64>,
}

impl TryFrom<AwGeoposition> for ResolvedLocation {
    type Error = WeatherError;

    fn try_from(raw: AwGeoposition) -> Result<Self, Self::Error> {
        let location_key = raw
            .key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| WeatherError::data("Geoposition response has no location Key"))?;

        let city_name = raw
            .localized_name
            .ok_or_else(|| WeatherError::data("Geoposition response has no LocalizedName"))?;

        let name_of = |n: Option<AwNamed>| n.and_then(|n| n.localized_name).unwrap_or_default();

        Ok(ResolvedLocation {
            location_key,
            city_name,
            region: name_of(raw.administrative_area),
            country: name_of(raw.country),
        })
    }
}

impl From<AwConditions> for CurrentConditions {
    fn from(raw: AwConditions) -> Self {
        CurrentConditions {
            temperature_c: raw.temperature.metric.value,
            condition_text: raw.weather_text,
            wind_speed_kmh: raw.wind.speed.metric.value,
            humidity_pct: raw.relative_humidity,
            real_feel_c: raw.real_feel.metric.value,
            observed_at: raw.epoch_time.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
        }
    }
}

#[async_trait]
impl WeatherProvider for AccuWeatherProvider {
    async fn geoposition(&self, coords: Coordinates) -> Result<ResolvedLocation, WeatherError> {
        let url = format!("{}/locations/v1/cities/geoposition/search", self.base_url);
        let q = coords.to_query();

        let raw: AwGeoposition = self.get_json(&url, &[("q", q.as_str())], "geoposition").await?;
        ResolvedLocation::try_from(raw)
    }

    async fn current_conditions(
        &self,
        location_key: &str,
    ) -> Result<CurrentConditions, WeatherError> {
        let url = format!("{}/currentconditions/v1/{}", self.base_url, location_key);

        // A `null` body deserializes to None and is treated like an empty array.
        let raw: Option<Vec<AwConditions>> =
            self.get_json(&url, &[("details", "true")], "current conditions").await?;

        raw.unwrap_or_default()
            .into_iter()
            .next()
            .map(CurrentConditions::from)
            .ok_or_else(|| WeatherError::data("No weather data found."))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
