use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single position snapshot taken from the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Latitude within ±90 and longitude within ±180.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// `"lat,lon"`, the form the geoposition search expects in `q`.
    pub fn to_query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// City a set of coordinates resolved to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub location_key: String,
    pub city_name: String,
    /// Empty when the provider has no administrative area.
    pub region: String,
    /// Empty when the provider has no country.
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub condition_text: String,
    pub wind_speed_kmh: f64,
    pub humidity_pct: u8,
    pub real_feel_c: f64,
    pub observed_at: Option<DateTime<Utc>>,
}

/// Everything the Ready view shows, merged from both lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub region: String,
    pub country: String,
    pub temperature_c: f64,
    pub condition_text: String,
    pub wind_speed_kmh: f64,
    pub humidity_pct: u8,
    pub real_feel_c: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,
}

impl WeatherReport {
    pub fn new(location: ResolvedLocation, conditions: CurrentConditions) -> Self {
        Self {
            city: location.city_name,
            region: location.region,
            country: location.country,
            temperature_c: conditions.temperature_c,
            condition_text: conditions.condition_text,
            wind_speed_kmh: conditions.wind_speed_kmh,
            humidity_pct: conditions.humidity_pct,
            real_feel_c: conditions.real_feel_c,
            observed_at: conditions.observed_at,
        }
    }
}
