//! Core library for the `weather` current-conditions display.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The AccuWeather provider behind the `WeatherProvider` trait
//! - Location consent, reverse geocoding and the conditions lookup
//! - The view state those drive, and its text rendering
//!
//! It is used by `weather-cli`, but can also be reused by other front-ends.

pub mod conditions;
pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod provider;
pub mod session;
pub mod view;

pub use conditions::ConditionsFetcher;
pub use config::Config;
pub use error::{ErrorKind, WeatherError};
pub use location::{
    FixedLocation, LocationResolver, LocationSource, PermissionCache, PermissionStatus,
};
pub use model::{Coordinates, CurrentConditions, ResolvedLocation, WeatherReport};
pub use provider::{WeatherProvider, accuweather::AccuWeatherProvider, provider_from_config};
pub use session::{ViewError, ViewState, WeatherTask, load_report};
pub use view::{RenderOptions, render};
