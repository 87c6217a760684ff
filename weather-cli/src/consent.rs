use async_trait::async_trait;
use inquire::{Confirm, InquireError};
use weather_core::{Coordinates, LocationSource, PermissionStatus, WeatherError};

/// Terminal stand-in for the platform location prompt: asks the user before
/// handing out the configured coordinates.
#[derive(Debug, Clone)]
pub struct PromptedLocation {
    coords: Coordinates,
}

impl PromptedLocation {
    pub fn new(coords: Coordinates) -> Self {
        Self { coords }
    }
}

#[async_trait]
impl LocationSource for PromptedLocation {
    async fn request_permission(&self) -> Result<PermissionStatus, WeatherError> {
        let answer = tokio::task::spawn_blocking(|| {
            Confirm::new("Allow weather to use your location?")
                .with_default(true)
                .with_help_message("Your coordinates are sent to AccuWeather to find your city.")
                .prompt()
        })
        .await
        .unwrap_or_else(|e| Err(InquireError::Custom(Box::new(e))));

        Ok(permission_from_answer(answer))
    }

    async fn current_position(&self) -> Result<Coordinates, WeatherError> {
        Ok(self.coords)
    }
}

/// A cancelled or failed prompt is treated as a refusal.
fn permission_from_answer(answer: Result<bool, InquireError>) -> PermissionStatus {
    match answer {
        Ok(true) => PermissionStatus::Granted,
        Ok(false) => PermissionStatus::Denied,
        Err(e) => {
            tracing::warn!("Location prompt failed: {e}");
            PermissionStatus::Denied
        }
    }
}
