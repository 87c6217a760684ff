use crate::{CurrentConditions, ResolvedLocation, WeatherError, WeatherProvider};

/// Fetches present conditions for an already resolved location.
#[derive(Debug)]
pub struct ConditionsFetcher<'a> {
    provider: &'a dyn WeatherProvider,
}

impl<'a> ConditionsFetcher<'a> {
    pub fn new(provider: &'a dyn WeatherProvider) -> Self {
        Self { provider }
    }

    pub async fn fetch(
        &self,
        location: &ResolvedLocation,
    ) -> Result<CurrentConditions, WeatherError> {
        let conditions = self.provider.current_conditions(&location.location_key).await?;

        tracing::info!(
            city = %location.city_name,
            temperature_c = conditions.temperature_c,
            text = %conditions.condition_text,
            "Fetched current conditions"
        );

        Ok(conditions)
    }
}
