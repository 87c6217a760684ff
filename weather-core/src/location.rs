//! Host location capability and reverse geocoding.

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Mutex;

use crate::{Coordinates, ResolvedLocation, WeatherError, WeatherProvider};

/// Outcome of asking the host for location access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Where device coordinates come from. Access is gated by user consent.
#[async_trait]
pub trait LocationSource: Send + Sync + Debug {
    async fn request_permission(&self) -> Result<PermissionStatus, WeatherError>;

    /// One snapshot of the current position. Only called after a grant.
    async fn current_position(&self) -> Result<Coordinates, WeatherError>;
}

/// Coordinates known up front, e.g. from flags or the config file.
#[derive(Debug, Clone)]
pub struct FixedLocation {
    coords: Coordinates,
    permission: PermissionStatus,
}

impl FixedLocation {
    pub fn granted(coords: Coordinates) -> Self {
        Self { coords, permission: PermissionStatus::Granted }
    }

    pub fn denied(coords: Coordinates) -> Self {
        Self { coords, permission: PermissionStatus::Denied }
    }
}

#[async_trait]
impl LocationSource for FixedLocation {
    async fn request_permission(&self) -> Result<PermissionStatus, WeatherError> {
        Ok(self.permission)
    }

    async fn current_position(&self) -> Result<Coordinates, WeatherError> {
        Ok(self.coords)
    }
}

/// Remembers the first permission answer for the lifetime of the value, so
/// repeated runs in one session do not ask the user again.
#[derive(Debug)]
pub struct PermissionCache<S> {
    inner: S,
    answer: Mutex<Option<PermissionStatus>>,
}

impl<S: LocationSource> PermissionCache<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, answer: Mutex::new(None) }
    }

    pub fn cached(&self) -> Option<PermissionStatus> {
        *self.answer.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl<S: LocationSource> LocationSource for PermissionCache<S> {
    async fn request_permission(&self) -> Result<PermissionStatus, WeatherError> {
        if let Some(status) = self.cached() {
            tracing::debug!(?status, "Using cached location permission");
            return Ok(status);
        }

        let status = self.inner.request_permission().await?;
        *self.answer.lock().unwrap_or_else(|e| e.into_inner()) = Some(status);
        Ok(status)
    }

    async fn current_position(&self) -> Result<Coordinates, WeatherError> {
        self.inner.current_position().await
    }
}

/// Consent, one position snapshot, then a geoposition lookup.
#[derive(Debug)]
pub struct LocationResolver<'a> {
    source: &'a dyn LocationSource,
    provider: &'a dyn WeatherProvider,
}

impl<'a> LocationResolver<'a> {
    pub fn new(source: &'a dyn LocationSource, provider: &'a dyn WeatherProvider) -> Self {
        Self { source, provider }
    }

    pub async fn resolve(&self) -> Result<ResolvedLocation, WeatherError> {
        if self.source.request_permission().await? == PermissionStatus::Denied {
            tracing::warn!("Location permission denied");
            return Err(WeatherError::PermissionDenied);
        }

        let coords = self.source.current_position().await?;
        tracing::debug!(lat = coords.latitude, lon = coords.longitude, "Resolving coordinates");

        let location = self.provider.geoposition(coords).await?;
        tracing::info!(
            key = %location.location_key,
            city = %location.city_name,
            "Resolved location"
        );

        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingSource {
        asks: AtomicUsize,
    }

    #[async_trait]
    impl LocationSource for CountingSource {
        async fn request_permission(&self) -> Result<PermissionStatus, WeatherError> {
            self.asks.fetch_add(1, Ordering::SeqCst);
            Ok(PermissionStatus::Granted)
        }

        async fn current_position(&self) -> Result<Coordinates, WeatherError> {
            Ok(Coordinates::new(1.0, 2.0))
        }
    }

    #[tokio::test]
    async fn fixed_location_reports_its_permission() {
        let coords = Coordinates::new(12.97, 77.59);

        let granted = FixedLocation::granted(coords);
        assert_eq!(granted.request_permission().await.unwrap(), PermissionStatus::Granted);
        assert_eq!(granted.current_position().await.unwrap(), coords);

        let denied = FixedLocation::denied(coords);
        assert_eq!(denied.request_permission().await.unwrap(), PermissionStatus::Denied);
    }

    #[tokio::test]
    async fn permission_cache_asks_only_once() {
        let cache = PermissionCache::new(CountingSource::default());
        assert_eq!(cache.cached(), None);

        for _ in 0..3 {
            assert_eq!(cache.request_permission().await.unwrap(), PermissionStatus::Granted);
        }

        assert_eq!(cache.inner.asks.load(Ordering::SeqCst), 1);
        assert_eq!(cache.cached(), Some(PermissionStatus::Granted));
    }

    #[tokio::test]
    async fn permission_cache_keeps_a_denial() {
        let cache = PermissionCache::new(FixedLocation::denied(Coordinates::new(0.0, 0.0)));

        assert_eq!(cache.request_permission().await.unwrap(), PermissionStatus::Denied);
        assert_eq!(cache.request_permission().await.unwrap(), PermissionStatus::Denied);
        assert_eq!(cache.cached(), Some(PermissionStatus::Denied));
    }
}
