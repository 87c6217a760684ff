//! The single load sequence and the view state it drives.
//!
//! `load_report` runs consent → position → geoposition → conditions and
//! stops at the first failure. `WeatherTask` runs it on the runtime and
//! publishes the outcome on a watch channel; dropping the task aborts it.

use std::sync::Arc;

use serde::Serialize;
use tokio::{sync::watch, task::JoinHandle};

use crate::{
    ConditionsFetcher, LocationResolver, LocationSource, WeatherError, WeatherProvider,
    WeatherReport, error::ErrorKind,
};

pub const PERMISSION_DENIED_MESSAGE: &str = "Permission to access location was denied";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch weather.";

/// What the screen shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ViewState {
    Loading,
    Error(ViewError),
    Ready(WeatherReport),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewError {
    pub kind: ErrorKind,
    pub detail: String,
}

impl ViewError {
    /// User-facing text. Only a denied permission gets its own wording.
    pub fn message(&self) -> &'static str {
        match self.kind {
            ErrorKind::PermissionDenied => PERMISSION_DENIED_MESSAGE,
            ErrorKind::Network | ErrorKind::DataUnavailable => FETCH_FAILED_MESSAGE,
        }
    }
}

impl From<WeatherError> for ViewError {
    fn from(err: WeatherError) -> Self {
        Self { kind: err.kind(), detail: err.to_string() }
    }
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn from_result(result: Result<WeatherReport, WeatherError>) -> Self {
        match result {
            Ok(report) => ViewState::Ready(report),
            Err(err) => ViewState::Error(err.into()),
        }
    }
}

/// Resolve the location, then fetch its conditions. Nothing partial escapes.
pub async fn load_report(
    source: &dyn LocationSource,
    provider: &dyn WeatherProvider,
) -> Result<WeatherReport, WeatherError> {
    let location = LocationResolver::new(source, provider).resolve().await?;
    let conditions = ConditionsFetcher::new(provider).fetch(&location).await?;
    Ok(WeatherReport::new(location, conditions))
}

/// One background run of [`load_report`].
#[derive(Debug)]
pub struct WeatherTask {
    state: watch::Receiver<ViewState>,
    handle: JoinHandle<()>,
}

impl WeatherTask {
    pub fn spawn(source: Arc<dyn LocationSource>, provider: Arc<dyn WeatherProvider>) -> Self {
        let (tx, rx) = watch::channel(ViewState::Loading);

        let handle = tokio::spawn(async move {
            let result = load_report(source.as_ref(), provider.as_ref()).await;
            if let Err(err) = &result {
                tracing::warn!(kind = ?err.kind(), error = %err, "Weather load failed");
            }
            // Nobody listening is fine; the outcome is simply dropped.
            let _ = tx.send(ViewState::from_result(result));
        });

        Self { state: rx, handle }
    }

    pub fn current(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Wait until the state leaves Loading. If the run died without
    /// publishing, the last seen state is returned.
    pub async fn settled(&mut self) -> ViewState {
        let settled = self.state.wait_for(|s| !s.is_loading()).await.map(|s| s.clone());
        settled.unwrap_or_else(|_| self.current())
    }
}

impl Drop for WeatherTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
