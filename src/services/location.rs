use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::models::UserLocation;
use crate::services::geo;

#[derive(thiserror::Error, Debug)]
pub enum LocationError {
    #[error("Geolocalización no soportada")]
    Unavailable,

    #[error("Position request denied: {0}")]
    Denied(String),

    #[error("Timed out waiting for a position fix")]
    Timeout,
}

/// Acquisition bounds passed through to the positioning capability.
#[derive(Debug, Clone, Copy)]
pub struct PositionOptions {
    /// Maximum wait for a fix.
    pub timeout: Duration,
    /// Maximum acceptable age of a previously obtained fix.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(300),
        }
    }
}

/// Platform positioning capability: yields the current latitude/longitude in
/// decimal degrees. A missing capability reports `Unavailable` rather than
/// crashing the calling flow.
#[async_trait]
pub trait PositionProvider: Send + Sync {
    async fn current_position(&self, options: PositionOptions)
        -> Result<(f64, f64), LocationError>;
}

/// Obtains the user's position and resolves it to the nearest known city.
pub struct LocationResolver {
    provider: Arc<dyn PositionProvider>,
    options: PositionOptions,
    location: Option<UserLocation>,
    busy: bool,
    last_error: Option<String>,
}

impl LocationResolver {
    pub fn new(provider: Arc<dyn PositionProvider>, options: PositionOptions) -> Self {
        Self {
            provider,
            options,
            location: None,
            busy: false,
            last_error: None,
        }
    }

    /// Requests the current position within the configured bounds.
    ///
    /// City resolution is best-effort: a coordinate pair without a resolved
    /// city is still a success. On failure the location stays unset and the
    /// error message is retained until the next attempt.
    #[tracing::instrument(skip(self))]
    pub async fn current_location(&mut self) -> Result<UserLocation, LocationError> {
        self.busy = true;
        self.last_error = None;

        let result = self.acquire().await;

        match &result {
            Ok(location) => {
                tracing::info!(
                    latitude = location.latitude,
                    longitude = location.longitude,
                    city = location.city.as_deref().unwrap_or("?"),
                    "Resolved user location"
                );
                self.location = Some(location.clone());
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to obtain user location");
                self.last_error = Some(e.to_string());
            }
        }

        self.busy = false;
        result
    }

    async fn acquire(&self) -> Result<UserLocation, LocationError> {
        // The provider receives the bounds too; the outer timeout guarantees
        // the single thread of control is never parked indefinitely even on
        // a provider that ignores them.
        let (latitude, longitude) =
            tokio::time::timeout(self.options.timeout, self.provider.current_position(self.options))
                .await
                .map_err(|_| LocationError::Timeout)??;

        let mut location = UserLocation::new(latitude, longitude);
        match geo::nearest_city(latitude, longitude) {
            Some(city) => {
                location.city = Some(city.name.to_string());
                location.country = Some(city.country.to_string());
            }
            None => {
                tracing::warn!("No reference city available for coordinates");
            }
        }

        Ok(location)
    }

    /// Most recently resolved location, if any.
    pub fn location(&self) -> Option<&UserLocation> {
        self.location.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
