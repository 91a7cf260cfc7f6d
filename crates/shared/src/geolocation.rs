//! Platform-independent half of the location controller.
//!
//! The browser binding issues the actual request; this module owns the state
//! it reports into: the latest fix, the latest error and the in-flight count.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::UserLocation;

/// Failure kinds for a position request. `Display` is the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location access denied by user")]
    PermissionDenied,
    #[error("Location information unavailable")]
    PositionUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Unknown location error")]
    Unknown,
    #[error("Geolocation is not supported by your browser")]
    Unsupported,
}

impl LocationError {
    /// Map a W3C `GeolocationPositionError.code`.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => LocationError::PermissionDenied,
            2 => LocationError::PositionUnavailable,
            3 => LocationError::Timeout,
            _ => LocationError::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeolocationOptions {
    pub high_accuracy: bool,
    pub timeout_ms: u32,
    pub maximum_age_ms: u32,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 10_000,
            maximum_age_ms: 60_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatePhase {
    Idle,
    Locating,
    Resolved,
}

/// Identifies one position request for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocationTracker {
    location: Option<UserLocation>,
    error: Option<LocationError>,
    in_flight: u32,
    issued: u64,
    fixes: u64,
}

impl LocationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(&self) -> Option<&UserLocation> {
        self.location.as_ref()
    }

    pub fn error(&self) -> Option<LocationError> {
        self.error
    }

    /// Number of successful fixes so far. Bumps even when a fix repeats the
    /// previous coordinates, so the map can re-center on every answer.
    pub fn fix_count(&self) -> u64 {
        self.fixes
    }

    pub fn is_locating(&self) -> bool {
        self.in_flight > 0
    }

    pub fn phase(&self) -> LocatePhase {
        if self.in_flight > 0 {
            LocatePhase::Locating
        } else if self.issued == 0 {
            LocatePhase::Idle
        } else {
            LocatePhase::Resolved
        }
    }

    /// Start a request. Clears any previous error; a previous fix is kept
    /// until a new one replaces it.
    pub fn begin(&mut self) -> RequestId {
        self.issued += 1;
        self.in_flight += 1;
        self.error = None;
        let id = RequestId(self.issued);
        tracing::debug!(request = %id, in_flight = self.in_flight, "location request started");
        id
    }

    /// Record the outcome of request `id`. Outcomes are applied in arrival
    /// order; a failure never erases a stored fix.
    pub fn settle(&mut self, id: RequestId, outcome: Result<UserLocation, LocationError>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match outcome {
            Ok(location) => {
                tracing::info!(
                    request = %id,
                    lat = location.position.latitude,
                    lng = location.position.longitude,
                    accuracy = ?location.accuracy,
                    "location resolved"
                );
                self.location = Some(location);
                self.error = None;
                self.fixes += 1;
            }
            Err(err) => {
                tracing::warn!(request = %id, error = %err, "location request failed");
                self.error = Some(err);
            }
        }
    }
}
