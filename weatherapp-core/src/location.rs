use async_trait::async_trait;
use tracing::debug;

use crate::model::LocationQuery;

/// Outcome of asking the device for its last known position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationFix {
    Found { latitude: f64, longitude: f64 },
    Unavailable,
    PermissionDenied,
}

impl From<Option<(f64, f64)>> for LocationFix {
    fn from(value: Option<(f64, f64)>) -> Self {
        match value {
            Some((latitude, longitude)) => LocationFix::Found { latitude, longitude },
            None => LocationFix::Unavailable,
        }
    }
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn last_known(&self) -> LocationFix;
}

/// A provider that always reports the same fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocation(pub LocationFix);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn last_known(&self) -> LocationFix {
        self.0
    }
}

/// Query for the automatic lookup at startup.
///
/// Falls back to `default` when there is no fix or location access is denied.
pub fn startup_query(fix: LocationFix, default: &LocationQuery) -> LocationQuery {
    match fix {
        LocationFix::Found { latitude, longitude } => LocationQuery::coordinates(latitude, longitude),
        other => {
            debug!(?other, fallback = %default, "no location fix, using default query");
            default.clone()
        }
    }
}
