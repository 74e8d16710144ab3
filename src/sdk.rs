// Seams to the external tracking SDK.
//
// `TrackingSdk` is everything the shell calls out to; `SdkReceiver` is
// everything the SDK calls back into. Neither side is implemented by the
// shell itself except for `crate::scripted::ScriptedSdk`, a stand-in used
// by the demo binary and tests.

use crate::model::{Event, Location, LocationSource, User};
use crate::status::TrackingStatus;
use serde::{Deserialize, Serialize};

/// Result of a one-shot track request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackOutcome {
    pub status: TrackingStatus,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub user: Option<User>,
}

impl TrackOutcome {
    /// Outcome for a failed request: no location, no events, no user.
    pub fn failed(status: TrackingStatus) -> Self {
        Self {
            status,
            location: None,
            events: Vec::new(),
            user: None,
        }
    }
}

/// Completion for `TrackingSdk::track_once`, invoked exactly once
pub type TrackCallback = Box<dyn FnOnce(TrackOutcome) + Send + 'static>;

/// Outbound calls into the tracking SDK
///
/// Setup calls return nothing; problems surface later as a
/// `TrackingStatus` on the next track request or through
/// `SdkReceiver::on_error`.
pub trait TrackingSdk: Send + Sync {
    fn initialize(&self, publishable_key: &str);

    fn set_user_id(&self, user_id: Option<&str>);

    /// Whether the location permission is currently granted
    fn check_permission(&self) -> bool;

    /// Start the platform permission flow; the answer arrives asynchronously
    fn request_permission(&self);

    fn start_tracking(&self);

    fn stop_tracking(&self);

    fn is_tracking(&self) -> bool;

    fn track_once(&self, callback: TrackCallback);
}

/// Inbound callbacks from the tracking SDK
///
/// Called on whatever thread the SDK delivers on.
pub trait SdkReceiver: Send + Sync {
    fn on_events_received(&self, events: &[Event], user: Option<&User>);

    fn on_location_updated(&self, location: &Location, user: &User);

    fn on_error(&self, status: &TrackingStatus);

    fn on_client_location_updated(
        &self,
        _location: &Location,
        _stopped: bool,
        _source: LocationSource,
    ) {
    }

    fn on_log(&self, message: &str) {
        log::debug!("[sdk] {}", message);
    }

    fn on_permission_status_updated(&self, _granted: bool) {}
}
