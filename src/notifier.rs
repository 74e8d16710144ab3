// Turns SDK callbacks into notifications.
//
// Every notification goes out under `NOTIFICATION_TAG` / `NOTIFICATION_ID`,
// so at most one is visible at a time and each post replaces the last.

use crate::config::DemoConfig;
use crate::model::{Event, EventConfidence, EventType, Location, LocationSource, User};
use crate::notification::{Notification, NotificationSink};
use crate::sdk::SdkReceiver;
use crate::status::TrackingStatus;
use std::sync::Arc;

pub const NOTIFICATION_TAG: &str = "GeotrackReceiver";
pub const NOTIFICATION_ID: i32 = 1337;

/// Stand-in for a missing geofence, place, chain or region
pub const PLACEHOLDER: &str = "-";

pub const TITLE_EVENT: &str = "Event";
pub const TITLE_LOCATION: &str = "Location";
pub const TITLE_ERROR: &str = "Error";

/// One-line description of an event
pub fn format_event(event: &Event) -> String {
    match &event.kind {
        EventType::EnteredGeofence => format!("Entered geofence {}", geofence_description(event)),
        EventType::ExitedGeofence => format!("Exited geofence {}", geofence_description(event)),
        EventType::EnteredHome => "Entered home".to_string(),
        EventType::ExitedHome => "Exited home".to_string(),
        EventType::EnteredOffice => "Entered office".to_string(),
        EventType::ExitedOffice => "Exited office".to_string(),
        EventType::StartedTraveling => "Started traveling".to_string(),
        EventType::StoppedTraveling => "Stopped traveling".to_string(),
        EventType::EnteredPlace => format!("Entered place {}", place_name(event)),
        EventType::ExitedPlace => format!("Exited place {}", place_name(event)),
        EventType::NearbyPlaceChain => {
            let chain = event
                .place
                .as_ref()
                .and_then(|p| p.chain.as_ref())
                .map_or(PLACEHOLDER, |c| c.name.as_str());
            format!("Nearby chain {}", chain)
        }
        EventType::EnteredRegionCountry => format!("Entered country {}", region_name(event)),
        EventType::ExitedRegionCountry => format!("Exited country {}", region_name(event)),
        EventType::EnteredRegionState => format!("Entered state {}", region_name(event)),
        EventType::ExitedRegionState => format!("Exited state {}", region_name(event)),
        EventType::EnteredRegionDma => format!("Entered DMA {}", region_name(event)),
        EventType::ExitedRegionDma => format!("Exited DMA {}", region_name(event)),
        EventType::Other(_) => PLACEHOLDER.to_string(),
    }
}

fn geofence_description(event: &Event) -> &str {
    event
        .geofence
        .as_ref()
        .map_or(PLACEHOLDER, |g| g.description.as_str())
}

fn place_name(event: &Event) -> &str {
    event.place.as_ref().map_or(PLACEHOLDER, |p| p.name.as_str())
}

fn region_name(event: &Event) -> &str {
    event.region.as_ref().map_or(PLACEHOLDER, |r| r.name.as_str())
}

/// Like `format_event`, with the confidence appended to recognized events
pub fn format_event_with_confidence(event: &Event) -> String {
    let text = format_event(event);
    if matches!(event.kind, EventType::Other(_)) {
        return text;
    }
    format!("{} with {}", text, describe_confidence(event.confidence))
}

pub fn describe_confidence(confidence: EventConfidence) -> &'static str {
    match confidence {
        EventConfidence::Low => "low confidence",
        EventConfidence::Medium => "medium confidence",
        EventConfidence::High => "high confidence",
        EventConfidence::Unknown => "unknown confidence",
    }
}

pub fn describe_source(source: LocationSource) -> &'static str {
    match source {
        LocationSource::ForegroundLocation => "foreground location",
        LocationSource::BackgroundLocation => "background location",
        LocationSource::ManualLocation => "manual location",
        LocationSource::GeofenceEnter => "geofence enter",
        LocationSource::GeofenceDwell => "geofence dwell",
        LocationSource::GeofenceExit => "geofence exit",
        LocationSource::Unknown => "unknown",
    }
}

/// `Stopped at location (lat, lng) with accuracy N meters`, or `Moved to ...`
pub fn format_location(location: &Location, stopped: bool) -> String {
    let state = if stopped { "Stopped at" } else { "Moved to" };
    format!(
        "{} location ({:.6}, {:.6}) with accuracy {} meters",
        state,
        location.latitude,
        location.longitude,
        location.accuracy as i64
    )
}

pub fn format_client_location(location: &Location, stopped: bool, source: LocationSource) -> String {
    let state = if stopped {
        "Client stopped at"
    } else {
        "Client moved to"
    };
    format!(
        "{} location ({:.6}, {:.6}) with accuracy {} meters and source {}",
        state,
        location.latitude,
        location.longitude,
        location.accuracy as i64,
        describe_source(source)
    )
}

/// Receiver that posts SDK callbacks to a `NotificationSink`
pub struct EventNotifier<N: NotificationSink> {
    sink: Arc<N>,
    notify_errors: bool,
    notify_client_locations: bool,
    include_confidence: bool,
}

impl<N: NotificationSink> EventNotifier<N> {
    pub fn new(sink: Arc<N>) -> Self {
        Self::from_config(sink, &DemoConfig::default())
    }

    pub fn from_config(sink: Arc<N>, config: &DemoConfig) -> Self {
        Self {
            sink,
            notify_errors: config.notify_errors,
            notify_client_locations: config.notify_client_locations,
            include_confidence: config.include_confidence,
        }
    }

    pub fn event_text(&self, event: &Event) -> String {
        if self.include_confidence {
            format_event_with_confidence(event)
        } else {
            format_event(event)
        }
    }

    fn notify(&self, title: &str, text: &str) {
        self.sink
            .post(Notification::new(NOTIFICATION_TAG, NOTIFICATION_ID, title, text));
    }
}

impl<N: NotificationSink> SdkReceiver for EventNotifier<N> {
    fn on_events_received(&self, events: &[Event], user: Option<&User>) {
        log::debug!(
            "[receiver] {} event(s) for user {:?}",
            events.len(),
            user.and_then(|u| u.user_id.as_deref())
        );
        for event in events {
            let text = self.event_text(event);
            self.notify(TITLE_EVENT, &text);
        }
    }

    fn on_location_updated(&self, location: &Location, user: &User) {
        let text = format_location(location, user.stopped);
        self.notify(TITLE_LOCATION, &text);
    }

    fn on_error(&self, status: &TrackingStatus) {
        let label = status.label();
        if self.notify_errors {
            self.notify(TITLE_ERROR, label);
        } else {
            log::error!("[receiver] {} ({})", label, status.code());
        }
    }

    fn on_client_location_updated(&self, location: &Location, stopped: bool, source: LocationSource) {
        let text = format_client_location(location, stopped, source);
        if self.notify_client_locations {
            self.notify(TITLE_LOCATION, &text);
        } else {
            log::info!("[receiver] {}", text);
        }
    }

    fn on_permission_status_updated(&self, granted: bool) {
        log::info!(
            "[receiver] location permission {}",
            if granted { "granted" } else { "denied" }
        );
    }
}
