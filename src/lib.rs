// Geotrack demo shell
// Wires UI actions and tracking SDK callbacks together: a session controller
// for the SDK lifecycle and a receiver that turns callbacks into notifications

pub mod config;
pub mod error;
pub mod model;
pub mod notification;
pub mod notifier;
pub mod scripted;
pub mod sdk;
pub mod session;
pub mod status;

pub use config::DemoConfig;
pub use error::{DemoError, DemoResult};
pub use model::{Event, EventConfidence, EventType, Geofence, Location, LocationSource, Place, User};
pub use notification::{LogSink, Notification, NotificationSink, NotificationTray};
pub use notifier::{format_event, format_location, EventNotifier, NOTIFICATION_ID, NOTIFICATION_TAG};
pub use scripted::{Scenario, ScriptedSdk, SdkCall, TrackingUpdate};
pub use sdk::{SdkReceiver, TrackCallback, TrackOutcome, TrackingSdk};
pub use session::{ControlView, SessionController, TriggerState};
pub use status::TrackingStatus;
