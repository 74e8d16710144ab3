// Scripted stand-in for the tracking SDK.
//
// Behaves like the real collaborator from the shell's point of view: setup
// calls return nothing and problems come back later as a status, results are
// delivered asynchronously on a worker thread, and start/stop are
// idempotent. What it reports is read from a JSON `Scenario`.

use crate::error::{DemoError, DemoResult};
use crate::model::{Event, Location, LocationSource, User};
use crate::sdk::{SdkReceiver, TrackCallback, TrackOutcome, TrackingSdk};
use crate::status::TrackingStatus;
use crossbeam::channel::{self, Sender};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

/// Something the SDK pushes to the receiver while tracking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrackingUpdate {
    Events {
        events: Vec<Event>,
        #[serde(default)]
        user: Option<User>,
    },
    Location {
        location: Location,
        #[serde(default)]
        user: User,
    },
    ClientLocation {
        location: Location,
        #[serde(default)]
        stopped: bool,
        source: LocationSource,
    },
    Error {
        status: TrackingStatus,
    },
    Log {
        message: String,
    },
}

/// What the scripted SDK will report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub permission_granted: bool,
    /// Whether a permission request gets granted
    pub grant_on_request: bool,
    /// SDK was already tracking when the screen opened
    pub already_tracking: bool,
    /// Answers for successive track-once requests; an exhausted queue
    /// answers with a location error
    pub track_once: Vec<TrackOutcome>,
    /// Pushed to the receiver the first time tracking starts
    pub tracking_updates: Vec<TrackingUpdate>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            permission_granted: true,
            grant_on_request: true,
            already_tracking: false,
            track_once: Vec::new(),
            tracking_updates: Vec::new(),
        }
    }
}

impl Scenario {
    pub fn from_json(json: &str) -> DemoResult<Self> {
        serde_json::from_str(json).map_err(|e| DemoError::Scenario(e.to_string()))
    }

    pub fn load(path: &Path) -> DemoResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

/// SDK call as seen by the scripted SDK, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkCall {
    Initialize(String),
    SetUserId(Option<String>),
    CheckPermission,
    RequestPermission,
    StartTracking,
    StopTracking,
    TrackOnce,
}

enum Delivery {
    Complete {
        callback: TrackCallback,
        outcome: TrackOutcome,
    },
    Update {
        receiver: Arc<dyn SdkReceiver>,
        update: TrackingUpdate,
    },
    Permission {
        receiver: Arc<dyn SdkReceiver>,
        granted: bool,
    },
    Flush(Sender<()>),
}

fn deliver(delivery: Delivery) {
    match delivery {
        Delivery::Complete { callback, outcome } => callback(outcome),
        Delivery::Update { receiver, update } => match update {
            TrackingUpdate::Events { events, user } => {
                receiver.on_events_received(&events, user.as_ref())
            }
            TrackingUpdate::Location { location, user } => {
                receiver.on_location_updated(&location, &user)
            }
            TrackingUpdate::ClientLocation {
                location,
                stopped,
                source,
            } => receiver.on_client_location_updated(&location, stopped, source),
            TrackingUpdate::Error { status } => receiver.on_error(&status),
            TrackingUpdate::Log { message } => receiver.on_log(&message),
        },
        Delivery::Permission { receiver, granted } => receiver.on_permission_status_updated(granted),
        Delivery::Flush(done) => {
            let _ = done.send(());
        }
    }
}

#[derive(Debug)]
struct SdkState {
    publishable_key: Option<String>,
    user_id: Option<String>,
    permission_granted: bool,
    grant_on_request: bool,
    tracking: bool,
    responses: VecDeque<TrackOutcome>,
    updates: Vec<TrackingUpdate>,
}

impl SdkState {
    /// Status the setup calls left behind, checked in SDK order
    fn setup_error(&self) -> Option<TrackingStatus> {
        let missing = |value: &Option<String>| value.as_deref().map_or(true, str::is_empty);

        if missing(&self.publishable_key) {
            Some(TrackingStatus::ErrorPublishableKey)
        } else if missing(&self.user_id) {
            Some(TrackingStatus::ErrorUserId)
        } else if !self.permission_granted {
            Some(TrackingStatus::ErrorPermissions)
        } else {
            None
        }
    }
}

pub struct ScriptedSdk {
    state: Mutex<SdkState>,
    receiver: Mutex<Option<Arc<dyn SdkReceiver>>>,
    calls: Mutex<Vec<SdkCall>>,
    tx: Sender<Delivery>,
}

impl ScriptedSdk {
    /// Spawn the delivery thread and load the scenario
    pub fn new(scenario: Scenario) -> DemoResult<Self> {
        let (tx, rx) = channel::unbounded::<Delivery>();

        thread::Builder::new()
            .name("scripted-sdk".to_string())
            .spawn(move || {
                for delivery in rx {
                    deliver(delivery);
                }
                log::debug!("[sdk] delivery thread finished");
            })?;

        let state = SdkState {
            publishable_key: None,
            user_id: None,
            permission_granted: scenario.permission_granted,
            grant_on_request: scenario.grant_on_request,
            tracking: scenario.already_tracking,
            responses: scenario.track_once.into(),
            updates: scenario.tracking_updates,
        };

        Ok(ScriptedSdk {
            state: Mutex::new(state),
            receiver: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            tx,
        })
    }

    /// Register the receiver for asynchronous callbacks
    pub fn set_receiver(&self, receiver: Arc<dyn SdkReceiver>) {
        *lock(&self.receiver) = Some(receiver);
    }

    /// Calls made so far
    pub fn calls(&self) -> Vec<SdkCall> {
        lock(&self.calls).clone()
    }

    /// Block until everything queued so far has been delivered
    pub fn flush(&self) -> DemoResult<()> {
        let (done_tx, done_rx) = channel::bounded(1);
        self.tx
            .send(Delivery::Flush(done_tx))
            .map_err(|_| DemoError::WorkerUnavailable("delivery thread gone".to_string()))?;
        done_rx
            .recv()
            .map_err(|_| DemoError::WorkerUnavailable("flush not acknowledged".to_string()))
    }

    fn record(&self, call: SdkCall) {
        log::debug!("[sdk] {:?}", call);
        lock(&self.calls).push(call);
    }

    fn current_receiver(&self) -> Option<Arc<dyn SdkReceiver>> {
        lock(&self.receiver).clone()
    }

    fn enqueue(&self, delivery: Delivery) {
        // Delivering inline keeps the exactly-once callback promise if the
        // worker has gone away.
        if let Err(channel::SendError(delivery)) = self.tx.send(delivery) {
            log::warn!("[sdk] delivery thread gone, delivering inline");
            deliver(delivery);
        }
    }

    fn push_update(&self, update: TrackingUpdate) {
        match self.current_receiver() {
            Some(receiver) => self.enqueue(Delivery::Update { receiver, update }),
            None => log::warn!("[sdk] no receiver registered, dropping {:?}", update),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl TrackingSdk for ScriptedSdk {
    fn initialize(&self, publishable_key: &str) {
        self.record(SdkCall::Initialize(publishable_key.to_string()));
        lock(&self.state).publishable_key = Some(publishable_key.to_string());
    }

    fn set_user_id(&self, user_id: Option<&str>) {
        self.record(SdkCall::SetUserId(user_id.map(str::to_string)));
        lock(&self.state).user_id = user_id.map(str::to_string);
    }

    fn check_permission(&self) -> bool {
        self.record(SdkCall::CheckPermission);
        lock(&self.state).permission_granted
    }

    fn request_permission(&self) {
        self.record(SdkCall::RequestPermission);
        let granted = {
            let mut state = lock(&self.state);
            if state.grant_on_request {
                state.permission_granted = true;
            }
            state.permission_granted
        };
        if let Some(receiver) = self.current_receiver() {
            self.enqueue(Delivery::Permission { receiver, granted });
        }
    }

    fn start_tracking(&self) {
        self.record(SdkCall::StartTracking);
        let pending = {
            let mut state = lock(&self.state);
            if state.tracking {
                log::debug!("[sdk] already tracking");
                return;
            }
            state.tracking = true;
            match state.setup_error() {
                Some(status) => vec![TrackingUpdate::Error { status }],
                None => std::mem::take(&mut state.updates),
            }
        };

        for update in pending {
            self.push_update(update);
        }
    }

    fn stop_tracking(&self) {
        self.record(SdkCall::StopTracking);
        lock(&self.state).tracking = false;
    }

    fn is_tracking(&self) -> bool {
        lock(&self.state).tracking
    }

    fn track_once(&self, callback: TrackCallback) {
        self.record(SdkCall::TrackOnce);
        let outcome = {
            let mut state = lock(&self.state);
            match state.setup_error() {
                Some(status) => TrackOutcome::failed(status),
                None => state
                    .responses
                    .pop_front()
                    .unwrap_or_else(|| TrackOutcome::failed(TrackingStatus::ErrorLocation)),
            }
        };

        if outcome.status.is_success() && !outcome.events.is_empty() {
            self.push_update(TrackingUpdate::Events {
                events: outcome.events.clone(),
                user: outcome.user.clone(),
            });
        }
        self.enqueue(Delivery::Complete { callback, outcome });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EventType;
    use std::sync::mpsc;

    fn ready_sdk(scenario: Scenario) -> ScriptedSdk {
        let sdk = ScriptedSdk::new(scenario).unwrap();
        sdk.initialize("prj_test_pk");
        sdk.set_user_id(Some("user-1"));
        sdk
    }

    fn track_and_wait(sdk: &ScriptedSdk) -> TrackOutcome {
        let (tx, rx) = mpsc::channel();
        sdk.track_once(Box::new(move |outcome: TrackOutcome| {
            tx.send(outcome).unwrap();
        }));
        sdk.flush().unwrap();
        rx.recv().unwrap()
    }

    #[test]
    fn test_setup_errors_in_order() {
        let sdk = ScriptedSdk::new(Scenario {
            permission_granted: false,
            grant_on_request: false,
            ..Scenario::default()
        })
        .unwrap();

        assert_eq!(track_and_wait(&sdk).status, TrackingStatus::ErrorPublishableKey);
        sdk.initialize("prj_test_pk");
        assert_eq!(track_and_wait(&sdk).status, TrackingStatus::ErrorUserId);
        sdk.set_user_id(Some("user-1"));
        assert_eq!(track_and_wait(&sdk).status, TrackingStatus::ErrorPermissions);
    }

    #[test]
    fn test_permission_granted_on_request() {
        let sdk = ready_sdk(Scenario {
            permission_granted: false,
            ..Scenario::default()
        });
        assert!(!sdk.check_permission());
        sdk.request_permission();
        assert!(sdk.check_permission());
    }

    #[test]
    fn test_responses_consumed_in_order() {
        let sdk = ready_sdk(Scenario {
            track_once: vec![
                TrackOutcome {
                    status: TrackingStatus::Success,
                    location: Some(Location::new(1.0, 2.0, 10.0)),
                    events: vec![Event::new(EventType::EnteredHome)],
                    user: None,
                },
                TrackOutcome::failed(TrackingStatus::ErrorServer),
            ],
            ..Scenario::default()
        });

        let first = track_and_wait(&sdk);
        assert!(first.status.is_success());
        assert_eq!(first.events.len(), 1);
        assert_eq!(track_and_wait(&sdk).status, TrackingStatus::ErrorServer);
        assert_eq!(track_and_wait(&sdk).status, TrackingStatus::ErrorLocation);
    }

    #[test]
    fn test_start_is_idempotent() {
        let sdk = ready_sdk(Scenario::default());
        sdk.start_tracking();
        sdk.start_tracking();
        assert!(sdk.is_tracking());
        sdk.stop_tracking();
        sdk.stop_tracking();
        assert!(!sdk.is_tracking());

        let starts = sdk
            .calls()
            .into_iter()
            .filter(|c| *c == SdkCall::StartTracking)
            .count();
        assert_eq!(starts, 2);
    }

    #[test]
    fn test_scenario_json() {
        let scenario = Scenario::from_json(
            r#"{
                "permission_granted": false,
                "track_once": [{"status": "SUCCESS", "events": [{"type": "user.entered_office"}]}],
                "tracking_updates": [
                    {"kind": "location", "location": {"latitude": 1.5, "longitude": 2.5, "accuracy": 8}, "user": {"stopped": true}},
                    {"kind": "error", "status": "ERROR_NETWORK"},
                    {"kind": "client_location", "location": {"latitude": 1, "longitude": 2, "accuracy": 3}, "source": "BACKGROUND_LOCATION"}
                ]
            }"#,
        )
        .unwrap();

        assert!(!scenario.permission_granted);
        assert!(scenario.grant_on_request);
        assert_eq!(scenario.track_once.len(), 1);
        assert_eq!(scenario.tracking_updates.len(), 3);
        assert_eq!(
            scenario.tracking_updates[1],
            TrackingUpdate::Error {
                status: TrackingStatus::ErrorNetwork
            }
        );
    }

    #[test]
    fn test_bad_scenario_is_scenario_error() {
        let err = Scenario::from_json(r#"{"track_once": 3}"#).unwrap_err();
        assert!(matches!(err, DemoError::Scenario(_)));
    }
}
