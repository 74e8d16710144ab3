use crate::config::DemoConfig;
use crate::error::{DemoError, DemoResult};
use crate::notifier::format_event;
use crate::sdk::{TrackOutcome, TrackingSdk};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

/// UI surface the controller drives
pub trait ControlView: Send + Sync {
    /// Enable or disable the one-shot track trigger
    fn set_trigger_enabled(&self, enabled: bool);

    /// Short-lived message (snackbar / toast)
    fn show_message(&self, text: &str);

    /// Reflect the tracking switch position without firing its listener
    fn set_tracking_switch(&self, _on: bool) {}
}

/// One-shot trigger state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerState {
    /// Trigger enabled, no request in flight
    Ready,
    /// Request issued, waiting for the SDK callback
    Pending,
}

#[derive(Debug)]
struct ControlState {
    trigger: TriggerState,
    tracking_switch: bool,
    user_id: Option<String>,
}

/// Bridges UI actions to the tracking SDK
pub struct SessionController {
    sdk: Arc<dyn TrackingSdk>,
    view: Arc<dyn ControlView>,
    state: Arc<Mutex<ControlState>>,
}

impl SessionController {
    /// Controller with the trigger enabled and the switch seeded from the SDK.
    /// Makes no lifecycle calls.
    pub fn new(sdk: Arc<dyn TrackingSdk>, view: Arc<dyn ControlView>) -> Self {
        let tracking = sdk.is_tracking();
        view.set_tracking_switch(tracking);

        SessionController {
            sdk,
            view,
            state: Arc::new(Mutex::new(ControlState {
                trigger: TriggerState::Ready,
                tracking_switch: tracking,
                user_id: None,
            })),
        }
    }

    /// Screen start-up: initialize, identify the user, sort out permission.
    /// Never starts or stops tracking.
    pub fn create(
        sdk: Arc<dyn TrackingSdk>,
        view: Arc<dyn ControlView>,
        config: &DemoConfig,
    ) -> DemoResult<Self> {
        let controller = Self::new(sdk, view);
        controller.initialize(&config.publishable_key);
        controller.set_user_id(config.user_id.as_deref())?;
        controller.check_and_request_permission();
        Ok(controller)
    }

    fn lock_state(&self) -> DemoResult<MutexGuard<'_, ControlState>> {
        self.state
            .lock()
            .map_err(|_| DemoError::Internal("Failed to acquire control state lock".to_string()))
    }

    pub fn initialize(&self, publishable_key: &str) {
        if publishable_key.is_empty() {
            log::warn!("[session] initializing without a publishable key");
        }
        self.sdk.initialize(publishable_key);
    }

    pub fn set_user_id(&self, user_id: Option<&str>) -> DemoResult<()> {
        if user_id.is_none() {
            log::warn!("[session] no user id set, tracking will report a user id error");
        }
        self.lock_state()?.user_id = user_id.map(str::to_string);
        self.sdk.set_user_id(user_id);
        Ok(())
    }

    pub fn user_id(&self) -> DemoResult<Option<String>> {
        Ok(self.lock_state()?.user_id.clone())
    }

    /// Ask for the location permission if it is missing.
    /// The answer shows up on the next operation.
    pub fn check_and_request_permission(&self) {
        if self.sdk.check_permission() {
            log::debug!("[session] location permission already granted");
            return;
        }
        log::info!("[session] requesting location permission");
        self.sdk.request_permission();
    }

    pub fn start_tracking(&self) {
        log::info!("[session] start tracking");
        self.sdk.start_tracking();
    }

    pub fn stop_tracking(&self) {
        log::info!("[session] stop tracking");
        self.sdk.stop_tracking();
    }

    /// Tracking switch listener.
    ///
    /// Returns `true` if the SDK was called, `false` when the switch was
    /// already in that position.
    pub fn set_tracking_enabled(&self, on: bool) -> DemoResult<bool> {
        {
            let mut state = self.lock_state()?;
            if state.tracking_switch == on {
                return Ok(false);
            }
            state.tracking_switch = on;
        }

        if on {
            self.start_tracking();
        } else {
            self.stop_tracking();
        }
        Ok(true)
    }

    pub fn is_tracking_switch_on(&self) -> DemoResult<bool> {
        Ok(self.lock_state()?.tracking_switch)
    }

    pub fn trigger_state(&self) -> DemoResult<TriggerState> {
        Ok(self.lock_state()?.trigger)
    }

    /// Trigger listener: fetch location and events once.
    ///
    /// The trigger is disabled until the SDK calls back, whatever the status.
    pub fn track_once(&self) -> DemoResult<()> {
        {
            let mut state = self.lock_state()?;
            if state.trigger == TriggerState::Pending {
                log::warn!("[session] track once ignored, request already in flight");
                return Err(DemoError::TrackInFlight);
            }
            state.trigger = TriggerState::Pending;
        }
        self.view.set_trigger_enabled(false);

        let state = Arc::clone(&self.state);
        let view = Arc::clone(&self.view);
        self.sdk.track_once(Box::new(move |outcome: TrackOutcome| {
            complete_track_once(&state, view.as_ref(), &outcome);
        }));

        Ok(())
    }
}

fn complete_track_once(state: &Mutex<ControlState>, view: &dyn ControlView, outcome: &TrackOutcome) {
    // A poisoned lock must not leave the trigger disabled forever.
    match state.lock() {
        Ok(mut guard) => guard.trigger = TriggerState::Ready,
        Err(poisoned) => poisoned.into_inner().trigger = TriggerState::Ready,
    }
    view.set_trigger_enabled(true);

    let label = outcome.status.label();
    view.show_message(label);

    if !outcome.status.is_success() {
        log::error!("[session] {}", label);
        return;
    }

    log::info!("[session] {}", label);
    if let Some(user) = &outcome.user {
        for geofence in &user.geofences {
            log::info!("[session] {}", geofence.description);
        }
        if let Some(place) = &user.place {
            log::info!("[session] {}", place.name);
        }
    }
    for event in &outcome.events {
        log::info!("[session] {}", format_event(event));
    }
}
