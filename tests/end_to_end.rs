use geotrack_demo::{
    ControlView, DemoConfig, EventNotifier, NotificationTray, Scenario, ScriptedSdk, SdkCall,
    SessionController, TrackingStatus, TriggerState, NOTIFICATION_ID, NOTIFICATION_TAG,
};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingView {
    trigger: Mutex<Vec<bool>>,
    messages: Mutex<Vec<String>>,
}

impl ControlView for RecordingView {
    fn set_trigger_enabled(&self, enabled: bool) {
        self.trigger.lock().unwrap().push(enabled);
    }

    fn show_message(&self, text: &str) {
        self.messages.lock().unwrap().push(text.to_string());
    }
}

struct Harness {
    sdk: Arc<ScriptedSdk>,
    tray: Arc<NotificationTray>,
    view: Arc<RecordingView>,
    controller: SessionController,
}

fn harness(scenario_json: &str, config: DemoConfig) -> Harness {
    let scenario = Scenario::from_json(scenario_json).unwrap();
    let sdk = Arc::new(ScriptedSdk::new(scenario).unwrap());
    let tray = Arc::new(NotificationTray::new());
    sdk.set_receiver(Arc::new(EventNotifier::from_config(tray.clone(), &config)));

    let view = Arc::new(RecordingView::default());
    let controller = SessionController::create(sdk.clone(), view.clone(), &config).unwrap();

    Harness {
        sdk,
        tray,
        view,
        controller,
    }
}

fn configured() -> DemoConfig {
    DemoConfig {
        publishable_key: "prj_test_pk_0000".to_string(),
        user_id: Some("device-1234".to_string()),
        ..DemoConfig::default()
    }
}

fn tracking_calls(sdk: &ScriptedSdk) -> Vec<SdkCall> {
    sdk.calls()
        .into_iter()
        .filter(|c| matches!(c, SdkCall::StartTracking | SdkCall::StopTracking))
        .collect()
}

#[test]
fn test_switch_drives_start_and_stop() {
    let h = harness("{}", configured());
    assert!(tracking_calls(&h.sdk).is_empty());

    h.controller.set_tracking_enabled(true).unwrap();
    assert_eq!(tracking_calls(&h.sdk), vec![SdkCall::StartTracking]);

    h.controller.set_tracking_enabled(false).unwrap();
    assert_eq!(
        tracking_calls(&h.sdk),
        vec![SdkCall::StartTracking, SdkCall::StopTracking]
    );
}

#[test]
fn test_switch_seeded_from_running_sdk() {
    let h = harness(r#"{"already_tracking": true}"#, configured());
    assert!(h.controller.is_tracking_switch_on().unwrap());

    // Already on: the listener does nothing until the switch moves.
    assert!(!h.controller.set_tracking_enabled(true).unwrap());
    assert!(tracking_calls(&h.sdk).is_empty());
}

#[test]
fn test_creation_sequence() {
    let h = harness(r#"{"permission_granted": false}"#, configured());
    assert_eq!(
        h.sdk.calls(),
        vec![
            SdkCall::Initialize("prj_test_pk_0000".to_string()),
            SdkCall::SetUserId(Some("device-1234".to_string())),
            SdkCall::CheckPermission,
            SdkCall::RequestPermission,
        ]
    );
}

#[test]
fn test_track_once_two_geofence_events() {
    let h = harness(
        r#"{
            "track_once": [{
                "status": "SUCCESS",
                "location": {"latitude": 37.7749, "longitude": -122.4194, "accuracy": 15.2},
                "events": [
                    {"type": "user.entered_geofence", "geofence": {"description": "Home Zone"}},
                    {"type": "user.exited_geofence", "geofence": {"description": "Home Zone"}}
                ],
                "user": {"userId": "device-1234", "geofences": [{"description": "Home Zone"}]}
            }]
        }"#,
        configured(),
    );

    h.controller.track_once().unwrap();
    h.sdk.flush().unwrap();

    let history = h.tray.history();
    let texts: Vec<&str> = history.iter().map(|n| n.text.as_str()).collect();
    assert_eq!(texts, vec!["Entered geofence Home Zone", "Exited geofence Home Zone"]);
    assert!(history
        .iter()
        .all(|n| n.tag == NOTIFICATION_TAG && n.id == NOTIFICATION_ID));

    let visible = h.tray.visible(NOTIFICATION_TAG, NOTIFICATION_ID).unwrap();
    assert_eq!(visible.text, "Exited geofence Home Zone");
    assert_eq!(h.tray.visible_count(), 1);

    assert_eq!(*h.view.trigger.lock().unwrap(), vec![false, true]);
    assert_eq!(*h.view.messages.lock().unwrap(), vec!["Success".to_string()]);
    assert_eq!(h.controller.trigger_state().unwrap(), TriggerState::Ready);
}

#[test]
fn test_track_once_without_user_id() {
    let config = DemoConfig {
        user_id: None,
        ..configured()
    };
    let h = harness("{}", config);

    h.controller.track_once().unwrap();
    h.sdk.flush().unwrap();

    assert_eq!(*h.view.trigger.lock().unwrap(), vec![false, true]);
    assert_eq!(*h.view.messages.lock().unwrap(), vec!["User ID Error".to_string()]);
    assert!(h.tray.history().is_empty());
}

#[test]
fn test_denied_permission_surfaces_on_track() {
    let h = harness(
        r#"{"permission_granted": false, "grant_on_request": false}"#,
        configured(),
    );

    h.controller.track_once().unwrap();
    h.sdk.flush().unwrap();

    assert_eq!(
        *h.view.messages.lock().unwrap(),
        vec![TrackingStatus::ErrorPermissions.label().to_string()]
    );
}

#[test]
fn test_tracking_updates_replace_one_notification() {
    let h = harness(
        r#"{
            "tracking_updates": [
                {"kind": "events", "events": [{"type": "user.started_traveling"}]},
                {"kind": "location", "location": {"latitude": 51.5, "longitude": -0.12, "accuracy": 20.7}, "user": {"stopped": false}},
                {"kind": "log", "message": "tracking loop tick"},
                {"kind": "error", "status": "ERROR_RATE_LIMIT"}
            ]
        }"#,
        configured(),
    );

    h.controller.set_tracking_enabled(true).unwrap();
    h.sdk.flush().unwrap();

    let texts: Vec<String> = h.tray.history().into_iter().map(|n| n.text).collect();
    assert_eq!(
        texts,
        vec![
            "Started traveling".to_string(),
            "Moved to location (51.500000, -0.120000) with accuracy 20 meters".to_string(),
            "Unknown Error".to_string(),
        ]
    );
    assert_eq!(h.tray.visible_count(), 1);
}

#[test]
fn test_missing_key_reported_while_tracking() {
    let config = DemoConfig {
        publishable_key: String::new(),
        ..configured()
    };
    let h = harness(
        r#"{"tracking_updates": [{"kind": "events", "events": [{"type": "user.entered_home"}]}]}"#,
        config,
    );

    h.controller.set_tracking_enabled(true).unwrap();
    h.sdk.flush().unwrap();

    let visible = h.tray.visible(NOTIFICATION_TAG, NOTIFICATION_ID).unwrap();
    assert_eq!(visible.title, "Error");
    assert_eq!(visible.text, "Publishable Key Error");
    assert_eq!(h.tray.history().len(), 1);
}
