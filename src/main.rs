use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use geotrack_demo::{
    ControlView, DemoConfig, EventNotifier, NotificationTray, Scenario, ScriptedSdk,
    SessionController, NOTIFICATION_ID, NOTIFICATION_TAG,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "geotrack-demo")]
#[command(about = "Tracking SDK demo shell driven by a scripted SDK scenario", long_about = None)]
struct Args {
    /// Scenario JSON describing what the SDK reports
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,

    /// Demo config JSON (publishable key, user id, notification options)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of one-shot track requests to issue
    #[arg(long, default_value = "1")]
    track_once: u32,

    /// Flip the tracking switch on, then off again at the end
    #[arg(long)]
    tracking: bool,
}

/// Prints what a real screen would show
struct ConsoleView;

impl ControlView for ConsoleView {
    fn set_trigger_enabled(&self, enabled: bool) {
        println!("[{}] trigger {}", ts_now(), if enabled { "enabled" } else { "disabled" });
    }

    fn show_message(&self, text: &str) {
        println!("[{}] message: {}", ts_now(), text);
    }

    fn set_tracking_switch(&self, on: bool) {
        println!("[{}] tracking switch {}", ts_now(), if on { "on" } else { "off" });
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = DemoConfig::resolve(args.config.as_deref()).context("Failed to load config")?;
    let scenario = Scenario::load(&args.scenario)
        .with_context(|| format!("Failed to load scenario {}", args.scenario.display()))?;

    let tray = Arc::new(NotificationTray::new());
    let sdk = Arc::new(ScriptedSdk::new(scenario).context("Failed to start scripted SDK")?);
    sdk.set_receiver(Arc::new(EventNotifier::from_config(Arc::clone(&tray), &config)));

    let controller = SessionController::create(sdk.clone(), Arc::new(ConsoleView), &config)?;
    println!(
        "[{}] user id: {}",
        ts_now(),
        controller.user_id()?.as_deref().unwrap_or("-")
    );

    if args.tracking {
        controller.set_tracking_enabled(true)?;
        sdk.flush()?;
    }

    for _ in 0..args.track_once {
        controller.track_once()?;
        sdk.flush()?;
    }

    if args.tracking {
        controller.set_tracking_enabled(false)?;
        sdk.flush()?;
    }

    let history = tray.history();
    println!("[{}] {} notification(s) posted", ts_now(), history.len());
    for notification in &history {
        println!("  {}: {}", notification.title, notification.text);
    }
    if let Some(visible) = tray.visible(NOTIFICATION_TAG, NOTIFICATION_ID) {
        println!("[{}] visible: {}: {}", ts_now(), visible.title, visible.text);
    }

    Ok(())
}

fn ts_now() -> String {
    Utc::now().format("%H:%M:%S%.3f").to_string()
}
