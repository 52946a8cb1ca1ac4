//! Waypost CLI - command-line tracking daemon
//!
//! Wires the library's tracking runtime to the bundled UDP location source
//! and runs until interrupted. The nightly quiet window stops the loop and
//! the in-process wake scheduler re-enters it fresh when the resume fires.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use waypost::battery::SysfsBatteryReader;
use waypost::config::{config_file_path, ConfigFile};
use waypost::logging::init_logging;
use waypost::source::{UdpLocationSource, UdpLocationSourceConfig};
use waypost::tracker::{
    Connectivity, FileStatusLog, NoopWakeLock, Notifier, StaticConnectivity, StatusLog,
    StopReason, SystemClock, Tracker, TrackerCollaborators, TrackerRuntime,
};
use waypost::wake::TokioWakeScheduler;

#[derive(Parser)]
#[command(name = "waypost")]
#[command(version = waypost::VERSION)]
#[command(about = "Track device position and keep a bounded status history", long_about = None)]
struct Args {
    /// Config file path (created with defaults when absent)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the UDP listen port from the config file
    #[arg(long)]
    port: Option<u16>,

    /// Directory for session logs
    #[arg(long, default_value = "logs")]
    log_dir: String,

    /// Battery power supply name under /sys/class/power_supply
    #[arg(long, default_value = SysfsBatteryReader::DEFAULT_SUPPLY)]
    battery: String,
}

/// Notifier surfacing status text through the session log.
struct LogNotifier;

impl Notifier for LogNotifier {
    fn update(&self, text: &str) {
        info!(status = text, "Status");
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let _logging_guard = match init_logging(&args.log_dir, "waypost.log") {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(1);
        }
    };

    let config_path = args.config.clone().unwrap_or_else(config_file_path);
    let mut config = match ConfigFile::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!(path = %config_path.display(), error = %e, "Failed to load config");
            process::exit(1);
        }
    };
    if let Some(port) = args.port {
        config.source.udp_port = port;
    }

    // Auto-resume decision, read once at cold start.
    if config.tracking.is_tracked {
        warn!("is_tracked flag set, tracking is managed externally; exiting");
        return;
    }

    info!(version = waypost::VERSION, "Waypost starting");

    if let Err(e) = run(&args, &config).await {
        error!(error = %e, "Tracking failed");
        process::exit(1);
    }
}

/// Run tracking sessions until interrupted.
///
/// Each quiet-hour shutdown ends the current session; the wake scheduler's
/// resume starts the next one from scratch.
async fn run(args: &Args, config: &ConfigFile) -> Result<(), waypost::source::SourceError> {
    let (wake_scheduler, mut resume_rx) = TokioWakeScheduler::new();
    let wake_scheduler = Arc::new(wake_scheduler);

    loop {
        let (event_tx, event_rx) = mpsc::channel(32);
        let source = UdpLocationSource::new(
            UdpLocationSourceConfig {
                port: config.source.udp_port,
                request: config.location_request(),
            },
            event_tx,
        );
        let source_handle = source.start();

        let status_log: Option<Arc<dyn StatusLog>> = if config.logging.status_log {
            Some(Arc::new(FileStatusLog::new(
                config.logging.status_log_path.clone(),
            )))
        } else {
            None
        };
        let tracker = Tracker::new(
            config.tracker_config(),
            Arc::new(SysfsBatteryReader::new(&args.battery)),
            status_log,
        );
        let runtime = TrackerRuntime::start(
            tracker,
            event_rx,
            TrackerCollaborators {
                notifier: Arc::new(LogNotifier),
                wake_scheduler: wake_scheduler.clone(),
                wake_lock: Arc::new(NoopWakeLock),
                connectivity: Arc::new(StaticConnectivity(Connectivity::Connected)),
                clock: Arc::new(SystemClock),
            },
        );

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                runtime.stop().await;
                source_handle.abort();
                return Ok(());
            }
            _ = runtime.stopped() => {}
        }

        let reason = runtime.stop_reason();
        runtime.stop().await;

        match reason {
            Some(StopReason::Sleeping) => {
                source_handle.abort();
                info!("Sleeping until the scheduled resume");
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        info!("Interrupted during quiet window, shutting down");
                        return Ok(());
                    }
                    fired = resume_rx.recv() => {
                        if fired.is_none() {
                            return Ok(());
                        }
                        info!("Resume fired, restarting tracking");
                    }
                }
            }
            reason => {
                // A source that failed to start (e.g. port in use) shows up
                // here as a closed channel; surface its error.
                if source_handle.is_finished() {
                    if let Ok(Err(e)) = source_handle.await {
                        return Err(e);
                    }
                } else {
                    source_handle.abort();
                }
                warn!(?reason, "Tracking loop ended");
                return Ok(());
            }
        }
    }
}
