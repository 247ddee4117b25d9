use std::time::Duration;

use anyhow::Result;
use gputempd::{
    arg_parser::ArgsOptions,
    config::MonitorConfig,
    device::GpuDevice,
    logger,
    monitor::{Monitor, MonitorMessage},
};
use tokio::{
    select,
    signal::{
        ctrl_c,
        unix::{SignalKind, signal},
    },
    sync::mpsc,
};
use tokio_util::{sync::CancellationToken, task::TaskTracker};

use tracing::{error, warn};

#[tokio::main]
async fn main() -> Result<()> {
    logger::init_logging();

    // Parse the command line arguments
    let args_options = ArgsOptions::parse();

    // Load the persisted settings
    let config = MonitorConfig::load(&args_options.config_file_path);

    // This token and tracker will be used to handle graceful shutdown
    let tracker = TaskTracker::new();
    let token = CancellationToken::new();

    // Use thin channel to move errors to the main task for logging
    let (tx_err, mut rx_err) = mpsc::channel(16);

    // Acquire the telemetry handle once for the process lifetime.
    // A missing driver or GPU leaves the monitor polling nothing
    let device = GpuDevice::probe();

    // Start the monitor
    let (tx_monitor, rx_monitor) = mpsc::channel(16);
    {
        let token = token.clone();
        let tx_err = tx_err.clone();
        let config = config.clone();

        tracker.spawn(async move {
            let mut monitor = Monitor::new(device, &config);
            monitor.run(token, rx_monitor, tx_err).await;
        });
    }

    // Apply the interval override as a message to the running
    // monitor, the persisted settings stay untouched
    if let Some(interval_ms) = args_options.interval_ms {
        let message = MonitorMessage::UpdateInterval {
            new_duration: Duration::from_millis(interval_ms),
        };

        if let Err(err) = tx_monitor.send(message).await {
            error!("Failed to send message to the monitor: {err}");
        }
    }

    // SIGUSR1 toggles the readout without stopping the polling,
    // SIGUSR2 cycles the display unit
    let mut toggle_signal = signal(SignalKind::user_defined1())?;
    let mut unit_signal = signal(SignalKind::user_defined2())?;

    let mut unit = config.unit;

    loop {
        select! {
            _ = ctrl_c() => { break; },
            _ = toggle_signal.recv() => {
                let message = MonitorMessage::ToggleDisplay;

                if let Err(err) = tx_monitor.send(message).await {
                    error!("Failed to send message to the monitor: {err}");
                }
            },
            _ = unit_signal.recv() => {
                unit = unit.cycle();
                let message = MonitorMessage::SetUnit { unit };

                if let Err(err) = tx_monitor.send(message).await {
                    error!("Failed to send message to the monitor: {err}");
                }
            },
            err_msg = rx_err.recv() => {
                if let Some(err) = err_msg {
                    // Log the full error chain
                    for e in err.chain() {
                        error!("{e}");
                    }
                }
            }
        }
    }

    // Cancel the token to communicate the program
    // termination to the running tasks
    token.cancel();

    // Wait for the tasks to finish
    tracker.close();
    tracker.wait().await;

    // Persist the settings for the next run
    if let Err(err) = config.save(&args_options.config_file_path) {
        warn!("Failed to save configuration: {err}");
    }

    Ok(())
}
