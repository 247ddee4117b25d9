use std::time::Duration;

use anyhow::Result;
use tokio::{
    select,
    sync::mpsc::{Receiver, Sender},
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, trace};

use crate::{
    config::MonitorConfig,
    device::GpuDevice,
    render::Label,
    thermal::{
        gradient::Gradient,
        hotspot::{self, HotspotOffset},
        units::TemperatureUnit,
    },
};

#[derive(Debug)]
pub enum MonitorMessage {
    SetUnit {
        unit: TemperatureUnit,
    },
    UpdateInterval {
        new_duration: Duration,
    },

    // Toggle the readout without stopping the polling
    ToggleDisplay,
}

// Poll the GPU temperature on a fixed interval and drive the readout
pub struct Monitor {
    // The device can be absent on systems with no Nvidia GPU,
    // in that case every poll cycle is skipped
    device: Option<GpuDevice>,

    gradient: Gradient,
    hotspot_offset: HotspotOffset,
    unit: TemperatureUnit,

    warning_threshold: i32,
    warnings_enabled: bool,

    // Update interval of the readout
    update_interval: Duration,
    displayed: bool,

    label: Label,
}

impl Monitor {
    pub fn new(device: Option<GpuDevice>, config: &MonitorConfig) -> Self {
        Self {
            device,

            gradient: config.gradient(),
            hotspot_offset: config.hotspot_offset,
            unit: config.unit,

            warning_threshold: config.warning_threshold,
            warnings_enabled: config.warnings_enabled,

            update_interval: Duration::from_millis(config.update_interval_ms),
            displayed: true,

            label: Label::new(),
        }
    }

    // Run the monitor
    pub async fn run(
        &mut self,
        run_token: CancellationToken,
        mut rx_cmd: Receiver<MonitorMessage>,
        tx_err: Sender<anyhow::Error>,
    ) {
        info!("Monitor: Running");

        if let Some(device) = &self.device {
            info!("Monitor: Polling GPU \"{}\"", device.uuid());
        } else {
            info!("Monitor: No GPU available, poll cycles will be skipped");
        }

        loop {
            select! {
                _ = run_token.cancelled() => {
                    info!("Monitor: Quitting");

                    break;
                },
                message = rx_cmd.recv() => {
                    trace!("Parsing message: {:?}", message);

                    if let Err(err) = self.parse_msg(message) {
                        tx_err.send(err).await.unwrap_or_else(|err| {
                            error!("Failed to send error over channel: {err}");
                        });
                    }
                },
                _ = tokio::time::sleep(self.update_interval) => {
                    // If any error occur send it to the error channel
                    if let Err(err) = self.update() {
                        tx_err.send(err).await.unwrap_or_else(|err| {
                            error!("Failed to send error over channel: {err}");
                        });
                    }
                }
            }
        }
    }

    // Parse the received message and apply the needed changes
    fn parse_msg(&mut self, message: Option<MonitorMessage>) -> Result<()> {
        // Check if the message was None
        if let Some(message) = message {
            match message {
                MonitorMessage::SetUnit { unit } => {
                    trace!("New display unit: {unit}");

                    self.unit = unit;
                }
                MonitorMessage::UpdateInterval { new_duration } => {
                    trace!(
                        "New monitor update interval: {:?}",
                        new_duration
                    );

                    self.update_interval = new_duration;
                }
                MonitorMessage::ToggleDisplay => {
                    self.displayed = !self.displayed;

                    trace!("Readout displayed: {}", self.displayed);

                    // Erase the stale readout line
                    if !self.displayed {
                        self.label.clear()?;
                    }
                }
            }
        }

        Ok(())
    }

    // Poll the GPU once and refresh the readout
    fn update(&mut self) -> Result<()> {
        // A missing device is a steady state, skip the cycle
        let Some(device) = &self.device else {
            trace!("No GPU device, skipping poll cycle");

            return Ok(());
        };

        let raw_temp = device.temperature()? as i32;

        // The hotspot estimate feeds both the gradient and the
        // readout, the warning decision uses the raw reading
        let hotspot_temp = hotspot::estimate(raw_temp, self.hotspot_offset);
        let color = self.gradient.color_at(hotspot_temp);
        let display_temp = self.unit.to_display(hotspot_temp);

        let alert = should_alert(
            raw_temp,
            self.warning_threshold,
            self.warnings_enabled,
        );

        trace!(
            "Poll: raw {raw_temp}°C - hotspot {hotspot_temp}°C - alert: {alert}"
        );

        if self.displayed {
            self.label.update(display_temp, self.unit, color, alert)?;
        }

        Ok(())
    }
}

// Warning decision for one poll cycle
pub fn should_alert(raw_temp: i32, threshold: i32, enabled: bool) -> bool {
    enabled && raw_temp >= threshold
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(90, 90, true, true; "at the threshold")]
    #[test_case(95, 90, true, true; "above the threshold")]
    #[test_case(89, 90, true, false; "below the threshold")]
    #[test_case(95, 90, false, false; "warnings disabled")]
    #[test_case(90, 90, false, false; "warnings disabled at the threshold")]
    fn should_decide_the_warning_bell(
        raw: i32,
        threshold: i32,
        enabled: bool,
        expected: bool,
    ) {
        assert_eq!(should_alert(raw, threshold, enabled), expected);
    }

    #[test]
    fn should_skip_the_poll_cycle_without_a_device() {
        let mut monitor = Monitor::new(None, &MonitorConfig::default());

        assert!(monitor.update().is_ok());
    }

    #[test]
    fn should_apply_messages_to_the_monitor_state() {
        let mut monitor = Monitor::new(None, &MonitorConfig::default());

        monitor
            .parse_msg(Some(MonitorMessage::SetUnit {
                unit: TemperatureUnit::Kelvin,
            }))
            .unwrap();
        monitor
            .parse_msg(Some(MonitorMessage::UpdateInterval {
                new_duration: Duration::from_millis(250),
            }))
            .unwrap();

        assert_eq!(monitor.unit, TemperatureUnit::Kelvin);
        assert_eq!(monitor.update_interval, Duration::from_millis(250));
    }

    #[test]
    fn should_keep_an_interval_override_out_of_the_saved_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = MonitorConfig::default();
        config.update_interval_ms = 2000;
        config.save(&path).unwrap();

        // A run with a transient interval override only touches the
        // monitor state, the settings written back at shutdown keep
        // the persisted interval
        let config = MonitorConfig::load(&path);
        let mut monitor = Monitor::new(None, &config);

        monitor
            .parse_msg(Some(MonitorMessage::UpdateInterval {
                new_duration: Duration::from_millis(100),
            }))
            .unwrap();
        config.save(&path).unwrap();

        assert_eq!(monitor.update_interval, Duration::from_millis(100));
        assert_eq!(MonitorConfig::load(&path).update_interval_ms, 2000);
    }

    #[test]
    fn should_ignore_an_empty_message() {
        let mut monitor = Monitor::new(None, &MonitorConfig::default());

        assert!(monitor.parse_msg(None).is_ok());
    }
}
