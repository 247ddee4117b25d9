use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::thermal::{
    gradient::{Gradient, Rgb},
    hotspot::HotspotOffset,
    units::TemperatureUnit,
};

// Flat persisted monitor settings.
// Every field has a default so a partial file still loads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    // Readout surface geometry, carried for the display front end
    pub width: u32,
    pub height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
    pub font: String,

    pub unit: TemperatureUnit,
    // Poll period for the temperature readout
    pub update_interval_ms: u64,

    // The warning bell fires when the raw die temperature reaches
    // this threshold
    pub warning_threshold: i32,
    pub warnings_enabled: bool,

    pub hotspot_offset: HotspotOffset,
    // Gradient breakpoints as (temperature, color) pairs
    pub gradient_points: Vec<(i32, Rgb)>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 50,
            offset_x: -20,
            offset_y: 20,
            font: "Courier New".to_string(),

            unit: TemperatureUnit::default(),
            update_interval_ms: 1000,

            warning_threshold: 90,
            warnings_enabled: true,

            hotspot_offset: HotspotOffset::default(),
            gradient_points: vec![
                (50, (0, 255, 0).into()),
                (60, (255, 255, 0).into()),
                (70, (255, 165, 0).into()),
                (80, (255, 69, 0).into()),
                (90, (128, 0, 0).into()),
            ],
        }
    }
}

impl MonitorConfig {
    // Load the configuration from the given path.
    // A missing or unreadable file falls back to the defaults
    pub fn load(path: &Path) -> Self {
        match Self::parse_config_file(path) {
            Ok(config) => config,
            Err(err) => {
                warn!(
                    "Failed to load config file {:?}: {err}, using defaults",
                    path
                );

                Self::default()
            }
        }
    }

    fn parse_config_file(path: &Path) -> Result<Self> {
        debug!("Parsing config file at: {:?}", path);

        // Read the file to a string
        let file = File::open(path)
            .with_context(|| "Failed to open Json configuration file")?;

        let buf = BufReader::new(file);

        // Parse the Json data
        let config = serde_json::from_reader(buf)
            .with_context(|| "Failed to parse Json configuration file")?;

        Ok(config)
    }

    // Save the current configuration to the config file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    "Failed to create the configuration directory"
                })?;
            }
        }

        // Save the configuration in the configuration file
        let file = File::create(path)
            .with_context(|| "Failed to open configuration file for writing")?;
        serde_json::to_writer_pretty(file, self)
            .with_context(|| "Failed to write to the configuration file")?;

        Ok(())
    }

    // Build the validated gradient from the persisted breakpoints.
    // An invalid gradient falls back to the default ramp
    pub fn gradient(&self) -> Gradient {
        match Gradient::new(&self.gradient_points) {
            Ok(gradient) => gradient,
            Err(err) => {
                warn!("Invalid gradient in configuration: {err}, using default");

                Gradient::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_fall_back_to_defaults_for_a_missing_file() {
        let config = MonitorConfig::load(Path::new("no/such/config.json"));

        assert_eq!(config.update_interval_ms, 1000);
        assert_eq!(config.warning_threshold, 90);
        assert!(config.warnings_enabled);
    }

    #[test]
    fn should_round_trip_through_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = MonitorConfig::default();
        config.unit = TemperatureUnit::Fahrenheit;
        config.update_interval_ms = 500;
        config.warning_threshold = 85;

        config.save(&path).unwrap();
        let loaded = MonitorConfig::load(&path);

        assert_eq!(loaded.unit, TemperatureUnit::Fahrenheit);
        assert_eq!(loaded.update_interval_ms, 500);
        assert_eq!(loaded.warning_threshold, 85);
        assert_eq!(loaded.gradient_points, config.gradient_points);
    }

    #[test]
    fn should_create_missing_parent_directories_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gputempd").join("config.json");

        MonitorConfig::default().save(&path).unwrap();

        assert!(path.is_file());
    }

    #[test]
    fn should_fill_missing_fields_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        std::fs::write(&path, r#"{ "unit": "Kelvin" }"#).unwrap();
        let config = MonitorConfig::load(&path);

        assert_eq!(config.unit, TemperatureUnit::Kelvin);
        assert_eq!(config.update_interval_ms, 1000);
        assert_eq!(config.gradient_points.len(), 5);
    }

    #[test]
    fn should_fall_back_to_the_default_gradient_when_invalid() {
        let mut config = MonitorConfig::default();
        config.gradient_points = vec![(50, Rgb::new(0, 255, 0))];

        let gradient = config.gradient();

        assert_eq!(gradient.points_num(), 5);
    }
}
