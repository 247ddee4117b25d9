use std::sync::Arc;

use anyhow::{Context, Result};
use nvml_wrapper::{Device, Nvml, enum_wrappers::device::TemperatureSensor};
use tracing::{debug, info, warn};

// Store a NVML GPU device and the original NVML context.
// The context is acquired once at start up and released when the
// last clone of the device is dropped at shutdown
#[derive(Clone)]
pub struct GpuDevice {
    nvml: Arc<Nvml>,

    // Store the GPU unique identifier
    uuid: String,
}

impl GpuDevice {
    // Probe NVML for the first GPU on the system.
    // A missing driver or a system with no Nvidia GPU is a steady
    // state, not an error: the monitor runs without a device and
    // skips its poll cycles
    pub fn probe() -> Option<GpuDevice> {
        // Attempt to initialize NVML.
        // NVML is thread-safe so it is safe to make simultaneous
        // NVML calls from multiple threads. We can therefore simply
        // wrap it in a Arc with no Mutex
        let nvml = match Nvml::init() {
            Ok(nvml) => {
                info!("NVML successfully initialized");

                Arc::new(nvml)
            }
            Err(err) => {
                warn!("Failed to load NVML library: {err}");

                return None;
            }
        };

        match Self::first_device(&nvml) {
            Ok(device) => device,
            Err(err) => {
                warn!("Error during Nvidia GPU discovery: {err}");

                None
            }
        }
    }

    // Find the first Nvidia GPU on the system and create the
    // associated GPU device
    fn first_device(nvml: &Arc<Nvml>) -> Result<Option<GpuDevice>> {
        let device_count = nvml.device_count()?;

        if device_count == 0 {
            warn!("No Nvidia GPU found on the system");

            return Ok(None);
        }

        // Get the UUID of the first device
        let uuid = nvml.device_by_index(0)?.uuid()?;

        debug!("Found Nvidia device: \"{uuid}\"");

        Ok(Some(GpuDevice {
            nvml: nvml.clone(),
            uuid,
        }))
    }

    // Read the current raw die temperature in whole degrees Celsius
    pub fn temperature(&self) -> Result<u32> {
        let device = self.get()?;

        device
            .temperature(TemperatureSensor::Gpu)
            .with_context(|| "Failed to retrieve GPU temperature")
    }

    // Return a device handle, resolved by UUID on every call.
    // This function can fail and return an error
    fn get<'a>(&'a self) -> Result<Device<'a>> {
        let uuid = self.uuid.as_str();

        self.nvml
            .device_by_uuid(uuid)
            .with_context(|| format!("Failed to retrieve GPU device \"{uuid}\""))
    }

    pub fn uuid(&self) -> &str {
        self.uuid.as_str()
    }
}
