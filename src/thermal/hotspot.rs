use serde::{Deserialize, Serialize};

// Raw die temperatures at or below this bound get the low offset
pub const LOW_THRESHOLD: i32 = 45;
// Raw die temperatures at or above this bound get the high offset
pub const HIGH_THRESHOLD: i32 = 65;

// Empirical corrections added to the reported die temperature to
// approximate the hotter junction temperature
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HotspotOffset {
    pub low: i32,
    pub high: i32,
}

impl Default for HotspotOffset {
    fn default() -> Self {
        Self { low: 15, high: 20 }
    }
}

// Estimate the hotspot temperature for a raw die temperature.
// The offset is interpolated between `low` and `high` across the
// 45-65°C band and held constant outside it. Only the offset is
// clamped, the temperature itself never is.
// Interpolated offsets round half away from zero (`f64::round`)
pub fn estimate(raw_temp: i32, offset: HotspotOffset) -> i32 {
    let applied = if raw_temp <= LOW_THRESHOLD {
        offset.low
    } else if raw_temp >= HIGH_THRESHOLD {
        offset.high
    } else {
        let span = f64::from(HIGH_THRESHOLD - LOW_THRESHOLD);
        let ratio = f64::from(raw_temp - LOW_THRESHOLD) / span;

        let interpolated = f64::from(offset.low)
            + (f64::from(offset.high) - f64::from(offset.low)) * ratio;

        interpolated.round() as i32
    };

    raw_temp + applied
}
