use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// RGB triple with 8 bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from(value: (u8, u8, u8)) -> Self {
        Rgb::new(value.0, value.1, value.2)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GradientError {
    #[error("A gradient requires at least 2 breakpoints, got {0}")]
    TooFewPoints(usize),
    #[error("Duplicate breakpoint temperature: {0}")]
    DuplicateTemperature(i32),
}

// Piecewise linear color ramp over temperature breakpoints.
// The breakpoints are kept sorted by temperature in the map
#[derive(Debug, Clone)]
pub struct Gradient {
    points: BTreeMap<i32, Rgb>,
}

impl Gradient {
    // Build a gradient from (temperature, color) pairs.
    // At least 2 breakpoints with distinct temperatures are required
    pub fn new(points: &[(i32, Rgb)]) -> Result<Gradient, GradientError> {
        let mut map = BTreeMap::new();

        for (temp, color) in points {
            if map.insert(*temp, *color).is_some() {
                return Err(GradientError::DuplicateTemperature(*temp));
            }
        }

        if map.len() < 2 {
            return Err(GradientError::TooFewPoints(map.len()));
        }

        Ok(Gradient { points: map })
    }

    // Return the number of breakpoints in the gradient
    pub fn points_num(&self) -> usize {
        self.points.len()
    }

    // Return the color for the given temperature.
    // Temperatures outside the breakpoint range clamp to the
    // nearest endpoint color instead of failing
    pub fn color_at(&self, temp: i32) -> Rgb {
        // Check if the temperature is in the map, in that case return
        // the corresponding color
        if let Some(color) = self.points.get(&temp) {
            return *color;
        }

        // Find the 2 breakpoints of the temperature interval
        let preceding = self.points.range(..temp).next_back();
        let succeeding = self.points.range(temp..).next();

        match (preceding, succeeding) {
            (Some(pre), Some(suc)) => linear_interpolation(pre, suc, temp),

            // Above the last breakpoint
            (Some(pre), None) => *pre.1,
            // Below the first breakpoint
            (None, Some(suc)) => *suc.1,

            // Construction guarantees at least 2 breakpoints
            (None, None) => Rgb::new(255, 255, 255),
        }
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Gradient {
            points: BTreeMap::from([
                (50, Rgb::new(0, 255, 0)),
                (60, Rgb::new(255, 255, 0)),
                (70, Rgb::new(255, 165, 0)),
                (80, Rgb::new(255, 69, 0)),
                (90, Rgb::new(128, 0, 0)),
            ]),
        }
    }
}

// Perform the linear interpolation between two breakpoints
// and return the color, one channel at a time
fn linear_interpolation(
    pre: (&i32, &Rgb),
    suc: (&i32, &Rgb),
    temp: i32,
) -> Rgb {
    let ratio = f64::from(temp - pre.0) / f64::from(suc.0 - pre.0);

    Rgb {
        r: lerp_channel(pre.1.r, suc.1.r, ratio),
        g: lerp_channel(pre.1.g, suc.1.g, ratio),
        b: lerp_channel(pre.1.b, suc.1.b, ratio),
    }
}

fn lerp_channel(c1: u8, c2: u8, ratio: f64) -> u8 {
    let channel =
        f64::from(c1) + (f64::from(c2) - f64::from(c1)) * ratio;

    channel.round().clamp(0.0, 255.0) as u8
}
