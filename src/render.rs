use std::io::{Stdout, Write, stdout};

use anyhow::{Context, Result};

use crate::thermal::{gradient::Rgb, units::TemperatureUnit};

// ANSI truecolor readout on the controlling terminal.
// Stands in for the transparent overlay label of a desktop build
pub struct Label {
    out: Stdout,

    // The degree symbol alternates with a space every tick
    blink: bool,
}

impl Label {
    pub fn new() -> Self {
        Self {
            out: stdout(),
            blink: false,
        }
    }

    // Render one reading in place.
    // The warning bell only sounds on the ticks that hide the degree
    // symbol, so a sustained alert pulses instead of firing every tick
    pub fn update(
        &mut self,
        temp: i32,
        unit: TemperatureUnit,
        color: Rgb,
        alert: bool,
    ) -> Result<()> {
        let line = format_label(temp, unit, color, self.blink);
        let bell = if alert && !self.blink { "\x07" } else { "" };

        self.blink = !self.blink;

        let mut out = self.out.lock();

        write!(out, "\r\x1b[2K{line}{bell}")
            .with_context(|| "Failed to write the temperature readout")?;
        out.flush()
            .with_context(|| "Failed to flush the temperature readout")?;

        Ok(())
    }

    // Erase the readout line when the display is toggled off
    pub fn clear(&mut self) -> Result<()> {
        let mut out = self.out.lock();

        write!(out, "\r\x1b[2K")
            .with_context(|| "Failed to clear the temperature readout")?;
        out.flush()
            .with_context(|| "Failed to flush the temperature readout")?;

        Ok(())
    }
}

impl Default for Label {
    fn default() -> Self {
        Self::new()
    }
}

// Format the colored readout line
fn format_label(
    temp: i32,
    unit: TemperatureUnit,
    color: Rgb,
    blink: bool,
) -> String {
    let symbol = if blink { "°" } else { " " };

    format!(
        "\x1b[38;2;{};{};{}mGPU: {}{}{}\x1b[0m",
        color.r,
        color.g,
        color.b,
        temp,
        symbol,
        unit.symbol(),
    )
}
