use core::fmt;

use serde::{Deserialize, Serialize};

// Display unit for the temperature readout
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    // Convert a whole degree Celsius reading to this unit.
    // Kelvin uses the whole degree 273 offset, not 273.15
    pub fn to_display(self, celsius: i32) -> i32 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => {
                (f64::from(celsius) * 9.0 / 5.0 + 32.0).round() as i32
            }
            TemperatureUnit::Kelvin => celsius + 273,
        }
    }

    // Return the next unit in the Celsius, Fahrenheit, Kelvin cycle
    pub fn cycle(self) -> TemperatureUnit {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Kelvin,
            TemperatureUnit::Kelvin => TemperatureUnit::Celsius,
        }
    }

    // Return the unit letter for the readout label
    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "C",
            TemperatureUnit::Fahrenheit => "F",
            TemperatureUnit::Kelvin => "K",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureUnit::Celsius => write!(f, "Celsius"),
            TemperatureUnit::Fahrenheit => write!(f, "Fahrenheit"),
            TemperatureUnit::Kelvin => write!(f, "Kelvin"),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(TemperatureUnit::Celsius, 100, 100)]
    #[test_case(TemperatureUnit::Fahrenheit, 100, 212)]
    #[test_case(TemperatureUnit::Fahrenheit, 0, 32)]
    #[test_case(TemperatureUnit::Fahrenheit, 37, 99; "98.6 rounds to 99")]
    #[test_case(TemperatureUnit::Kelvin, 0, 273)]
    #[test_case(TemperatureUnit::Kelvin, 27, 300)]
    fn should_convert_celsius_to_display_unit(
        unit: TemperatureUnit,
        celsius: i32,
        expected: i32,
    ) {
        assert_eq!(unit.to_display(celsius), expected);
    }

    #[test]
    fn should_default_to_celsius() {
        assert_eq!(TemperatureUnit::default(), TemperatureUnit::Celsius);
    }

    #[test]
    fn should_cycle_through_every_unit_and_back() {
        let unit = TemperatureUnit::Celsius;

        assert_eq!(unit.cycle(), TemperatureUnit::Fahrenheit);
        assert_eq!(unit.cycle().cycle(), TemperatureUnit::Kelvin);
        assert_eq!(unit.cycle().cycle().cycle(), TemperatureUnit::Celsius);
    }
}
