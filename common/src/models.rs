use serde::{Deserialize, Serialize};
use std::fmt;

const KELVIN_OFFSET: f64 = 273.15;

/// Current weather for one city, as reported by the remote API.
///
/// Temperatures are kept in Kelvin as ingested; use the `_celsius` accessors
/// for display. Records are never patched: a refresh replaces the whole value.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherRecord {
    main: String,
    description: String,
    temperature: f64,
    feels_like: f64,
}

impl WeatherRecord {
    pub fn new(
        main: impl Into<String>,
        description: impl Into<String>,
        temperature: f64,
        feels_like: f64,
    ) -> Self {
        Self {
            main: main.into(),
            description: description.into(),
            temperature,
            feels_like,
        }
    }

    /// Condition label, e.g. "Clouds"
    pub fn main(&self) -> &str {
        &self.main
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn temperature_kelvin(&self) -> f64 {
        self.temperature
    }

    pub fn feels_like_kelvin(&self) -> f64 {
        self.feels_like
    }

    pub fn temperature_celsius(&self) -> f64 {
        self.temperature - KELVIN_OFFSET
    }

    pub fn feels_like_celsius(&self) -> f64 {
        self.feels_like - KELVIN_OFFSET
    }
}

impl fmt::Display for WeatherRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Weather: {}, Description: {}, Temp: {:.2}°C, Feels Like: {:.2}°C",
            self.main,
            self.description,
            self.temperature_celsius(),
            self.feels_like_celsius()
        )
    }
}
