//! Normalized samples produced once per poll cycle

use std::fmt;

/// Physical unit of a [`SensorReading`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Volts,
    Amps,
    Percent,
}

impl Unit {
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Volts => "V",
            Unit::Amps => "A",
            Unit::Percent => "%",
        }
    }
}

/// One calibrated value together with the telemetry path it is published under
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    key: String,
    value: f32,
    unit: Unit,
}

impl SensorReading {
    pub fn new(key: impl Into<String>, value: f32, unit: Unit) -> Self {
        Self {
            key: key.into(),
            value,
            unit,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }
}

impl fmt::Display for SensorReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {:.2} {}", self.key, self.value, self.unit.symbol())
    }
}
