//! Error types shared by the sensor pipeline and the startup configuration

use embedded_hal::i2c::ErrorKind;
use thiserror::Error;

/// Failures reported by the battery monitor and tank ADC collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SensorError {
    /// Nothing answered on the sensor bus
    #[error("no compatible current/voltage sensor found on the bus")]
    DeviceNotFound,
    /// The I2C transfer itself failed
    #[error("i2c bus error: {0:?}")]
    Bus(ErrorKind),
    /// The requested device number is not one of the detected channels
    #[error("sensor channel {0} does not exist")]
    InvalidChannel(u8),
    /// Bounded startup probing gave up
    #[error("sensor not found after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

impl SensorError {
    /// Map any `embedded-hal` I2C error onto its portable kind
    pub fn from_i2c<E: embedded_hal::i2c::Error>(error: E) -> Self {
        SensorError::Bus(error.kind())
    }
}

/// Reasons the deployment constants are rejected at startup
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("shunt resistance must be positive")]
    ZeroShunt,
    #[error("maximum current must be within 1..=1022 A, got {0}")]
    InvalidMaxAmps(u16),
    #[error("tank scale divisor must be a positive number, got {0}")]
    InvalidTankDivisor(f32),
    #[error("full refresh threshold must be at least one tick")]
    ZeroRefreshThreshold,
    #[error("quantize step must be within 1..=100, got {0}")]
    InvalidQuantizeStep(u8),
    #[error("voltage offset must be finite, got {0}")]
    InvalidOffset(f32),
    #[error("telemetry key {0:?} is used more than once")]
    DuplicateKey(String),
    #[error("tank ADC channel {0} does not exist (0..=3)")]
    InvalidTankChannel(u8),
}
