//! Battery and water tank panel on a 2.9" e-paper display
//!
//! Everything that does not need ESP-IDF lives here so it can be tested on the host;
//! the firmware binary wires it to the real peripherals.

pub mod clock;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod input;
pub mod reading;
pub mod sensors;
pub mod ssd1680;
pub mod telemetry;

pub use config::PanelConfig;
pub use controller::{PanelController, TickReport};
pub use display::{DisplayMode, Panel, Side};
pub use error::{ConfigError, SensorError};
pub use reading::{SensorReading, Unit};
