//! Pin definitions for the e-paper display and the sensor bus
//!
//! This module contains all GPIO pin assignments used in the hardware configuration.

/// Pin configuration constants for the ESP32 DevKit wiring
pub struct Pins;

#[allow(dead_code)]
impl Pins {
    // SPI Display pins
    /// Busy status pin (High when display is busy)
    pub const BSY: u8 = 4;
    /// Reset pin for display
    pub const RST: u8 = 16;
    /// Data/Command control pin (High for data, Low for command)
    pub const DC: u8 = 17;
    /// Chip Select pin for SPI display
    pub const CS: u8 = 5;
    /// SPI Clock pin
    pub const SCK: u8 = 18;
    /// SPI Master Out Slave In
    pub const MOSI: u8 = 23;

    // Sensor bus
    /// I2C data (INA3221 and ADS1115)
    pub const SDA: u8 = 21;
    /// I2C clock
    pub const SCL: u8 = 22;

    // Touch
    /// Capacitive touch pad used to switch pages (T3)
    pub const TOUCH: u8 = 15;
    /// Touch channel number of [`Pins::TOUCH`]
    pub const TOUCH_PAD: u32 = 3;
}
