//! SSD1680 ePaper Display Driver
//!
//! Used with the 2.9" 128x296 black/white panel. The panel is mounted in landscape,
//! so everything above this module draws into a 296x128 rotated frame.
//!
//! ### Usage
//! 1. draw into a [`graphics::Display`] frame buffer with
//!    [`embedded_graphics`](https://github.com/embedded-graphics/embedded-graphics)
//! 1. push it with [`driver::Ssd1680::update_full`], or push one window of it with
//!    [`driver::Ssd1680::update_partial`]
//!
//! [`panel::EpaperPanel`] bundles both and is what the rest of the firmware uses.

pub mod cmd;
pub mod color;
pub mod driver;
pub mod flag;
pub mod graphics;
pub mod interface;
pub mod panel;
pub mod pins;

/// Display height, pixels vertically
pub const HEIGHT: u16 = 296;

/// Display width, pixels horizontally
pub const WIDTH: u16 = 128;

/// Bytes in one RAM row
pub const ROW_BYTES: usize = WIDTH as usize / 8;

/// Bytes in a full frame
pub const BUFFER_SIZE: usize = ROW_BYTES * HEIGHT as usize;
