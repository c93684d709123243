//! Mapping between drawing colours and controller RAM bits
//!
//! The SSD1680 stores one bit per pixel; a set bit is white. `BinaryColor::On` is
//! ink, so it maps to a cleared bit.

use embedded_graphics::pixelcolor::BinaryColor;

use super::flag::Flag;

/// Colour as the controller RAM sees it
pub trait RamColor {
    /// Bit value of one pixel
    fn ram_bit(self) -> bool;

    /// Byte with all eight pixels in this colour
    fn ram_byte(self) -> u8;
}

impl RamColor for BinaryColor {
    fn ram_bit(self) -> bool {
        self == BinaryColor::Off
    }

    fn ram_byte(self) -> u8 {
        if self.ram_bit() {
            Flag::RAM_BYTE_WHITE
        } else {
            Flag::RAM_BYTE_BLACK
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ink_clears_bits() {
        assert!(!BinaryColor::On.ram_bit());
        assert_eq!(BinaryColor::On.ram_byte(), 0x00);
        assert!(BinaryColor::Off.ram_bit());
        assert_eq!(BinaryColor::Off.ram_byte(), 0xFF);
    }
}
