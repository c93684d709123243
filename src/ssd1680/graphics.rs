//! Frame buffer for the panel with rotation support

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::color::RamColor;
use super::{BUFFER_SIZE, HEIGHT, ROW_BYTES, WIDTH};

/// Display rotation, clockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayRotation {
    /// No rotation, portrait
    #[default]
    Rotate0,
    /// Rotate by 90 degrees clockwise, landscape
    Rotate90,
    /// Rotate by 180 degrees clockwise
    Rotate180,
    /// Rotate by 270 degrees clockwise, landscape
    Rotate270,
}

/// Byte-aligned window of controller RAM, inclusive bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RamWindow {
    /// First RAM column byte
    pub x_start: u8,
    /// Last RAM column byte
    pub x_end: u8,
    /// First gate line
    pub y_start: u16,
    /// Last gate line
    pub y_end: u16,
}

impl RamWindow {
    /// The whole panel
    pub const FULL: RamWindow = RamWindow {
        x_start: 0,
        x_end: (ROW_BYTES - 1) as u8,
        y_start: 0,
        y_end: HEIGHT - 1,
    };

    /// Bytes per row inside the window, 0 when inverted
    pub fn row_bytes(&self) -> usize {
        self.x_end
            .checked_sub(self.x_start)
            .map_or(0, |span| usize::from(span) + 1)
    }

    /// Rows inside the window, 0 when inverted
    pub fn rows(&self) -> usize {
        self.y_end
            .checked_sub(self.y_start)
            .map_or(0, |span| usize::from(span) + 1)
    }

    /// Non-empty and inside controller RAM
    pub fn is_valid(&self) -> bool {
        self.row_bytes() > 0
            && self.rows() > 0
            && usize::from(self.x_end) < ROW_BYTES
            && self.y_end < HEIGHT
    }
}

/// One bit per pixel, stored the way the controller RAM expects it
pub struct Display {
    buffer: Vec<u8>,
    rotation: DisplayRotation,
}

impl Display {
    /// White frame, no rotation
    pub fn new() -> Self {
        Self {
            buffer: vec![BinaryColor::Off.ram_byte(); BUFFER_SIZE],
            rotation: DisplayRotation::default(),
        }
    }

    /// Raw frame, row-major in panel coordinates
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn rotation(&self) -> DisplayRotation {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: DisplayRotation) {
        self.rotation = rotation;
    }

    /// Fill the whole buffer with one colour
    pub fn clear_buffer(&mut self, color: BinaryColor) {
        self.buffer.fill(color.ram_byte());
    }

    /// Panel coordinates of a logical point, `None` when off screen
    fn to_panel(&self, point: Point) -> Option<(usize, usize)> {
        let size = self.size();
        if point.x < 0 || point.y < 0 || point.x >= size.width as i32 || point.y >= size.height as i32 {
            return None;
        }

        let (x, y) = (point.x as usize, point.y as usize);
        let (w, h) = (usize::from(WIDTH), usize::from(HEIGHT));
        Some(match self.rotation {
            DisplayRotation::Rotate0 => (x, y),
            DisplayRotation::Rotate90 => (w - 1 - y, x),
            DisplayRotation::Rotate180 => (w - 1 - x, h - 1 - y),
            DisplayRotation::Rotate270 => (y, h - 1 - x),
        })
    }

    fn set_pixel(&mut self, point: Point, color: BinaryColor) {
        let Some((x, y)) = self.to_panel(point) else {
            return;
        };
        let index = y * ROW_BYTES + x / 8;
        let mask = 0x80 >> (x % 8);
        if color.ram_bit() {
            self.buffer[index] |= mask;
        } else {
            self.buffer[index] &= !mask;
        }
    }

    /// Colour of a logical pixel
    pub fn pixel(&self, point: Point) -> Option<BinaryColor> {
        let (x, y) = self.to_panel(point)?;
        let set = self.buffer[y * ROW_BYTES + x / 8] & (0x80 >> (x % 8)) != 0;
        Some(if set { BinaryColor::Off } else { BinaryColor::On })
    }

    /// RAM window covering a logical rectangle, widened to whole bytes
    pub fn ram_window(&self, area: Rectangle) -> Option<RamWindow> {
        let area = area.intersection(&self.bounding_box());
        let bottom_right = area.bottom_right()?;

        let (ax, ay) = self.to_panel(area.top_left)?;
        let (bx, by) = self.to_panel(bottom_right)?;
        Some(RamWindow {
            x_start: (ax.min(bx) / 8) as u8,
            x_end: (ax.max(bx) / 8) as u8,
            y_start: ay.min(by) as u16,
            y_end: ay.max(by) as u16,
        })
    }

    /// Buffer bytes inside `window`, row by row; empty for an invalid window
    pub fn window_bytes(&self, window: &RamWindow) -> Vec<u8> {
        if !window.is_valid() {
            return Vec::new();
        }
        let mut bytes = Vec::with_capacity(window.row_bytes() * window.rows());
        for row in usize::from(window.y_start)..=usize::from(window.y_end) {
            let start = row * ROW_BYTES + usize::from(window.x_start);
            bytes.extend_from_slice(&self.buffer[start..start + window.row_bytes()]);
        }
        bytes
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for Display {
    fn size(&self) -> Size {
        match self.rotation {
            DisplayRotation::Rotate0 | DisplayRotation::Rotate180 => {
                Size::new(WIDTH.into(), HEIGHT.into())
            }
            DisplayRotation::Rotate90 | DisplayRotation::Rotate270 => {
                Size::new(HEIGHT.into(), WIDTH.into())
            }
        }
    }
}

impl DrawTarget for Display {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.clear_buffer(color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landscape() -> Display {
        let mut display = Display::new();
        display.set_rotation(DisplayRotation::Rotate270);
        display
    }

    #[test]
    fn starts_white() {
        let display = Display::new();
        assert_eq!(display.buffer().len(), 4736);
        assert!(display.buffer().iter().all(|b| *b == 0xFF));
    }

    #[test]
    fn landscape_size() {
        assert_eq!(landscape().size(), Size::new(296, 128));
        assert_eq!(Display::new().size(), Size::new(128, 296));
    }

    #[test]
    fn rotate_270_maps_corners() {
        let mut display = landscape();
        // Logical top-left is the panel's bottom-left
        display.set_pixel(Point::new(0, 0), BinaryColor::On);
        assert_eq!(display.buffer()[295 * ROW_BYTES], 0x7F);
        // Logical bottom-right is the panel's top-right
        display.set_pixel(Point::new(295, 127), BinaryColor::On);
        assert_eq!(display.buffer()[ROW_BYTES - 1], 0xFE);

        assert_eq!(display.pixel(Point::new(0, 0)), Some(BinaryColor::On));
        assert_eq!(display.pixel(Point::new(1, 0)), Some(BinaryColor::Off));
        assert_eq!(display.pixel(Point::new(296, 0)), None);
    }

    #[test]
    fn other_rotations_round_trip() {
        for rotation in [
            DisplayRotation::Rotate0,
            DisplayRotation::Rotate90,
            DisplayRotation::Rotate180,
        ] {
            let mut display = Display::new();
            display.set_rotation(rotation);
            let point = Point::new(7, 100);
            display.set_pixel(point, BinaryColor::On);
            assert_eq!(display.pixel(point), Some(BinaryColor::On), "{rotation:?}");
            assert_eq!(display.buffer().iter().filter(|b| **b != 0xFF).count(), 1);
        }
    }

    #[test]
    fn off_screen_pixels_are_dropped() {
        let mut display = landscape();
        display.set_pixel(Point::new(-1, 5), BinaryColor::On);
        display.set_pixel(Point::new(5, 128), BinaryColor::On);
        assert!(display.buffer().iter().all(|b| *b == 0xFF));
    }

    #[test]
    fn window_is_byte_aligned_in_panel_space() {
        let display = landscape();
        // Logical x 10..=29, y 3..=12 -> panel x 3..=12, panel y 266..=285
        let window = display
            .ram_window(Rectangle::new(Point::new(10, 3), Size::new(20, 10)))
            .unwrap();
        assert_eq!(
            window,
            RamWindow {
                x_start: 0,
                x_end: 1,
                y_start: 266,
                y_end: 285,
            }
        );
        assert_eq!(display.window_bytes(&window).len(), 2 * 20);
    }

    #[test]
    fn full_window() {
        let display = landscape();
        let window = display.ram_window(display.bounding_box()).unwrap();
        assert_eq!(window, RamWindow::FULL);
        assert_eq!(display.window_bytes(&window), display.buffer());
    }

    #[test]
    fn inverted_window_is_empty() {
        let inverted = RamWindow {
            x_start: 3,
            x_end: 1,
            y_start: 20,
            y_end: 10,
        };
        assert_eq!(inverted.row_bytes(), 0);
        assert_eq!(inverted.rows(), 0);
        assert!(!inverted.is_valid());
        assert!(landscape().window_bytes(&inverted).is_empty());

        let beyond = RamWindow {
            y_end: HEIGHT,
            ..RamWindow::FULL
        };
        assert!(!beyond.is_valid());
        assert!(RamWindow::FULL.is_valid());
    }

    #[test]
    fn empty_window() {
        assert_eq!(landscape().ram_window(Rectangle::zero()), None);
    }
}
