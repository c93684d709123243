//! The landscape e-paper panel: frame buffer, controller and delay in one [`Panel`]

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use super::driver::{DisplayError, Ssd1680};
use super::graphics::{Display, DisplayRotation};
use crate::display::{Panel, Region, LANDSCAPE};

pub struct EpaperPanel<SPI, BSY, DC, RST, DELAY> {
    driver: Ssd1680<SPI, BSY, DC, RST>,
    display: Display,
    delay: DELAY,
}

impl<SPI, BSY, DC, RST, DELAY> EpaperPanel<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Initialise the controller and start with a white landscape frame
    pub fn new(spi: SPI, busy: BSY, dc: DC, rst: RST, mut delay: DELAY) -> Result<Self, DisplayError> {
        let driver = Ssd1680::new(spi, busy, dc, rst, &mut delay)?;
        let mut display = Display::new();
        display.set_rotation(LANDSCAPE);
        Ok(Self {
            driver,
            display,
            delay,
        })
    }

    pub fn frame(&self) -> &Display {
        &self.display
    }

    pub fn sleep(&mut self) -> Result<(), DisplayError> {
        self.driver.sleep()
    }
}

impl<SPI, BSY, DC, RST, DELAY> OriginDimensions for EpaperPanel<SPI, BSY, DC, RST, DELAY> {
    fn size(&self) -> Size {
        self.display.size()
    }
}

impl<SPI, BSY, DC, RST, DELAY> DrawTarget for EpaperPanel<SPI, BSY, DC, RST, DELAY> {
    type Color = BinaryColor;
    type Error = DisplayError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.display.draw_iter(pixels).map_err(|never| match never {})
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.display.clear_buffer(color);
        Ok(())
    }
}

impl<SPI, BSY, DC, RST, DELAY> Panel for EpaperPanel<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    fn set_rotation(&mut self, rotation: DisplayRotation) {
        self.display.set_rotation(rotation);
    }

    fn refresh_full(&mut self) -> Result<(), Self::Error> {
        self.driver.update_full(self.display.buffer(), &mut self.delay)
    }

    fn refresh_partial(&mut self, window: Region) -> Result<(), Self::Error> {
        let Some(ram) = self.display.ram_window(window.into()) else {
            log::debug!("Partial refresh of {:?} is off screen, skipped", window);
            return Ok(());
        };
        let bytes = self.display.window_bytes(&ram);
        self.driver.update_partial(&ram, &bytes, &mut self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssd1680::driver::testing::{Mocks, Script};
    use crate::ssd1680::graphics::RamWindow;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::Mock as PinMock;
    use embedded_hal_mock::eh1::spi::Mock as SpiMock;

    type TestPanel = EpaperPanel<SpiMock<u8>, PinMock, PinMock, PinMock, NoopDelay>;

    fn panel(mocks: &Mocks) -> TestPanel {
        EpaperPanel::new(
            mocks.spi.clone(),
            mocks.busy.clone(),
            mocks.dc.clone(),
            mocks.rst.clone(),
            NoopDelay::new(),
        )
        .unwrap()
    }

    #[test]
    fn is_landscape() {
        let mut mocks = Mocks::new(Script::default().init());
        assert_eq!(panel(&mocks).size(), Size::new(296, 128));
        mocks.done();
    }

    #[test]
    fn partial_refresh_sends_only_the_window() {
        let mut mocks = Mocks::new(Script::default().init());
        let mut panel = panel(&mocks);

        let area = Rectangle::new(Point::new(10, 3), Size::new(20, 10));
        area.into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut panel)
            .unwrap();

        // Two byte columns by twenty gate lines
        let window = RamWindow {
            x_start: 0,
            x_end: 1,
            y_start: 266,
            y_end: 285,
        };
        let bytes = panel.frame().window_bytes(&window);
        assert_eq!(bytes.len(), 40);
        assert!(bytes.iter().any(|b| *b != 0xFF));

        mocks.expect(Script::default().partial_update(&window, &bytes));
        panel.refresh_partial(Region::from(area)).unwrap();
        mocks.done();
    }

    #[test]
    fn off_screen_partial_refresh_is_a_no_op() {
        let mut mocks = Mocks::new(Script::default().init());
        let mut panel = panel(&mocks);

        mocks.expect(Script::default());
        panel.refresh_partial(Region::new(400, 200, 10, 10)).unwrap();
        mocks.done();
    }

    #[test]
    fn full_refresh_pushes_the_frame() {
        let mut mocks = Mocks::new(Script::default().init());
        let mut panel = panel(&mocks);
        panel.clear(BinaryColor::On).unwrap();

        mocks.expect(Script::default().full_update(&[0x00; crate::ssd1680::BUFFER_SIZE]));
        panel.refresh_full().unwrap();
        mocks.done();
    }
}
