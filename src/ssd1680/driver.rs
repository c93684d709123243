//! SSD1680 Display Driver Implementation
//!
//! ## Update modes
//!
//! - **Full**: the frame goes into both RAM banks and the whole panel runs the full
//!   waveform (`0xF7`). Slow, flashes, clears ghosting.
//! - **Partial**: only a window is written to the current RAM (`0x24`) and the panel
//!   runs the partial waveform (`0xFC`), which drives just the pixels that differ
//!   from the previous RAM (`0x26`). The same window is then copied into `0x26` so
//!   the next partial update diffs against what is really on the glass.
//!
//! ## Polarity
//!
//! A set RAM bit is white, see [`super::color`].

pub use display_interface::DisplayError;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::ssd1680::graphics::RamWindow;
use crate::ssd1680::interface::DisplayInterface;
use crate::ssd1680::{cmd::Cmd, flag::Flag, BUFFER_SIZE};

/// SSD1680 E-Paper Display Driver
///
/// ## Type Parameters
///
/// - `SPI` - SPI device for communication
/// - `BSY` - BUSY input pin (HIGH when display is busy)
/// - `DC` - Data/Command output pin
/// - `RST` - Reset output pin
pub struct Ssd1680<SPI, BSY, DC, RST> {
    interface: DisplayInterface<SPI, BSY, DC, RST>,
}

impl<SPI, BSY, DC, RST> Ssd1680<SPI, BSY, DC, RST>
where
    SPI: SpiDevice,
    RST: OutputPin,
    DC: OutputPin,
    BSY: InputPin,
{
    /// Create and initialize the display driver
    pub fn new(
        spi: SPI,
        busy: BSY,
        dc: DC,
        rst: RST,
        delay: &mut impl DelayNs,
    ) -> Result<Self, DisplayError> {
        let mut ssd1680 = Ssd1680 {
            interface: DisplayInterface::new(spi, busy, dc, rst),
        };
        ssd1680.interface.init(delay)?;
        Ok(ssd1680)
    }

    /// Limit RAM access to `window` and put the address counters at its start
    fn set_ram_window(&mut self, window: &RamWindow) -> Result<(), DisplayError> {
        let [y_start_lo, y_start_hi] = window.y_start.to_le_bytes();
        let [y_end_lo, y_end_hi] = window.y_end.to_le_bytes();

        self.interface
            .cmd_with_data(Cmd::SET_RAMX_START_END, &[window.x_start, window.x_end])?;
        self.interface.cmd_with_data(
            Cmd::SET_RAMY_START_END,
            &[y_start_lo, y_start_hi, y_end_lo, y_end_hi],
        )?;
        self.interface
            .cmd_with_data(Cmd::SET_RAMX_COUNTER, &[window.x_start])?;
        self.interface
            .cmd_with_data(Cmd::SET_RAMY_COUNTER, &[y_start_lo, y_start_hi])
    }

    /// Write `bytes` (row by row) into one RAM bank inside `window`
    fn write_ram(&mut self, bank: u8, window: &RamWindow, bytes: &[u8]) -> Result<(), DisplayError> {
        if !window.is_valid() {
            log::error!("Window {:?} is outside controller RAM", window);
            return Err(DisplayError::OutOfBoundsError);
        }
        if bytes.len() != window.row_bytes() * window.rows() {
            log::error!(
                "Window {:?} needs {} bytes, got {}",
                window,
                window.row_bytes() * window.rows(),
                bytes.len()
            );
            return Err(DisplayError::OutOfBoundsError);
        }

        self.set_ram_window(window)?;
        self.interface.cmd(bank)?;
        self.interface.data_chunked(bytes)
    }

    /// Write the whole frame into both RAM banks and run a full refresh
    pub fn update_full(&mut self, buffer: &[u8], delay: &mut impl DelayNs) -> Result<(), DisplayError> {
        if buffer.len() != BUFFER_SIZE {
            return Err(DisplayError::OutOfBoundsError);
        }

        self.interface
            .cmd_with_data(Cmd::BORDER_WAVEFORM_CONTROL, &[Flag::BORDER_WAVEFORM_FOLLOW_LUT])?;
        self.write_ram(Cmd::WRITE_PREVIOUS_DATA, &RamWindow::FULL, buffer)?;
        self.write_ram(Cmd::WRITE_BW_DATA, &RamWindow::FULL, buffer)?;

        log::debug!("Full refresh");
        self.interface.update(Flag::DISPLAY_UPDATE_FULL, delay)
    }

    /// Write one window and refresh only the pixels in it that changed
    pub fn update_partial(
        &mut self,
        window: &RamWindow,
        bytes: &[u8],
        delay: &mut impl DelayNs,
    ) -> Result<(), DisplayError> {
        self.interface
            .cmd_with_data(Cmd::BORDER_WAVEFORM_CONTROL, &[Flag::BORDER_WAVEFORM_PARTIAL])?;
        self.write_ram(Cmd::WRITE_BW_DATA, window, bytes)?;
        self.interface.update(Flag::DISPLAY_UPDATE_PARTIAL, delay)?;

        // Keep the previous-frame RAM in step with the glass
        self.write_ram(Cmd::WRITE_PREVIOUS_DATA, window, bytes)
    }

    /// Enter deep sleep; a hardware reset and init are needed afterwards
    pub fn sleep(&mut self) -> Result<(), DisplayError> {
        log::info!("Display entering deep sleep");
        self.interface
            .cmd_with_data(Cmd::DEEP_SLEEP_MODE, &[Flag::DEEP_SLEEP_MODE_1])
    }

    /// Give back the bus and pins
    pub fn release(self) -> (SPI, BSY, DC, RST) {
        self.interface.release()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    use crate::ssd1680::graphics::RamWindow;
    use crate::ssd1680::{cmd::Cmd, flag::Flag, BUFFER_SIZE};

    /// Bus and pin traffic the controller should see, in order
    #[derive(Default)]
    pub struct Script {
        spi: Vec<SpiTransaction<u8>>,
        busy: Vec<PinTransaction>,
        dc: Vec<PinTransaction>,
        rst: Vec<PinTransaction>,
    }

    impl Script {
        /// Command byte with DC low, then its data with DC high in 512 byte chunks
        pub fn cmd(mut self, command: u8, data: &[u8]) -> Self {
            self.dc.push(PinTransaction::set(State::Low));
            self.spi.push(SpiTransaction::transaction_start());
            self.spi.push(SpiTransaction::write_vec(vec![command]));
            self.spi.push(SpiTransaction::transaction_end());

            for chunk in data.chunks(512) {
                self.dc.push(PinTransaction::set(State::High));
                self.spi.push(SpiTransaction::transaction_start());
                self.spi.push(SpiTransaction::write_vec(chunk.to_vec()));
                self.spi.push(SpiTransaction::transaction_end());
            }
            self
        }

        pub fn busy_idle(mut self) -> Self {
            self.busy.push(PinTransaction::get(State::Low));
            self
        }

        pub fn init(mut self) -> Self {
            self.rst = vec![
                PinTransaction::set(State::High),
                PinTransaction::set(State::Low),
                PinTransaction::set(State::High),
            ];
            self.cmd(Cmd::SW_RESET, &[])
                .busy_idle()
                .cmd(Cmd::DRIVER_CONTROL, &[0x27, 0x01, 0x00])
                .cmd(Cmd::BORDER_WAVEFORM_CONTROL, &[0x05])
                .cmd(Cmd::DISPLAY_UPDATE_CONTROL, &[0x00, 0x80])
                .cmd(Cmd::TEMP_CONTROL, &[0x80])
                .cmd(Cmd::DATA_ENTRY_MODE, &[0x03])
                .busy_idle()
        }

        pub fn window(self, window: &RamWindow, bank: u8, bytes: &[u8]) -> Self {
            let [ys_lo, ys_hi] = window.y_start.to_le_bytes();
            let [ye_lo, ye_hi] = window.y_end.to_le_bytes();
            self.cmd(Cmd::SET_RAMX_START_END, &[window.x_start, window.x_end])
                .cmd(Cmd::SET_RAMY_START_END, &[ys_lo, ys_hi, ye_lo, ye_hi])
                .cmd(Cmd::SET_RAMX_COUNTER, &[window.x_start])
                .cmd(Cmd::SET_RAMY_COUNTER, &[ys_lo, ys_hi])
                .cmd(bank, bytes)
        }

        pub fn update(self, sequence: u8) -> Self {
            self.cmd(Cmd::UPDATE_DISPLAY_CTRL2, &[sequence])
                .cmd(Cmd::MASTER_ACTIVATE, &[])
                .busy_idle()
        }

        pub fn full_update(self, frame: &[u8]) -> Self {
            assert_eq!(frame.len(), BUFFER_SIZE);
            self.cmd(Cmd::BORDER_WAVEFORM_CONTROL, &[Flag::BORDER_WAVEFORM_FOLLOW_LUT])
                .window(&RamWindow::FULL, Cmd::WRITE_PREVIOUS_DATA, frame)
                .window(&RamWindow::FULL, Cmd::WRITE_BW_DATA, frame)
                .update(Flag::DISPLAY_UPDATE_FULL)
        }

        pub fn partial_update(self, window: &RamWindow, bytes: &[u8]) -> Self {
            self.cmd(Cmd::BORDER_WAVEFORM_CONTROL, &[Flag::BORDER_WAVEFORM_PARTIAL])
                .window(window, Cmd::WRITE_BW_DATA, bytes)
                .update(Flag::DISPLAY_UPDATE_PARTIAL)
                .window(window, Cmd::WRITE_PREVIOUS_DATA, bytes)
        }
    }

    /// Handles on the mocks handed to the driver; clones share their expectations
    pub struct Mocks {
        pub spi: SpiMock<u8>,
        pub busy: PinMock,
        pub dc: PinMock,
        pub rst: PinMock,
    }

    impl Mocks {
        pub fn new(script: Script) -> Self {
            Self {
                spi: SpiMock::new(&script.spi),
                busy: PinMock::new(&script.busy),
                dc: PinMock::new(&script.dc),
                rst: PinMock::new(&script.rst),
            }
        }

        /// Replace the (fully consumed) expectations with the next step
        pub fn expect(&mut self, script: Script) {
            self.spi.update_expectations(&script.spi);
            self.busy.update_expectations(&script.busy);
            self.dc.update_expectations(&script.dc);
            self.rst.update_expectations(&script.rst);
        }

        pub fn done(&mut self) {
            self.spi.done();
            self.busy.done();
            self.dc.done();
            self.rst.done();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{Mocks, Script};
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::Mock as PinMock;
    use embedded_hal_mock::eh1::spi::Mock as SpiMock;

    type Driver = Ssd1680<SpiMock<u8>, PinMock, PinMock, PinMock>;

    fn driver(mocks: &Mocks) -> Driver {
        Ssd1680::new(
            mocks.spi.clone(),
            mocks.busy.clone(),
            mocks.dc.clone(),
            mocks.rst.clone(),
            &mut NoopDelay::new(),
        )
        .unwrap()
    }

    #[test]
    fn init_sequence() {
        let mut mocks = Mocks::new(Script::default().init());
        driver(&mocks);
        mocks.done();
    }

    #[test]
    fn full_update_fills_both_banks() {
        let mut mocks = Mocks::new(Script::default().init());
        let mut epd = driver(&mocks);

        let frame = vec![0xAA; BUFFER_SIZE];
        mocks.expect(Script::default().full_update(&frame));
        epd.update_full(&frame, &mut NoopDelay::new()).unwrap();
        mocks.done();
    }

    #[test]
    fn partial_update_writes_window_then_syncs_previous_ram() {
        let mut mocks = Mocks::new(Script::default().init());
        let mut epd = driver(&mocks);

        let window = RamWindow {
            x_start: 2,
            x_end: 3,
            y_start: 0x0110,
            y_end: 0x0112,
        };
        let bytes = vec![0x0F; 6];
        mocks.expect(Script::default().partial_update(&window, &bytes));
        epd.update_partial(&window, &bytes, &mut NoopDelay::new()).unwrap();
        mocks.done();
    }

    #[test]
    fn window_size_mismatch_is_rejected() {
        let mut mocks = Mocks::new(Script::default().init());
        let mut epd = driver(&mocks);

        let window = RamWindow {
            x_start: 0,
            x_end: 0,
            y_start: 0,
            y_end: 9,
        };
        // Border is set before the size check; no RAM is touched
        mocks.expect(
            Script::default().cmd(Cmd::BORDER_WAVEFORM_CONTROL, &[Flag::BORDER_WAVEFORM_PARTIAL]),
        );
        assert!(epd
            .update_partial(&window, &[0u8; 3], &mut NoopDelay::new())
            .is_err());
        assert!(epd.update_full(&[0u8; 10], &mut NoopDelay::new()).is_err());
        mocks.done();
    }

    #[test]
    fn inverted_window_is_rejected() {
        let mut mocks = Mocks::new(Script::default().init());
        let mut epd = driver(&mocks);

        let window = RamWindow {
            x_start: 4,
            x_end: 2,
            y_start: 0,
            y_end: 0,
        };
        mocks.expect(
            Script::default().cmd(Cmd::BORDER_WAVEFORM_CONTROL, &[Flag::BORDER_WAVEFORM_PARTIAL]),
        );
        assert_eq!(
            epd.update_partial(&window, &[], &mut NoopDelay::new()),
            Err(DisplayError::OutOfBoundsError)
        );
        mocks.done();
    }

    #[test]
    fn sleep_command() {
        let mut mocks = Mocks::new(Script::default().init());
        let mut epd = driver(&mocks);

        mocks.expect(Script::default().cmd(Cmd::DEEP_SLEEP_MODE, &[0x01]));
        epd.sleep().unwrap();
        mocks.done();
    }
}
