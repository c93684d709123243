//! Display interface using SPI
use crate::ssd1680::{cmd::Cmd, flag::Flag};
use display_interface::DisplayError;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

const RESET_DELAY_MS: u32 = 10;
const BUSY_POLL_MS: u32 = 1;
const BUSY_WAIT_TIMEOUT_MS: u32 = 5000; // A full refresh takes about 2 s

/// SPI device plus the three control lines of the panel
pub struct DisplayInterface<SPI, BSY, DC, RST> {
    /// SPI device
    spi: SPI,
    /// High for busy, wait until display is ready
    busy: BSY,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Reseting
    rst: RST,
}

impl<SPI, BSY, DC, RST> DisplayInterface<SPI, BSY, DC, RST> {
    /// Wrap the bus and pins, nothing is sent yet
    pub fn new(spi: SPI, busy: BSY, dc: DC, rst: RST) -> Self {
        DisplayInterface { spi, busy, dc, rst }
    }

    /// Give back the bus and pins
    pub fn release(self) -> (SPI, BSY, DC, RST) {
        (self.spi, self.busy, self.dc, self.rst)
    }
}

impl<SPI, BSY, DC, RST> DisplayInterface<SPI, BSY, DC, RST>
where
    SPI: SpiDevice,
    RST: OutputPin,
    DC: OutputPin,
    BSY: InputPin,
{
    /// Reset and configure the controller for the 2.9" panel
    pub(crate) fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), DisplayError> {
        log::info!("Initializing e-paper display");

        self.reset(delay)?;

        self.cmd(Cmd::SW_RESET)?;
        delay.delay_ms(RESET_DELAY_MS);
        self.wait_busy_low(delay);

        // 296 gate lines, scan from G0
        self.cmd_with_data(
            Cmd::DRIVER_CONTROL,
            &[
                Flag::DRIVER_OUTPUT_MUX[0],
                Flag::DRIVER_OUTPUT_MUX[1],
                Flag::DRIVER_OUTPUT_GATE_SCAN_FROM_G0,
            ],
        )?;
        self.cmd_with_data(Cmd::BORDER_WAVEFORM_CONTROL, &[Flag::BORDER_WAVEFORM_FOLLOW_LUT])?;
        self.cmd_with_data(Cmd::DISPLAY_UPDATE_CONTROL, &Flag::DISPLAY_UPDATE_NORMAL)?;
        self.cmd_with_data(Cmd::TEMP_CONTROL, &[Flag::INTERNAL_TEMP_SENSOR])?;
        self.cmd_with_data(Cmd::DATA_ENTRY_MODE, &[Flag::DATA_ENTRY_INCRY_INCRX])?;

        self.wait_busy_low(delay);
        Ok(())
    }

    /// Basic function for sending commands
    pub(crate) fn cmd(&mut self, command: u8) -> Result<(), DisplayError> {
        // low for commands
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;

        match self.spi.write(&[command]) {
            Ok(_) => Ok(()),
            Err(e) => {
                log::error!("SPI write error for command 0x{:02X}: {:?}", command, e);
                Err(DisplayError::BusWriteError)
            }
        }
    }

    /// Basic function for sending an array of u8-values of data over spi
    pub(crate) fn data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        // high for data
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        self.spi
            .write(data)
            .map_err(|_| DisplayError::BusWriteError)
    }

    /// Basic function for sending a command and the data belonging to it.
    pub(crate) fn cmd_with_data(&mut self, command: u8, data: &[u8]) -> Result<(), DisplayError> {
        self.cmd(command)?;
        self.data(data)
    }

    /// Send a large block in chunks so the SPI driver never needs one huge transfer
    pub(crate) fn data_chunked(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        const CHUNK_SIZE: usize = 512;
        for chunk in data.chunks(CHUNK_SIZE) {
            self.data(chunk)?;
        }
        Ok(())
    }

    /// Trigger an update sequence and wait for it to finish
    pub(crate) fn update(&mut self, sequence: u8, delay: &mut impl DelayNs) -> Result<(), DisplayError> {
        self.cmd_with_data(Cmd::UPDATE_DISPLAY_CTRL2, &[sequence])?;
        self.cmd(Cmd::MASTER_ACTIVATE)?;
        self.wait_busy_low(delay);
        Ok(())
    }

    /// Wait for busy pin to go LOW, giving up after [`BUSY_WAIT_TIMEOUT_MS`]
    pub fn wait_busy_low(&mut self, delay: &mut impl DelayNs) {
        let mut waited = 0;

        while waited < BUSY_WAIT_TIMEOUT_MS {
            match self.busy.is_high() {
                Ok(false) => return,
                Ok(true) => {
                    delay.delay_ms(BUSY_POLL_MS);
                    waited += BUSY_POLL_MS;
                }
                Err(_) => {
                    // Error reading pin - bail out to avoid infinite loop
                    log::error!("Error reading BUSY pin state - assuming not busy to continue");
                    return;
                }
            }
        }

        // Don't hang the program - just continue and hope for the best
        log::error!("Timeout waiting for BUSY pin to go LOW after {} ms", waited);
    }

    /// Hardware reset pulse
    pub(crate) fn reset(&mut self, delay: &mut impl DelayNs) -> Result<(), DisplayError> {
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        delay.delay_ms(RESET_DELAY_MS);
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        delay.delay_ms(RESET_DELAY_MS);
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        delay.delay_ms(RESET_DELAY_MS);
        Ok(())
    }
}
