//! ADS1115 16 bit ADC, single-shot single-ended reads

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::TankAdc;
use crate::error::SensorError;

pub const DEFAULT_ADDRESS: u8 = 0x48;

pub struct Reg;
impl Reg {
    pub const CONVERSION: u8 = 0x00;
    pub const CONFIG: u8 = 0x01;
}

pub struct Flag;
impl Flag {
    pub const START_SINGLE: u16 = 0x8000;
    /// AINx against GND; add the channel number
    pub const MUX_SINGLE_0: u16 = 0b100;
    pub const MUX_SHIFT: u16 = 12;
    pub const GAIN_TWOTHIRDS: u16 = 0x0000;
    pub const MODE_SINGLE: u16 = 0x0100;
    pub const RATE_128SPS: u16 = 0x0080;
    pub const COMPARATOR_DISABLE: u16 = 0x0003;
}

/// One conversion at 128 SPS is just under 8 ms
const CONVERSION_DELAY_MS: u32 = 9;

pub struct Ads1115<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C, D> Ads1115<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    /// Start a conversion on `channel`, wait for it and return the signed count
    pub fn read_single_ended(&mut self, channel: u8) -> Result<i16, SensorError> {
        if channel > 3 {
            return Err(SensorError::InvalidChannel(channel));
        }

        let config = Flag::START_SINGLE
            | ((Flag::MUX_SINGLE_0 + u16::from(channel)) << Flag::MUX_SHIFT)
            | Flag::GAIN_TWOTHIRDS
            | Flag::MODE_SINGLE
            | Flag::RATE_128SPS
            | Flag::COMPARATOR_DISABLE;
        let [hi, lo] = config.to_be_bytes();
        self.i2c
            .write(self.address, &[Reg::CONFIG, hi, lo])
            .map_err(SensorError::from_i2c)?;

        self.delay.delay_ms(CONVERSION_DELAY_MS);

        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[Reg::CONVERSION], &mut buf)
            .map_err(SensorError::from_i2c)?;
        Ok(i16::from_be_bytes(buf))
    }

    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

impl<I2C, D> TankAdc for Ads1115<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    fn read_tank_raw(&mut self) -> Result<[i16; 4], SensorError> {
        let mut counts = [0i16; 4];
        for (channel, count) in (0u8..).zip(counts.iter_mut()) {
            *count = self.read_single_ended(channel)?;
        }
        Ok(counts)
    }
}
