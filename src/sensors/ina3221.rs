//! INA3221 triple-channel current/voltage monitor over I2C
//!
//! Several chips may share the bus (address set by jumper). Every channel of every
//! detected chip gets a flat device number, `chip_index * 3 + channel`, in the order
//! the chips were found. Which number is wired to which battery has to be found
//! once by scanning and is then fixed in the configuration.

use embedded_hal::i2c::I2c;

use super::{BatteryMonitor, BatterySample};
use crate::error::SensorError;

/// Register map
pub struct Reg;
#[allow(missing_docs)]
impl Reg {
    pub const CONFIG: u8 = 0x00;
    pub const SHUNT_VOLTAGE_CH1: u8 = 0x01;
    pub const BUS_VOLTAGE_CH1: u8 = 0x02;
    pub const MANUFACTURER_ID: u8 = 0xFE;
    pub const DIE_ID: u8 = 0xFF;
}

/// Configuration register bits
pub struct Flag;
#[allow(missing_docs)]
impl Flag {
    pub const ENABLE_ALL_CHANNELS: u16 = 0x7000;
    pub const AVERAGE_128: u16 = 0b100 << 9;
    pub const BUS_CONVERSION_8244US: u16 = 0b111 << 6;
    pub const SHUNT_CONVERSION_8244US: u16 = 0b111 << 3;
    pub const MODE_CONTINUOUS_BOTH: u16 = 0b111;

    pub const MANUFACTURER_TI: u16 = 0x5449;
    pub const DIE_INA3221: u16 = 0x3220;
}

/// Jumper-selectable addresses
pub const DEFAULT_ADDRESSES: [u8; 4] = [0x40, 0x41, 0x42, 0x43];

pub const CHANNELS_PER_CHIP: u8 = 3;

const SHUNT_LSB_MICROVOLTS: f32 = 40.0;
const BUS_LSB_MILLIVOLTS: f32 = 8.0;

/// All INA3221 chips found on one bus
pub struct Ina3221Bank<I2C> {
    i2c: I2C,
    chips: Vec<u8>,
    shunt_micro_ohm: u32,
}

impl<I2C: I2c> Ina3221Bank<I2C> {
    /// Scan `addresses`, keep every chip that identifies as an INA3221 and put it in
    /// continuous, heavily averaged mode
    pub fn probe(mut i2c: I2C, addresses: &[u8], shunt_micro_ohm: u32) -> Result<Self, SensorError> {
        let mut chips = Vec::new();

        for &address in addresses {
            // A missing chip NAKs its address; that is an answer, not a failure
            let Ok(manufacturer) = read_register(&mut i2c, address, Reg::MANUFACTURER_ID) else {
                log::debug!("Nothing at 0x{:02X}", address);
                continue;
            };
            if manufacturer != Flag::MANUFACTURER_TI {
                log::debug!("0x{:02X} is not a TI part (0x{:04X})", address, manufacturer);
                continue;
            }
            let die = read_register(&mut i2c, address, Reg::DIE_ID)?;
            if die != Flag::DIE_INA3221 {
                log::debug!("0x{:02X} is not an INA3221 (die 0x{:04X})", address, die);
                continue;
            }
            chips.push(address);
        }

        if chips.is_empty() {
            return Err(SensorError::DeviceNotFound);
        }

        let config = Flag::ENABLE_ALL_CHANNELS
            | Flag::AVERAGE_128
            | Flag::BUS_CONVERSION_8244US
            | Flag::SHUNT_CONVERSION_8244US
            | Flag::MODE_CONTINUOUS_BOTH;
        for &address in &chips {
            write_register(&mut i2c, address, Reg::CONFIG, config)?;
        }

        log::info!("Detected {} INA3221 chip(s) at {:02X?}", chips.len(), chips);

        Ok(Self {
            i2c,
            chips,
            shunt_micro_ohm,
        })
    }

    /// I2C address and zero-based channel behind a flat device number
    pub fn locate(&self, device: u8) -> Option<(u8, u8)> {
        let chip = usize::from(device / CHANNELS_PER_CHIP);
        self.chips
            .get(chip)
            .map(|&address| (address, device % CHANNELS_PER_CHIP))
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> BatteryMonitor for Ina3221Bank<I2C> {
    fn device_count(&self) -> u8 {
        (self.chips.len() as u8).saturating_mul(CHANNELS_PER_CHIP)
    }

    fn read_battery(&mut self, device: u8) -> Result<BatterySample, SensorError> {
        let (address, channel) = self
            .locate(device)
            .ok_or(SensorError::InvalidChannel(device))?;

        let shunt_reg = Reg::SHUNT_VOLTAGE_CH1 + channel * 2;
        let bus_reg = Reg::BUS_VOLTAGE_CH1 + channel * 2;

        // Both registers are left-justified 13 bit two's complement
        let shunt_raw = read_register(&mut self.i2c, address, shunt_reg)? as i16 >> 3;
        let bus_raw = read_register(&mut self.i2c, address, bus_reg)? as i16 >> 3;

        let shunt_microvolts = f32::from(shunt_raw) * SHUNT_LSB_MICROVOLTS;
        let bus_millivolts = f32::from(bus_raw) * BUS_LSB_MILLIVOLTS;
        let bus_microamps = shunt_microvolts / self.shunt_micro_ohm as f32 * 1_000_000.0;
        let bus_microwatts = bus_millivolts / 1000.0 * bus_microamps;

        Ok(BatterySample {
            bus_millivolts,
            shunt_microvolts,
            bus_microamps,
            bus_microwatts,
        })
    }
}

fn read_register<I2C: I2c>(i2c: &mut I2C, address: u8, reg: u8) -> Result<u16, SensorError> {
    let mut buf = [0u8; 2];
    i2c.write_read(address, &[reg], &mut buf)
        .map_err(SensorError::from_i2c)?;
    Ok(u16::from_be_bytes(buf))
}

fn write_register<I2C: I2c>(
    i2c: &mut I2C,
    address: u8,
    reg: u8,
    value: u16,
) -> Result<(), SensorError> {
    let [hi, lo] = value.to_be_bytes();
    i2c.write(address, &[reg, hi, lo])
        .map_err(SensorError::from_i2c)
}
