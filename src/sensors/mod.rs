//! Battery monitor and tank ADC collaborators, and the mapping from their raw
//! output to calibrated [`SensorReading`]s

pub mod ads1115;
pub mod calibration;
pub mod ina3221;
pub mod probe;

use crate::config::{BatteryBank, PanelConfig};
use crate::display::Side;
use crate::error::SensorError;
use crate::reading::{SensorReading, Unit};

use calibration::{real_volts, shunt_amps, tank_level_adjust, tank_percent};

/// Raw values of one monitor channel
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BatterySample {
    pub bus_millivolts: f32,
    pub shunt_microvolts: f32,
    pub bus_microamps: f32,
    pub bus_microwatts: f32,
}

/// Current/voltage monitor with numbered channels
pub trait BatteryMonitor {
    /// Number of channels found on the bus
    fn device_count(&self) -> u8;

    fn read_battery(&mut self, device: u8) -> Result<BatterySample, SensorError>;
}

/// Four-input ADC the tank senders hang off
pub trait TankAdc {
    /// One raw count per input, in input order
    fn read_tank_raw(&mut self) -> Result<[i16; 4], SensorError>;
}

impl<T: BatteryMonitor + ?Sized> BatteryMonitor for &mut T {
    fn device_count(&self) -> u8 {
        (**self).device_count()
    }

    fn read_battery(&mut self, device: u8) -> Result<BatterySample, SensorError> {
        (**self).read_battery(device)
    }
}

impl<T: TankAdc + ?Sized> TankAdc for &mut T {
    fn read_tank_raw(&mut self) -> Result<[i16; 4], SensorError> {
        (**self).read_tank_raw()
    }
}

/// Calibrated readings of one battery bank
#[derive(Debug, Clone, PartialEq)]
pub struct BatteryReadings {
    pub voltage: SensorReading,
    pub current: SensorReading,
}

/// One tank: the percentage published as telemetry and the coarse level shown
#[derive(Debug, Clone, PartialEq)]
pub struct TankReading {
    pub level: SensorReading,
    pub display_level: u8,
}

/// Polls the hardware collaborators and applies the deployment's calibration
pub struct SensorSource<B, A> {
    monitor: B,
    adc: A,
}

impl<B, A> SensorSource<B, A>
where
    B: BatteryMonitor,
    A: TankAdc,
{
    pub fn new(monitor: B, adc: A) -> Self {
        Self { monitor, adc }
    }

    pub fn read_battery(&mut self, device: u8) -> Result<BatterySample, SensorError> {
        self.monitor.read_battery(device)
    }

    pub fn read_tank_raw(&mut self) -> Result<[i16; 4], SensorError> {
        self.adc.read_tank_raw()
    }

    /// Voltage from the bank's voltage channel, current from its shunt channel
    ///
    /// Current is clamped to `±max_amps`, the rated range of the shunt.
    pub fn poll_battery(
        &mut self,
        bank: &BatteryBank,
        shunt_micro_ohm: u32,
        max_amps: u16,
    ) -> Result<BatteryReadings, SensorError> {
        let voltage_sample = self.monitor.read_battery(bank.voltage_device)?;
        let current_sample = self.monitor.read_battery(bank.current_device)?;

        let volts = real_volts(voltage_sample.bus_millivolts, &bank.calibration);
        let mut amps = shunt_amps(current_sample.shunt_microvolts, shunt_micro_ohm);
        let limit = f32::from(max_amps);
        if amps.abs() > limit {
            log::warn!("{}: {:.1} A is beyond the {} A shunt, clamped", bank.name, amps, max_amps);
            amps = amps.clamp(-limit, limit);
        }
        log::debug!("{}: {:.2} V {:.2} A", bank.name, volts, amps);

        Ok(BatteryReadings {
            voltage: SensorReading::new(bank.voltage_key.as_str(), volts, Unit::Volts),
            current: SensorReading::new(bank.current_key.as_str(), amps, Unit::Amps),
        })
    }

    /// Both configured tanks from a single ADC sweep, left pane first
    pub fn poll_tanks(&mut self, config: &PanelConfig) -> Result<[TankReading; 2], SensorError> {
        let raw = self.adc.read_tank_raw()?;

        Ok(Side::ALL.map(|side| {
            let tank = config.tank(side);
            let count = raw[usize::from(tank.adc_channel & 0x03)];
            let percent = tank_percent(count, config.tank_scale_divisor);
            let display_level = tank_level_adjust(percent, side, &tank.calibration);
            log::debug!("{}: raw {} = {:.1}% -> {}%", tank.name, count, percent, display_level);

            TankReading {
                level: SensorReading::new(tank.level_key.as_str(), percent, Unit::Percent),
                display_level,
            }
        }))
    }

    pub fn release(self) -> (B, A) {
        (self.monitor, self.adc)
    }
}
