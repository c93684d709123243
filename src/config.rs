//! Deployment constants for one installed panel
//!
//! Everything here is decided once at startup by the bring-up code, checked with
//! [`PanelConfig::validate`] and then handed to the core as an immutable value.

use std::collections::HashSet;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use crate::display::Side;
use crate::error::ConfigError;

/// Tank levels are shown in steps of this many percent
pub const DEFAULT_QUANTIZE_STEP: u8 = 10;

/// Per-channel correction applied to raw sensor output before it becomes a reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationRule {
    /// Added to a positive bus voltage (compensates a sensor that reads low)
    pub offset_volts: f32,
    /// Tank percentage is rounded down to a multiple of this
    pub quantize_step: u8,
}

impl CalibrationRule {
    pub const fn new(offset_volts: f32, quantize_step: u8) -> Self {
        Self {
            offset_volts,
            quantize_step,
        }
    }
}

impl Default for CalibrationRule {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_QUANTIZE_STEP)
    }
}

/// One battery bank: two INA3221 device numbers feed one pane
#[derive(Debug, Clone, PartialEq)]
pub struct BatteryBank {
    pub name: String,
    /// Device number read for the bus voltage
    pub voltage_device: u8,
    /// Device number whose shunt carries the bank current
    pub current_device: u8,
    pub voltage_key: String,
    pub current_key: String,
    pub calibration: CalibrationRule,
}

/// One tank sender wired to an ADS1115 input
#[derive(Debug, Clone, PartialEq)]
pub struct TankChannel {
    pub name: String,
    pub adc_channel: u8,
    pub level_key: String,
    pub calibration: CalibrationRule,
}

/// How long to keep looking for the battery monitor at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay_ms: u32,
    /// `None` retries forever
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryConfig {
    pub enabled: bool,
    /// SignalK server UDP input
    pub server: SocketAddr,
    /// `Source` tag on every delta
    pub source: String,
}

/// Station credentials; an empty password joins an open network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiConfig {
    pub ssid: String,
    pub password: String,
}

impl WifiConfig {
    pub const DEFAULT_SSID: &'static str = "openplotter";

    /// Build-time overrides, falling back to the open boat network
    pub fn from_env(ssid: Option<&str>, password: Option<&str>) -> Self {
        Self {
            ssid: ssid.unwrap_or(Self::DEFAULT_SSID).into(),
            password: password.unwrap_or_default().into(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self::from_env(None, None)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    /// Shunt resistance in micro-ohm (75 mV / 200 A shunt = 375)
    pub shunt_micro_ohm: u32,
    /// Rated current of the shunt; readings beyond it are clamped
    pub max_amps: u16,
    /// Left pane first
    pub batteries: [BatteryBank; 2],
    /// Left pane first
    pub tanks: [TankChannel; 2],
    /// Raw ADC count that corresponds to a full tank
    pub tank_scale_divisor: f32,
    /// Partial updates allowed before a full repaint
    pub refresh_threshold: u32,
    /// Touch readings below this request a page toggle
    pub touch_threshold: u16,
    pub tick_interval_ms: u32,
    pub sensor_retry: RetryPolicy,
    pub telemetry: TelemetryConfig,
    pub wifi: WifiConfig,
    /// POSIX TZ string
    pub time_zone: String,
    pub ntp_server: String,
}

impl PanelConfig {
    pub fn battery(&self, side: Side) -> &BatteryBank {
        &self.batteries[side.index()]
    }

    pub fn tank(&self, side: Side) -> &TankChannel {
        &self.tanks[side.index()]
    }

    /// Reject constants that would make the pipeline divide by zero or publish ambiguously
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shunt_micro_ohm == 0 {
            return Err(ConfigError::ZeroShunt);
        }
        if !(1..=1022).contains(&self.max_amps) {
            return Err(ConfigError::InvalidMaxAmps(self.max_amps));
        }
        if !(self.tank_scale_divisor.is_finite() && self.tank_scale_divisor > 0.0) {
            return Err(ConfigError::InvalidTankDivisor(self.tank_scale_divisor));
        }
        if self.refresh_threshold == 0 {
            return Err(ConfigError::ZeroRefreshThreshold);
        }

        let rules = self
            .batteries
            .iter()
            .map(|bank| bank.calibration)
            .chain(self.tanks.iter().map(|tank| tank.calibration));
        for rule in rules {
            if !rule.offset_volts.is_finite() {
                return Err(ConfigError::InvalidOffset(rule.offset_volts));
            }
            if !(1..=100).contains(&rule.quantize_step) {
                return Err(ConfigError::InvalidQuantizeStep(rule.quantize_step));
            }
        }

        if let Some(tank) = self.tanks.iter().find(|tank| tank.adc_channel > 3) {
            return Err(ConfigError::InvalidTankChannel(tank.adc_channel));
        }

        let mut seen = HashSet::new();
        let keys = self
            .batteries
            .iter()
            .flat_map(|bank| [&bank.voltage_key, &bank.current_key])
            .chain(self.tanks.iter().map(|tank| &tank.level_key));
        for key in keys {
            if !seen.insert(key.as_str()) {
                return Err(ConfigError::DuplicateKey(key.clone()));
            }
        }

        Ok(())
    }
}

impl Default for PanelConfig {
    /// The boat installation: HOUSE/ENGINE banks, FORE/STBD water tanks
    fn default() -> Self {
        // The voltage sensors on this boat read half a volt low
        let battery_rule = CalibrationRule::new(0.5, DEFAULT_QUANTIZE_STEP);

        Self {
            shunt_micro_ohm: 375,
            max_amps: 200,
            batteries: [
                BatteryBank {
                    name: "HOUSE".into(),
                    voltage_device: 4,
                    current_device: 5,
                    voltage_key: "electrical.batteries.house.voltage".into(),
                    current_key: "electrical.batteries.house.current".into(),
                    calibration: battery_rule,
                },
                BatteryBank {
                    name: "ENGINE".into(),
                    voltage_device: 1,
                    current_device: 2,
                    voltage_key: "electrical.batteries.engine.voltage".into(),
                    current_key: "electrical.batteries.engine.current".into(),
                    calibration: battery_rule,
                },
            ],
            tanks: [
                TankChannel {
                    name: "FORE".into(),
                    adc_channel: 0,
                    level_key: "tanks.freshWater.forwardTank.currentLevel".into(),
                    calibration: CalibrationRule::default(),
                },
                TankChannel {
                    name: "STBD".into(),
                    adc_channel: 1,
                    level_key: "tanks.freshWater.starboardTank.currentLevel".into(),
                    calibration: CalibrationRule::default(),
                },
            ],
            tank_scale_divisor: 12336.0,
            // About 4 cycles per second, so a full repaint every ~10 minutes
            refresh_threshold: 2400,
            touch_threshold: 30,
            tick_interval_ms: 500,
            sensor_retry: RetryPolicy {
                delay_ms: 10_000,
                max_attempts: None,
            },
            telemetry: TelemetryConfig {
                enabled: true,
                server: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(10, 10, 10, 1), 55561)),
                source: "PanelSensors".into(),
            },
            wifi: WifiConfig::default(),
            time_zone: "<GMT-6>+6".into(),
            ntp_server: "pool.ntp.org".into(),
        }
    }
}
