//! Turning raw monitor and ADC counts into display-ready values

use crate::config::CalibrationRule;
use crate::display::Side;

/// Anything above this is shown as a full tank
const FULL_TANK_PERCENT: f32 = 99.0;

/// Bus voltage in volts, with the channel's offset added to live (positive) readings
pub fn real_volts(bus_millivolts: f32, rule: &CalibrationRule) -> f32 {
    let volts = bus_millivolts / 1000.0;
    if volts > 0.0 {
        volts + rule.offset_volts
    } else {
        volts
    }
}

/// Current through the shunt: µV / µΩ = A
pub fn shunt_amps(shunt_microvolts: f32, shunt_micro_ohm: u32) -> f32 {
    shunt_microvolts / shunt_micro_ohm as f32
}

/// Raw ADC count scaled to a 0..100 percentage (not clamped)
pub fn tank_percent(raw_count: i16, scale_divisor: f32) -> f32 {
    f32::from(raw_count) / scale_divisor * 100.0
}

/// Round a percentage down to a multiple of `step`, snapping anything above 99 to 100
///
/// Cheap resistive senders jump between closely spaced resistor steps; showing
/// coarse levels keeps the panel from flickering on that jitter.
pub fn quantize_level(raw_percent: f32, step: u8) -> u8 {
    if raw_percent > FULL_TANK_PERCENT {
        return 100;
    }
    if raw_percent.is_nan() || raw_percent <= 0.0 {
        return 0;
    }
    let step = f32::from(step.clamp(1, 100));
    let level = (raw_percent / step).floor() * step;
    level.clamp(0.0, 100.0) as u8
}

/// Tank level as it should be shown on the given side of the panel
///
/// Both tanks use the same curve today. Oddly shaped tanks or non-linear senders get
/// their own arm here, so callers must not assume the two sides stay identical.
pub fn tank_level_adjust(raw_percent: f32, side: Side, rule: &CalibrationRule) -> u8 {
    match side {
        Side::Left => quantize_level(raw_percent, rule.quantize_step),
        Side::Right => quantize_level(raw_percent, rule.quantize_step),
    }
}
