/// Flags and constants for the SSD1680 commands in [`super::cmd::Cmd`]
pub struct Flag;
#[allow(missing_docs)]
impl Flag {
    // Driver Output Control (0x01): 296 gate lines, then GD/SM/TB
    pub const DRIVER_OUTPUT_MUX: [u8; 2] = [0x27, 0x01];
    pub const DRIVER_OUTPUT_GATE_SCAN_FROM_G0: u8 = 0x00;

    // Data Entry Mode (0x11) flags
    pub const DATA_ENTRY_INCRY_INCRX: u8 = 0x03; // Y increment, X increment

    // Deep Sleep Mode (0x10) flags
    pub const DEEP_SLEEP_MODE_1: u8 = 0x01;

    // Temperature Sensor Control (0x18) flags
    pub const INTERNAL_TEMP_SENSOR: u8 = 0x80;

    // Display Update Control 1 (0x21): normal RAM content, source S8..S167
    pub const DISPLAY_UPDATE_NORMAL: [u8; 2] = [0x00, 0x80];

    // Display Update Control 2 (0x22) sequences
    pub const DISPLAY_UPDATE_FULL: u8 = 0xF7; // Clock, analog, temp, LUT 1, display
    pub const DISPLAY_UPDATE_PARTIAL: u8 = 0xFC; // Same with LUT 2, only changed pixels

    // Border Waveform Control (0x3C) flags
    pub const BORDER_WAVEFORM_FOLLOW_LUT: u8 = 0x05;
    pub const BORDER_WAVEFORM_PARTIAL: u8 = 0x80; // Border follows VCOM, untouched

    // RAM bits
    pub const RAM_BYTE_WHITE: u8 = 0xFF;
    pub const RAM_BYTE_BLACK: u8 = 0x00;
}
