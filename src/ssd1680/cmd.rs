/// Controller commands
pub struct Cmd;
#[allow(missing_docs)]
impl Cmd {
    // Init
    pub const SW_RESET: u8 = 0x12;
    pub const DRIVER_CONTROL: u8 = 0x01;
    pub const DATA_ENTRY_MODE: u8 = 0x11;
    pub const TEMP_CONTROL: u8 = 0x18;
    pub const BORDER_WAVEFORM_CONTROL: u8 = 0x3C;
    pub const DISPLAY_UPDATE_CONTROL: u8 = 0x21;
    pub const SET_RAMX_START_END: u8 = 0x44;
    pub const SET_RAMY_START_END: u8 = 0x45;
    pub const DEEP_SLEEP_MODE: u8 = 0x10;

    // Update
    pub const SET_RAMX_COUNTER: u8 = 0x4E;
    pub const SET_RAMY_COUNTER: u8 = 0x4F;
    /// RAM the next update drives towards
    pub const WRITE_BW_DATA: u8 = 0x24;
    /// RAM holding what is on the glass now; partial updates diff against it
    pub const WRITE_PREVIOUS_DATA: u8 = 0x26;
    pub const UPDATE_DISPLAY_CTRL2: u8 = 0x22;
    pub const MASTER_ACTIVATE: u8 = 0x20;
}
