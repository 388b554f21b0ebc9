#[cfg(feature = "defmt")]
use defmt::Format;

/// Fixed 7-bit I²C address of the Si7021
pub const SLAVE_ADDRESS: u8 = 0x40;

/// Time the device needs after a humidity command before its result register is valid
pub const HUMIDITY_SETTLE_MS: u32 = 25;

/// Time the device needs to come back after a software reset
pub const RESET_SETTLE_MS: u32 = 15;

/// Mask clearing the two status bits at the bottom of a humidity code
pub const HUMIDITY_STATUS_MASK: u16 = 0xFFFC;

/// Electronic ID, first access (SNA_3..SNA_0)
pub const ELECTRONIC_ID_1: [u8; 2] = [0xFA, 0x0F];
/// Electronic ID, second access (SNB_3..SNB_0)
pub const ELECTRONIC_ID_2: [u8; 2] = [0xFC, 0xC9];

/// SNB_3 values identifying the part
pub const DEVICE_ID_ENGINEERING_SAMPLE_0: u8 = 0x00;
/// SNB_3 value for engineering samples, alternate encoding
pub const DEVICE_ID_ENGINEERING_SAMPLE_1: u8 = 0xFF;
/// SNB_3 value for the Si7013
pub const DEVICE_ID_SI7013: u8 = 0x0D;
/// SNB_3 value for the Si7020
pub const DEVICE_ID_SI7020: u8 = 0x14;
/// SNB_3 value for the Si7021
pub const DEVICE_ID_SI7021: u8 = 0x15;

pub(crate) const USER_REG_FIELD_LSBIT_RES0: u8 = 0;
pub(crate) const USER_REG_FIELD_LSBIT_HEATER: u8 = 2;
pub(crate) const USER_REG_FIELD_LSBIT_VDD_LOW: u8 = 6;
pub(crate) const USER_REG_FIELD_LSBIT_RES1: u8 = 7;

/// Single-byte commands understood by the device
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Command {
    /// Measure relative humidity
    MeasureHumidity = 0xE5,
    /// Read the temperature latched during the previous humidity measurement
    ReadTempFromHumidity = 0xE0,
    /// Measure temperature (hold master mode)
    MeasureTemp = 0xE3,
    /// Write user register 1
    WriteUserReg = 0xE6,
    /// Read user register 1
    ReadUserReg = 0xE7,
    /// Software reset
    Reset = 0xFE,
}
impl Command {
    /// Command byte as sent on the wire
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

pub(crate) const CMD_MEASURE_HUMIDITY: [u8; 1] = [Command::MeasureHumidity.as_u8()];
pub(crate) const CMD_READ_TEMP_FROM_HUMIDITY: [u8; 1] = [Command::ReadTempFromHumidity.as_u8()];
#[cfg(any(feature = "async", feature = "blocking"))]
pub(crate) const CMD_MEASURE_TEMP: [u8; 1] = [Command::MeasureTemp.as_u8()];
pub(crate) const CMD_READ_USER_REG: [u8; 1] = [Command::ReadUserReg.as_u8()];
#[cfg(any(feature = "async", feature = "blocking"))]
pub(crate) const CMD_RESET: [u8; 1] = [Command::Reset.as_u8()];

/// Convert a raw temperature code to degrees Celsius
pub fn raw_temp_to_centigrade(raw: u16) -> f32 {
    175.72 * (raw as f32) / 65536.0 - 46.85
}

/// Convert a raw temperature code to degrees Fahrenheit
pub fn raw_temp_to_fahrenheit(raw: u16) -> f32 {
    raw_temp_to_centigrade(raw) * 1.8 + 32.0
}

/// Convert a raw humidity code (status bits already cleared) to percent relative humidity
pub fn raw_rel_humid_to_percent(raw: u16) -> f32 {
    125.0 * (raw as f32) / 65536.0 - 6.0
}
