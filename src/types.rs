use crate::hw_def::*;

use core::fmt;

#[cfg(feature = "defmt")]
use defmt::Format;

/// Si7021 device driver over `embedded-hal-async`
#[cfg(feature = "async")]
#[derive(Debug)]
pub struct Si7021<I2C, Delay> {
    pub(crate) i2c: I2C,
    pub(crate) delay: Delay,
}

/// All possible errors in this crate
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, PartialEq)]
pub enum Error<E> {
    /// I²C communication error
    I2c(E),
    /// Failure of a checksum from the device was detected
    CrcMismatch,
    /// The bus completed a read with fewer bytes than were requested
    TruncatedResponse,
    /// A measurement is already in flight on this driver instance
    Busy,
    /// The settle timer could not be armed
    Timer,
}

/// Which physical quantity a measurement carries
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Quantity {
    /// relative humidity
    RelHumid,
    /// temperature
    Temp,
}
impl Quantity {
    /// `(value, raw)` pair reported for a failed measurement by callers that still speak the
    /// sentinel convention: `(-1.0, 0xFFFF)` for humidity and `(-1.0, 0)` for temperature.
    pub const fn sentinel(self) -> (f32, u16) {
        match self {
            Self::RelHumid => (-1.0, 0xFFFF),
            Self::Temp => (-1.0, 0),
        }
    }
}

/// Raw (still in u16 format) temperature or humidity from the device
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RawDatum {
    /// relative humidity code, status bits cleared
    RelHumid(u16),
    /// temperature code
    Temp(u16),
}
impl RawDatum {
    /// Get the unconverted code
    pub fn raw(&self) -> u16 {
        match self {
            Self::RelHumid(raw) | Self::Temp(raw) => *raw,
        }
    }
    /// Which quantity this code measures
    pub fn quantity(&self) -> Quantity {
        match self {
            Self::RelHumid(_) => Quantity::RelHumid,
            Self::Temp(_) => Quantity::Temp,
        }
    }
    /// Get temperature in Fahrenheit
    pub fn fahrenheit(&self) -> Option<f32> {
        match self {
            Self::Temp(raw) => Some(raw_temp_to_fahrenheit(*raw)),
            Self::RelHumid(_) => None,
        }
    }
    /// Get temperature in Centigrade
    pub fn centigrade(&self) -> Option<f32> {
        match self {
            Self::Temp(raw) => Some(raw_temp_to_centigrade(*raw)),
            Self::RelHumid(_) => None,
        }
    }
    /// Get relative humidity in percent
    pub fn humidity_percent(&self) -> Option<f32> {
        match self {
            Self::RelHumid(raw) => Some(raw_rel_humid_to_percent(*raw)),
            Self::Temp(_) => None,
        }
    }
}

/// Temp or humidity from the device after conversion
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug)]
pub enum Datum {
    /// relative humidity in percent
    RelHumid(f32),
    /// temperature
    Temp(Temp),
}
impl From<&RawDatum> for Datum {
    fn from(raw: &RawDatum) -> Self {
        match raw {
            RawDatum::RelHumid(raw) => Datum::RelHumid(raw_rel_humid_to_percent(*raw)),
            RawDatum::Temp(raw) => Datum::Temp((*raw).into()),
        }
    }
}

/// Temp after conversion
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug)]
pub struct Temp {
    /// degrees centigrade
    pub centigrade: f32,
    /// degrees fahrenheit
    pub fahrenheit: f32,
}
impl From<u16> for Temp {
    fn from(raw: u16) -> Self {
        Self {
            centigrade: raw_temp_to_centigrade(raw),
            fahrenheit: raw_temp_to_fahrenheit(raw),
        }
    }
}

/// Measurement resolution, relative humidity / temperature bits
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Resolution {
    /// 12 bit RH, 14 bit temperature (power-on default)
    Rh12Temp14,
    /// 8 bit RH, 12 bit temperature
    Rh8Temp12,
    /// 10 bit RH, 13 bit temperature
    Rh10Temp13,
    /// 11 bit RH, 11 bit temperature
    Rh11Temp11,
}

/// User register 1
///
/// Bits 1, 3, 4 and 5 are reserved; the `with_*` builders leave them as read.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UserRegister(u8);
impl From<u8> for UserRegister {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}
impl UserRegister {
    /// Get the raw register byte
    pub fn bits(&self) -> u8 {
        self.0
    }
    /// Measurement resolution selected by bits 7 and 0
    pub fn resolution(&self) -> Resolution {
        let res1 = (self.0 >> USER_REG_FIELD_LSBIT_RES1) & 1;
        let res0 = (self.0 >> USER_REG_FIELD_LSBIT_RES0) & 1;
        match (res1, res0) {
            (0, 0) => Resolution::Rh12Temp14,
            (0, _) => Resolution::Rh8Temp12,
            (_, 0) => Resolution::Rh10Temp13,
            _ => Resolution::Rh11Temp11,
        }
    }
    /// On-chip heater is enabled
    pub fn heater_enabled(&self) -> bool {
        (self.0 >> USER_REG_FIELD_LSBIT_HEATER) & 1 != 0
    }
    /// Supply voltage has dropped below the operating threshold
    pub fn vdd_low(&self) -> bool {
        (self.0 >> USER_REG_FIELD_LSBIT_VDD_LOW) & 1 != 0
    }
    /// Copy with a different resolution
    pub fn with_resolution(self, resolution: Resolution) -> Self {
        let (res1, res0) = match resolution {
            Resolution::Rh12Temp14 => (0, 0),
            Resolution::Rh8Temp12 => (0, 1),
            Resolution::Rh10Temp13 => (1, 0),
            Resolution::Rh11Temp11 => (1, 1),
        };
        let cleared = self.0 & !((1 << USER_REG_FIELD_LSBIT_RES1) | (1 << USER_REG_FIELD_LSBIT_RES0));
        Self(cleared | (res1 << USER_REG_FIELD_LSBIT_RES1) | (res0 << USER_REG_FIELD_LSBIT_RES0))
    }
    /// Copy with the heater switched on or off
    pub fn with_heater(self, enabled: bool) -> Self {
        let cleared = self.0 & !(1 << USER_REG_FIELD_LSBIT_HEATER);
        Self(cleared | ((enabled as u8) << USER_REG_FIELD_LSBIT_HEATER))
    }
}
impl fmt::Display for UserRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserRegister {{ 0x{:02x}; {:?} ", self.0, self.resolution())?;
        if self.heater_enabled() {
            write!(f, "heater_enabled ")?;
        }
        if self.vdd_low() {
            write!(f, "vdd_low ")?;
        }
        write!(f, "}}")
    }
}

/// 64-bit electronic serial number, SNA_3 first
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SerialNumber(pub [u8; 8]);
impl SerialNumber {
    /// Part identification carried in SNB_3
    pub fn device_id(&self) -> DeviceId {
        DeviceId::from(self.0[4])
    }
}
impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

/// Part family reported by the device
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeviceId {
    /// engineering sample (0x00 or 0xFF)
    EngineeringSample(u8),
    /// Si7013
    Si7013,
    /// Si7020
    Si7020,
    /// Si7021
    Si7021,
    /// Other
    Other(u8),
}
impl From<u8> for DeviceId {
    fn from(raw: u8) -> Self {
        match raw {
            DEVICE_ID_ENGINEERING_SAMPLE_0 | DEVICE_ID_ENGINEERING_SAMPLE_1 => DeviceId::EngineeringSample(raw),
            DEVICE_ID_SI7013 => DeviceId::Si7013,
            DEVICE_ID_SI7020 => DeviceId::Si7020,
            DEVICE_ID_SI7021 => DeviceId::Si7021,
            _ => DeviceId::Other(raw),
        }
    }
}
impl From<DeviceId> for u8 {
    fn from(id: DeviceId) -> u8 {
        match id {
            DeviceId::EngineeringSample(raw) | DeviceId::Other(raw) => raw,
            DeviceId::Si7013 => DEVICE_ID_SI7013,
            DeviceId::Si7020 => DEVICE_ID_SI7020,
            DeviceId::Si7021 => DEVICE_ID_SI7021,
        }
    }
}
impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id: u8 = (*self).into();
        match self {
            DeviceId::EngineeringSample(_) => write!(f, "engineering sample (0x{id:02X})"),
            DeviceId::Si7013 => write!(f, "Si7013 (0x{id:02X})"),
            DeviceId::Si7020 => write!(f, "Si7020 (0x{id:02X})"),
            DeviceId::Si7021 => write!(f, "Si7021 (0x{id:02X})"),
            DeviceId::Other(_) => write!(f, "Unknown (0x{id:02X})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_register_power_on_default() {
        // 0x3A after reset: 12/14 bit, heater off, VDD ok
        let reg = UserRegister::from(0x3A);
        assert_eq!(reg.resolution(), Resolution::Rh12Temp14);
        assert!(!reg.heater_enabled());
        assert!(!reg.vdd_low());
    }

    #[test]
    fn user_register_resolution_bits_are_split() {
        assert_eq!(UserRegister::from(0b0000_0001).resolution(), Resolution::Rh8Temp12);
        assert_eq!(UserRegister::from(0b1000_0000).resolution(), Resolution::Rh10Temp13);
        assert_eq!(UserRegister::from(0b1000_0001).resolution(), Resolution::Rh11Temp11);
    }

    #[test]
    fn user_register_flags() {
        let reg = UserRegister::from(0b0100_0100);
        assert!(reg.heater_enabled());
        assert!(reg.vdd_low());
    }

    #[test]
    fn user_register_builders_keep_reserved_bits() {
        let reg = UserRegister::from(0x3A)
            .with_resolution(Resolution::Rh11Temp11)
            .with_heater(true);
        assert_eq!(reg.bits(), 0x3A | 0x81 | 0x04);
        let back = reg.with_resolution(Resolution::Rh12Temp14).with_heater(false);
        assert_eq!(back.bits(), 0x3A);
    }

    #[test]
    fn device_id_round_trips_through_u8() {
        assert_eq!(DeviceId::from(0x15), DeviceId::Si7021);
        assert_eq!(DeviceId::from(0x0D), DeviceId::Si7013);
        assert_eq!(DeviceId::from(0xFF), DeviceId::EngineeringSample(0xFF));
        assert_eq!(u8::from(DeviceId::Si7020), 0x14);
        assert_eq!(u8::from(DeviceId::Other(0x42)), 0x42);
        assert_eq!(format!("{}", DeviceId::Si7021), "Si7021 (0x15)");
    }

    #[test]
    fn serial_number_display_and_device_id() {
        let sn = SerialNumber([0x11, 0x22, 0x33, 0x44, 0x15, 0xFF, 0xB5, 0xFF]);
        assert_eq!(format!("{sn}"), "1122334415FFB5FF");
        assert_eq!(sn.device_id(), DeviceId::Si7021);
    }

    #[test]
    fn raw_datum_conversions_match_quantity() {
        let hum = RawDatum::RelHumid(0x5A00);
        assert_eq!(hum.quantity(), Quantity::RelHumid);
        assert!(hum.centigrade().is_none());
        assert!((hum.humidity_percent().unwrap() - 37.9453).abs() < 1e-3);

        let temp = RawDatum::Temp(0x683A);
        assert_eq!(temp.raw(), 0x683A);
        assert!(temp.humidity_percent().is_none());
        assert!((temp.centigrade().unwrap() - 24.69).abs() < 0.01);
        match Datum::from(&temp) {
            Datum::Temp(t) => assert!((t.fahrenheit - 76.44).abs() < 0.02),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn sentinel_pairs() {
        assert_eq!(Quantity::RelHumid.sentinel(), (-1.0, 0xFFFF));
        assert_eq!(Quantity::Temp.sentinel(), (-1.0, 0));
    }
}
