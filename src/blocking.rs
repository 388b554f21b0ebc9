//! Blocking driver over `embedded-hal` 1.0.
//!
//! Same operations as the async [`Si7021`](crate::Si7021); the humidity settle time is spent
//! inside `read_humidity` on the supplied delay.

use crate::hw_def::*;
use crate::protocol;
use crate::types::*;

use embedded_hal::{delay::DelayNs, i2c::I2c};

/// Si7021 device driver over blocking `embedded-hal`
#[derive(Debug)]
pub struct Si7021<I2C, Delay> {
    i2c: I2C,
    delay: Delay,
}

impl<I2C, Delay, E> Si7021<I2C, Delay>
where
    I2C: I2c<Error = E>,
    Delay: DelayNs,
{
    /// Create a new Si7021 driver instance
    pub fn new(i2c: I2C, delay: Delay) -> Self {
        Self { i2c, delay }
    }

    /// Destroy the driver and hand back the bus and delay
    pub fn release(self) -> (I2C, Delay) {
        (self.i2c, self.delay)
    }

    fn cmd_and_read(&mut self, cmd_bytes: &[u8], read_buf: &mut [u8]) -> Result<(), Error<E>> {
        trace!("si7021::blocking::cmd_and_read(): cmd={:#x} read_len={}", cmd_bytes[0], read_buf.len());
        if read_buf.is_empty() {
            self.i2c.write(SLAVE_ADDRESS, cmd_bytes).map_err(Error::I2c)
        } else {
            self.i2c.write_read(SLAVE_ADDRESS, cmd_bytes, read_buf).map_err(Error::I2c)
        }
    }

    /// Read user register 1
    pub fn read_user_register(&mut self) -> Result<UserRegister, Error<E>> {
        let mut read_buf = [0u8; 1];
        self.cmd_and_read(&CMD_READ_USER_REG, &mut read_buf)?;
        Ok(UserRegister::from(read_buf[0]))
    }

    /// Write user register 1
    pub fn write_user_register(&mut self, reg: UserRegister) -> Result<(), Error<E>> {
        self.cmd_and_read(&[Command::WriteUserReg.as_u8(), reg.bits()], &mut [])
    }

    /// Read the 64-bit electronic serial number
    pub fn read_serial_number(&mut self) -> Result<SerialNumber, Error<E>> {
        let mut id_1 = [0u8; protocol::ID_1_FRAME_LEN];
        self.cmd_and_read(&ELECTRONIC_ID_1, &mut id_1)?;
        let sna = protocol::serial_a(&id_1)?;

        let mut id_2 = [0u8; protocol::ID_2_FRAME_LEN];
        self.cmd_and_read(&ELECTRONIC_ID_2, &mut id_2)?;
        let snb = protocol::serial_b(&id_2)?;

        Ok(protocol::serial_number(sna, snb))
    }

    /// Read the part identification (SNB_3 of the serial number)
    pub fn read_device_identifier(&mut self) -> Result<DeviceId, Error<E>> {
        Ok(self.read_serial_number()?.device_id())
    }

    /// Measure relative humidity, blocking for [`HUMIDITY_SETTLE_MS`]
    pub fn read_humidity(&mut self) -> Result<RawDatum, Error<E>> {
        self.cmd_and_read(&CMD_MEASURE_HUMIDITY, &mut [])?;
        self.delay.delay_ms(HUMIDITY_SETTLE_MS);

        let mut read_buf = [0u8; protocol::HUMIDITY_FRAME_LEN];
        self.i2c.read(SLAVE_ADDRESS, &mut read_buf).map_err(Error::I2c)?;
        protocol::humidity(&read_buf)
    }

    /// Read the temperature measured along with the previous humidity measurement
    pub fn read_temperature(&mut self) -> Result<RawDatum, Error<E>> {
        let mut read_buf = [0u8; protocol::TEMP_FRAME_LEN];
        self.cmd_and_read(&CMD_READ_TEMP_FROM_HUMIDITY, &mut read_buf)?;
        protocol::temperature(&read_buf)
    }

    /// Measure temperature directly
    pub fn measure_temperature(&mut self) -> Result<RawDatum, Error<E>> {
        let mut read_buf = [0u8; protocol::CHECKED_TEMP_FRAME_LEN];
        self.cmd_and_read(&CMD_MEASURE_TEMP, &mut read_buf)?;
        protocol::checked_temperature(&read_buf)
    }

    /// software reset
    pub fn software_reset(&mut self) -> Result<(), Error<E>> {
        self.cmd_and_read(&CMD_RESET, &mut [])?;
        self.delay.delay_ms(RESET_SETTLE_MS);
        Ok(())
    }
}
