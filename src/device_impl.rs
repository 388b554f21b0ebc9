use crate::hw_def::*;
use crate::protocol;
use crate::types::*;

use embedded_hal_async::{delay::DelayNs, i2c::I2c};

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

    /// Write `cmd_bytes`; if `read_buf` is non-empty, follow with a repeated start and fill it
    async fn cmd_and_read(&mut self, cmd_bytes: &[u8], read_buf: &mut [u8]) -> Result<(), Error<E>> {
        trace!("si7021::cmd_and_read(): cmd={:#x} read_len={}", cmd_bytes[0], read_buf.len());
        if read_buf.is_empty() {
            self.i2c.write(SLAVE_ADDRESS, cmd_bytes).await.map_err(Error::I2c)
        } else {
            self.i2c.write_read(SLAVE_ADDRESS, cmd_bytes, read_buf).await.map_err(Error::I2c)
        }
    }

    /// Read user register 1
    pub async fn read_user_register(&mut self) -> Result<UserRegister, Error<E>> {
        let mut read_buf = [0u8; 1];
        self.cmd_and_read(&CMD_READ_USER_REG, &mut read_buf).await?;
        Ok(UserRegister::from(read_buf[0]))
    }

    /// Write user register 1.  Start from a value returned by
    /// [`read_user_register`](Self::read_user_register) so the reserved bits are preserved.
    pub async fn write_user_register(&mut self, reg: UserRegister) -> Result<(), Error<E>> {
        self.cmd_and_read(&[Command::WriteUserReg.as_u8(), reg.bits()], &mut []).await
    }

    /// Read the 64-bit electronic serial number
    pub async fn read_serial_number(&mut self) -> Result<SerialNumber, Error<E>> {
        let mut id_1 = [0u8; protocol::ID_1_FRAME_LEN];
        self.cmd_and_read(&ELECTRONIC_ID_1, &mut id_1).await?;
        let sna = protocol::serial_a(&id_1)?;

        let mut id_2 = [0u8; protocol::ID_2_FRAME_LEN];
        self.cmd_and_read(&ELECTRONIC_ID_2, &mut id_2).await?;
        let snb = protocol::serial_b(&id_2)?;

        Ok(protocol::serial_number(sna, snb))
    }

    /// Read the part identification (SNB_3 of the serial number)
    pub async fn read_device_identifier(&mut self) -> Result<DeviceId, Error<E>> {
        let id = self.read_serial_number().await?.device_id();
        debug!("si7021: device id {}", u8::from(id));
        Ok(id)
    }

    /// Measure relative humidity.
    ///
    /// Sends the measure command, waits [`HUMIDITY_SETTLE_MS`] for the conversion to latch, then
    /// reads the checksum-protected result. The returned code has its status bits cleared.
    pub async fn read_humidity(&mut self) -> Result<RawDatum, Error<E>> {
        self.cmd_and_read(&CMD_MEASURE_HUMIDITY, &mut []).await?;
        self.delay.delay_ms(HUMIDITY_SETTLE_MS).await;

        let mut read_buf = [0u8; protocol::HUMIDITY_FRAME_LEN];
        self.i2c.read(SLAVE_ADDRESS, &mut read_buf).await.map_err(Error::I2c)?;
        protocol::humidity(&read_buf)
    }

    /// Read the temperature measured along with the previous humidity measurement
    pub async fn read_temperature(&mut self) -> Result<RawDatum, Error<E>> {
        let mut read_buf = [0u8; protocol::TEMP_FRAME_LEN];
        self.cmd_and_read(&CMD_READ_TEMP_FROM_HUMIDITY, &mut read_buf).await?;
        protocol::temperature(&read_buf)
    }

    /// Measure temperature directly.  The device holds the bus until the conversion is done.
    pub async fn measure_temperature(&mut self) -> Result<RawDatum, Error<E>> {
        let mut read_buf = [0u8; protocol::CHECKED_TEMP_FRAME_LEN];
        self.cmd_and_read(&CMD_MEASURE_TEMP, &mut read_buf).await?;
        protocol::checked_temperature(&read_buf)
    }

    /// software reset
    pub async fn software_reset(&mut self) -> Result<(), Error<E>> {
        self.cmd_and_read(&CMD_RESET, &mut []).await?;
        self.delay.delay_ms(RESET_SETTLE_MS).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::fixtures;

    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
    use futures::executor::block_on;

    /// Adds up every requested delay.
    #[derive(Default)]
    struct RecordingDelay {
        total_ns: u64,
    }
    impl DelayNs for RecordingDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    fn finish(dev: Si7021<I2cMock, RecordingDelay>) -> RecordingDelay {
        let (mut i2c, delay) = dev.release();
        i2c.done();
        delay
    }

    #[test]
    fn read_user_register() {
        let expectations = [Transaction::write_read(SLAVE_ADDRESS, vec![0xE7], vec![0x3A])];
        let mut dev = Si7021::new(I2cMock::new(&expectations), RecordingDelay::default());
        let reg = block_on(dev.read_user_register()).unwrap();
        assert_eq!(reg.bits(), 0x3A);
        finish(dev);
    }

    #[test]
    fn write_user_register() {
        let expectations = [Transaction::write(SLAVE_ADDRESS, vec![0xE6, 0x3B])];
        let mut dev = Si7021::new(I2cMock::new(&expectations), RecordingDelay::default());
        let reg = UserRegister::from(0x3A).with_resolution(Resolution::Rh8Temp12);
        block_on(dev.write_user_register(reg)).unwrap();
        finish(dev);
    }

    #[test]
    fn read_humidity_waits_before_reading() {
        let expectations = [
            Transaction::write(SLAVE_ADDRESS, vec![0xE5]),
            Transaction::read(SLAVE_ADDRESS, fixtures::HUMIDITY.to_vec()),
        ];
        let mut dev = Si7021::new(I2cMock::new(&expectations), RecordingDelay::default());
        let datum = block_on(dev.read_humidity()).unwrap();
        assert_eq!(datum, RawDatum::RelHumid(0x5A00));
        assert!((datum.humidity_percent().unwrap() - 37.945).abs() < 1e-3);
        let delay = finish(dev);
        assert_eq!(delay.total_ns, 25_000_000);
    }

    #[test]
    fn read_humidity_command_failure_skips_wait_and_read() {
        let expectations = [Transaction::write(SLAVE_ADDRESS, vec![0xE5]).with_error(ErrorKind::Other)];
        let mut dev = Si7021::new(I2cMock::new(&expectations), RecordingDelay::default());
        assert_eq!(block_on(dev.read_humidity()), Err(Error::I2c(ErrorKind::Other)));
        let delay = finish(dev);
        assert_eq!(delay.total_ns, 0);
    }

    #[test]
    fn read_humidity_bad_crc() {
        let expectations = [
            Transaction::write(SLAVE_ADDRESS, vec![0xE5]),
            Transaction::read(SLAVE_ADDRESS, vec![0x5A, 0x00, 0x2D]),
        ];
        let mut dev = Si7021::new(I2cMock::new(&expectations), RecordingDelay::default());
        assert_eq!(block_on(dev.read_humidity()), Err(Error::CrcMismatch));
        finish(dev);
    }

    #[test]
    fn read_temperature_from_humidity_cycle() {
        let expectations = [Transaction::write_read(SLAVE_ADDRESS, vec![0xE0], vec![0x68, 0x3A])];
        let mut dev = Si7021::new(I2cMock::new(&expectations), RecordingDelay::default());
        let datum = block_on(dev.read_temperature()).unwrap();
        assert_eq!(datum, RawDatum::Temp(0x683A));
        assert!((datum.centigrade().unwrap() - 24.69).abs() < 0.01);
        finish(dev);
    }

    #[test]
    fn read_temperature_bus_failure() {
        let expectations =
            [Transaction::write_read(SLAVE_ADDRESS, vec![0xE0], vec![0, 0]).with_error(ErrorKind::Other)];
        let mut dev = Si7021::new(I2cMock::new(&expectations), RecordingDelay::default());
        assert_eq!(block_on(dev.read_temperature()), Err(Error::I2c(ErrorKind::Other)));
        finish(dev);
    }

    #[test]
    fn measure_temperature_checks_crc() {
        let expectations = [
            Transaction::write_read(SLAVE_ADDRESS, vec![0xE3], vec![0x68, 0x3A, 0x7C]),
            Transaction::write_read(SLAVE_ADDRESS, vec![0xE3], vec![0x68, 0x3A, 0x00]),
        ];
        let mut dev = Si7021::new(I2cMock::new(&expectations), RecordingDelay::default());
        assert_eq!(block_on(dev.measure_temperature()), Ok(RawDatum::Temp(0x683A)));
        assert_eq!(block_on(dev.measure_temperature()), Err(Error::CrcMismatch));
        finish(dev);
    }

    #[test]
    fn read_device_identifier() {
        let expectations = [
            Transaction::write_read(SLAVE_ADDRESS, vec![0xFA, 0x0F], fixtures::ID_1.to_vec()),
            Transaction::write_read(SLAVE_ADDRESS, vec![0xFC, 0xC9], fixtures::ID_2.to_vec()),
        ];
        let mut dev = Si7021::new(I2cMock::new(&expectations), RecordingDelay::default());
        assert_eq!(block_on(dev.read_device_identifier()), Ok(DeviceId::Si7021));
        finish(dev);
    }

    #[test]
    fn read_serial_number() {
        let expectations = [
            Transaction::write_read(SLAVE_ADDRESS, vec![0xFA, 0x0F], fixtures::ID_1.to_vec()),
            Transaction::write_read(SLAVE_ADDRESS, vec![0xFC, 0xC9], fixtures::ID_2.to_vec()),
        ];
        let mut dev = Si7021::new(I2cMock::new(&expectations), RecordingDelay::default());
        let sn = block_on(dev.read_serial_number()).unwrap();
        assert_eq!(sn.0, [0x11, 0x22, 0x33, 0x44, 0x15, 0xFF, 0xB5, 0xFF]);
        finish(dev);
    }

    /// A corrupted first access must not be followed by the second.
    #[test]
    fn read_device_identifier_stops_after_corrupt_first_access() {
        let mut corrupt = fixtures::ID_1.to_vec();
        corrupt[5] ^= 0x80;
        let expectations = [Transaction::write_read(SLAVE_ADDRESS, vec![0xFA, 0x0F], corrupt)];
        let mut dev = Si7021::new(I2cMock::new(&expectations), RecordingDelay::default());
        assert_eq!(block_on(dev.read_device_identifier()), Err(Error::CrcMismatch));
        finish(dev);
    }

    #[test]
    fn read_device_identifier_bus_failure_on_second_access() {
        let expectations = [
            Transaction::write_read(SLAVE_ADDRESS, vec![0xFA, 0x0F], fixtures::ID_1.to_vec()),
            Transaction::write_read(SLAVE_ADDRESS, vec![0xFC, 0xC9], vec![0; 6]).with_error(ErrorKind::Other),
        ];
        let mut dev = Si7021::new(I2cMock::new(&expectations), RecordingDelay::default());
        assert_eq!(block_on(dev.read_device_identifier()), Err(Error::I2c(ErrorKind::Other)));
        finish(dev);
    }

    #[test]
    fn software_reset_waits_for_reboot() {
        let expectations = [Transaction::write(SLAVE_ADDRESS, vec![0xFE])];
        let mut dev = Si7021::new(I2cMock::new(&expectations), RecordingDelay::default());
        block_on(dev.software_reset()).unwrap();
        let delay = finish(dev);
        assert_eq!(delay.total_ns, 15_000_000);
    }
}
