//! Callback-driven driver for event-loop platforms.
//!
//! Nothing here blocks. A measurement request schedules its first bus stage and returns; the
//! platform then feeds completion events back through [`Si7021Sequencer::on_transfer_complete`]
//! and [`Si7021Sequencer::on_timer_expired`], and each event advances the state machine by one
//! stage:
//!
//! ```text
//! humidity:     Idle -> CommandSent -> WaitingSettle -> ReadingResult -> Idle
//! temperature:  Idle -> ReadingResult -> Idle
//! ```
//!
//! The caller's callback lives inside the state, so it exists only while a request is in flight
//! and is consumed by the transition back to `Idle`. Every accepted request therefore invokes
//! its callback exactly once. A request made while another is in flight is rejected with
//! [`Error::Busy`].

use core::mem;

use crate::hw_def::*;
use crate::protocol;
use crate::scheduler::{OneShotTimer, Transfer, TransferScheduler};
use crate::types::*;

#[cfg(feature = "defmt")]
use defmt::Format;

static HUMIDITY_COMMAND: [Transfer<'static>; 1] = [Transfer::Write {
    bytes: &CMD_MEASURE_HUMIDITY,
    stop: true,
}];

static HUMIDITY_READ: [Transfer<'static>; 1] = [Transfer::Read {
    len: protocol::HUMIDITY_FRAME_LEN,
}];

static TEMPERATURE_READ: [Transfer<'static>; 2] = [
    Transfer::Write {
        bytes: &CMD_READ_TEMP_FROM_HUMIDITY,
        stop: false,
    },
    Transfer::Read {
        len: protocol::TEMP_FRAME_LEN,
    },
];

/// Observable stage of the in-flight request
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    /// no request in flight
    Idle,
    /// humidity command queued on the bus
    CommandSent,
    /// humidity command accepted, waiting for the conversion to latch
    WaitingSettle,
    /// result read queued on the bus
    ReadingResult(Quantity),
}

enum State<F> {
    Idle,
    CommandSent(F),
    WaitingSettle(F),
    ReadingResult(Quantity, F),
}
impl<F> State<F> {
    fn phase(&self) -> Phase {
        match self {
            State::Idle => Phase::Idle,
            State::CommandSent(_) => Phase::CommandSent,
            State::WaitingSettle(_) => Phase::WaitingSettle,
            State::ReadingResult(quantity, _) => Phase::ReadingResult(*quantity),
        }
    }
}

/// Si7021 driver over a [`TransferScheduler`] and a [`OneShotTimer`].
///
/// `F` is the measurement callback type; it receives the raw datum or the reason the
/// measurement failed.
pub struct Si7021Sequencer<B, T, F> {
    bus: B,
    timer: T,
    state: State<F>,
}

impl<B, T, F, E> Si7021Sequencer<B, T, F>
where
    B: TransferScheduler<Error = E>,
    T: OneShotTimer,
    F: FnOnce(Result<RawDatum, Error<E>>),
{
    /// Create a new sequencer owning its bus scheduler and settle timer
    pub fn new(bus: B, timer: T) -> Self {
        Self {
            bus,
            timer,
            state: State::Idle,
        }
    }

    /// Hand back the collaborators.  Refused while a request is in flight, since its callback
    /// would never run.
    pub fn release(self) -> Result<(B, T), Self> {
        match self.state {
            State::Idle => Ok((self.bus, self.timer)),
            _ => Err(self),
        }
    }

    /// Stage of the request currently in flight
    pub fn state(&self) -> Phase {
        self.state.phase()
    }

    fn perform_cmd_and_read(&mut self, cmd_bytes: &[u8], read_buf: &mut [u8]) -> Result<(), Error<E>> {
        trace!("si7021::perform_cmd_and_read(): cmd={:#x} read_len={}", cmd_bytes[0], read_buf.len());
        let transfers = [
            Transfer::Write {
                bytes: cmd_bytes,
                stop: false,
            },
            Transfer::Read { len: read_buf.len() },
        ];
        let read_len = self.bus.perform(SLAVE_ADDRESS, &transfers, read_buf).map_err(Error::I2c)?;
        if read_len < read_buf.len() {
            warn!("si7021: short read, {} of {} bytes", read_len, read_buf.len());
            return Err(Error::TruncatedResponse);
        }
        Ok(())
    }

    /// Read user register 1.  The device sends no checksum for it.
    pub fn read_user_register(&mut self) -> Result<UserRegister, Error<E>> {
        let mut read_buf = [0u8; 1];
        self.perform_cmd_and_read(&CMD_READ_USER_REG, &mut read_buf)?;
        Ok(UserRegister::from(read_buf[0]))
    }

    /// Read the 64-bit electronic serial number.  A corrupt first access ends the read before
    /// the second access is issued.
    pub fn read_serial_number(&mut self) -> Result<SerialNumber, Error<E>> {
        let mut id_1 = [0u8; protocol::ID_1_FRAME_LEN];
        self.perform_cmd_and_read(&ELECTRONIC_ID_1, &mut id_1)?;
        let sna = protocol::serial_a(&id_1)?;

        let mut id_2 = [0u8; protocol::ID_2_FRAME_LEN];
        self.perform_cmd_and_read(&ELECTRONIC_ID_2, &mut id_2)?;
        let snb = protocol::serial_b(&id_2)?;

        Ok(protocol::serial_number(sna, snb))
    }

    /// Read the part identification (SNB_3 of the serial number)
    pub fn read_device_identifier(&mut self) -> Result<DeviceId, Error<E>> {
        Ok(self.read_serial_number()?.device_id())
    }

    /// Start a humidity measurement.
    ///
    /// `callback` receives [`RawDatum::RelHumid`] once the command has been sent, the settle
    /// time has passed and the checksum-protected result has been read back.
    pub fn read_humidity(&mut self, callback: F) -> Result<(), Error<E>> {
        self.begin(&HUMIDITY_COMMAND, State::CommandSent, callback)
    }

    /// Start a read of the temperature measured with the previous humidity measurement.
    ///
    /// Command and read go out as a single transaction; `callback` receives [`RawDatum::Temp`].
    pub fn read_temperature(&mut self, callback: F) -> Result<(), Error<E>> {
        self.begin(&TEMPERATURE_READ, |cb| State::ReadingResult(Quantity::Temp, cb), callback)
    }

    fn begin(
        &mut self,
        transfers: &'static [Transfer<'static>],
        next: fn(F) -> State<F>,
        callback: F,
    ) -> Result<(), Error<E>> {
        if !matches!(self.state, State::Idle) {
            warn!("si7021: request rejected, {:?} in flight", self.state.phase());
            return Err(Error::Busy);
        }
        self.bus.schedule(SLAVE_ADDRESS, transfers).map_err(Error::I2c)?;
        self.state = next(callback);
        trace!("si7021: {:?}", self.state.phase());
        Ok(())
    }

    /// Report completion of the transaction queued by the last
    /// [`TransferScheduler::schedule`] call.  `result` carries the bytes read.
    pub fn on_transfer_complete(&mut self, result: Result<&[u8], E>) {
        match mem::replace(&mut self.state, State::Idle) {
            State::CommandSent(callback) => {
                if let Err(e) = result {
                    warn!("si7021: humidity command failed");
                    callback(Err(Error::I2c(e)));
                    return;
                }
                match self.timer.start(HUMIDITY_SETTLE_MS) {
                    Ok(()) => {
                        self.state = State::WaitingSettle(callback);
                        trace!("si7021: {:?}", self.state.phase());
                    }
                    Err(_) => {
                        warn!("si7021: settle timer could not be armed");
                        callback(Err(Error::Timer));
                    }
                }
            }
            State::ReadingResult(quantity, callback) => {
                let datum = result.map_err(Error::I2c).and_then(|frame| match quantity {
                    Quantity::RelHumid => protocol::humidity(frame),
                    Quantity::Temp => protocol::temperature(frame),
                });
                if let Ok(datum) = &datum {
                    debug!("si7021: {:?} raw={:#x}", quantity, datum.raw());
                }
                callback(datum);
            }
            other => {
                warn!("si7021: transfer completion ignored in {:?}", other.phase());
                self.state = other;
            }
        }
    }

    /// Report expiry of the settle timer armed by this sequencer
    pub fn on_timer_expired(&mut self) {
        match mem::replace(&mut self.state, State::Idle) {
            State::WaitingSettle(callback) => match self.bus.schedule(SLAVE_ADDRESS, &HUMIDITY_READ) {
                Ok(()) => {
                    self.state = State::ReadingResult(Quantity::RelHumid, callback);
                    trace!("si7021: {:?}", self.state.phase());
                }
                Err(e) => {
                    warn!("si7021: humidity read could not be scheduled");
                    callback(Err(Error::I2c(e)));
                }
            },
            other => {
                warn!("si7021: timer expiry ignored in {:?}", other.phase());
                self.state = other;
            }
        }
    }
}
