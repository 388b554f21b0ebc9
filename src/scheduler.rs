//! Collaborators consumed by [`Si7021Sequencer`](crate::Si7021Sequencer).
//!
//! These mirror the transaction manager and application timer found on event-driven platforms:
//! work is queued, and completion is reported back later by calling into the sequencer.

/// One step of a bus transaction addressed to a single slave
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transfer<'a> {
    /// Write `bytes`; with `stop == false` the next transfer follows a repeated start
    Write {
        /// bytes to send
        bytes: &'a [u8],
        /// end with a stop condition
        stop: bool,
    },
    /// Read `len` bytes
    Read {
        /// number of bytes to read
        len: usize,
    },
}

/// Bus transaction scheduler
pub trait TransferScheduler {
    /// Bus error reported on failure
    type Error;

    /// Run `transfers` as one transaction and return once it is done.
    ///
    /// Bytes from every `Read` land in `read_buf` back to back, in transfer order.  Returns how
    /// many bytes were actually read; fewer than `read_buf.len()` marks a short transaction.
    fn perform(&mut self, address: u8, transfers: &[Transfer<'_>], read_buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Queue `transfers` as one transaction and return immediately.
    ///
    /// When the transaction finishes, or its first transfer fails, the platform must call
    /// [`Si7021Sequencer::on_transfer_complete`](crate::Si7021Sequencer::on_transfer_complete)
    /// exactly once with the bytes read (possibly none) or the error.
    fn schedule(&mut self, address: u8, transfers: &'static [Transfer<'static>]) -> Result<(), Self::Error>;
}

/// One-shot timer service
pub trait OneShotTimer {
    /// Error reported when the timer cannot be armed
    type Error;

    /// Arm the timer.  When `duration_ms` has elapsed the platform must call
    /// [`Si7021Sequencer::on_timer_expired`](crate::Si7021Sequencer::on_timer_expired) once.
    fn start(&mut self, duration_ms: u32) -> Result<(), Self::Error>;
}
