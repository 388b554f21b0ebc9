//! Decoding of raw response frames, shared by every front-end.

use crate::checksum::{compute16, update};
use crate::hw_def::HUMIDITY_STATUS_MASK;
use crate::types::{Error, RawDatum, SerialNumber};

/// Bytes returned by a humidity read: MSB, LSB, checksum
pub(crate) const HUMIDITY_FRAME_LEN: usize = 3;
/// Bytes returned by a temperature-from-humidity read: MSB, LSB
pub(crate) const TEMP_FRAME_LEN: usize = 2;
/// Bytes returned by a direct temperature measurement: MSB, LSB, checksum
#[cfg(any(feature = "async", feature = "blocking"))]
pub(crate) const CHECKED_TEMP_FRAME_LEN: usize = 3;
/// First electronic-ID access: 4 × (data, crc)
pub(crate) const ID_1_FRAME_LEN: usize = 8;
/// Second electronic-ID access: 2 × (data, data, crc)
pub(crate) const ID_2_FRAME_LEN: usize = 6;

/// Check a big-endian word followed by its checksum byte
pub(crate) fn checked_word<E>(frame: &[u8]) -> Result<u16, Error<E>> {
    let [msb, lsb, crc, ..] = *frame else {
        return Err(Error::TruncatedResponse);
    };
    let word = u16::from_be_bytes([msb, lsb]);
    let crc_expect = compute16(word);
    if crc != crc_expect {
        warn!("si7021: crc mismatch word={:#x} crc={:#x} expected={:#x}", word, crc, crc_expect);
        return Err(Error::CrcMismatch);
    }
    Ok(word)
}

/// Humidity frame: checksum verified, status bits cleared
pub(crate) fn humidity<E>(frame: &[u8]) -> Result<RawDatum, Error<E>> {
    let raw = checked_word(frame)?;
    Ok(RawDatum::RelHumid(raw & HUMIDITY_STATUS_MASK))
}

/// Temperature latched by the previous humidity measurement; the device sends no checksum
pub(crate) fn temperature<E>(frame: &[u8]) -> Result<RawDatum, Error<E>> {
    let [msb, lsb, ..] = *frame else {
        return Err(Error::TruncatedResponse);
    };
    Ok(RawDatum::Temp(u16::from_be_bytes([msb, lsb])))
}

/// Directly measured temperature, checksum verified
#[cfg(any(feature = "async", feature = "blocking"))]
pub(crate) fn checked_temperature<E>(frame: &[u8]) -> Result<RawDatum, Error<E>> {
    Ok(RawDatum::Temp(checked_word(frame)?))
}

/// SNA_3..SNA_0 from the first electronic-ID access.
///
/// Every data byte is followed by the CRC of all data bytes so far.
pub(crate) fn serial_a<E>(frame: &[u8]) -> Result<[u8; 4], Error<E>> {
    if frame.len() < ID_1_FRAME_LEN {
        return Err(Error::TruncatedResponse);
    }
    let mut sna = [0u8; 4];
    let mut crc = 0;
    for (ii, pair) in frame[..ID_1_FRAME_LEN].chunks_exact(2).enumerate() {
        crc = update(crc, pair[0]);
        if crc != pair[1] {
            warn!("si7021: electronic id 1 crc mismatch at byte {}", ii);
            return Err(Error::CrcMismatch);
        }
        sna[ii] = pair[0];
    }
    Ok(sna)
}

/// SNB_3..SNB_0 from the second electronic-ID access.
///
/// Every two data bytes are followed by the CRC of all data bytes so far.
pub(crate) fn serial_b<E>(frame: &[u8]) -> Result<[u8; 4], Error<E>> {
    if frame.len() < ID_2_FRAME_LEN {
        return Err(Error::TruncatedResponse);
    }
    let mut snb = [0u8; 4];
    let mut crc = 0;
    for (ii, group) in frame[..ID_2_FRAME_LEN].chunks_exact(3).enumerate() {
        crc = update(update(crc, group[0]), group[1]);
        if crc != group[2] {
            warn!("si7021: electronic id 2 crc mismatch at group {}", ii);
            return Err(Error::CrcMismatch);
        }
        snb[ii * 2] = group[0];
        snb[ii * 2 + 1] = group[1];
    }
    Ok(snb)
}

pub(crate) fn serial_number(sna: [u8; 4], snb: [u8; 4]) -> SerialNumber {
    let mut bytes = [0u8; 8];
    bytes[..4].copy_from_slice(&sna);
    bytes[4..].copy_from_slice(&snb);
    SerialNumber(bytes)
}
