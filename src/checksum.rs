//! CRC-8 protecting the device's multi-byte responses.
//!
//! Polynomial x⁸+x⁵+x⁴+1 (0x131), MSB first, no reflection, zero seed and no final xor.
//! The electronic-ID responses carry a running CRC, so [`update`] exposes the per-byte fold.

use crc::{Algorithm, Crc};

const SI7021_CRC_8: Algorithm<u8> = Algorithm {
    width: 8,
    poly: 0x31,
    init: 0x00,
    refin: false,
    refout: false,
    xorout: 0x00,
    check: 0xA2,
    residue: 0x00,
};

const CRC: Crc<u8> = Crc::<u8>::new(&SI7021_CRC_8);

/// Fold one byte into a running checksum state.
///
/// With a zero seed and no reflection, seeding the register with `state` and shifting in
/// `byte` is the same as checksumming the single byte `state ^ byte`.
pub fn update(state: u8, byte: u8) -> u8 {
    CRC.checksum(&[state ^ byte])
}

/// Checksum of a 16-bit code, high byte first
pub fn compute16(value: u16) -> u8 {
    CRC.checksum(&value.to_be_bytes())
}

/// Checksum of an arbitrary byte sequence
pub fn checksum(bytes: &[u8]) -> u8 {
    CRC.checksum(bytes)
}
