// SPDX-License-Identifier: MIT OR Apache-2.0

//! Abstraction over the bus transport (Hardware Abstraction Layer (HAL)).
//!
//! Main exports:
//! - [`Backend`]
//! - [`I2cBackend`]

use core::fmt::Debug;
use embedded_hal::i2c::{I2c, Operation, SevenBitAddress};

/// Abstraction over the bus transport of an SC16IS752.
///
/// This acts as Hardware Abstraction Layer (HAL). An implementation carries
/// everything needed to reach the device, typically the bus peripheral and
/// the device address, and exchanges raw bytes with a register sub-address
/// (see [`Register::subaddress`]).
///
/// Single-byte and bulk transfers go through the same two methods; the
/// transfer length is always the slice length, never inferred from the value
/// type.
///
/// Implementations must not retry: a failed transfer is reported as-is and
/// the device state is whatever the partial transaction left behind.
///
/// [`Register::subaddress`]: crate::spec::registers::Register::subaddress
pub trait Backend {
    /// The transport error type.
    type Error: Debug;

    /// Reads `buffer.len()` bytes from the register behind `subaddress`.
    ///
    /// This needs a mutable reference as reads can have side effects on the
    /// device, depending on the register.
    fn read(&mut self, subaddress: u8, buffer: &mut [u8]) -> Result<(), Self::Error>;

    /// Writes all of `bytes` to the register behind `subaddress`.
    ///
    /// Writes can have side effects on the device, depending on the
    /// register.
    fn write(&mut self, subaddress: u8, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// [`Backend`] implementation for any [`embedded_hal::i2c::I2c`] bus.
///
/// Binds the bus peripheral to the 7-bit device address selected by the A0
/// and A1 pins of the chip. Both channels of one chip share a single device
/// address; create one backend per channel handle and serialize access
/// externally if the handles live on different threads.
#[derive(Debug)]
pub struct I2cBackend<I2C> {
    i2c: I2C,
    address: SevenBitAddress,
}

impl<I2C: I2c> I2cBackend<I2C> {
    /// Creates a new [`I2cBackend`] from a bus peripheral and the 7-bit
    /// device address.
    pub const fn new(i2c: I2C, address: SevenBitAddress) -> Self {
        Self { i2c, address }
    }

    /// Consumes the backend and hands the bus peripheral back.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> Backend for I2cBackend<I2C> {
    type Error = I2C::Error;

    fn read(&mut self, subaddress: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, &[subaddress], buffer)
    }

    fn write(&mut self, subaddress: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        // One write transaction of [subaddress, bytes..] without staging the
        // payload in a local buffer: adjacent write operations are coalesced
        // on the wire.
        self.i2c.transaction(
            self.address,
            &mut [Operation::Write(&[subaddress]), Operation::Write(bytes)],
        )
    }
}
