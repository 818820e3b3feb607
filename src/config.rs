// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for [`Sc16is752`].
//!
//! [`Sc16is752`]: crate::Sc16is752

use crate::spec::registers::{Parity, StopBits, WordLength};

/// Budget for the transmit-space poll in [`Sc16is752::write_byte`].
///
/// The chip reports free transmit FIFO space in its TXLVL register;
/// `write_byte` keeps reading that register until it is nonzero. Every poll
/// is a full bus transaction, so the budget effectively bounds how long a
/// stalled device can block the caller.
///
/// [`Sc16is752::write_byte`]: crate::Sc16is752::write_byte
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollLimit {
    /// Tolerate at most this many consecutive full-FIFO readings, then fail
    /// with [`Error::TxTimeout`].
    ///
    /// `Attempts(0)` fails on the first full reading.
    ///
    /// [`Error::TxTimeout`]: crate::Error::TxTimeout
    Attempts(u32),
    /// Poll until the device reports space, with no upper bound.
    ///
    /// A persistently stalled device then blocks the caller indefinitely.
    /// Opt into this only when some other layer supervises the bus.
    Forever,
}

impl Default for PollLimit {
    fn default() -> Self {
        Self::Attempts(100_000)
    }
}

/// Configuration for [`Sc16is752`].
///
/// Consumed by [`Sc16is752::init`] to bring the channel up in one call; the
/// individual setters remain available for callers that sequence their own
/// bring-up.
///
/// Please note that sender and receiver **must agree** on the transmission
/// settings, otherwise you receive garbage.
///
/// [`Sc16is752`]: crate::Sc16is752
/// [`Sc16is752::init`]: crate::Sc16is752::init
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// The 16-bit baud rate divisor programmed into the divisor latch.
    ///
    /// Derive it from a crystal frequency and a target baud rate with
    /// [`calc_divisor`].
    ///
    /// [`calc_divisor`]: crate::spec::calc_divisor
    pub divisor: u16,
    /// The length of each transmitted word.
    pub word_length: WordLength,
    /// Whether parity bits should be used.
    pub parity: Parity,
    /// The number of stop bits per word.
    pub stop_bits: StopBits,
    /// The transmit-space poll budget, see [`PollLimit`].
    pub tx_poll: PollLimit,
}

impl Default for Config {
    fn default() -> Self {
        // Default is a 8-N-1 connection at 9600 baud with the reference
        // crystal.
        Self {
            divisor: 12,
            word_length: WordLength::EightBits,
            parity: Parity::None,
            stop_bits: StopBits::One,
            tx_poll: PollLimit::default(),
        }
    }
}
