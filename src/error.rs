// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors that can happen when working with [`Sc16is752`].
//!
//! [`Sc16is752`]: crate::Sc16is752

use core::fmt::{self, Debug, Display, Formatter};

#[cfg(doc)]
use crate::Sc16is752;

/// Errors reported by [`Sc16is752`] operations.
///
/// Generic over the transport error of the chosen [`Backend`].
///
/// [`Backend`]: crate::backend::Backend
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The underlying bus transfer failed.
    ///
    /// The failed transfer is not retried and nothing was recovered; the
    /// error is handed through as-is.
    Bus(E),
    /// The bus failed while the divisor latch was accessible.
    ///
    /// [`Sc16is752::set_baudrate`] opens the divisor latch window by
    /// setting the LCR DLAB bit and closes it again at the end of the
    /// sequence. A transfer failure in between leaves the bit in an unknown
    /// state, so RHR/THR and IER accesses may silently hit the divisor
    /// latch instead. Check [`Sc16is752::lcr`] or re-initialize the device
    /// before trusting any further register access.
    DlabHazard(E),
    /// The transmit FIFO stayed full for the whole configured poll budget.
    ///
    /// Only produced under [`PollLimit::Attempts`]; see
    /// [`Sc16is752::write_byte`].
    ///
    /// [`PollLimit::Attempts`]: crate::PollLimit::Attempts
    TxTimeout,
    /// The scratch pad probe failed during [`Sc16is752::init`], the device
    /// did not answer with the expected byte.
    NotPresent,
}

impl<E: Debug> Display for Error<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => {
                write!(f, "bus transfer failed: {e:?}")
            }
            Self::DlabHazard(e) => {
                write!(
                    f,
                    "bus transfer failed with the divisor latch window open, \
                     DLAB state is unknown: {e:?}"
                )
            }
            Self::TxTimeout => {
                write!(f, "transmit FIFO stayed full for the whole poll budget")
            }
            Self::NotPresent => {
                write!(f, "the device did not answer the scratch pad probe")
            }
        }
    }
}

impl<E: Debug> core::error::Error for Error<E> {}
