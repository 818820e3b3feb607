// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Chip Constants, Register Map, and Register Bits.
//!
//! Models the raw low-level details of the SC16IS752 as of the [datasheet],
//! and avoids too opinionated abstractions.
//!
//! The one detail that is *not* in the public register description: on the
//! I2C bus the chip does not consume the register numbers directly. See
//! [`registers::Register::subaddress`].
//!
//! [datasheet]: https://www.nxp.com/docs/en/data-sheet/SC16IS752_SC16IS762.pdf

pub use crate::spec::errors::*;

/// Reference crystal frequency of 1.8432 MHz.
///
/// This is the classic 16550-family clock and the one assumed by the divisor
/// table in the [datasheet]. Boards with a different crystal pass their own
/// frequency to [`calc_divisor`].
///
/// [datasheet]: https://www.nxp.com/docs/en/data-sheet/SC16IS752_SC16IS762.pdf
pub const XTAL_FREQUENCY_HZ: u32 = 1_843_200;

/// The capacity of the on-chip transmit and receive FIFOs in bytes.
///
/// Each direction of each channel has its own queue of this size. The TXLVL
/// and RXLVL registers report occupancy relative to this capacity, so their
/// values are always in `0..=64`.
pub const FIFO_SIZE: usize = 64;

mod errors {
    use core::error::Error;
    use core::fmt::{self, Display, Formatter};

    /// Error that is returned when [`calc_divisor`] can not produce a valid
    /// divisor latch value.
    ///
    /// This happens when the division does not come out even or when the
    /// result does not fit the 16-bit divisor latch.
    ///
    /// [`calc_divisor`]: crate::spec::calc_divisor
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Hash)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct DivisorError {
        /// The crystal frequency driving the baud rate generator.
        pub frequency: u32,
        /// The requested baud rate.
        pub baud_rate: u32,
    }

    impl Display for DivisorError {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            write!(
                f,
                "frequency={} and baud_rate={} do not yield an integer 16-bit divisor",
                self.frequency, self.baud_rate
            )
        }
    }

    impl Error for DivisorError {}
}

/// Calculates the divisor latch value for a target baud rate.
///
/// The chip divides the crystal frequency by `16 * divisor` to derive the
/// bit clock, so `divisor = frequency / (16 * baud_rate)`.
///
/// With the [`XTAL_FREQUENCY_HZ`] reference crystal this reproduces the
/// divisor table from the datasheet (9600 baud maps to 12, 19200 baud maps
/// to 6, and so on).
///
/// # Arguments
/// - `frequency`: The crystal frequency in Hz, typically
///   [`XTAL_FREQUENCY_HZ`].
/// - `baud_rate`: The target baud rate.
pub fn calc_divisor(frequency: u32, baud_rate: u32) -> Result<u16, DivisorError> {
    let err = DivisorError {
        frequency,
        baud_rate,
    };

    let Some(denominator) = baud_rate.checked_mul(16) else {
        return Err(err);
    };
    if denominator == 0 || frequency % denominator != 0 {
        return Err(err);
    }

    u16::try_from(frequency / denominator).map_err(|_| err)
}

/// Exposes low-level information about the on-chip register layout and
/// provides types that model individual registers.
///
/// The getters and setters in this module operate exclusively on raw bit
/// representations within the local computing context. They are limited to
/// extracting or updating the corresponding fields and do not perform any
/// bus access.
pub mod registers {
    use bitflags::bitflags;

    /// One of the two independent UART channels of the chip.
    ///
    /// Both channels live behind the same I2C device address. The channel
    /// choice contributes one bit to every register sub-address, see
    /// [`Register::subaddress`].
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum Channel {
        /// Channel A.
        #[default]
        A,
        /// Channel B.
        B,
    }

    impl Channel {
        /// Returns the channel selector bit for sub-address encoding.
        #[must_use]
        pub const fn select_bit(self) -> u8 {
            match self {
                Self::A => 0,
                Self::B => 1,
            }
        }
    }

    /// The logical registers of one UART channel.
    ///
    /// Several registers share a 4-bit register number and are told apart by
    /// access direction ([`Rhr`]/[`Thr`]) or by chip mode: with the LCR DLAB
    /// bit set, the numbers of [`Rhr`]/[`Thr`], [`Ier`] and [`Fcr`]/[`Iir`]
    /// alias onto [`Dll`], [`Dlh`] and [`Efr`] instead. [`Tcr`] and [`Tlr`]
    /// likewise replace [`Msr`] and [`Spr`] while enhanced functions are
    /// active.
    ///
    /// [`Rhr`]: Register::Rhr
    /// [`Thr`]: Register::Thr
    /// [`Ier`]: Register::Ier
    /// [`Fcr`]: Register::Fcr
    /// [`Iir`]: Register::Iir
    /// [`Dll`]: Register::Dll
    /// [`Dlh`]: Register::Dlh
    /// [`Efr`]: Register::Efr
    /// [`Tcr`]: Register::Tcr
    /// [`Tlr`]: Register::Tlr
    /// [`Msr`]: Register::Msr
    /// [`Spr`]: Register::Spr
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum Register {
        /// Receive Holding Register (read direction of register `0x00`).
        Rhr,
        /// Transmit Holding Register (write direction of register `0x00`).
        Thr,
        /// Interrupt Enable Register.
        Ier,
        /// FIFO Control Register (write direction of register `0x02`).
        Fcr,
        /// Interrupt Identification Register (read direction of register
        /// `0x02`).
        Iir,
        /// Line Control Register.
        Lcr,
        /// Modem Control Register.
        Mcr,
        /// Line Status Register.
        Lsr,
        /// Modem Status Register.
        Msr,
        /// Transmission Control Register (alias of [`Register::Msr`] while
        /// enhanced functions are active).
        Tcr,
        /// Scratch Pad Register. No hardware function, read/write storage
        /// used to probe that the device responds on the bus.
        Spr,
        /// Trigger Level Register (alias of [`Register::Spr`] while enhanced
        /// functions are active).
        Tlr,
        /// Transmit FIFO Level Register. Reports free space in the TX FIFO.
        TxLvl,
        /// Receive FIFO Level Register. Reports pending bytes in the RX
        /// FIFO.
        RxLvl,
        /// GPIO direction register.
        IoDir,
        /// GPIO state register.
        IoState,
        /// GPIO interrupt enable register.
        IoIntEna,
        /// GPIO/chip control register, including the software reset bit.
        IoControl,
        /// Extra Features Control Register.
        Efcr,
        /// Divisor latch low byte (register `0x00` while DLAB is set).
        Dll,
        /// Divisor latch high byte (register `0x01` while DLAB is set).
        Dlh,
        /// Enhanced Features Register (register `0x02` while DLAB is set).
        Efr,
    }

    impl Register {
        /// Returns the 4-bit register number from the datasheet's register
        /// map.
        #[must_use]
        pub const fn number(self) -> u8 {
            match self {
                Self::Rhr | Self::Thr | Self::Dll => 0x00,
                Self::Ier | Self::Dlh => 0x01,
                Self::Fcr | Self::Iir | Self::Efr => 0x02,
                Self::Lcr => 0x03,
                Self::Mcr => 0x04,
                Self::Lsr => 0x05,
                Self::Msr | Self::Tcr => 0x06,
                Self::Spr | Self::Tlr => 0x07,
                Self::TxLvl => 0x08,
                Self::RxLvl => 0x09,
                Self::IoDir => 0x0A,
                Self::IoState => 0x0B,
                Self::IoIntEna => 0x0C,
                Self::IoControl => 0x0E,
                Self::Efcr => 0x0F,
            }
        }

        /// Encodes the physical I2C sub-address for this register on the
        /// given channel.
        ///
        /// The chip expects the register number shifted left by three with
        /// the channel selector in bit 1. The shift is not spelled out in
        /// the register map section of the datasheet; it is a fixed wire
        /// convention of the chip and must not be derived from anything
        /// else.
        #[must_use]
        pub const fn subaddress(self, channel: Channel) -> u8 {
            (self.number() << 3) | (channel.select_bit() << 1)
        }
    }

    bitflags! {
        /// Typing of the Interrupt Enable Register (IER).
        ///
        /// Each set bit enables the corresponding interrupt source. Bits 4
        /// to 7 only take effect while enhanced functions are active.
        ///
        /// This is a **read/write** register.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct IER: u8 {
            /// Enables the receive data ready interrupt.
            const DATA_READY = 1 << 0;
            /// Enables the THR empty interrupt.
            const THR_EMPTY = 1 << 1;
            /// Enables the receive line status interrupt (overrun, parity,
            /// framing, break).
            const RECEIVE_LINE_STATUS = 1 << 2;
            /// Enables the modem status interrupt.
            const MODEM_STATUS = 1 << 3;
            /// Enables sleep mode.
            const SLEEP_MODE = 1 << 4;
            /// Enables the Xoff interrupt.
            const XOFF = 1 << 5;
            /// Enables the RTS line change interrupt.
            const RTS_CHANGE = 1 << 6;
            /// Enables the CTS line change interrupt.
            const CTS_CHANGE = 1 << 7;
        }
    }

    bitflags! {
        /// Typing of the FIFO Control Register (FCR).
        ///
        /// Enables and resets the per-channel FIFOs and selects the trigger
        /// levels.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct FCR: u8 {
            /// Enables the transmit and receive FIFOs of the channel.
            const FIFO_ENABLE = 1 << 0;
            /// Writing a one resets the receive FIFO. The bit clears
            /// itself.
            const RX_FIFO_RESET = 1 << 1;
            /// Writing a one resets the transmit FIFO. The bit clears
            /// itself.
            const TX_FIFO_RESET = 1 << 2;
            /// Reserved.
            const _RESERVED0 = 1 << 3;
            /// First bit of the transmit FIFO trigger level selection.
            const TX_TRIGGER_LEVEL0 = 1 << 4;
            /// Second bit of the transmit FIFO trigger level selection.
            const TX_TRIGGER_LEVEL1 = 1 << 5;
            /// First bit of the receive FIFO trigger level selection.
            const RX_TRIGGER_LEVEL0 = 1 << 6;
            /// Second bit of the receive FIFO trigger level selection.
            const RX_TRIGGER_LEVEL1 = 1 << 7;
        }
    }

    bitflags! {
        /// Typing of the Line Control Register (LCR).
        ///
        /// Configures the serial frame format including word length, stop
        /// bits and parity, and controls access to the divisor latches via
        /// DLAB.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct LCR: u8 {
            /// First bit of [`WordLength`].
            const WORD_LENGTH0 = 1 << 0;
            /// Second bit of [`WordLength`].
            const WORD_LENGTH1 = 1 << 1;
            /// If cleared, one stop bit is transmitted. If set, two stop
            /// bits (1.5 with a 5-bit word) are transmitted.
            const MORE_STOP_BITS = 1 << 2;
            /// First bit of the parity selection, see [`Parity`].
            const PARITY0 = 1 << 3;
            /// Second bit of the parity selection, see [`Parity`].
            const PARITY1 = 1 << 4;
            /// Third bit of the parity selection, see [`Parity`].
            const PARITY2 = 1 << 5;
            /// Forces a break condition on the transmission line while set.
            const SET_BREAK = 1 << 6;
            /// The Divisor Latch Access Bit (DLAB).
            ///
            /// While set, the register numbers of RHR/THR and IER address
            /// the divisor latch bytes [`Register::Dll`] and
            /// [`Register::Dlh`] instead, and FCR/IIR addresses
            /// [`Register::Efr`]. No other register access must be
            /// interleaved while this bit is set.
            const DLAB = 1 << 7;
        }
    }

    impl LCR {
        /// The frame format field: word length, stop bits and parity
        /// (bits 0 to 5).
        pub const FRAME_FORMAT_MASK: u8 = 0b0011_1111;

        /// Returns the [`WordLength`] currently encoded in bits 0 to 1.
        #[must_use]
        pub const fn word_length(self) -> WordLength {
            WordLength::from_raw_bits(self.bits() & 0b11)
        }

        /// Composes the frame format field from the three line parameters.
        ///
        /// The result only carries bits inside [`Self::FRAME_FORMAT_MASK`];
        /// callers preserve the break and DLAB bits themselves when writing
        /// the register.
        #[must_use]
        pub const fn frame_format(
            word_length: WordLength,
            parity: Parity,
            stop_bits: StopBits,
        ) -> Self {
            Self::from_bits_retain(
                word_length.lcr_bits() | stop_bits.lcr_bits() | parity.lcr_bits(),
            )
        }
    }

    bitflags! {
        /// Typing of the Line Status Register (LSR).
        ///
        /// Reports receiver and transmitter state. Error flags clear on
        /// read.
        ///
        /// This is a **read-only** register.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct LSR: u8 {
            /// At least one received byte is waiting in the RX FIFO.
            const DATA_READY = 1 << 0;
            /// A received byte was lost because the RX FIFO was full.
            const OVERRUN_ERROR = 1 << 1;
            /// The byte on top of the RX FIFO has a parity error.
            const PARITY_ERROR = 1 << 2;
            /// The byte on top of the RX FIFO was missing its stop bit.
            const FRAMING_ERROR = 1 << 3;
            /// A break condition was observed on the receive line.
            const BREAK_INTERRUPT = 1 << 4;
            /// The transmit holding register (or the whole TX FIFO in FIFO
            /// mode) is empty.
            const THR_EMPTY = 1 << 5;
            /// Both the TX FIFO and the transmitter shift register are
            /// empty, the line is idle.
            const TRANSMITTER_EMPTY = 1 << 6;
            /// At least one byte in the RX FIFO has a parity, framing or
            /// break flag attached.
            const FIFO_DATA_ERROR = 1 << 7;
        }
    }

    bitflags! {
        /// Typing of the IOControl register.
        ///
        /// Shared between both channels; controls GPIO behavior and carries
        /// the software reset bit.
        ///
        /// This is a **read/write** register, except that the reset bit
        /// reads back as zero.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct IOControl: u8 {
            /// Latches GPIO inputs on interrupt generation.
            const IO_LATCH = 1 << 0;
            /// Routes the GPIO[7:4] pins to modem control functions instead
            /// of GPIO.
            const MODEM_PIN_SELECT = 1 << 1;
            /// Reserved.
            const _RESERVED0 = 1 << 2;
            /// Requests a software reset of the whole chip.
            ///
            /// The chip is documented to clear this bit itself once the
            /// reset has run. Whether the reset actually happens is not
            /// observable through this register.
            const SOFTWARE_RESET = 1 << 3;
            /// Reserved.
            const _RESERVED1 = 1 << 4;
            /// Reserved.
            const _RESERVED2 = 1 << 5;
            /// Reserved.
            const _RESERVED3 = 1 << 6;
            /// Reserved.
            const _RESERVED4 = 1 << 7;
        }
    }

    /// The word length of each transmitted and received character.
    ///
    /// A closed set: the chip treats any unknown selection as eight bits,
    /// and this type makes such a selection unrepresentable in the first
    /// place.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum WordLength {
        /// Five data bits per character.
        FiveBits,
        /// Six data bits per character.
        SixBits,
        /// Seven data bits per character.
        SevenBits,
        /// Eight data bits per character.
        #[default]
        EightBits,
    }

    impl WordLength {
        /// Translates the raw LCR encoding (bits 0 to 1) into the
        /// corresponding value.
        #[must_use]
        pub const fn from_raw_bits(bits: u8) -> Self {
            match bits & 0b11 {
                0b00 => Self::FiveBits,
                0b01 => Self::SixBits,
                0b10 => Self::SevenBits,
                _ => Self::EightBits,
            }
        }

        /// Returns the bits this selection contributes to the LCR.
        ///
        /// The field already sits in bits 0 to 1, no shifting required.
        #[must_use]
        pub const fn lcr_bits(self) -> u8 {
            match self {
                Self::FiveBits => 0b00,
                Self::SixBits => 0b01,
                Self::SevenBits => 0b10,
                Self::EightBits => 0b11,
            }
        }
    }

    /// The parity mode of each transmitted and received character.
    ///
    /// # Compatibility quirk
    ///
    /// The [`Reserved`] and forced selections reproduce a legacy encoding
    /// verbatim: [`Reserved`] writes `0x03`, which lands in the *word
    /// length* field rather than the parity field, and [`Forced1`] /
    /// [`Forced0`] contribute no bits at all, leaving parity disabled.
    /// Whether that behavior was ever intended on real silicon is
    /// unverified. Callers that want a parity bit on the wire should stick
    /// to [`Odd`] and [`Even`].
    ///
    /// [`Reserved`]: Parity::Reserved
    /// [`Forced1`]: Parity::Forced1
    /// [`Forced0`]: Parity::Forced0
    /// [`Odd`]: Parity::Odd
    /// [`Even`]: Parity::Even
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum Parity {
        /// No parity bit is transmitted nor expected.
        #[default]
        None,
        /// The number of one bits including the parity bit must be odd.
        Odd,
        /// The number of one bits including the parity bit must be even.
        Even,
        /// Legacy selection: does not touch the register (see the type
        /// docs).
        Forced1,
        /// Legacy selection: does not touch the register (see the type
        /// docs).
        Forced0,
        /// Legacy selection: overlaps the word length field (see the type
        /// docs).
        Reserved,
    }

    impl Parity {
        /// Returns the bits this selection ORs into the LCR.
        ///
        /// The values are already positioned, no shifting required.
        #[must_use]
        pub const fn lcr_bits(self) -> u8 {
            match self {
                Self::None | Self::Forced1 | Self::Forced0 => 0x00,
                Self::Odd => 0x08,
                Self::Even => 0x18,
                Self::Reserved => 0x03,
            }
        }
    }

    /// The number of stop bits appended to each character.
    ///
    /// The hardware only distinguishes one versus more; with a 5-bit word
    /// the [`Two`] selection yields 1.5 stop bits on the wire.
    ///
    /// [`Two`]: StopBits::Two
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum StopBits {
        /// One stop bit.
        #[default]
        One,
        /// Two stop bits (1.5 with a 5-bit word).
        Two,
    }

    impl StopBits {
        /// Returns the bits this selection contributes to the LCR.
        #[must_use]
        pub const fn lcr_bits(self) -> u8 {
            match self {
                Self::One => 0x00,
                Self::Two => 0x04,
            }
        }
    }

    /// Typing of the scratch pad register (SPR).
    ///
    /// General purpose read/write storage with no hardware function, used
    /// to probe device presence.
    pub type SPR = u8;

    /// Typing of the divisor latch low byte.
    pub type DLL = u8;

    /// Typing of the divisor latch high byte.
    pub type DLH = u8;
}
