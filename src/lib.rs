// SPDX-License-Identifier: MIT OR Apache-2.0

//! # sc16is752_driver
//!
//! Simple yet highly configurable low-level driver for the
//! [NXP SC16IS752][datasheet] dual UART with I2C interface. Easy integration
//! into Rust while providing fine-grained control where needed (e.g., for
//! firmware bring-up or board verification).
//!
//! The chip puts two full serial channels plus a small GPIO expander behind
//! a single I2C device address; a host reaches every UART register through
//! addressed bus transactions instead of memory-mapped I/O. This crate
//! offers convenient and powerful abstractions for exactly that register
//! traffic.
//!
//! ## Features
//!
//! - ✅ Full transmit and receive support for both UART channels
//! - ✅ `no_std`-compatible and allocation-free by design
//! - ✅ Works with any [`embedded-hal`] I2C bus implementation
//! - ✅ High-level, ergonomic abstractions paired with support for plain
//!   register values
//! - ✅ Fully type-safe register access derived directly from the official
//!   [datasheet]
//!
//! ## Focus, Scope & Limitations
//!
//! The primary focus of `sc16is752_driver` is the register transaction
//! protocol: sub-address encoding, line configuration, divisor latch
//! programming and FIFO-level flow control. The GPIO expander half of the
//! chip, interrupt-driven operation and any byte-stream or framing layer on
//! top of raw bytes are intentionally out of scope, as is the I2C bus
//! peripheral itself (bring your own [`embedded-hal`] implementation).
//!
//! Transport failures are surfaced, never retried; see [`Error`].
//!
//! [datasheet]: https://www.nxp.com/docs/en/data-sheet/SC16IS752_SC16IS762.pdf
//! [`embedded-hal`]: https://crates.io/crates/embedded-hal

#![no_std]
#![deny(
    clippy::all,
    clippy::must_use_candidate,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![deny(rustdoc::all)]

#[cfg(test)]
extern crate std;

pub use crate::backend::{Backend, I2cBackend};
pub use crate::config::{Config, PollLimit};
pub use crate::error::Error;
pub use crate::spec::registers::{Channel, Parity, StopBits, WordLength};

use crate::spec::registers::{IOControl, Register, FCR, IER, LCR, LSR};

pub mod backend;
pub mod spec;

mod config;
mod error;

/// Powerful abstraction over one UART channel of an [SC16IS752][datasheet]
/// with access to low-level details but also high usability for higher-level
/// layers.
///
/// All operations translate into I2C register transactions against the
/// underlying hardware; nothing is cached, in particular not the FIFO level
/// registers, which change asynchronously with line activity.
///
/// Create one value per physical UART side. Both channels of one chip share
/// the bus, the device address and chip-global state such as the divisor
/// latch access window, so driving them from concurrent threads requires
/// external serialization.
///
/// # Example
///
/// ```no_run
/// use sc16is752_driver::{Channel, Config, I2cBackend, Sc16is752};
///
/// fn bring_up<I2C: embedded_hal::i2c::I2c>(i2c: I2C) {
///     let backend = I2cBackend::new(i2c, 0x4D);
///     let mut uart = Sc16is752::new(backend, Channel::A, Config::default());
///
///     uart.init().expect("should initialize device successfully");
///     uart.write_all(b"hello world!").expect("should transmit");
/// }
/// ```
///
/// # Sending and Receiving Data
///
/// - [`Sc16is752::write_byte`]: send a single byte once the chip reports
///   space
/// - [`Sc16is752::write_all`]: send a whole slice
/// - [`Sc16is752::read_byte`]: receive a single byte
/// - [`Sc16is752::read_buf`]: drain several bytes in one bus transaction
/// - [`Sc16is752::available`] / [`Sc16is752::tx_buffer_size`]: live FIFO
///   occupancy
///
/// [datasheet]: https://www.nxp.com/docs/en/data-sheet/SC16IS752_SC16IS762.pdf
#[derive(Debug)]
pub struct Sc16is752<B: Backend> {
    backend: B,
    channel: Channel,
    // The currently active config.
    config: Config,
}

impl<B: Backend> Sc16is752<B> {
    /// Creates a new [`Sc16is752`] for one channel of the chip behind the
    /// given backend.
    ///
    /// No bus traffic happens yet; call [`Self::init`] or the individual
    /// setup operations next.
    pub const fn new(backend: B, channel: Channel, config: Config) -> Self {
        Self {
            backend,
            channel,
            config,
        }
    }

    /* ----- Init, Setup, Tests --------------------------------------------- */

    /// Initializes the channel according to the stored [`Config`] so that
    /// afterwards the device can properly receive and send data.
    ///
    /// The sequence is: scratch pad presence probe, FIFO enable, divisor
    /// latch programming, line setup. A device that does not answer the
    /// probe fails with [`Error::NotPresent`] before anything is
    /// configured.
    ///
    /// The serial settings must match the expectations of the wire and the
    /// other side. Otherwise, garbage will be received.
    pub fn init(&mut self) -> Result<(), Error<B::Error>> {
        if !self.self_test()? {
            return Err(Error::NotPresent);
        }

        self.fifo_enable(true)?;
        self.set_baudrate(self.config.divisor)?;
        self.set_line(
            self.config.word_length,
            self.config.parity,
            self.config.stop_bits,
        )
    }

    /// Checks that the device is present and responsive on the bus.
    ///
    /// Writes a fixed probe byte to the scratch pad register and reads it
    /// back; `true` means the readback matched. A `false` result must be
    /// taken seriously: no other operation can be trusted until the device
    /// answers this probe.
    pub fn self_test(&mut self) -> Result<bool, Error<B::Error>> {
        /// Probe value written to the scratch pad. Arbitrary but fixed.
        const PROBE_BYTE: u8 = 0x88;

        self.write_register(Register::Spr, PROBE_BYTE)
            .map_err(Error::Bus)?;
        let readback = self.read_register(Register::Spr).map_err(Error::Bus)?;

        Ok(readback == PROBE_BYTE)
    }

    /// Enables or disables the transmit and receive FIFOs of this channel.
    ///
    /// Only bit 0 of the FIFO control register is touched; trigger levels
    /// and reset bits keep their current value (read-modify-write).
    pub fn fifo_enable(&mut self, enabled: bool) -> Result<(), Error<B::Error>> {
        let fcr = FCR::from_bits_retain(self.read_register(Register::Fcr).map_err(Error::Bus)?);
        let fcr = if enabled {
            fcr | FCR::FIFO_ENABLE
        } else {
            fcr - FCR::FIFO_ENABLE
        };

        self.write_register(Register::Fcr, fcr.bits())
            .map_err(Error::Bus)
    }

    /// Requests a software reset of the chip by setting the reset bit in
    /// the IOControl register.
    ///
    /// This is advisory: the bit is known to be unreliable on real
    /// hardware, the chip offers no way to observe whether the reset ran,
    /// and `Ok(())` only means the register write was issued. Do not build
    /// recovery logic on top of this call alone.
    ///
    /// The IOControl register is shared between both channels; a reset, if
    /// it happens, hits the whole chip.
    pub fn reset_device(&mut self) -> Result<(), Error<B::Error>> {
        let ioc = IOControl::from_bits_retain(
            self.read_register(Register::IoControl)
                .map_err(Error::Bus)?,
        );

        self.write_register(Register::IoControl, (ioc | IOControl::SOFTWARE_RESET).bits())
            .map_err(Error::Bus)
    }

    /// Programs the 16-bit baud rate divisor through the divisor latch.
    ///
    /// The sequence reads the current LCR, sets the DLAB bit to open the
    /// divisor latch window, writes the divisor low and high bytes, and
    /// writes the originally read LCR value with DLAB cleared to close the
    /// window again.
    ///
    /// While the window is open, the register numbers of RHR/THR and IER
    /// address the divisor latch instead, chip-wide. No other register
    /// access on either channel may be interleaved with this sequence.
    ///
    /// # Errors
    ///
    /// A bus failure on the initial LCR read comes back as [`Error::Bus`];
    /// the register mapping is untouched in that case. A failure anywhere
    /// after comes back as [`Error::DlabHazard`]: the window may still be
    /// open and the device needs re-initialization (or an LCR check via
    /// [`Self::lcr`]) before further use.
    pub fn set_baudrate(&mut self, divisor: u16) -> Result<(), Error<B::Error>> {
        let lcr = self.read_register(Register::Lcr).map_err(Error::Bus)?;

        self.write_register(Register::Lcr, lcr | LCR::DLAB.bits())
            .map_err(Error::DlabHazard)?;

        let [low, high] = divisor.to_le_bytes();
        self.write_register(Register::Dll, low)
            .map_err(Error::DlabHazard)?;
        self.write_register(Register::Dlh, high)
            .map_err(Error::DlabHazard)?;

        self.write_register(Register::Lcr, lcr & !LCR::DLAB.bits())
            .map_err(Error::DlabHazard)
    }

    /// Configures word length, parity and stop bits of the channel.
    ///
    /// The frame format field of the LCR is rewritten while the break and
    /// DLAB bits keep their current value. Line setup always arms the
    /// receive data ready interrupt source in the IER as a side effect;
    /// this is part of configuring the line, not a separate opt-in.
    ///
    /// See [`Parity`] for the legacy encoding quirk of the non-standard
    /// parity selections.
    pub fn set_line(
        &mut self,
        word_length: WordLength,
        parity: Parity,
        stop_bits: StopBits,
    ) -> Result<(), Error<B::Error>> {
        let lcr = self.read_register(Register::Lcr).map_err(Error::Bus)?;
        let frame = LCR::frame_format(word_length, parity, stop_bits).bits();

        self.write_register(Register::Lcr, (lcr & !LCR::FRAME_FORMAT_MASK) | frame)
            .map_err(Error::Bus)?;

        self.write_register(Register::Ier, IER::DATA_READY.bits())
            .map_err(Error::Bus)
    }

    /* ----- User I/O ------------------------------------------------------- */

    /// Returns how many received bytes are waiting in the RX FIFO
    /// (`0..=64`).
    ///
    /// Sampled live from the RXLVL register on every call.
    pub fn available(&mut self) -> Result<u8, Error<B::Error>> {
        self.read_register(Register::RxLvl).map_err(Error::Bus)
    }

    /// Returns how many bytes of space are free in the TX FIFO (`0..=64`).
    ///
    /// Zero means the transmit buffer is full. Sampled live from the TXLVL
    /// register on every call.
    pub fn tx_buffer_size(&mut self) -> Result<u8, Error<B::Error>> {
        self.read_register(Register::TxLvl).map_err(Error::Bus)
    }

    /// Reads one byte from the receive holding register.
    ///
    /// No flow check happens here; reading with an empty RX FIFO yields
    /// whatever the chip currently latches. Check [`Self::available`]
    /// first.
    pub fn read_byte(&mut self) -> Result<u8, Error<B::Error>> {
        self.read_register(Register::Rhr).map_err(Error::Bus)
    }

    /// Drains `buffer.len()` bytes from the RX FIFO in a single bulk bus
    /// transaction.
    ///
    /// Bytes beyond the FIFO capacity of 64 queue up on the chip and can be
    /// collected with further calls.
    ///
    /// Callers that trigger this read by polling [`Self::available`] must
    /// insert a short timing margin between observing the level and issuing
    /// the bulk read. The chip's shift and latch timing lags a polled
    /// request, and without the margin the tail of the buffer arrives
    /// corrupted. Interrupt-driven callers need no margin. This is a
    /// hardware constraint of the chip, not a property of this function.
    pub fn read_buf(&mut self, buffer: &mut [u8]) -> Result<(), Error<B::Error>> {
        self.backend
            .read(Register::Rhr.subaddress(self.channel), buffer)
            .map_err(Error::Bus)
    }

    /// Writes one byte to the transmit holding register once the chip
    /// reports space for it.
    ///
    /// Polls the TXLVL register until it is nonzero, bounded by the
    /// configured [`PollLimit`]; the byte is never written while the chip
    /// reports a full FIFO. Under [`PollLimit::Forever`] this call blocks
    /// until space appears, indefinitely on a stalled device.
    pub fn write_byte(&mut self, byte: u8) -> Result<(), Error<B::Error>> {
        let mut budget = match self.config.tx_poll {
            PollLimit::Attempts(attempts) => Some(attempts),
            PollLimit::Forever => None,
        };

        loop {
            let free = self.read_register(Register::TxLvl).map_err(Error::Bus)?;
            if free != 0 {
                break;
            }
            if let Some(left) = budget.as_mut() {
                if *left == 0 {
                    return Err(Error::TxTimeout);
                }
                *left -= 1;
            }
        }

        self.write_register(Register::Thr, byte).map_err(Error::Bus)
    }

    /// Writes all bytes of the slice via [`Self::write_byte`].
    ///
    /// Stops at the first error; bytes already handed to the chip stay
    /// queued for transmission.
    pub fn write_all(&mut self, bytes: &[u8]) -> Result<(), Error<B::Error>> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    /// Discards everything currently waiting in the RX FIFO.
    ///
    /// Repeatedly checks [`Self::available`] and consumes one byte at a
    /// time until the chip reports an empty FIFO.
    pub fn flush(&mut self) -> Result<(), Error<B::Error>> {
        while self.available()? > 0 {
            self.read_byte()?;
        }
        Ok(())
    }

    /* ----- Typed Register Getters ----------------------------------------- */

    /// Fetches the current value of the line control register.
    ///
    /// Useful to check the DLAB bit after a failed [`Self::set_baudrate`],
    /// see [`Error::DlabHazard`].
    pub fn lcr(&mut self) -> Result<LCR, Error<B::Error>> {
        self.read_register(Register::Lcr)
            .map(LCR::from_bits_retain)
            .map_err(Error::Bus)
    }

    /// Fetches the current value of the line status register.
    ///
    /// Note that the error flags in this register clear on read.
    pub fn lsr(&mut self) -> Result<LSR, Error<B::Error>> {
        self.read_register(Register::Lsr)
            .map(LSR::from_bits_retain)
            .map_err(Error::Bus)
    }

    /* ----- Accessors ------------------------------------------------------ */

    /// Returns the channel this handle operates on.
    #[must_use]
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// Returns the currently active config.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Consumes the handle and hands the backend back.
    #[must_use]
    pub fn release(self) -> B {
        self.backend
    }

    /* ----- Raw Register Transactions -------------------------------------- */

    fn read_register(&mut self, register: Register) -> Result<u8, B::Error> {
        let mut buffer = [0_u8; 1];
        self.backend
            .read(register.subaddress(self.channel), &mut buffer)?;
        Ok(buffer[0])
    }

    fn write_register(&mut self, register: Register, value: u8) -> Result<(), B::Error> {
        self.backend
            .write(register.subaddress(self.channel), &[value])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec;
    use std::vec::Vec;

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    struct FakeError;

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Op {
        /// Sub-address and transfer length.
        Read(u8, usize),
        /// Sub-address and payload.
        Write(u8, Vec<u8>),
    }

    /// Scripted stand-in for the chip behind a [`Backend`].
    ///
    /// Keeps a register file keyed by sub-address and models the chip
    /// behavior the driver relies on: the DLAB window routing accesses of
    /// register numbers 0 and 1 into the divisor latch, RXLVL decrementing
    /// as RHR is drained, and scripted TXLVL readings for flow control
    /// tests.
    struct FakeBackend {
        channel: Channel,
        regs: [u8; 0x80],
        dll: u8,
        dlh: u8,
        /// Bytes accepted for transmission through THR.
        thr: Vec<u8>,
        /// Bytes pending in the RX FIFO, front first.
        rx: Vec<u8>,
        /// Scripted TXLVL readings; once drained, the register file value
        /// answers.
        tx_lvl: Vec<u8>,
        tx_pos: usize,
        /// A dead device accepts traffic but stores nothing and answers
        /// every read with zero.
        dead: bool,
        /// Fail the (n+1)-th write with [`FakeError`].
        fail_after_writes: Option<usize>,
        /// Fail the (n+1)-th read with [`FakeError`].
        fail_after_reads: Option<usize>,
        log: Vec<Op>,
    }

    impl Default for FakeBackend {
        fn default() -> Self {
            Self {
                channel: Channel::A,
                regs: [0; 0x80],
                dll: 0,
                dlh: 0,
                thr: Vec::new(),
                rx: Vec::new(),
                tx_lvl: Vec::new(),
                tx_pos: 0,
                dead: false,
                fail_after_writes: None,
                fail_after_reads: None,
                log: Vec::new(),
            }
        }
    }

    impl FakeBackend {
        fn sub(&self, register: Register) -> u8 {
            register.subaddress(self.channel)
        }

        fn dlab_set(&self) -> bool {
            self.regs[self.sub(Register::Lcr) as usize] & 0x80 != 0
        }

        fn reg(&self, register: Register) -> u8 {
            self.regs[self.sub(register) as usize]
        }

        fn set_reg(&mut self, register: Register, value: u8) {
            self.regs[self.sub(register) as usize] = value;
        }
    }

    impl Backend for FakeBackend {
        type Error = FakeError;

        fn read(&mut self, subaddress: u8, buffer: &mut [u8]) -> Result<(), FakeError> {
            self.log.push(Op::Read(subaddress, buffer.len()));
            if let Some(left) = self.fail_after_reads.as_mut() {
                if *left == 0 {
                    return Err(FakeError);
                }
                *left -= 1;
            }
            if self.dead {
                buffer.fill(0);
                return Ok(());
            }

            if subaddress == self.sub(Register::Rhr) {
                if self.dlab_set() {
                    buffer.fill(self.dll);
                } else {
                    for slot in buffer.iter_mut() {
                        *slot = if self.rx.is_empty() { 0 } else { self.rx.remove(0) };
                    }
                    let consumed = u8::try_from(buffer.len()).unwrap_or(u8::MAX);
                    let level = self.reg(Register::RxLvl).saturating_sub(consumed);
                    self.set_reg(Register::RxLvl, level);
                }
            } else if subaddress == self.sub(Register::Ier) && self.dlab_set() {
                buffer.fill(self.dlh);
            } else if subaddress == self.sub(Register::TxLvl) && self.tx_pos < self.tx_lvl.len() {
                buffer.fill(self.tx_lvl[self.tx_pos]);
                self.tx_pos += 1;
            } else {
                buffer.fill(self.regs[subaddress as usize]);
            }
            Ok(())
        }

        fn write(&mut self, subaddress: u8, bytes: &[u8]) -> Result<(), FakeError> {
            self.log.push(Op::Write(subaddress, bytes.to_vec()));
            if let Some(left) = self.fail_after_writes.as_mut() {
                if *left == 0 {
                    return Err(FakeError);
                }
                *left -= 1;
            }
            if self.dead {
                return Ok(());
            }

            for &byte in bytes {
                if subaddress == self.sub(Register::Thr) {
                    if self.dlab_set() {
                        self.dll = byte;
                    } else {
                        self.thr.push(byte);
                    }
                } else if subaddress == self.sub(Register::Ier) && self.dlab_set() {
                    self.dlh = byte;
                } else {
                    self.regs[subaddress as usize] = byte;
                }
            }
            Ok(())
        }
    }

    fn uart(fake: FakeBackend) -> Sc16is752<FakeBackend> {
        Sc16is752::new(fake, Channel::A, Config::default())
    }

    #[test]
    fn test_self_test_reads_back_probe_byte() {
        let mut uart = uart(FakeBackend::default());

        assert_eq!(uart.self_test(), Ok(true));

        let spr = Register::Spr.subaddress(Channel::A);
        let fake = uart.release();
        assert_eq!(fake.log, [Op::Write(spr, vec![0x88]), Op::Read(spr, 1)]);
    }

    #[test]
    fn test_self_test_reports_dead_device() {
        let mut uart = uart(FakeBackend {
            dead: true,
            ..FakeBackend::default()
        });

        assert_eq!(uart.self_test(), Ok(false));
    }

    #[test]
    fn test_self_test_addresses_channel_b() {
        let fake = FakeBackend {
            channel: Channel::B,
            ..FakeBackend::default()
        };
        let mut uart = Sc16is752::new(fake, Channel::B, Config::default());

        assert_eq!(uart.self_test(), Ok(true));

        // SPR is register 0x07: (0x07 << 3) | (1 << 1).
        let fake = uart.release();
        assert_eq!(fake.log[0], Op::Write(0x3A, vec![0x88]));
    }

    #[test]
    fn test_set_line_writes_frame_format_and_arms_data_ready() {
        let mut uart = uart(FakeBackend::default());

        uart.set_line(WordLength::EightBits, Parity::None, StopBits::One)
            .unwrap();

        let fake = uart.release();
        assert_eq!(fake.reg(Register::Lcr), 0x03);
        assert_eq!(fake.reg(Register::Ier), 0x01);
    }

    #[test]
    fn test_set_line_scenario_7e2() {
        let mut uart = uart(FakeBackend::default());

        uart.set_line(WordLength::SevenBits, Parity::Even, StopBits::Two)
            .unwrap();

        let fake = uart.release();
        assert_eq!(fake.reg(Register::Lcr), 0x1E);
        assert_eq!(fake.reg(Register::Ier), 0x01);
    }

    #[test]
    fn test_set_line_preserves_break_bit() {
        let mut fake = FakeBackend::default();
        fake.set_reg(Register::Lcr, 0x40);
        let mut uart = uart(fake);

        uart.set_line(WordLength::EightBits, Parity::Odd, StopBits::One)
            .unwrap();

        let fake = uart.release();
        assert_eq!(fake.reg(Register::Lcr), 0x40 | 0x0B);
    }

    #[test]
    fn test_set_baudrate_sequence_order() {
        let mut fake = FakeBackend::default();
        fake.set_reg(Register::Lcr, 0x03);
        let mut uart = uart(fake);

        // Divisor 12 selects 9600 baud with the reference crystal.
        uart.set_baudrate(12).unwrap();

        let lcr = Register::Lcr.subaddress(Channel::A);
        let data = Register::Rhr.subaddress(Channel::A);
        let ier = Register::Ier.subaddress(Channel::A);
        let fake = uart.release();
        assert_eq!(
            fake.log,
            [
                Op::Read(lcr, 1),
                Op::Write(lcr, vec![0x83]),
                Op::Write(data, vec![12]),
                Op::Write(ier, vec![0]),
                Op::Write(lcr, vec![0x03]),
            ]
        );
        assert_eq!(fake.dll, 12);
        assert_eq!(fake.dlh, 0);
        // The window is closed again.
        assert_eq!(fake.reg(Register::Lcr) & 0x80, 0);
    }

    #[test]
    fn test_set_baudrate_round_trip() {
        for divisor in [0_u16, 1, 12, 48, 0xABCD, 0xFFFF] {
            let mut uart = uart(FakeBackend::default());
            uart.set_baudrate(divisor).unwrap();

            // Read the latch back the way the chip exposes it: open the
            // window again and read register numbers 0 and 1.
            let mut fake = uart.release();
            let lcr = fake.reg(Register::Lcr);
            fake.set_reg(Register::Lcr, lcr | 0x80);
            let mut low = [0_u8; 1];
            let mut high = [0_u8; 1];
            fake.read(Register::Dll.subaddress(Channel::A), &mut low)
                .unwrap();
            fake.read(Register::Dlh.subaddress(Channel::A), &mut high)
                .unwrap();

            assert_eq!(u16::from_le_bytes([low[0], high[0]]), divisor);
        }
    }

    #[test]
    fn test_set_baudrate_bus_error_before_window() {
        let mut uart = uart(FakeBackend {
            fail_after_reads: Some(0),
            ..FakeBackend::default()
        });

        assert_eq!(uart.set_baudrate(12), Err(Error::Bus(FakeError)));
    }

    #[test]
    fn test_set_baudrate_flags_dlab_hazard() {
        // Writes: LCR with DLAB (ok), then DLL (fails).
        let mut uart = uart(FakeBackend {
            fail_after_writes: Some(1),
            ..FakeBackend::default()
        });

        assert_eq!(uart.set_baudrate(12), Err(Error::DlabHazard(FakeError)));

        // The device really is stuck with the window open.
        let fake = uart.release();
        assert_ne!(fake.reg(Register::Lcr) & 0x80, 0);
    }

    #[test]
    fn test_write_byte_waits_for_tx_space() {
        let mut uart = uart(FakeBackend {
            tx_lvl: vec![0, 0, 5],
            ..FakeBackend::default()
        });

        uart.write_byte(0x55).unwrap();

        let tx_lvl = Register::TxLvl.subaddress(Channel::A);
        let thr = Register::Thr.subaddress(Channel::A);
        let fake = uart.release();
        assert_eq!(
            fake.log,
            [
                Op::Read(tx_lvl, 1),
                Op::Read(tx_lvl, 1),
                Op::Read(tx_lvl, 1),
                Op::Write(thr, vec![0x55]),
            ]
        );
        assert_eq!(fake.thr, [0x55]);
    }

    #[test]
    fn test_write_byte_times_out() {
        let fake = FakeBackend::default();
        let config = Config {
            tx_poll: PollLimit::Attempts(4),
            ..Config::default()
        };
        let mut uart = Sc16is752::new(fake, Channel::A, config);

        // TXLVL stays zero, the FIFO never drains.
        assert_eq!(uart.write_byte(0x55), Err(Error::TxTimeout));

        let fake = uart.release();
        assert!(fake.thr.is_empty());
        // Attempts(4) tolerates four full readings and fails on the fifth.
        assert_eq!(fake.log.len(), 5);
    }

    #[test]
    fn test_write_byte_forever_keeps_polling() {
        let fake = FakeBackend {
            tx_lvl: vec![0, 0, 0, 0, 0, 0, 0, 1],
            ..FakeBackend::default()
        };
        let config = Config {
            tx_poll: PollLimit::Forever,
            ..Config::default()
        };
        let mut uart = Sc16is752::new(fake, Channel::A, config);

        uart.write_byte(0x55).unwrap();

        let fake = uart.release();
        assert_eq!(fake.thr, [0x55]);
    }

    #[test]
    fn test_write_all_pushes_every_byte() {
        let mut fake = FakeBackend::default();
        fake.set_reg(Register::TxLvl, 64);
        let mut uart = uart(fake);

        uart.write_all(b"uart").unwrap();

        let fake = uart.release();
        assert_eq!(fake.thr, b"uart");
    }

    #[test]
    fn test_read_buf_is_one_bulk_transaction() {
        let mut fake = FakeBackend {
            rx: vec![9, 8, 7],
            ..FakeBackend::default()
        };
        fake.set_reg(Register::RxLvl, 3);
        let mut uart = uart(fake);

        let mut buffer = [0_u8; 3];
        uart.read_buf(&mut buffer).unwrap();
        assert_eq!(buffer, [9, 8, 7]);

        let fake = uart.release();
        assert_eq!(fake.log, [Op::Read(Register::Rhr.subaddress(Channel::A), 3)]);
    }

    #[test]
    fn test_flush_drains_rx_fifo() {
        let mut fake = FakeBackend {
            rx: vec![1, 2, 3],
            ..FakeBackend::default()
        };
        fake.set_reg(Register::RxLvl, 3);
        let mut uart = uart(fake);

        uart.flush().unwrap();
        assert_eq!(uart.available(), Ok(0));

        let fake = uart.release();
        assert!(fake.rx.is_empty());
    }

    #[test]
    fn test_available_and_tx_buffer_size_sample_the_level_registers() {
        let mut fake = FakeBackend::default();
        fake.set_reg(Register::RxLvl, 17);
        fake.set_reg(Register::TxLvl, 64);
        let mut uart = uart(fake);

        assert_eq!(uart.available(), Ok(17));
        assert_eq!(uart.tx_buffer_size(), Ok(64));
    }

    #[test]
    fn test_fifo_enable_read_modify_write() {
        let mut fake = FakeBackend::default();
        // Trigger level bits already configured.
        fake.set_reg(Register::Fcr, 0x50);
        let mut dev = uart(fake);

        dev.fifo_enable(true).unwrap();
        assert_eq!(dev.release().reg(Register::Fcr), 0x51);

        let mut fake = FakeBackend::default();
        fake.set_reg(Register::Fcr, 0x51);
        let mut dev = uart(fake);

        dev.fifo_enable(false).unwrap();
        assert_eq!(dev.release().reg(Register::Fcr), 0x50);
    }

    #[test]
    fn test_reset_device_sets_reset_bit() {
        let mut fake = FakeBackend::default();
        fake.set_reg(Register::IoControl, 0x01);
        let mut uart = uart(fake);

        uart.reset_device().unwrap();

        assert_eq!(uart.release().reg(Register::IoControl), 0x09);
    }

    #[test]
    fn test_init_brings_channel_up() {
        let mut uart = uart(FakeBackend::default());

        uart.init().unwrap();

        let fake = uart.release();
        assert_eq!(fake.reg(Register::Fcr) & 0x01, 0x01);
        assert_eq!(fake.dll, 12);
        assert_eq!(fake.dlh, 0);
        assert_eq!(fake.reg(Register::Lcr), 0x03);
        assert_eq!(fake.reg(Register::Ier), 0x01);
    }

    #[test]
    fn test_init_reports_missing_device() {
        let mut uart = uart(FakeBackend {
            dead: true,
            ..FakeBackend::default()
        });

        assert_eq!(uart.init(), Err(Error::NotPresent));
    }

    #[test]
    fn test_typed_register_getters() {
        let mut fake = FakeBackend::default();
        fake.set_reg(Register::Lcr, 0x83);
        fake.set_reg(Register::Lsr, 0x61);
        let mut uart = uart(fake);

        let lcr = uart.lcr().unwrap();
        assert!(lcr.contains(LCR::DLAB));
        assert_eq!(lcr.word_length(), WordLength::EightBits);

        let lsr = uart.lsr().unwrap();
        assert!(lsr.contains(LSR::DATA_READY));
        assert!(lsr.contains(LSR::THR_EMPTY));
        assert!(lsr.contains(LSR::TRANSMITTER_EMPTY));
    }
}
