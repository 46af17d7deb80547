//! UART interface trait
//!
//! Byte-level, non-blocking access to the serial link the hat is wired to.

use crate::platform::Result;

/// Default hat link speed
pub const HAT_BAUD_RATE: u32 = 1_000_000;

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baud_rate: u32,
    /// Data bits (typically 8)
    pub data_bits: u8,
    pub parity: UartParity,
    pub stop_bits: UartStopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baud_rate: HAT_BAUD_RATE,
            data_bits: 8,
            parity: UartParity::None,
            stop_bits: UartStopBits::One,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UartParity {
    None,
    Even,
    Odd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UartStopBits {
    One,
    Two,
}

/// UART interface trait
///
/// # Invariants
///
/// - Only one owner per UART instance
/// - `read` never blocks: it returns `Ok(0)` when nothing is pending
pub trait UartInterface {
    /// Write data, returning the number of bytes written
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Uart` if the write fails.
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Read up to `buffer.len()` pending bytes
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Uart` if the read fails.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize>;

    /// Set UART baud rate
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Uart(UartError::InvalidBaudRate)` for a zero
    /// or unachievable rate.
    fn set_baud_rate(&mut self, baud: u32) -> Result<()>;

    /// At least one byte can be read without blocking
    fn available(&self) -> bool;

    /// Flush transmit buffer
    fn flush(&mut self) -> Result<()>;
}
