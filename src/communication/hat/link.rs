//! Line assembly
//!
//! The hat streams ASCII records terminated by `\n` (optionally `\r\n`).
//! Reads may split a record anywhere, so the partial tail is kept until its
//! terminator arrives. A line that grows past [`MAX_LINE_LEN`] without a
//! terminator is garbage (usually a baud mismatch); it is discarded up to
//! the next newline.

use crate::platform::traits::UartInterface;
use crate::platform::Result;

/// Longest accepted line, terminator excluded
pub const MAX_LINE_LEN: usize = 256;

/// Read chunk size
const READ_CHUNK: usize = 256;

/// Upper bound on reads per poll so a flooding link cannot starve the task
const MAX_READS_PER_POLL: usize = 16;

/// Source of complete protocol lines
pub trait LineSource {
    /// Return every line completed since the last call, possibly none
    ///
    /// # Errors
    ///
    /// Returns the underlying platform error if the device read fails.
    /// Lines already assembled are kept for the next call.
    fn read_lines(&mut self) -> Result<Vec<String>>;
}

/// Line assembler over a UART
pub struct HatLink<U: UartInterface> {
    uart: U,
    partial: Vec<u8>,
    /// Completed lines not yet returned
    pending: Vec<String>,
    /// Inside an over-long line, waiting for its terminator
    discarding: bool,
    overlong_lines: u32,
}

impl<U: UartInterface> HatLink<U> {
    pub fn new(uart: U) -> Self {
        Self {
            uart,
            partial: Vec::with_capacity(MAX_LINE_LEN),
            pending: Vec::new(),
            discarding: false,
            overlong_lines: 0,
        }
    }

    /// Lines discarded for exceeding [`MAX_LINE_LEN`]
    pub fn overlong_lines(&self) -> u32 {
        self.overlong_lines
    }

    pub fn uart(&self) -> &U {
        &self.uart
    }

    pub fn into_inner(self) -> U {
        self.uart
    }

    fn push_byte(&mut self, byte: u8) {
        match byte {
            b'\n' => {
                if self.discarding {
                    self.discarding = false;
                } else {
                    if self.partial.last() == Some(&b'\r') {
                        self.partial.pop();
                    }
                    self.pending
                        .push(String::from_utf8_lossy(&self.partial).into_owned());
                }
                self.partial.clear();
            }
            _ if self.discarding => {}
            _ if self.partial.len() >= MAX_LINE_LEN => {
                self.partial.clear();
                self.discarding = true;
                self.overlong_lines = self.overlong_lines.saturating_add(1);
                crate::log_warn!("hat line exceeds {} bytes, discarding", MAX_LINE_LEN);
            }
            _ => self.partial.push(byte),
        }
    }
}

impl<U: UartInterface> LineSource for HatLink<U> {
    fn read_lines(&mut self) -> Result<Vec<String>> {
        let mut chunk = [0u8; READ_CHUNK];

        for _ in 0..MAX_READS_PER_POLL {
            let n = self.uart.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            for &byte in &chunk[..n] {
                self.push_byte(byte);
            }
        }

        Ok(std::mem::take(&mut self.pending))
    }
}
