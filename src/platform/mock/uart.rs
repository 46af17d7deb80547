//! Mock UART implementation for testing

use crate::platform::{
    traits::{UartConfig, UartInterface},
    PlatformError, Result, UartError,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Buffers {
    tx: Vec<u8>,
    rx: VecDeque<u8>,
    fail_reads: usize,
}

/// Mock UART backed by in-memory buffers
///
/// Clones share the same buffers, so a test can keep a handle while the
/// link that owns the other clone runs in a task.
///
/// # Example
///
/// ```
/// use robocars_hat::platform::mock::MockUart;
/// use robocars_hat::platform::traits::UartInterface;
///
/// let mut uart = MockUart::new(Default::default());
/// let handle = uart.clone();
///
/// handle.inject_rx_data(b"1,1500,1500,1500,1500\n");
/// let mut buf = [0u8; 64];
/// let n = uart.read(&mut buf).unwrap();
/// assert_eq!(&buf[..n], b"1,1500,1500,1500,1500\n");
/// ```
#[derive(Debug, Clone)]
pub struct MockUart {
    config: UartConfig,
    buffers: Arc<Mutex<Buffers>>,
}

impl MockUart {
    pub fn new(config: UartConfig) -> Self {
        Self {
            config,
            buffers: Arc::new(Mutex::new(Buffers::default())),
        }
    }

    fn buffers(&self) -> MutexGuard<'_, Buffers> {
        // A poisoned lock only means another test thread panicked
        self.buffers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Transmitted data (for test verification)
    pub fn tx_buffer(&self) -> Vec<u8> {
        self.buffers().tx.clone()
    }

    pub fn clear_tx_buffer(&self) {
        self.buffers().tx.clear();
    }

    /// Queue bytes to be returned by `read`
    pub fn inject_rx_data(&self, data: &[u8]) {
        self.buffers().rx.extend(data);
    }

    /// Make the next `count` reads fail with `UartError::ReadFailed`
    pub fn fail_next_reads(&self, count: usize) {
        self.buffers().fail_reads = count;
    }

    pub fn baud_rate(&self) -> u32 {
        self.config.baud_rate
    }
}

impl UartInterface for MockUart {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.buffers().tx.extend_from_slice(data);
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let mut buffers = self.buffers();
        if buffers.fail_reads > 0 {
            buffers.fail_reads -= 1;
            return Err(PlatformError::Uart(UartError::ReadFailed));
        }

        let to_read = buffer.len().min(buffers.rx.len());
        for (slot, byte) in buffer.iter_mut().zip(buffers.rx.drain(..to_read)) {
            *slot = byte;
        }
        Ok(to_read)
    }

    fn set_baud_rate(&mut self, baud: u32) -> Result<()> {
        if baud == 0 {
            return Err(PlatformError::Uart(UartError::InvalidBaudRate));
        }
        self.config.baud_rate = baud;
        Ok(())
    }

    fn available(&self) -> bool {
        !self.buffers().rx.is_empty()
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
