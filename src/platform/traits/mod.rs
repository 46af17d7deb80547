//! Platform abstraction traits

pub mod uart;

pub use uart::{UartConfig, UartInterface, UartParity, UartStopBits, HAT_BAUD_RATE};
