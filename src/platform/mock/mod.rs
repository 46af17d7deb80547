//! Mock platform implementations for testing

mod uart;

pub use uart::MockUart;
