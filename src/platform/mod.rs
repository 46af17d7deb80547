//! Platform abstraction layer
//!
//! The concrete serial device driver lives outside this crate; it plugs in
//! through [`traits::UartInterface`]. [`mock`] provides in-memory doubles.

pub mod error;
pub mod mock;
pub mod traits;

pub use error::{PlatformError, Result, UartError};
