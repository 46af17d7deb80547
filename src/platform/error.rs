//! Platform error types

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
///
/// Serial drivers map their device-specific errors to these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformError {
    /// UART operation failed
    Uart(UartError),
    /// Invalid configuration provided
    InvalidConfig,
    /// Device not present or already closed
    ResourceUnavailable,
}

/// UART-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UartError {
    WriteFailed,
    ReadFailed,
    Timeout,
    InvalidBaudRate,
    FramingError,
    Overrun,
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Uart(e) => write!(f, "UART error: {:?}", e),
            PlatformError::InvalidConfig => write!(f, "Invalid configuration"),
            PlatformError::ResourceUnavailable => write!(f, "Resource not available"),
        }
    }
}

impl std::error::Error for PlatformError {}

impl From<UartError> for PlatformError {
    fn from(e: UartError) -> Self {
        PlatformError::Uart(e)
    }
}
