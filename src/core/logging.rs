//! Logging abstraction
//!
//! Unified logging macros used across the host crate. All levels forward to
//! [`tracing`]; installing a subscriber is left to the binary embedding the
//! pipeline. Without one, events are discarded.
//!
//! The core crate never logs. It reports notable changes as events which
//! the pipeline turns into log lines here.
//!
//! # Example
//!
//! ```
//! use robocars_hat::{log_info, log_warn};
//!
//! log_info!("control task started ({} Hz)", 100);
//! log_warn!("dropped malformed frame: {:?}", "1,1100,1900");
//! ```

/// Log an informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        $crate::__tracing::info!($($arg)*);
    }};
}

/// Log a warning
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        $crate::__tracing::warn!($($arg)*);
    }};
}

/// Log an error
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        $crate::__tracing::error!($($arg)*);
    }};
}

/// Log a debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        $crate::__tracing::debug!($($arg)*);
    }};
}

/// Log a trace message
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        $crate::__tracing::trace!($($arg)*);
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_expand_without_subscriber() {
        let value = 42;
        crate::log_info!("info {}", value);
        crate::log_warn!("warn {}", value);
        crate::log_error!("error {}", value);
        crate::log_debug!("debug {}", value);
        crate::log_trace!("trace {value}");
    }
}
