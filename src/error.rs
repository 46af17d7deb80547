//! Host runtime error types

use crate::platform::PlatformError;
use robocars_hat_core::parameters::ParameterError;

/// Errors surfaced by configuration and runtime lifecycle
///
/// Nothing inside a control tick returns an error: malformed frames,
/// missing calibration and link read failures degrade to "no new data".
#[derive(Debug, thiserror::Error)]
pub enum HatError {
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    #[error("Invalid {0} configuration")]
    InvalidConfig(&'static str),

    #[error("Task {name} did not finish cleanly: {source}")]
    TaskJoin {
        name: &'static str,
        #[source]
        source: tokio::task::JoinError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::UartError;

    #[test]
    fn test_error_display() {
        let err: HatError = PlatformError::Uart(UartError::ReadFailed).into();
        assert_eq!(err.to_string(), "Platform error: UART error: ReadFailed");

        let err: HatError = ParameterError::StoreFull.into();
        assert_eq!(err.to_string(), "Parameter error: parameter store full");

        assert_eq!(
            HatError::InvalidConfig("drivetrain").to_string(),
            "Invalid drivetrain configuration"
        );
    }
}
