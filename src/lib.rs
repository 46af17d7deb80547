//! robocars_hat - Drive-control host runtime for the Robocars receiver/sensor hat
//!
//! Reads the hat's serial line protocol, normalizes receiver channels and
//! odometry, and runs the drivetrain state machine. Pure control logic lives
//! in [`robocars_hat_core`]; this crate adds the serial link, shared state,
//! logging and the tokio tasks around it.

// Platform abstraction layer (serial device)
pub mod platform;

// Logging macros and shared state
pub mod core;

// Hat serial link
pub mod communication;

pub mod config;
pub mod error;
pub mod pipeline;
pub mod runtime;
pub mod tasks;

pub use config::HatConfig;
pub use error::HatError;
pub use pipeline::{ControlPipeline, PerceptionInput, PipelineOutput, VehicleCommand};
pub use runtime::{HatRuntime, RuntimeReport};

#[doc(hidden)]
pub use tracing as __tracing;
