//! robocars_hat_core - Pure no_std drive-control logic for the Robocars hat
//!
//! This crate contains the platform-agnostic half of the pipeline: it turns
//! hat serial records into normalized drive commands and runs the drivetrain
//! state machine. Everything is host-testable without feature flags.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies, no allocation
//! - **No logging**: notable changes are returned as events for the host to log
//! - **Trait abstractions**: Actuator output injected via traits
//!
//! # Modules
//!
//! - [`protocol`]: Hat line decoder and latest-frame cache
//! - [`rc`]: Pulse mapping, calibration, aux features, control normalizer
//! - [`odometry`]: Encoder pulses to normalized speed
//! - [`drivetrain`]: Drive state machine, ACC vote filter, lane keeping
//! - [`parameters`]: Parameter store and typed parameter groups
//! - [`scheduler`]: Periodic task metadata and statistics
//! - [`traits`]: Actuator abstraction

#![no_std]

pub mod drivetrain;
pub mod odometry;
pub mod parameters;
pub mod protocol;
pub mod rc;
pub mod scheduler;
pub mod traits;
