//! Parameter management types
//!
//! Each parameter group registers its defaults in a [`ParameterStore`] and
//! loads a typed struct back with `from_store`. Loading never fails: missing
//! or mistyped entries fall back to defaults, and `is_valid` reports
//! combinations the pipeline cannot run with.

pub mod drivetrain;
pub mod error;
pub mod odometry;
pub mod rc;
pub mod storage;

pub use drivetrain::DrivetrainParams;
pub use error::ParameterError;
pub use odometry::OdomParams;
pub use rc::RcParams;
pub use storage::{ParamFlags, ParamMetadata, ParamValue, ParameterStore};
pub use storage::{MAX_LIST_LEN, MAX_PARAMS, MAX_STRING_LEN, PARAM_NAME_LEN};

/// Register every parameter group's defaults
pub fn register_all(store: &mut ParameterStore) -> Result<(), ParameterError> {
    RcParams::register_defaults(store)?;
    DrivetrainParams::register_defaults(store)?;
    OdomParams::register_defaults(store)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_all_fits_store() {
        let mut store = ParameterStore::new();
        register_all(&mut store).unwrap();
        assert!(store.len() <= MAX_PARAMS);
        assert!(store.get("RCIN_THR_MIN").is_some());
        assert!(store.get("ACC_WINDOW").is_some());
        assert!(store.get("ODOM_MAX").is_some());
    }
}
