//! Communication with the receiver/sensor hat

pub mod hat;
