//! Host infrastructure shared by the communication and task layers

pub mod logging;
pub mod traits;
