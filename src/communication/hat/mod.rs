//! Hat serial link
//!
//! - [`link`]: newline-delimited line assembly over a [`UartInterface`]
//! - [`ingest`]: feeding assembled lines into the shared frame cache
//!
//! [`UartInterface`]: crate::platform::traits::UartInterface

pub mod ingest;
pub mod link;

pub use ingest::{ingest_lines, IngestStats};
pub use link::{HatLink, LineSource, MAX_LINE_LEN};
