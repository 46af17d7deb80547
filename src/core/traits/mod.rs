//! Host-side trait abstractions
//!
//! ```text
//!   ingestion task ──with_mut──▶ SharedState<FrameCache> ◀──with── control task
//!                                   │
//!                    ┌──────────────┴──────────────┐
//!                    ▼                             ▼
//!             EmbassyState<T>                 MockState<T>
//!        (critical-section mutex,          (RefCell, single
//!         shared across threads)            threaded tests)
//! ```

pub mod sync;

pub use sync::{EmbassyState, MockState, SharedState};
