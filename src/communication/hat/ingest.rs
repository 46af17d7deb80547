//! Frame ingestion into the shared cache

use crate::core::traits::SharedState;
use robocars_hat_core::protocol::{FrameCache, FrameError, FrameKind};

/// Outcome counts of one ingestion batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Valid frames stored in the cache
    pub stored: usize,
    /// Blank lines and unknown tags
    pub ignored: usize,
    /// Malformed lines (logged and dropped)
    pub dropped: usize,
}

impl IngestStats {
    pub fn merge(&mut self, other: IngestStats) {
        self.stored += other.stored;
        self.ignored += other.ignored;
        self.dropped += other.dropped;
    }
}

/// Parse `lines` into the shared cache
///
/// Each line takes the lock separately so the control task never waits on
/// a whole batch. Rejections keep the previously cached frame and are
/// logged after the lock is released.
pub fn ingest_lines<S, L>(cache: &S, lines: &[L]) -> IngestStats
where
    S: SharedState<FrameCache>,
    L: AsRef<str>,
{
    let mut stats = IngestStats::default();

    for line in lines {
        let line = line.as_ref();
        let result: Result<Option<FrameKind>, FrameError> = cache.with_mut(|c| c.ingest(line));
        match result {
            Ok(Some(kind)) => {
                stats.stored += 1;
                crate::log_trace!("stored {} frame", kind.as_str());
            }
            Ok(None) => stats.ignored += 1,
            Err(e) => {
                stats.dropped += 1;
                crate::log_warn!("dropped malformed frame {:?}: {}", line, e);
            }
        }
    }

    stats
}
