//! Hat ingestion task
//!
//! Drains every complete line from the link and writes the parsed frames
//! into the shared cache. Only the latest frame of each kind is kept.

use super::{StopFlag, TickTimer};
use crate::communication::hat::{ingest_lines, IngestStats, LineSource};
use crate::core::traits::SharedState;
use robocars_hat_core::protocol::FrameCache;
use robocars_hat_core::scheduler::{TaskMetadata, TaskStats};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};

/// Link poll interval
pub const INGEST_POLL: Duration = Duration::from_millis(1);

pub static INGEST_TASK: TaskMetadata = TaskMetadata::new("hat_ingest", 1_000, 800);

/// Summary returned when the ingestion task exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub stats: TaskStats,
    pub frames: IngestStats,
    /// Polls where the link reported an error
    pub read_errors: u32,
}

/// Poll `source` until `stop` is raised
pub async fn ingest_task<L, S>(mut source: L, cache: Arc<S>, stop: StopFlag) -> IngestReport
where
    L: LineSource,
    S: SharedState<FrameCache>,
{
    let mut ticker = tokio::time::interval(INGEST_POLL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut timer = TickTimer::new(&INGEST_TASK);
    let mut frames = IngestStats::default();
    let mut read_errors = 0u32;

    crate::log_info!(
        "{} task started ({} Hz)",
        INGEST_TASK.name,
        INGEST_TASK.rate_hz()
    );

    while !stop.is_raised() {
        ticker.tick().await;
        let start = Instant::now();

        let lines = match source.read_lines() {
            Ok(lines) => lines,
            Err(e) => {
                read_errors = read_errors.saturating_add(1);
                crate::log_error!("hat link read failed: {}", e);
                Vec::new()
            }
        };
        if !lines.is_empty() {
            frames.merge(ingest_lines(&*cache, &lines));
        }

        timer.record(start);
    }

    crate::log_info!(
        "{} task stopped: {} frames stored, {} dropped",
        INGEST_TASK.name,
        frames.stored,
        frames.dropped
    );

    IngestReport {
        stats: timer.stats(),
        frames,
        read_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::communication::hat::HatLink;
    use crate::core::traits::EmbassyState;
    use crate::platform::mock::MockUart;
    use crate::platform::traits::UartConfig;

    #[tokio::test(start_paused = true)]
    async fn test_ingest_until_stopped() {
        let uart = MockUart::new(UartConfig::default());
        let handle = uart.clone();
        let cache = Arc::new(EmbassyState::new(FrameCache::new()));
        let stop = StopFlag::new();

        let task = tokio::spawn(ingest_task(
            HatLink::new(uart),
            Arc::clone(&cache),
            stop.clone(),
        ));

        handle.inject_rx_data(b"3,1500,1500\n1,1100,1900\n1,1100,1900,1500,1500\n");
        tokio::time::sleep(Duration::from_millis(5)).await;

        let channels = cache.with(|c| c.channels()).unwrap();
        assert_eq!(channels.throttle, 1100);

        handle.fail_next_reads(2);
        tokio::time::sleep(Duration::from_millis(5)).await;

        stop.raise();
        let report = task.await.unwrap();
        assert_eq!(report.frames.stored, 2);
        assert_eq!(report.frames.dropped, 1);
        assert_eq!(report.read_errors, 2);
        assert!(report.stats.execution_count > 0);
    }
}
