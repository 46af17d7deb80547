//! Host tasks
//!
//! Two periodic tokio tasks share the frame cache:
//!
//! - [`ingest_task`]: polls the hat link and writes the cache (1 kHz)
//! - [`control_task`]: snapshots the cache and runs the pipeline (100 Hz)
//!
//! Both check a [`StopFlag`] once per tick and return a report of their
//! timing statistics when they exit.

pub mod control;
pub mod ingest;

pub use control::{control_task, ControlChannels, ControlReport, CONTROL_TASK};
pub use ingest::{ingest_task, IngestReport, INGEST_POLL, INGEST_TASK};

use robocars_hat_core::scheduler::{TaskMetadata, TaskStats};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::Instant;

/// Cooperative stop signal shared by the tasks
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Tick timing bookkeeping for one task
pub(crate) struct TickTimer {
    meta: &'static TaskMetadata,
    stats: TaskStats,
    last_start: Option<Instant>,
}

impl TickTimer {
    pub(crate) fn new(meta: &'static TaskMetadata) -> Self {
        Self {
            meta,
            stats: TaskStats::default(),
            last_start: None,
        }
    }

    /// Record a tick that started at `start`; returns `true` on a budget miss
    pub(crate) fn record(&mut self, start: Instant) -> bool {
        let execution_us = micros(start.elapsed().as_micros());
        let period_us = self
            .last_start
            .map(|last| micros(start.duration_since(last).as_micros()))
            .unwrap_or(0);
        self.last_start = Some(start);

        let missed = self.stats.record(self.meta, execution_us, period_us);
        if missed {
            crate::log_debug!(
                "{} tick took {} us (budget {} us)",
                self.meta.name,
                execution_us,
                self.meta.budget_us
            );
        }
        missed
    }

    pub(crate) fn stats(&self) -> TaskStats {
        self.stats
    }
}

fn micros(value: u128) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
