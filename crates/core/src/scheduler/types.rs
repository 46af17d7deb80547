//! Periodic task metadata and runtime statistics
//!
//! Both host tasks (ingestion and control) are described by a
//! [`TaskMetadata`] and accumulate a [`TaskStats`] as they run. Times are
//! plain microsecond counts so the types stay runtime-agnostic.

/// Static description of a periodic task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskMetadata {
    /// Task name for logging
    pub name: &'static str,

    /// Target period in microseconds
    pub period_us: u32,

    /// Execution time budget in microseconds
    ///
    /// Executions above the budget count as deadline misses. Should be
    /// below the period to leave room for the other task.
    pub budget_us: u32,
}

impl TaskMetadata {
    pub const fn new(name: &'static str, period_us: u32, budget_us: u32) -> Self {
        Self {
            name,
            period_us,
            budget_us,
        }
    }

    /// Rate in Hz derived from the period
    #[inline]
    pub const fn rate_hz(&self) -> u32 {
        if self.period_us == 0 {
            0
        } else {
            1_000_000 / self.period_us
        }
    }

    #[inline]
    pub const fn is_within_budget(&self, execution_us: u32) -> bool {
        execution_us <= self.budget_us
    }
}

/// Runtime statistics for a single task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    /// Last execution time in microseconds
    pub last_execution_us: u32,

    /// Average execution time (EMA, alpha = 0.1)
    pub avg_execution_us: u32,

    pub max_execution_us: u32,

    /// Executions over budget
    pub deadline_misses: u32,

    /// Ticks that started later than one full period after the previous one
    pub overruns: u32,

    /// Last measured period in microseconds
    pub last_period_us: u32,

    pub execution_count: u64,
}

impl TaskStats {
    /// Record one execution
    ///
    /// `period_us` is the time since the previous execution started, zero
    /// for the first one. Returns `true` if the execution missed its budget.
    pub fn record(&mut self, meta: &TaskMetadata, execution_us: u32, period_us: u32) -> bool {
        self.last_execution_us = execution_us;
        self.last_period_us = period_us;
        self.execution_count = self.execution_count.saturating_add(1);

        // avg_new = (value + 9 * avg_old) / 10
        if self.execution_count == 1 {
            self.avg_execution_us = execution_us;
        } else {
            let avg = (execution_us as u64 + 9 * self.avg_execution_us as u64) / 10;
            self.avg_execution_us = avg as u32;
        }

        self.max_execution_us = self.max_execution_us.max(execution_us);

        // 5% slack before a late start counts as an overrun
        if period_us > meta.period_us + meta.period_us / 20 {
            self.overruns = self.overruns.saturating_add(1);
        }

        let missed = !meta.is_within_budget(execution_us);
        if missed {
            self.deadline_misses = self.deadline_misses.saturating_add(1);
        }
        missed
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTROL: TaskMetadata = TaskMetadata::new("control", 10_000, 8_000);

    #[test]
    fn test_task_metadata_rate() {
        assert_eq!(CONTROL.rate_hz(), 100);
        assert_eq!(TaskMetadata::new("idle", 0, 0).rate_hz(), 0);
        assert!(CONTROL.is_within_budget(8_000));
        assert!(!CONTROL.is_within_budget(8_001));
    }

    #[test]
    fn test_task_stats_record() {
        let mut stats = TaskStats::default();

        assert!(!stats.record(&CONTROL, 1_000, 0));
        assert_eq!(stats.avg_execution_us, 1_000);
        assert_eq!(stats.max_execution_us, 1_000);
        assert_eq!(stats.execution_count, 1);

        assert!(!stats.record(&CONTROL, 2_000, 10_000));
        assert_eq!(stats.avg_execution_us, 1_100);
        assert_eq!(stats.max_execution_us, 2_000);
        assert_eq!(stats.overruns, 0);
    }

    #[test]
    fn test_task_stats_deadline_miss_and_overrun() {
        let mut stats = TaskStats::default();
        assert!(stats.record(&CONTROL, 9_000, 0));
        assert_eq!(stats.deadline_misses, 1);

        stats.record(&CONTROL, 1_000, 10_400);
        assert_eq!(stats.overruns, 0);
        stats.record(&CONTROL, 1_000, 10_600);
        assert_eq!(stats.overruns, 1);

        stats.reset();
        assert_eq!(stats, TaskStats::default());
    }
}
