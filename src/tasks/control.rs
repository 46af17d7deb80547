//! Control task
//!
//! Runs the [`ControlPipeline`] at 100 Hz over the latest cached frames and
//! publishes the resulting command and speed. Downstream consumers only ever
//! see the last value.

use super::{StopFlag, TickTimer};
use crate::core::traits::SharedState;
use crate::pipeline::{ControlPipeline, PerceptionInput, VehicleCommand};
use robocars_hat_core::protocol::FrameCache;
use robocars_hat_core::scheduler::{TaskMetadata, TaskStats};
use robocars_hat_core::traits::HatActuator;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};

pub static CONTROL_TASK: TaskMetadata = TaskMetadata::new("control", 10_000, 8_000);

/// Channels connecting the control task to the rest of the vehicle
pub struct ControlChannels {
    pub perception: watch::Receiver<PerceptionInput>,
    pub commands: watch::Sender<VehicleCommand>,
    pub speed: watch::Sender<f32>,
}

/// Summary returned when the control task exits
#[derive(Debug)]
pub struct ControlReport<A> {
    pub stats: TaskStats,
    /// Actuator handed back for reuse
    pub actuator: A,
    pub last_command: VehicleCommand,
}

/// Latest perception values for this tick
///
/// An ACC sample counts once: it is only forwarded on the first tick after
/// a new publication. Obstacles and pilot steering persist.
fn take_perception(rx: &mut watch::Receiver<PerceptionInput>) -> PerceptionInput {
    if rx.has_changed().unwrap_or(false) {
        *rx.borrow_and_update()
    } else {
        let latest = *rx.borrow();
        PerceptionInput {
            acc: None,
            ..latest
        }
    }
}

/// Tick the pipeline until `stop` is raised
pub async fn control_task<S, A>(
    mut pipeline: ControlPipeline,
    cache: Arc<S>,
    mut actuator: A,
    mut channels: ControlChannels,
    stop: StopFlag,
) -> ControlReport<A>
where
    S: SharedState<FrameCache>,
    A: HatActuator,
{
    let period = Duration::from_micros(u64::from(CONTROL_TASK.period_us));
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut timer = TickTimer::new(&CONTROL_TASK);
    let mut last_command = VehicleCommand::default();

    crate::log_info!(
        "{} task started ({} Hz)",
        CONTROL_TASK.name,
        CONTROL_TASK.rate_hz()
    );

    while !stop.is_raised() {
        ticker.tick().await;
        let start = Instant::now();

        let frames = cache.with(|c| c.snapshot());
        let perception = take_perception(&mut channels.perception);
        let out = pipeline.tick(&frames, &perception, &mut actuator);

        channels.commands.send_replace(out.command);
        channels.speed.send_replace(out.speed);
        last_command = out.command;

        timer.record(start);
    }

    let stats = timer.stats();
    crate::log_info!(
        "{} task stopped after {} ticks ({} deadline misses)",
        CONTROL_TASK.name,
        stats.execution_count,
        stats.deadline_misses
    );

    ControlReport {
        stats,
        actuator,
        last_command,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acc_sample_consumed_once() {
        let (tx, mut rx) = watch::channel(PerceptionInput::default());
        tx.send_replace(PerceptionInput {
            acc: Some(1),
            pilot_steering: Some(0.2),
            ..PerceptionInput::default()
        });

        assert_eq!(take_perception(&mut rx).acc, Some(1));

        let held = take_perception(&mut rx);
        assert_eq!(held.acc, None);
        assert_eq!(held.pilot_steering, Some(0.2));
    }

    #[test]
    fn test_closed_perception_keeps_last_value() {
        let (tx, mut rx) = watch::channel(PerceptionInput::default());
        tx.send_replace(PerceptionInput {
            acc: Some(1),
            ..PerceptionInput::default()
        });
        drop(tx);

        // Sender gone: no fresh sample, no panic
        assert_eq!(take_perception(&mut rx).acc, None);
    }
}
