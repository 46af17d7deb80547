//! Runtime lifecycle
//!
//! [`HatRuntime`] spawns the ingestion and control tasks on the current tokio
//! runtime, wires their channels and owns the shared frame cache.
//!
//! # Example
//!
//! ```no_run
//! use robocars_hat::communication::hat::HatLink;
//! use robocars_hat::config::HatConfig;
//! use robocars_hat::platform::mock::MockUart;
//! use robocars_hat::runtime::HatRuntime;
//! use robocars_hat_core::traits::MockActuator;
//!
//! # async fn run() -> Result<(), robocars_hat::HatError> {
//! let store = HatConfig::default_store()?;
//! let config = HatConfig::from_store(&store)?;
//! let link = HatLink::new(MockUart::new(Default::default()));
//!
//! let runtime = HatRuntime::spawn(config, link, MockActuator::new());
//! let mut commands = runtime.commands();
//! commands.changed().await.ok();
//! let _report = runtime.shutdown().await?;
//! # Ok(())
//! # }
//! ```

use crate::communication::hat::LineSource;
use crate::config::HatConfig;
use crate::core::traits::EmbassyState;
use crate::error::HatError;
use crate::pipeline::{ControlPipeline, PerceptionInput, VehicleCommand};
use crate::tasks::{
    control_task, ingest_task, ControlChannels, ControlReport, IngestReport, StopFlag,
    CONTROL_TASK, INGEST_TASK,
};
use robocars_hat_core::protocol::FrameCache;
use robocars_hat_core::traits::HatActuator;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Time the tasks get to observe the stop flag before they are joined
pub const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Frame cache shared between the tasks
pub type SharedFrames = EmbassyState<FrameCache>;

/// Final reports of both tasks
#[derive(Debug)]
pub struct RuntimeReport<A> {
    pub ingest: IngestReport,
    pub control: ControlReport<A>,
}

/// Running ingestion and control tasks
pub struct HatRuntime<A> {
    cache: Arc<SharedFrames>,
    perception: watch::Sender<PerceptionInput>,
    commands: watch::Receiver<VehicleCommand>,
    speed: watch::Receiver<f32>,
    stop: StopFlag,
    ingest: JoinHandle<IngestReport>,
    control: JoinHandle<ControlReport<A>>,
}

impl<A> HatRuntime<A>
where
    A: HatActuator + Send + 'static,
{
    /// Spawn both tasks
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn<L>(config: HatConfig, source: L, actuator: A) -> Self
    where
        L: LineSource + Send + 'static,
    {
        let cache = Arc::new(SharedFrames::new(FrameCache::new()));
        let stop = StopFlag::new();

        let (perception_tx, perception_rx) = watch::channel(PerceptionInput::default());
        let (commands_tx, commands_rx) = watch::channel(VehicleCommand::default());
        let (speed_tx, speed_rx) = watch::channel(0.0f32);

        let ingest = tokio::spawn(ingest_task(source, Arc::clone(&cache), stop.clone()));
        let control = tokio::spawn(control_task(
            ControlPipeline::new(&config),
            Arc::clone(&cache),
            actuator,
            ControlChannels {
                perception: perception_rx,
                commands: commands_tx,
                speed: speed_tx,
            },
            stop.clone(),
        ));

        Self {
            cache,
            perception: perception_tx,
            commands: commands_rx,
            speed: speed_rx,
            stop,
            ingest,
            control,
        }
    }

    /// Subscribe to vehicle commands
    pub fn commands(&self) -> watch::Receiver<VehicleCommand> {
        self.commands.clone()
    }

    /// Subscribe to normalized speed
    pub fn speed(&self) -> watch::Receiver<f32> {
        self.speed.clone()
    }

    /// Sender for perception outputs
    pub fn perception(&self) -> &watch::Sender<PerceptionInput> {
        &self.perception
    }

    /// Publish the latest perception outputs
    pub fn publish_perception(&self, input: PerceptionInput) {
        self.perception.send_replace(input);
    }

    /// Shared frame cache, for diagnostics
    pub fn frames(&self) -> Arc<SharedFrames> {
        Arc::clone(&self.cache)
    }

    /// Stop both tasks and collect their reports
    ///
    /// # Errors
    ///
    /// Returns [`HatError::TaskJoin`] if a task panicked or was cancelled.
    pub async fn shutdown(self) -> Result<RuntimeReport<A>, HatError> {
        crate::log_info!("stopping hat runtime");
        self.stop.raise();
        tokio::time::sleep(SHUTDOWN_GRACE).await;

        let ingest = self.ingest.await.map_err(|source| HatError::TaskJoin {
            name: INGEST_TASK.name,
            source,
        })?;
        let control = self.control.await.map_err(|source| HatError::TaskJoin {
            name: CONTROL_TASK.name,
            source,
        })?;

        Ok(RuntimeReport { ingest, control })
    }
}
