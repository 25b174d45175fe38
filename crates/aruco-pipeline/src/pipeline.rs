//! The caller-facing pipeline handle.

use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Sender, TrySendError};
use log::{debug, info, warn};

use aruco_pipeline_core::{
    ArucoResult, ImageFrame, PipelineConfig, PipelineError, StationInfo, Status,
};

use crate::detector::{MarkerDetector, NullDetector};
use crate::state::SharedState;
use crate::worker::{Input, Worker};

pub use crate::state::ResultCallback;

/// Static build version reported by [`ArucoPipeline::version`].
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// An owned marker-detection pipeline instance.
///
/// Creation spawns one background worker thread; the instance starts
/// `Silent` and produces nothing until [`start`](Self::start) is called.
/// Ingestion calls (`add_image`, `add_station`) enqueue without blocking;
/// results reach the registered callback on the worker thread, one per
/// processed frame, in ingestion order. Dropping the pipeline releases it.
pub struct ArucoPipeline {
    shared: Arc<SharedState>,
    sender: Option<Sender<Input>>,
    worker: Option<JoinHandle<()>>,
    queue_capacity: usize,
}

// Manual impl: SharedState holds the `dyn Fn` result callback, which has no
// Debug representation.
impl std::fmt::Debug for ArucoPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArucoPipeline")
            .field("status", &self.shared.status())
            .field("queue_capacity", &self.queue_capacity)
            .finish_non_exhaustive()
    }
}

impl ArucoPipeline {
    /// Create a pipeline from a JSON config file, with the built-in
    /// placeholder detector.
    pub fn from_config_path(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let config = PipelineConfig::load_json(path)?;
        Ok(Self::with_detector(config, Box::new(NullDetector)))
    }

    /// Create a pipeline from an in-memory config, with the built-in
    /// placeholder detector.
    pub fn with_config(config: PipelineConfig) -> Self {
        Self::with_detector(config, Box::new(NullDetector))
    }

    /// Create a pipeline with an explicit detector implementation.
    pub fn with_detector(config: PipelineConfig, detector: Box<dyn MarkerDetector>) -> Self {
        // A zero capacity would turn try_send into an unconditional reject.
        let queue_capacity = config.queue_capacity.max(1);
        let (sender, receiver) = bounded::<Input>(queue_capacity);
        let shared = SharedState::new();

        let worker = Worker::new(
            receiver,
            Arc::clone(&shared),
            detector,
            config.station_fusion,
        );
        let name = config
            .instance_name
            .clone()
            .unwrap_or_else(|| "aruco-worker".to_string());
        let handle = thread::Builder::new()
            .name(name)
            .spawn(move || worker.run())
            .expect("failed to spawn pipeline worker thread");

        info!(
            "pipeline created (queue capacity {}, station fusion {})",
            queue_capacity, config.station_fusion
        );
        Self {
            shared,
            sender: Some(sender),
            worker: Some(handle),
            queue_capacity,
        }
    }

    /// Install the result observer. May be called before or after `start`;
    /// a later call replaces the previous observer.
    pub fn register_callback(&self, callback: impl Fn(&ArucoResult) + Send + Sync + 'static) {
        self.shared.install_callback(Arc::new(callback));
    }

    /// Transition to `Running`. Calling while already running is a no-op
    /// success.
    pub fn start(&self) -> Result<(), PipelineError> {
        if self.shared.is_released() {
            return Err(PipelineError::AlreadyReleased);
        }
        let previous = self.shared.status();
        if previous == Status::Running {
            return Ok(());
        }
        self.shared.set_status(Status::Running);
        info!("pipeline started ({previous:?} -> Running)");
        Ok(())
    }

    /// Transition to `Pause`. Frames keep being accepted but processing is
    /// suspended until the next `start`.
    pub fn pause(&self) -> Result<(), PipelineError> {
        if self.shared.is_released() {
            return Err(PipelineError::AlreadyReleased);
        }
        let previous = self.shared.status();
        if previous == Status::Pause {
            return Ok(());
        }
        self.shared.set_status(Status::Pause);
        info!("pipeline paused ({previous:?} -> Pause)");
        Ok(())
    }

    /// Current status. Lock-free read, never blocks.
    #[inline]
    pub fn status(&self) -> Status {
        self.shared.status()
    }

    /// Static build/version string.
    #[inline]
    pub fn version(&self) -> &'static str {
        VERSION
    }

    /// Validate, copy and enqueue a frame for asynchronous processing.
    ///
    /// The caller keeps ownership of `data` and never blocks: a full queue
    /// is reported as [`PipelineError::QueueFull`]. Rejected while `Silent`.
    pub fn add_image(
        &self,
        timestamp: u64,
        width: u32,
        height: u32,
        data: &[u8],
        channels: u64,
    ) -> Result<(), PipelineError> {
        let frame = ImageFrame::from_raw(timestamp, width, height, data, channels)?;
        self.enqueue(Input::Frame(frame))
    }

    /// Enqueue an externally computed charge-station detection. The worker
    /// hands the most recent one to the detector with the next frame.
    pub fn add_station(&self, timestamp: u64, info: StationInfo) -> Result<(), PipelineError> {
        self.enqueue(Input::Station(info.with_timestamp(timestamp)))
    }

    fn enqueue(&self, input: Input) -> Result<(), PipelineError> {
        if self.shared.is_released() {
            return Err(PipelineError::AlreadyReleased);
        }
        if !self.shared.status().accepts_input() {
            debug!("input rejected while silent");
            return Err(PipelineError::NotInitialized);
        }
        let sender = self
            .sender
            .as_ref()
            .ok_or(PipelineError::AlreadyReleased)?;
        match sender.try_send(input) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                warn!("input queue full ({} entries)", self.queue_capacity);
                Err(PipelineError::QueueFull {
                    capacity: self.queue_capacity,
                })
            }
            Err(TrySendError::Disconnected(_)) => Err(PipelineError::AlreadyReleased),
        }
    }

    /// Stop the worker and free all owned resources.
    ///
    /// Frames already accepted while the pipeline was producing output are
    /// still delivered to the callback before this returns. Safe to call
    /// more than once; later calls (and the eventual `Drop`) are no-ops.
    pub fn release(&mut self) {
        if !self.shared.request_release() {
            return;
        }
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                warn!("pipeline worker panicked before release");
            }
        }
        self.sender = None;
        info!("pipeline released");
    }
}

impl Drop for ArucoPipeline {
    fn drop(&mut self) {
        self.release();
    }
}
