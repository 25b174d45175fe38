//! Asynchronous ArUco marker pose pipeline.
//!
//! This crate provides:
//! - [`ArucoPipeline`]: an owned pipeline instance with explicit lifecycle
//!   calls (`start`, `pause`, `release`) and a non-blocking frame-ingestion
//!   boundary,
//! - a status-driven background worker whose wake cadence follows the
//!   current [`Status`] (continuous while running, 5 ms armed, 50 ms paused,
//!   1000 ms silent),
//! - a result dispatcher invoking a registered callback once per processed
//!   frame, on the worker's own thread,
//! - the [`MarkerDetector`] seam behind which the actual detection and
//!   pose-solving algorithm lives.
//!
//! ## Quickstart
//!
//! ```no_run
//! use aruco_pipeline::{ArucoPipeline, PipelineConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = ArucoPipeline::with_config(PipelineConfig::default());
//! pipeline.register_callback(|result| {
//!     if let Some(pose) = result.pose() {
//!         println!("t={} translation={:?}", result.timestamp, pose.translation);
//!     }
//! });
//! pipeline.start()?;
//!
//! let gray = vec![0u8; 640 * 480];
//! pipeline.add_image(1_000, 640, 480, &gray, 1)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `aruco_pipeline::core`: re-export of the data model
//!   (`Status`, `ImageFrame`, `ArucoResult`, `StationInfo`, errors, config).
//! - [`ArucoPipeline`]: lifecycle, ingestion and status queries.
//! - [`MarkerDetector`]: the detector seam; [`NullDetector`] is the built-in
//!   placeholder reporting "no marker" for every frame.

pub use aruco_pipeline_core as core;

pub use aruco_pipeline_core::{
    legacy, ArucoResult, ConfigError, DetectionBox, ImageFrame, MarkerState, PipelineConfig,
    PipelineError, PixelFormat, Pose, StationInfo, Status,
};

mod detector;
mod pipeline;
mod state;
mod worker;

pub use detector::{MarkerDetector, NullDetector};
pub use pipeline::{ArucoPipeline, ResultCallback};
