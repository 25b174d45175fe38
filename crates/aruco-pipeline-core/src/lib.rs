//! Core types for the asynchronous ArUco marker pose pipeline.
//!
//! This crate is intentionally small and algorithm-free. It holds the data
//! model shared by the pipeline, its detectors and the C ABI wrapper: frame
//! and result types, the processing status, the error taxonomy and the JSON
//! configuration. It does *not* depend on any concrete marker detector.

mod config;
mod error;
mod frame;
mod logger;
mod result;
mod station;
mod status;

pub use config::{ConfigError, PipelineConfig};
pub use error::{legacy, PipelineError};
pub use frame::{ImageFrame, PixelFormat};
pub use result::{ArucoResult, MarkerState, Pose};
pub use station::{DetectionBox, StationInfo};
pub use status::Status;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
