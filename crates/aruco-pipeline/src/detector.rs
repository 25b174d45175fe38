//! The detector seam.
//!
//! The marker-detection and pose-solving algorithm is an external
//! collaborator; the pipeline only defines the calling contract. Detectors
//! run on the worker thread and see frames in ingestion order.

use aruco_pipeline_core::{ArucoResult, ImageFrame, StationInfo};

/// A marker detector consuming frames and producing one result per frame.
pub trait MarkerDetector: Send {
    /// Process one frame, optionally together with the most recent
    /// charge-station detection, and produce its result.
    ///
    /// The result's timestamp is expected to match the frame's.
    fn process_frame(&mut self, frame: &ImageFrame, station: Option<&StationInfo>) -> ArucoResult;
}

/// Placeholder detector reporting "no marker" for every frame.
///
/// Useful to exercise the pipeline plumbing before a real detector is
/// plugged in.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullDetector;

impl MarkerDetector for NullDetector {
    fn process_frame(&mut self, frame: &ImageFrame, _station: Option<&StationInfo>) -> ArucoResult {
        ArucoResult::no_marker(frame.timestamp)
    }
}

impl<F> MarkerDetector for F
where
    F: FnMut(&ImageFrame, Option<&StationInfo>) -> ArucoResult + Send,
{
    fn process_frame(&mut self, frame: &ImageFrame, station: Option<&StationInfo>) -> ArucoResult {
        self(frame, station)
    }
}
