//! Feeds synthetic frames through a pipeline with a stand-in detector and
//! prints the dispatched results.
//!
//! Run with `cargo run -p aruco-pipeline --example run_pipeline`.

use std::time::Duration;

use log::{info, LevelFilter};

use aruco_pipeline::{
    core::init_with_level, ArucoPipeline, ArucoResult, ImageFrame, MarkerDetector,
    PipelineConfig, Pose, StationInfo,
};
use nalgebra::{UnitQuaternion, Vector3};

/// Pretends every third frame yields a pose, to show the state gating.
struct SyntheticDetector {
    frames_seen: u64,
}

impl MarkerDetector for SyntheticDetector {
    fn process_frame(&mut self, frame: &ImageFrame, _station: Option<&StationInfo>) -> ArucoResult {
        self.frames_seen += 1;
        match self.frames_seen % 3 {
            0 => {
                let pose = Pose {
                    rotation: UnitQuaternion::from_euler_angles(0.0, 0.0, 0.05),
                    translation: Vector3::new(0.1, 0.0, 1.2),
                };
                ArucoResult::with_pose(
                    frame.timestamp,
                    pose,
                    [0.0, 0.0, 0.05, 0.1, 0.0, 1.2],
                    0.02,
                    false,
                )
            }
            1 => ArucoResult::no_marker(frame.timestamp),
            _ => ArucoResult::marker_only(frame.timestamp, 0.1),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_with_level(LevelFilter::Debug)?;

    let pipeline = ArucoPipeline::with_detector(
        PipelineConfig::default(),
        Box::new(SyntheticDetector { frames_seen: 0 }),
    );
    pipeline.register_callback(|result| match result.pose() {
        Some(pose) => info!(
            "t={} pose translation ({:.2}, {:.2}, {:.2})",
            result.timestamp, pose.translation.x, pose.translation.y, pose.translation.z
        ),
        None => info!(
            "t={} no pose (deviation angle {:?})",
            result.timestamp,
            result.deviation_angle()
        ),
    });
    pipeline.start()?;

    let gray = vec![128u8; 320 * 240];
    for ts in 0..9u64 {
        pipeline.add_image(1_000 + ts * 33, 320, 240, &gray, 1)?;
        std::thread::sleep(Duration::from_millis(10));
    }

    // Dropping the pipeline releases it; queued frames are delivered first.
    Ok(())
}
