//! Detection results emitted by the pipeline.
//!
//! The legacy result struct carried its pose arrays unconditionally and let
//! the state code decide which fields were meaningful. Here the raw arrays
//! are private and every accessor is gated on [`MarkerState`], so stale
//! fields cannot be read by mistake.

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

/// Outcome class of one processed frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum MarkerState {
    /// No marker found in the frame.
    NoMarker = 0,
    /// A marker was found but no pose could be computed from it.
    MarkerOnly = 1,
    /// A full pose was computed.
    Pose = 2,
    /// A full pose was computed and refined.
    PoseRefined = 3,
}

impl MarkerState {
    /// A marker was seen (deviation angle is meaningful).
    #[inline]
    pub fn has_marker(self) -> bool {
        self != MarkerState::NoMarker
    }

    /// A pose was computed (pose and rpy/xyz fields are meaningful).
    #[inline]
    pub fn has_pose(self) -> bool {
        matches!(self, MarkerState::Pose | MarkerState::PoseRefined)
    }

    /// Wire value used by the legacy ABI.
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Camera pose relative to the marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub rotation: UnitQuaternion<f32>,
    pub translation: Vector3<f32>,
}

/// Result of processing one frame.
#[derive(Clone, Debug)]
pub struct ArucoResult {
    pub timestamp: u64,
    state: MarkerState,
    /// quaternion(x, y, z, w), translation(tx, ty, tz)
    camera_pose: [f32; 7],
    /// roll, pitch, yaw [rad], x, y, z [m] in the robot frame
    rpyxyz: [f32; 6],
    /// Angle of the marker centre off the optical axis, z up, marker to the
    /// left positive [rad].
    deviation_angle: f64,
}

impl ArucoResult {
    /// Result for a frame with no visible marker.
    pub fn no_marker(timestamp: u64) -> Self {
        Self {
            timestamp,
            state: MarkerState::NoMarker,
            camera_pose: [0.0; 7],
            rpyxyz: [0.0; 6],
            deviation_angle: 0.0,
        }
    }

    /// Result for a detected marker that did not yield a pose.
    pub fn marker_only(timestamp: u64, deviation_angle: f64) -> Self {
        Self {
            timestamp,
            state: MarkerState::MarkerOnly,
            camera_pose: [0.0; 7],
            rpyxyz: [0.0; 6],
            deviation_angle,
        }
    }

    /// Result with a full pose.
    pub fn with_pose(
        timestamp: u64,
        pose: Pose,
        rpyxyz: [f32; 6],
        deviation_angle: f64,
        refined: bool,
    ) -> Self {
        let q = pose.rotation.quaternion();
        let t = pose.translation;
        Self {
            timestamp,
            state: if refined {
                MarkerState::PoseRefined
            } else {
                MarkerState::Pose
            },
            camera_pose: [q.i, q.j, q.k, q.w, t.x, t.y, t.z],
            rpyxyz,
            deviation_angle,
        }
    }

    #[inline]
    pub fn state(&self) -> MarkerState {
        self.state
    }

    /// Camera pose, available once a pose was computed.
    pub fn pose(&self) -> Option<Pose> {
        if !self.state.has_pose() {
            return None;
        }
        let [x, y, z, w, tx, ty, tz] = self.camera_pose;
        Some(Pose {
            rotation: UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z)),
            translation: Vector3::new(tx, ty, tz),
        })
    }

    /// Roll/pitch/yaw [rad] and x/y/z [m] in the robot frame, available once
    /// a pose was computed.
    pub fn rpyxyz(&self) -> Option<[f32; 6]> {
        self.state.has_pose().then_some(self.rpyxyz)
    }

    /// Deviation angle [rad], available once a marker was seen.
    pub fn deviation_angle(&self) -> Option<f64> {
        self.state.has_marker().then_some(self.deviation_angle)
    }

    /// Raw quaternion + translation layout for the ABI boundary.
    ///
    /// The values are only meaningful when [`MarkerState::has_pose`] holds;
    /// the C caller is bound by the same state-code contract as before.
    #[inline]
    pub fn camera_pose_raw(&self) -> [f32; 7] {
        self.camera_pose
    }

    /// Raw rpy/xyz layout for the ABI boundary.
    #[inline]
    pub fn rpyxyz_raw(&self) -> [f32; 6] {
        self.rpyxyz
    }

    /// Raw deviation angle for the ABI boundary.
    #[inline]
    pub fn deviation_angle_raw(&self) -> f64 {
        self.deviation_angle
    }
}
