//! C ABI for the asynchronous ArUco marker pose pipeline.
//!
//! The surface follows the legacy shared-library contract: an opaque handle
//! passed as the first argument of every call, coarse `int32` return codes
//! (`1` success, `0`/negative failure; see [`aruco_pipeline_core::legacy`]),
//! and a function-pointer callback with a user-data pointer invoked on the
//! worker thread. Null or malformed arguments are rejected with the legacy
//! failure codes instead of being propagated.

use std::ffi::CStr;
use std::os::raw::{c_char, c_void};

use log::warn;

use aruco_pipeline::{ArucoPipeline, ArucoResult};
use aruco_pipeline_core::{legacy, DetectionBox, PipelineError, StationInfo};

/// Opaque pipeline handle. Created by [`aruco_pipeline_create`], destroyed
/// exactly once by [`aruco_pipeline_release`].
pub struct ArucoPipelineHandle {
    inner: ArucoPipeline,
}

/// Result layout of the legacy ABI.
///
/// `camera_pose` and `rpyxyz` are meaningful only when `state > 1`;
/// `deviation_angle` only when `state > 0`.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ArucoResultFfi {
    pub timestamp: u64,
    /// quaternion(x, y, z, w), translation(tx, ty, tz)
    pub camera_pose: [f32; 7],
    /// roll, pitch, yaw [rad], x, y, z [m] in the robot frame
    pub rpyxyz: [f32; 6],
    pub deviation_angle: f64,
    pub state: i32,
}

impl From<&ArucoResult> for ArucoResultFfi {
    fn from(res: &ArucoResult) -> Self {
        Self {
            timestamp: res.timestamp,
            camera_pose: res.camera_pose_raw(),
            rpyxyz: res.rpyxyz_raw(),
            deviation_angle: res.deviation_angle_raw(),
            state: res.state().code(),
        }
    }
}

/// Station detection layout of the legacy ABI. Each box is a flat
/// `(classID, conf, x1, y1, x2, y2)` float sequence.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct StationInfoFfi {
    pub timestamp: u64,
    pub is_chargestation: bool,
    pub is_head: bool,
    pub station_box: *const f32,
    pub station_box_len: usize,
    pub head_box: *const f32,
    pub head_box_len: usize,
}

/// Result callback of the legacy ABI, invoked once per processed frame on
/// the worker thread.
pub type ArucoResultCallback =
    Option<unsafe extern "C" fn(result: *const ArucoResultFfi, user_data: *mut c_void)>;

struct CCallback {
    func: unsafe extern "C" fn(*const ArucoResultFfi, *mut c_void),
    user_data: *mut c_void,
}

// The C caller guarantees its callback and context stay valid until release
// and tolerate invocation from the worker thread.
unsafe impl Send for CCallback {}
unsafe impl Sync for CCallback {}

unsafe fn parse_box(ptr: *const f32, len: usize) -> Option<DetectionBox> {
    if ptr.is_null() || len < 6 {
        return None;
    }
    let values = std::slice::from_raw_parts(ptr, len);
    DetectionBox::from_floats(values)
}

fn result_code(res: Result<(), PipelineError>) -> i32 {
    match res {
        Ok(()) => legacy::SUCCESS,
        Err(err) => {
            warn!("pipeline call failed: {err}");
            err.code()
        }
    }
}

/// Create a pipeline instance and store it in `*handle`.
///
/// `config_path` may be null or empty to use the built-in defaults. On any
/// failure `*handle` is set to null; the legacy contract has no error
/// return here.
///
/// # Safety
/// `handle` must be a valid pointer; `config_path`, when non-null, must be a
/// nul-terminated string.
#[no_mangle]
pub unsafe extern "C" fn aruco_pipeline_create(
    handle: *mut *mut ArucoPipelineHandle,
    config_path: *const c_char,
) {
    if handle.is_null() {
        return;
    }
    *handle = std::ptr::null_mut();

    let pipeline = if config_path.is_null() {
        Ok(ArucoPipeline::with_config(Default::default()))
    } else {
        match CStr::from_ptr(config_path).to_str() {
            Ok("") => Ok(ArucoPipeline::with_config(Default::default())),
            Ok(path) => ArucoPipeline::from_config_path(path),
            Err(_) => {
                warn!("config path is not valid UTF-8");
                return;
            }
        }
    };
    match pipeline {
        Ok(p) => {
            *handle = Box::into_raw(Box::new(ArucoPipelineHandle { inner: p }));
        }
        Err(err) => warn!("pipeline creation failed: {err}"),
    }
}

/// Stop the worker and free the instance. Passing null is a no-op; passing
/// the same handle twice is undefined behaviour, as in the original
/// contract.
///
/// # Safety
/// `handle` must be null or a pointer obtained from
/// [`aruco_pipeline_create`] that has not been released yet.
#[no_mangle]
pub unsafe extern "C" fn aruco_pipeline_release(handle: *mut ArucoPipelineHandle) {
    if handle.is_null() {
        return;
    }
    drop(Box::from_raw(handle));
}

/// Register the result callback with an opaque user-data pointer. A null
/// callback keeps the previous observer.
///
/// # Safety
/// `handle` must be a live pipeline handle; the callback and `user_data`
/// must stay valid until release.
#[no_mangle]
pub unsafe extern "C" fn aruco_pipeline_register_result_callback(
    handle: *mut ArucoPipelineHandle,
    callback: ArucoResultCallback,
    user_data: *mut c_void,
) {
    let Some(pipeline) = handle.as_ref() else {
        return;
    };
    let Some(func) = callback else {
        return;
    };
    let cb = CCallback { func, user_data };
    pipeline.inner.register_callback(move |result| {
        // Capture the whole CCallback (not its raw-pointer fields) so the
        // Send/Sync impls above apply to the closure.
        let cb = &cb;
        let ffi = ArucoResultFfi::from(result);
        // Bound by the C contract above.
        unsafe { (cb.func)(&ffi, cb.user_data) };
    });
}

/// Start processing. Returns `1` on success, `0` on failure.
///
/// # Safety
/// `handle` must be null or a live pipeline handle.
#[no_mangle]
pub unsafe extern "C" fn aruco_pipeline_start(handle: *mut ArucoPipelineHandle) -> i32 {
    let Some(pipeline) = handle.as_ref() else {
        return legacy::FAILURE;
    };
    legacy::as_bool_code(result_code(pipeline.inner.start()))
}

/// Pause processing. Returns `1` on success or a negative error code.
///
/// # Safety
/// `handle` must be null or a live pipeline handle.
#[no_mangle]
pub unsafe extern "C" fn aruco_pipeline_pause(handle: *mut ArucoPipelineHandle) -> i32 {
    let Some(pipeline) = handle.as_ref() else {
        return legacy::FAILURE;
    };
    result_code(pipeline.inner.pause())
}

/// Enqueue a frame. `data` must reference `width * height * channels` bytes
/// (channels 1 or 3); the buffer is copied before the call returns. Returns
/// `1` on success or a negative error code.
///
/// # Safety
/// `handle` must be null or a live pipeline handle; `data`, when non-null,
/// must reference at least `width * height * channels` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn aruco_pipeline_add_image(
    handle: *mut ArucoPipelineHandle,
    timestamp: u64,
    width: u32,
    height: u32,
    data: *const u8,
    channels: u64,
) -> i32 {
    let Some(pipeline) = handle.as_ref() else {
        return legacy::FAILURE;
    };
    if data.is_null() || width == 0 || height == 0 || !matches!(channels, 1 | 3) {
        warn!("add_image rejected: null data or malformed parameters");
        return legacy::INVALID_ARGUMENT;
    }
    let len = width as usize * height as usize * channels as usize;
    let slice = std::slice::from_raw_parts(data, len);
    result_code(
        pipeline
            .inner
            .add_image(timestamp, width, height, slice, channels),
    )
}

/// Enqueue an externally computed charge-station detection. Returns `1` on
/// success or a negative error code.
///
/// # Safety
/// `handle` must be null or a live pipeline handle; the box pointers inside
/// `info`, when non-null, must reference `*_len` readable floats.
#[no_mangle]
pub unsafe extern "C" fn aruco_pipeline_add_station(
    handle: *mut ArucoPipelineHandle,
    timestamp: u64,
    info: StationInfoFfi,
) -> i32 {
    let Some(pipeline) = handle.as_ref() else {
        return legacy::FAILURE;
    };
    let station = info
        .is_chargestation
        .then(|| parse_box(info.station_box, info.station_box_len))
        .flatten();
    let head = info
        .is_head
        .then(|| parse_box(info.head_box, info.head_box_len))
        .flatten();
    let station_info = match (station, head) {
        (Some(s), Some(h)) => StationInfo::full(info.timestamp, s, h),
        // Head-only detections carry the head box in both slots.
        (_, Some(h)) => StationInfo::head_only(info.timestamp, h),
        (Some(s), None) => StationInfo::station_only(info.timestamp, s),
        (None, None) => StationInfo::empty(info.timestamp),
    };
    result_code(pipeline.inner.add_station(timestamp, station_info))
}

/// Current status as its wire value (0 silent, 1 running, 2 waiting,
/// 3 pause). Null handles report silent.
///
/// # Safety
/// `handle` must be null or a live pipeline handle.
#[no_mangle]
pub unsafe extern "C" fn aruco_pipeline_get_status(handle: *mut ArucoPipelineHandle) -> i32 {
    match handle.as_ref() {
        Some(pipeline) => pipeline.inner.status().code() as i32,
        None => 0,
    }
}

/// Static version string of the library. The handle is accepted for ABI
/// parity but not used.
///
/// # Safety
/// Always safe; the returned pointer is static.
#[no_mangle]
pub unsafe extern "C" fn aruco_pipeline_get_version(
    _handle: *mut ArucoPipelineHandle,
) -> *const c_char {
    static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    unsafe extern "C" fn count_results(result: *const ArucoResultFfi, user_data: *mut c_void) {
        let counter = &*(user_data as *const AtomicUsize);
        assert!(!result.is_null());
        // Placeholder detector: a sta=0 result exposes nothing beyond the
        // timestamp, consumers must not read the pose fields.
        assert_eq!((*result).state, 0);
        counter.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn create_start_ingest_release_round_trip() {
        let counter = AtomicUsize::new(0);
        let mut handle: *mut ArucoPipelineHandle = std::ptr::null_mut();
        unsafe {
            aruco_pipeline_create(&mut handle, std::ptr::null());
            assert!(!handle.is_null());
            assert_eq!(aruco_pipeline_get_status(handle), 0);

            aruco_pipeline_register_result_callback(
                handle,
                Some(count_results),
                &counter as *const AtomicUsize as *mut c_void,
            );
            assert_eq!(aruco_pipeline_start(handle), legacy::SUCCESS);
            assert_eq!(aruco_pipeline_start(handle), legacy::SUCCESS);

            let data = vec![0u8; 16 * 12];
            assert_eq!(
                aruco_pipeline_add_image(handle, 1, 16, 12, data.as_ptr(), 1),
                legacy::SUCCESS
            );
            assert_eq!(
                aruco_pipeline_add_image(handle, 2, 16, 12, data.as_ptr(), 2),
                legacy::INVALID_ARGUMENT
            );

            let begin = Instant::now();
            while counter.load(Ordering::SeqCst) < 1 && begin.elapsed() < Duration::from_secs(2) {
                std::thread::sleep(Duration::from_millis(2));
            }
            assert_eq!(counter.load(Ordering::SeqCst), 1);

            aruco_pipeline_release(handle);
        }
    }

    #[test]
    fn null_handles_are_rejected() {
        unsafe {
            assert_eq!(aruco_pipeline_start(std::ptr::null_mut()), legacy::FAILURE);
            assert_eq!(aruco_pipeline_pause(std::ptr::null_mut()), legacy::FAILURE);
            assert_eq!(aruco_pipeline_get_status(std::ptr::null_mut()), 0);
            aruco_pipeline_release(std::ptr::null_mut());
        }
    }

    #[test]
    fn version_is_a_nul_terminated_crate_version() {
        unsafe {
            let ptr = aruco_pipeline_get_version(std::ptr::null_mut());
            let version = CStr::from_ptr(ptr).to_str().unwrap();
            assert_eq!(version, env!("CARGO_PKG_VERSION"));
        }
    }
}
