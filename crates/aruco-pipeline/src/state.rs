//! State shared between the caller-facing handle and the worker thread.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex, RwLock};

use aruco_pipeline_core::{ArucoResult, Status};

/// Observer invoked once per processed frame, on the worker thread.
pub type ResultCallback = Arc<dyn Fn(&ArucoResult) + Send + Sync>;

/// Shared pipeline state.
///
/// The status and the released flag are atomics so `status()` never blocks;
/// the condvar lets `start`/`pause`/`release` wake a sleeping worker without
/// waiting out the silent 1000 ms cadence.
pub(crate) struct SharedState {
    status: AtomicU8,
    released: AtomicBool,
    callback: RwLock<Option<ResultCallback>>,
    wake_lock: Mutex<()>,
    wake: Condvar,
}

impl SharedState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            status: AtomicU8::new(Status::Silent.code()),
            released: AtomicBool::new(false),
            callback: RwLock::new(None),
            wake_lock: Mutex::new(()),
            wake: Condvar::new(),
        })
    }

    pub fn status(&self) -> Status {
        // The atomic only ever holds values written through set_status.
        Status::from_code(self.status.load(Ordering::SeqCst)).unwrap_or(Status::Silent)
    }

    /// Store the new status and wake the worker so cadence changes apply
    /// immediately.
    pub fn set_status(&self, status: Status) {
        self.status.store(status.code(), Ordering::SeqCst);
        self.notify();
    }

    /// Status handover done by the worker itself (`Running` <-> `Waiting`).
    /// Only applies while the externally visible status still matches
    /// `from`, so it cannot overwrite a concurrent `pause`.
    pub fn transition(&self, from: Status, to: Status) -> bool {
        self.status
            .compare_exchange(from.code(), to.code(), Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    /// Mark the pipeline released. Returns `false` when it already was, so
    /// the caller can make `release` idempotent.
    pub fn request_release(&self) -> bool {
        let first = !self.released.swap(true, Ordering::SeqCst);
        if first {
            self.notify();
        }
        first
    }

    pub fn install_callback(&self, cb: ResultCallback) {
        *self.callback.write() = Some(cb);
    }

    /// Invoke the registered callback, if any, with the given result.
    pub fn dispatch(&self, result: &ArucoResult) {
        let guard = self.callback.read();
        if let Some(cb) = guard.as_ref() {
            cb(result);
        }
    }

    /// Sleep up to `timeout`, returning early when another thread changes
    /// the status or requests release.
    pub fn wait_for_wake(&self, timeout: Duration) {
        let mut guard = self.wake_lock.lock();
        let _ = self.wake.wait_for(&mut guard, timeout);
    }

    fn notify(&self) {
        let _guard = self.wake_lock.lock();
        self.wake.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn initial_state_is_silent_and_live() {
        let state = SharedState::new();
        assert_eq!(state.status(), Status::Silent);
        assert!(!state.is_released());
    }

    #[test]
    fn release_is_reported_once() {
        let state = SharedState::new();
        assert!(state.request_release());
        assert!(!state.request_release());
        assert!(state.is_released());
    }

    #[test]
    fn worker_handover_does_not_override_external_transitions() {
        let state = SharedState::new();
        state.set_status(Status::Running);
        assert!(state.transition(Status::Running, Status::Waiting));
        assert_eq!(state.status(), Status::Waiting);

        // A pause landed in between; the handover must not apply.
        state.set_status(Status::Pause);
        assert!(!state.transition(Status::Waiting, Status::Running));
        assert_eq!(state.status(), Status::Pause);
    }

    #[test]
    fn set_status_wakes_a_sleeper() {
        let state = SharedState::new();
        let waiter = Arc::clone(&state);
        let handle = std::thread::spawn(move || {
            let begin = Instant::now();
            waiter.wait_for_wake(Duration::from_secs(5));
            begin.elapsed()
        });
        // Give the sleeper time to park before signalling.
        std::thread::sleep(Duration::from_millis(50));
        state.set_status(Status::Running);
        let slept = handle.join().unwrap();
        assert!(slept < Duration::from_secs(2), "sleeper was not woken");
    }

    #[test]
    fn dispatch_without_callback_is_a_no_op() {
        let state = SharedState::new();
        state.dispatch(&ArucoResult::no_marker(1));
    }
}
