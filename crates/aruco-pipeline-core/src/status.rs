//! Processing status of a pipeline instance.

use std::time::Duration;

/// Status of the background processing loop.
///
/// Exactly one value is active per pipeline at any time. Transitions happen
/// only through `start`/`pause`/`release` calls or the worker's own
/// `Running`/`Waiting` idle handover.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Status {
    /// Idle. Frames are rejected at the ingestion boundary; the worker only
    /// wakes every second to re-check for an external transition request.
    Silent = 0,
    /// Actively draining the frame queue and emitting one result per frame.
    Running = 1,
    /// Armed but idle: frames are accepted and the worker polls the queue
    /// every few milliseconds so the first frame resumes processing at once.
    Waiting = 2,
    /// Suspended. Frames accumulate in the queue for a quick resume; no
    /// results are emitted.
    Pause = 3,
}

impl Status {
    /// Wake interval of the worker loop in this state.
    ///
    /// `None` means "process continuously, no artificial delay".
    pub fn poll_interval(self) -> Option<Duration> {
        match self {
            Status::Silent => Some(Duration::from_millis(1000)),
            Status::Running => None,
            Status::Waiting => Some(Duration::from_millis(5)),
            Status::Pause => Some(Duration::from_millis(50)),
        }
    }

    /// Whether `add_image`/`add_station` are accepted in this state.
    #[inline]
    pub fn accepts_input(self) -> bool {
        !matches!(self, Status::Silent)
    }

    /// Decode the wire value used by the legacy ABI.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Status::Silent),
            1 => Some(Status::Running),
            2 => Some(Status::Waiting),
            3 => Some(Status::Pause),
            _ => None,
        }
    }

    /// Wire value used by the legacy ABI.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_intervals_follow_the_state_table() {
        assert_eq!(
            Status::Silent.poll_interval(),
            Some(Duration::from_millis(1000))
        );
        assert_eq!(Status::Running.poll_interval(), None);
        assert_eq!(
            Status::Waiting.poll_interval(),
            Some(Duration::from_millis(5))
        );
        assert_eq!(
            Status::Pause.poll_interval(),
            Some(Duration::from_millis(50))
        );
    }

    #[test]
    fn code_round_trip() {
        for status in [
            Status::Silent,
            Status::Running,
            Status::Waiting,
            Status::Pause,
        ] {
            assert_eq!(Status::from_code(status.code()), Some(status));
        }
        assert_eq!(Status::from_code(4), None);
    }

    #[test]
    fn only_silent_rejects_input() {
        assert!(!Status::Silent.accepts_input());
        assert!(Status::Running.accepts_input());
        assert!(Status::Waiting.accepts_input());
        assert!(Status::Pause.accepts_input());
    }
}
