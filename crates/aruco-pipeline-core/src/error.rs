//! Error taxonomy for the pipeline and its legacy integer mapping.

use crate::config::ConfigError;

/// Errors produced by the pipeline API.
///
/// The legacy ABI only carries coarse integer codes; [`PipelineError::code`]
/// maps each variant onto that channel while the structured variant keeps
/// the detail for logging and Rust callers.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("invalid image dimensions (width={width}, height={height})")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("unsupported channel count {0} (expected 1 or 3)")]
    UnsupportedChannels(u64),

    #[error("image buffer length mismatch (expected {expected} bytes, got {got})")]
    BufferLengthMismatch { expected: usize, got: usize },

    #[error("pipeline is silent and not accepting input; call start first")]
    NotInitialized,

    #[error("input queue is full ({capacity} entries)")]
    QueueFull { capacity: usize },

    #[error("pipeline has already been released")]
    AlreadyReleased,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PipelineError {
    /// Negative status code carried over the legacy `int32` channel.
    pub fn code(&self) -> i32 {
        match self {
            PipelineError::InvalidDimensions { .. }
            | PipelineError::UnsupportedChannels(_)
            | PipelineError::BufferLengthMismatch { .. } => legacy::INVALID_ARGUMENT,
            PipelineError::NotInitialized => legacy::NOT_INITIALIZED,
            PipelineError::QueueFull { .. } => legacy::QUEUE_FULL,
            PipelineError::AlreadyReleased => legacy::ALREADY_RELEASED,
            PipelineError::Config(_) => legacy::INVALID_ARGUMENT,
        }
    }
}

/// Integer codes of the legacy call surface.
///
/// The original contract was two-valued (1 success, 0 failure); the negative
/// codes refine the failure half without changing the sign convention, so a
/// caller testing `> 0` keeps working.
pub mod legacy {
    pub const SUCCESS: i32 = 1;
    pub const FAILURE: i32 = 0;
    pub const INVALID_ARGUMENT: i32 = -1;
    pub const NOT_INITIALIZED: i32 = -2;
    pub const QUEUE_FULL: i32 = -3;
    pub const ALREADY_RELEASED: i32 = -4;

    /// Collapse a rich code to the original two-valued flag.
    #[inline]
    pub fn as_bool_code(code: i32) -> i32 {
        if code > 0 {
            SUCCESS
        } else {
            FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_stay_on_the_failure_side() {
        let errors = [
            PipelineError::InvalidDimensions {
                width: 0,
                height: 0,
            },
            PipelineError::UnsupportedChannels(2),
            PipelineError::BufferLengthMismatch {
                expected: 10,
                got: 4,
            },
            PipelineError::NotInitialized,
            PipelineError::QueueFull { capacity: 8 },
            PipelineError::AlreadyReleased,
        ];
        for err in &errors {
            assert!(err.code() <= 0, "{err} must map to a non-success code");
            assert_eq!(legacy::as_bool_code(err.code()), legacy::FAILURE);
        }
        assert_eq!(legacy::as_bool_code(legacy::SUCCESS), legacy::SUCCESS);
    }
}
