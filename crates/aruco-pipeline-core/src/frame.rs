//! Timestamped image frames at the ingestion boundary.

use crate::PipelineError;

/// Pixel layout of an ingested frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PixelFormat {
    /// Single-channel 8-bit grayscale.
    Gray = 1,
    /// Interleaved 8-bit RGB.
    Rgb = 3,
}

impl PixelFormat {
    /// Number of bytes per pixel.
    #[inline]
    pub fn channels(self) -> usize {
        self as usize
    }

    /// Map the legacy channel-count parameter (1 or 3) to a format.
    pub fn from_channels(channels: u64) -> Result<Self, PipelineError> {
        match channels {
            1 => Ok(PixelFormat::Gray),
            3 => Ok(PixelFormat::Rgb),
            other => Err(PipelineError::UnsupportedChannels(other)),
        }
    }
}

/// An owned, timestamped image frame.
///
/// Ingestion copies the caller's buffer synchronously; the caller keeps
/// ownership of its slice and may reuse it immediately after the call.
#[derive(Clone, Debug)]
pub struct ImageFrame {
    pub timestamp: u64,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>, // row-major, len = w*h*channels
}

impl ImageFrame {
    /// Validate the frame parameters and copy the pixel buffer.
    ///
    /// Rejects zero dimensions and buffers whose length does not match
    /// `width * height * channels`, so malformed input never reaches a
    /// detector.
    pub fn new(
        timestamp: u64,
        width: u32,
        height: u32,
        format: PixelFormat,
        data: &[u8],
    ) -> Result<Self, PipelineError> {
        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize * format.channels();
        if data.len() != expected {
            return Err(PipelineError::BufferLengthMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            timestamp,
            width,
            height,
            format,
            data: data.to_vec(),
        })
    }

    /// Ingestion-boundary constructor taking the raw channel count.
    pub fn from_raw(
        timestamp: u64,
        width: u32,
        height: u32,
        data: &[u8],
        channels: u64,
    ) -> Result<Self, PipelineError> {
        let format = PixelFormat::from_channels(channels)?;
        Self::new(timestamp, width, height, format, data)
    }

    /// Total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_gray_and_rgb_channel_counts() {
        assert_eq!(PixelFormat::from_channels(1).unwrap(), PixelFormat::Gray);
        assert_eq!(PixelFormat::from_channels(3).unwrap(), PixelFormat::Rgb);
        assert!(matches!(
            PixelFormat::from_channels(2),
            Err(PipelineError::UnsupportedChannels(2))
        ));
        assert!(matches!(
            PixelFormat::from_channels(4),
            Err(PipelineError::UnsupportedChannels(4))
        ));
    }

    #[test]
    fn rejects_zero_dimensions() {
        let err = ImageFrame::from_raw(0, 0, 4, &[], 1).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidDimensions { .. }));
    }

    #[test]
    fn rejects_short_buffer() {
        let data = vec![0u8; 11];
        let err = ImageFrame::from_raw(0, 4, 3, &data, 1).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::BufferLengthMismatch {
                expected: 12,
                got: 11
            }
        ));
    }

    #[test]
    fn copies_the_caller_buffer() {
        let mut data = vec![7u8; 2 * 2 * 3];
        let frame = ImageFrame::from_raw(42, 2, 2, &data, 3).unwrap();
        data.fill(0);
        assert_eq!(frame.timestamp, 42);
        assert_eq!(frame.format, PixelFormat::Rgb);
        assert!(frame.data.iter().all(|&b| b == 7));
        assert_eq!(frame.pixel_count(), 4);
    }
}
