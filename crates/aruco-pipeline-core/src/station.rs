//! Charge-station detections fed into the pipeline from an external
//! object-detection head.

/// One detection box: class id, confidence and the top-left / bottom-right
/// pixel corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionBox {
    pub class_id: u32,
    pub confidence: f32,
    /// (x1, y1) top-left corner in pixels.
    pub top_left: [f32; 2],
    /// (x2, y2) bottom-right corner in pixels.
    pub bottom_right: [f32; 2],
}

impl DetectionBox {
    /// Flat `(classID, conf, x1, y1, x2, y2)` layout of the legacy struct.
    pub fn to_floats(&self) -> [f32; 6] {
        [
            self.class_id as f32,
            self.confidence,
            self.top_left[0],
            self.top_left[1],
            self.bottom_right[0],
            self.bottom_right[1],
        ]
    }

    /// Parse the flat legacy layout. Returns `None` when the sequence is
    /// shorter than the six expected values.
    pub fn from_floats(values: &[f32]) -> Option<Self> {
        if values.len() < 6 {
            return None;
        }
        Some(Self {
            class_id: values[0] as u32,
            confidence: values[1],
            top_left: [values[2], values[3]],
            bottom_right: [values[4], values[5]],
        })
    }
}

/// Externally computed charge-station detection for one frame.
///
/// The boxes are typed options rather than flag-plus-array pairs; the legacy
/// boolean flags fall out of `is_station`/`is_head`.
#[derive(Clone, Debug, PartialEq)]
pub struct StationInfo {
    pub timestamp: u64,
    station: Option<DetectionBox>,
    head: Option<DetectionBox>,
}

impl StationInfo {
    /// A frame in which neither the station nor its head was found.
    pub fn empty(timestamp: u64) -> Self {
        Self {
            timestamp,
            station: None,
            head: None,
        }
    }

    /// Both the whole station and its head sub-region were detected.
    pub fn full(timestamp: u64, station: DetectionBox, head: DetectionBox) -> Self {
        Self {
            timestamp,
            station: Some(station),
            head: Some(head),
        }
    }

    /// Only the head sub-region was detected. By convention the station box
    /// then equals the head box.
    pub fn head_only(timestamp: u64, head: DetectionBox) -> Self {
        Self {
            timestamp,
            station: Some(head),
            head: Some(head),
        }
    }

    /// The whole station was detected without resolving its head.
    pub fn station_only(timestamp: u64, station: DetectionBox) -> Self {
        Self {
            timestamp,
            station: Some(station),
            head: None,
        }
    }

    /// Same detections re-stamped with the given timestamp. The ingestion
    /// call carries a separate timestamp parameter that wins over the one
    /// embedded in the struct.
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[inline]
    pub fn is_station(&self) -> bool {
        self.station.is_some()
    }

    #[inline]
    pub fn is_head(&self) -> bool {
        self.head.is_some()
    }

    #[inline]
    pub fn station_box(&self) -> Option<&DetectionBox> {
        self.station.as_ref()
    }

    #[inline]
    pub fn head_box(&self) -> Option<&DetectionBox> {
        self.head.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_box(class_id: u32) -> DetectionBox {
        DetectionBox {
            class_id,
            confidence: 0.9,
            top_left: [10.0, 20.0],
            bottom_right: [110.0, 220.0],
        }
    }

    #[test]
    fn head_only_copies_the_head_box_into_the_station_box() {
        let head = sample_box(1);
        let info = StationInfo::head_only(7, head);
        assert!(info.is_station());
        assert!(info.is_head());
        assert_eq!(info.station_box(), info.head_box());
        assert_eq!(
            info.station_box().unwrap().to_floats(),
            head.to_floats(),
            "station box must equal head box field-for-field"
        );
    }

    #[test]
    fn float_layout_round_trips() {
        let b = sample_box(3);
        let floats = b.to_floats();
        assert_eq!(DetectionBox::from_floats(&floats), Some(b));
        assert_eq!(DetectionBox::from_floats(&floats[..5]), None);
    }

    #[test]
    fn empty_info_has_no_boxes() {
        let info = StationInfo::empty(1);
        assert!(!info.is_station());
        assert!(!info.is_head());
        assert!(info.station_box().is_none());
    }
}
