//! The status-driven processing loop.
//!
//! One worker thread runs per pipeline instance. Each iteration reads the
//! current [`Status`] and follows its cadence: continuous draining while
//! `Running`, a 5 ms armed poll while `Waiting`, a 50 ms suspend poll while
//! `Pause` and a 1000 ms idle re-check while `Silent`. While armed the
//! worker blocks on the channel itself, so an enqueued frame wakes it
//! immediately instead of waiting out the poll interval.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use log::{debug, trace};

use aruco_pipeline_core::{ImageFrame, StationInfo, Status};

use crate::detector::MarkerDetector;
use crate::state::SharedState;

/// Inputs flowing from the ingestion calls to the worker.
pub(crate) enum Input {
    Frame(ImageFrame),
    Station(StationInfo),
}

pub(crate) struct Worker {
    inputs: Receiver<Input>,
    shared: Arc<SharedState>,
    detector: Box<dyn MarkerDetector>,
    station_fusion: bool,
    pending_station: Option<StationInfo>,
    /// Input received just as an external transition suspended processing;
    /// held until the next `Running` iteration so pause really suspends.
    carry: Option<Input>,
}

impl Worker {
    pub fn new(
        inputs: Receiver<Input>,
        shared: Arc<SharedState>,
        detector: Box<dyn MarkerDetector>,
        station_fusion: bool,
    ) -> Self {
        Self {
            inputs,
            shared,
            detector,
            station_fusion,
            pending_station: None,
            carry: None,
        }
    }

    pub fn run(mut self) {
        debug!("worker started");
        loop {
            if self.shared.is_released() {
                break;
            }
            let status = self.shared.status();
            match status {
                Status::Silent | Status::Pause => {
                    // Do not consume the queue; wake on the state cadence or
                    // on an external transition request.
                    let interval = status
                        .poll_interval()
                        .unwrap_or(Duration::from_millis(1000));
                    self.shared.wait_for_wake(interval);
                }
                Status::Running => {
                    if let Some(input) = self.carry.take() {
                        self.handle(input);
                        continue;
                    }
                    match self.inputs.try_recv() {
                        Ok(input) => self.handle(input),
                        Err(TryRecvError::Empty) => {
                            // Queue drained: arm and idle until the next frame.
                            if self.shared.transition(Status::Running, Status::Waiting) {
                                debug!("queue drained, running -> waiting");
                            }
                        }
                        Err(TryRecvError::Disconnected) => break,
                    }
                }
                Status::Waiting => {
                    match self.inputs.recv_timeout(Duration::from_millis(5)) {
                        Ok(input) => {
                            if self.shared.transition(Status::Waiting, Status::Running) {
                                debug!("input received, waiting -> running");
                                self.handle(input);
                            } else if self.shared.status() == Status::Running {
                                self.handle(input);
                            } else {
                                // Suspended between the receive and the
                                // handover; hold the input for the resume.
                                self.carry = Some(input);
                            }
                        }
                        Err(RecvTimeoutError::Timeout) => {}
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            }
        }

        // Frames accepted while the pipeline was producing output are still
        // delivered before the worker exits, so release never drops them.
        if matches!(self.shared.status(), Status::Running | Status::Waiting) {
            if let Some(input) = self.carry.take() {
                self.handle(input);
            }
            while let Ok(input) = self.inputs.try_recv() {
                self.handle(input);
            }
        }
        debug!("worker exiting");
    }

    fn handle(&mut self, input: Input) {
        match input {
            Input::Station(info) => {
                trace!("station detection at t={}", info.timestamp);
                if self.station_fusion {
                    self.pending_station = Some(info);
                }
            }
            Input::Frame(frame) => {
                let station = self.pending_station.take();
                let result = self.detector.process_frame(&frame, station.as_ref());
                trace!(
                    "frame t={} ({}x{}) -> state {:?}",
                    frame.timestamp,
                    frame.width,
                    frame.height,
                    result.state()
                );
                self.shared.dispatch(&result);
            }
        }
    }
}
