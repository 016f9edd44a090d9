//! Per-frame processing statistics for viewers.

use std::time::{Duration, Instant};

use log::debug;
use serde::Serialize;

use crate::detector::EdgeDetector;
use crate::error::Result;
use crate::frame::{EdgeMap, Frame};

const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Snapshot reported to a viewer after each processed frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameStats {
    pub fps: f32,
    pub width: usize,
    pub height: usize,
    pub processing_time_ms: f64,
}

/// Frame rate over windows of at least one second.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Count one frame; returns the new rate when a window closes.
    pub fn record(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < FPS_WINDOW {
            return None;
        }
        self.fps = self.frames as f32 * 1000.0 / elapsed.as_millis() as f32;
        self.frames = 0;
        self.window_start = now;
        debug!("FPS: {:.1}", self.fps);
        Some(self.fps)
    }

    /// Last published rate, `0.0` until the first window closes.
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

/// Times every detection and keeps the running frame rate.
pub struct ProcessingMonitor<D> {
    detector: D,
    counter: FpsCounter,
}

impl<D: EdgeDetector> ProcessingMonitor<D> {
    pub fn new(detector: D) -> Self {
        Self {
            detector,
            counter: FpsCounter::new(Instant::now()),
        }
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn process(&mut self, frame: &Frame<'_>) -> Result<(EdgeMap, FrameStats)> {
        let start = Instant::now();
        let map = self.detector.detect(frame)?;
        let end = Instant::now();
        self.counter.record(end);

        let stats = FrameStats {
            fps: self.counter.fps(),
            width: frame.width(),
            height: frame.height(),
            processing_time_ms: end.duration_since(start).as_secs_f64() * 1000.0,
        };
        Ok((map, stats))
    }
}
