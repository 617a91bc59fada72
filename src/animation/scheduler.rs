use crate::foundation::core::Fps;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Host-side "call me again before the next repaint" primitive.
///
/// The loop driver asks for permission before every frame; returning `false` ends the loop.
pub trait FrameScheduler {
    /// Block until the next frame is due. `false` means no more frames will be scheduled.
    fn next_frame(&mut self) -> bool;
}

/// Offline scheduler: grants a fixed number of frames immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBudget {
    remaining: u64,
}

impl FrameBudget {
    /// Allow exactly `frames` frames.
    pub fn new(frames: u64) -> Self {
        Self { remaining: frames }
    }

    /// Frames not yet granted.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl FrameScheduler for FrameBudget {
    fn next_frame(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Real-time scheduler pacing frames at a fixed rate with `std::thread::sleep`.
///
/// Runs until its optional frame limit is reached or the stop flag is raised.
#[derive(Debug)]
pub struct FixedRate {
    frame_duration: Duration,
    limit: Option<u64>,
    granted: u64,
    last: Option<Instant>,
    stop: Arc<AtomicBool>,
}

impl FixedRate {
    /// Pace frames at `fps`, with no frame limit.
    pub fn new(fps: Fps) -> Self {
        Self {
            frame_duration: fps.frame_duration(),
            limit: None,
            granted: 0,
            last: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stop after `frames` frames.
    pub fn with_limit(mut self, frames: u64) -> Self {
        self.limit = Some(frames);
        self
    }

    /// Shared flag; storing `true` ends the loop before its next frame.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Target time between two frames.
    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Frames granted so far.
    pub fn granted(&self) -> u64 {
        self.granted
    }
}

impl FrameScheduler for FixedRate {
    fn next_frame(&mut self) -> bool {
        if self.stop.load(Ordering::Relaxed) {
            return false;
        }
        if self.limit.is_some_and(|limit| self.granted >= limit) {
            return false;
        }
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.frame_duration {
                std::thread::sleep(self.frame_duration - elapsed);
            }
        }
        self.last = Some(Instant::now());
        self.granted += 1;
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/scheduler.rs"]
mod tests;
