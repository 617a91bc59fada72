use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{WaterdropError, WaterdropResult};
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

impl SinkConfig {
    /// Config for frames of size `canvas` played at `fps`.
    pub fn for_canvas(canvas: Canvas, fps: Fps) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            fps,
        }
    }

    /// Frame size as a validated [`Canvas`], after checking the rate.
    pub fn validate(&self) -> WaterdropResult<Canvas> {
        self.fps.validate()?;
        Canvas::new(self.width, self.height)
    }

    /// Reject a frame whose size or byte length does not match this config.
    pub fn check_frame(&self, frame: &FrameRGBA) -> WaterdropResult<()> {
        if frame.width != self.width || frame.height != self.height {
            return Err(WaterdropError::validation(format!(
                "frame is {}x{}, sink expects {}x{}",
                frame.width, frame.height, self.width, self.height
            )));
        }
        let want = Canvas {
            width: self.width,
            height: self.height,
        }
        .rgba8_len();
        if frame.data.len() != want {
            return Err(WaterdropError::validation(format!(
                "frame carries {} bytes, expected {want}",
                frame.data.len()
            )));
        }
        Ok(())
    }
}

/// Consumer of rendered frames.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> WaterdropResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> WaterdropResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> WaterdropResult<()>;
}

/// Enforces the strictly increasing frame order of a sink session.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct FrameOrder {
    last: Option<FrameIndex>,
}

impl FrameOrder {
    pub(crate) fn accept(&mut self, idx: FrameIndex) -> WaterdropResult<()> {
        match self.last {
            Some(last) if idx.0 <= last.0 => Err(WaterdropError::encode(format!(
                "frame {} arrived after frame {}",
                idx.0, last.0
            ))),
            _ => {
                self.last = Some(idx);
                Ok(())
            }
        }
    }
}

/// Sink that keeps every frame in memory. Checks frame order and size like a file sink would.
#[derive(Debug, Default)]
pub struct InMemorySink {
    session: Option<(SinkConfig, FrameOrder)>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.session.as_ref().map(|(cfg, _)| cfg)
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` has been called since the last `begin`.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> WaterdropResult<()> {
        cfg.validate()?;
        self.session = Some((cfg, FrameOrder::default()));
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> WaterdropResult<()> {
        let Some((cfg, order)) = self.session.as_mut() else {
            return Err(WaterdropError::encode("in-memory sink not started"));
        };
        if self.ended {
            return Err(WaterdropError::encode("in-memory sink already ended"));
        }
        cfg.check_frame(frame)?;
        order.accept(idx)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> WaterdropResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Sink that drops every frame. Useful for timing a live run without output.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn begin(&mut self, _cfg: SinkConfig) -> WaterdropResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, _frame: &FrameRGBA) -> WaterdropResult<()> {
        Ok(())
    }

    fn end(&mut self) -> WaterdropResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
