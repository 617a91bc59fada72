use crate::animation::scheduler::FrameScheduler;
use crate::droplet::state::WaterDrop;
use crate::droplet::update::StepReport;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::WaterdropResult;
use crate::paint::color::Rgba;
use crate::render::backend::{FrameRGBA, Surface};
use crate::render::draw::{DEFAULT_TRAIL, DropStyle, draw_drop, fade_trail};
use std::time::{Duration, Instant};

/// How an [`Animation`] looks and how fast it is played back.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSettings {
    /// Drop body and highlight style.
    pub style: DropStyle,
    /// Fill painted over the whole surface before every frame.
    pub trail: Rgba,
    /// Playback rate reported to frame sinks.
    pub fps: Fps,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            style: DropStyle::default(),
            trail: DEFAULT_TRAIL,
            fps: Fps::default(),
        }
    }
}

/// Summary of one [`Animation::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    /// Frames rendered and pushed to the sink.
    pub frames: u64,
    /// Edge bounces during the run.
    pub bounces: u64,
    /// Pulse direction flips during the run.
    pub pulse_flips: u64,
    /// Wall time of the run.
    pub elapsed: Duration,
}

/// The loop driver: owns the drop and the surface it is painted on.
///
/// Every tick fades the surface, updates the drop, then draws it.
pub struct Animation<S: Surface> {
    drop: WaterDrop,
    surface: S,
    settings: AnimationSettings,
    next: FrameIndex,
}

impl<S: Surface> Animation<S> {
    /// Build an animation, validating the style against the drop.
    pub fn new(drop: WaterDrop, surface: S, settings: AnimationSettings) -> WaterdropResult<Self> {
        settings.style.validate()?;
        settings.fps.validate()?;
        drop.params.validate(surface.size())?;
        Ok(Self {
            drop,
            surface,
            settings,
            next: FrameIndex(0),
        })
    }

    /// Current drop state.
    pub fn water_drop(&self) -> &WaterDrop {
        &self.drop
    }

    /// Surface being painted.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface, e.g. to clear it between runs.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Give the surface back.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Settings in use.
    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    /// Index the next tick will render.
    pub fn next_frame_index(&self) -> FrameIndex {
        self.next
    }

    /// Render one frame: fade, update, draw.
    pub fn tick(&mut self) -> WaterdropResult<StepReport> {
        fade_trail(&mut self.surface, self.settings.trail)?;
        let report = self.drop.update(self.surface.size());
        draw_drop(&mut self.surface, &self.drop, &self.settings.style)?;
        tracing::trace!(
            frame = self.next.0,
            y = self.drop.center.y,
            radius = self.drop.radius,
            alpha = self.drop.alpha,
            "tick"
        );
        self.next = FrameIndex(self.next.0 + 1);
        Ok(report)
    }

    /// Tick until `frame` has been rendered and return its pixels.
    ///
    /// Frames already rendered are not repeated; asking for a past frame returns the current one.
    pub fn advance_to(&mut self, frame: FrameIndex) -> WaterdropResult<FrameRGBA> {
        while self.next.0 <= frame.0 {
            self.tick()?;
        }
        Ok(self.surface.snapshot())
    }

    /// Drive the loop until `scheduler` stops granting frames, pushing every frame into `sink`.
    #[tracing::instrument(skip(self, scheduler, sink), fields(fps = self.settings.fps.as_f64()))]
    pub fn run(
        &mut self,
        scheduler: &mut dyn FrameScheduler,
        sink: &mut dyn FrameSink,
    ) -> WaterdropResult<RunStats> {
        let canvas = self.surface.size();
        sink.begin(SinkConfig::for_canvas(canvas, self.settings.fps))?;
        tracing::info!(
            width = canvas.width,
            height = canvas.height,
            start = self.next.0,
            "animation started"
        );

        let started = Instant::now();
        let mut stats = RunStats::default();
        while scheduler.next_frame() {
            let idx = self.next;
            let report = self.tick()?;
            if report.bounced.is_some() {
                stats.bounces += 1;
            }
            if report.pulse_flipped.is_some() {
                stats.pulse_flips += 1;
            }
            sink.push_frame(idx, &self.surface.snapshot())?;
            stats.frames += 1;
        }
        sink.end()?;
        stats.elapsed = started.elapsed();

        tracing::info!(
            frames = stats.frames,
            bounces = stats.bounces,
            pulse_flips = stats.pulse_flips,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "animation finished"
        );
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/driver.rs"]
mod tests;
