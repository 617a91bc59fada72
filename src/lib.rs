//! Waterdrop renders a single pulsing, drifting water drop, frame by frame.
//!
//! The crate is a small loop around one owned state value:
//!
//! - A [`WaterDrop`] moves vertically, bounces off the top and bottom edges and pulses its radius
//!   between two bounds, with opacity derived from the radius ([`WaterDrop::update`]).
//! - [`draw_drop`] paints it onto a [`Surface`] as a two-point radial gradient plus a highlight.
//! - [`Animation`] fades the surface with a translucent trail, updates, draws, and asks a
//!   [`FrameScheduler`] for the next frame, handing every frame to a [`FrameSink`].
//!
//! Scenes are configured through [`SceneConfig`] JSON; frames can be written as PNG files or
//! streamed into the system `ffmpeg` for MP4 output.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod droplet;
mod encode;
mod foundation;
mod paint;
mod render;
mod scene;

pub use crate::foundation::core::{
    Canvas, Circle, Fps, FrameIndex, MAX_SURFACE_EDGE, Point, Rect, Rgba8Premul, Vec2,
};
pub use crate::foundation::error::{WaterdropError, WaterdropResult};

pub use crate::paint::color::{Rgba, parse_color_str};
pub use crate::paint::gradient::{ColorStop, RadialGradient, validate_stops};

pub use crate::droplet::state::{DropParams, PulseDirection, WaterDrop, opacity_for_radius};
pub use crate::droplet::update::{Edge, StepReport};

pub use crate::render::backend::{FrameRGBA, Paint, Surface};
pub use crate::render::cpu::CpuSurface;
pub use crate::render::draw::{
    DEFAULT_TRAIL, DropStyle, StopStyle, draw_drop, drop_gradient, fade_trail,
};

pub use crate::animation::driver::{Animation, AnimationSettings, RunStats};
pub use crate::animation::scheduler::{FixedRate, FrameBudget, FrameScheduler};

pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path};
pub use crate::encode::png::{PngSequenceSink, save_png};
pub use crate::encode::sink::{FrameSink, InMemorySink, NullSink, SinkConfig};

pub use crate::scene::config::SceneConfig;
