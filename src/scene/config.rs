use crate::animation::driver::{Animation, AnimationSettings};
use crate::droplet::state::{DropParams, WaterDrop};
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{WaterdropError, WaterdropResult};
use crate::paint::color::Rgba;
use crate::render::cpu::CpuSurface;
use crate::render::draw::{DEFAULT_TRAIL, DropStyle};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// JSON-facing description of a water drop animation.
///
/// Every field is optional in JSON; missing fields take the classic defaults (400x400 canvas,
/// 60 fps, 600 frames, lavender trail over white).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    /// Surface size.
    pub canvas: Canvas,
    /// Playback rate.
    pub fps: Fps,
    /// Number of frames rendered by offline outputs.
    pub duration: u64,
    /// Drop parameters.
    pub drop: DropParams,
    /// Drop look.
    pub style: DropStyle,
    /// Fill painted over the surface every frame.
    pub trail: Rgba,
    /// Color the transparent surface is flattened onto for video output.
    pub background: Rgba,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            fps: Fps::default(),
            duration: 600,
            drop: DropParams::default(),
            style: DropStyle::default(),
            trail: DEFAULT_TRAIL,
            background: Rgba::new(1.0, 1.0, 1.0, 1.0),
        }
    }
}

impl SceneConfig {
    /// Parse a scene from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> WaterdropResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| WaterdropError::serde(format!("parse scene JSON: {e}")))
    }

    /// Parse a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> WaterdropResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            WaterdropError::validation(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Pretty-printed JSON form.
    pub fn to_json_pretty(&self) -> WaterdropResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| WaterdropError::serde(format!("serialize scene JSON: {e}")))
    }

    /// Validate every section against the others.
    pub fn validate(&self) -> WaterdropResult<()> {
        self.canvas.validate()?;
        self.fps.validate()?;
        if self.duration == 0 {
            return Err(WaterdropError::validation("duration must be at least one frame"));
        }
        self.drop.validate(self.canvas)?;
        self.style.validate()?;
        validate_color("trail", self.trail)?;
        validate_color("background", self.background)?;
        Ok(())
    }

    /// Settings handed to the loop driver.
    pub fn settings(&self) -> AnimationSettings {
        AnimationSettings {
            style: self.style.clone(),
            trail: self.trail,
            fps: self.fps,
        }
    }

    /// Validate and build a CPU-backed animation at frame 0.
    pub fn build_animation(&self) -> WaterdropResult<Animation<CpuSurface>> {
        self.validate()?;
        let drop = WaterDrop::new(self.drop, self.canvas)?;
        let surface = CpuSurface::new(self.canvas)?;
        Animation::new(drop, surface, self.settings())
    }
}

fn validate_color(name: &str, c: Rgba) -> WaterdropResult<()> {
    let ok = [c.r, c.g, c.b, c.a]
        .iter()
        .all(|v| v.is_finite() && (0.0..=1.0).contains(v));
    if !ok {
        return Err(WaterdropError::validation(format!(
            "{name} color channels must be within 0..=1"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
