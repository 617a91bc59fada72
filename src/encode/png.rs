use crate::encode::ffmpeg::ensure_parent_dir;
use crate::encode::sink::{FrameOrder, FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{WaterdropError, WaterdropResult};
use crate::render::backend::FrameRGBA;
use std::path::{Path, PathBuf};

/// Write `frame` to `path` as a straight-alpha RGBA PNG.
pub fn save_png(frame: &FrameRGBA, path: &Path) -> WaterdropResult<()> {
    ensure_parent_dir(path)?;
    let rgba = frame.to_straight_rgba8();
    let img = image::RgbaImage::from_raw(frame.width, frame.height, rgba)
        .ok_or_else(|| WaterdropError::encode("frame data does not match its dimensions"))?;
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| WaterdropError::encode(format!("write '{}': {e}", path.display())))
}

/// Writes each frame as `<prefix><index>.png` under a directory.
#[derive(Debug, Clone)]
pub struct PngSequenceSink {
    dir: PathBuf,
    prefix: String,
    session: Option<(SinkConfig, FrameOrder)>,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    /// Sink writing `frame_00000.png`, `frame_00001.png`, ... into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: "frame_".to_string(),
            session: None,
            written: Vec::new(),
        }
    }

    /// Replace the file name prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Path a frame index is written to.
    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(format!("{}{:05}.png", self.prefix, idx.0))
    }

    /// Files written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> WaterdropResult<()> {
        cfg.validate()?;
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            WaterdropError::encode(format!(
                "failed to create output directory '{}': {e}",
                self.dir.display()
            ))
        })?;
        self.session = Some((cfg, FrameOrder::default()));
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> WaterdropResult<()> {
        let (cfg, order) = self
            .session
            .as_mut()
            .ok_or_else(|| WaterdropError::encode("png sink not started"))?;
        cfg.check_frame(frame)?;
        order.accept(idx)?;
        let path = self.frame_path(idx);
        save_png(frame, &path)?;
        tracing::trace!(path = %path.display(), "wrote frame");
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> WaterdropResult<()> {
        self.session = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
