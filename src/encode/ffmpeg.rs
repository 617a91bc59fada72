use crate::encode::sink::{FrameOrder, FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{WaterdropError, WaterdropResult};
use crate::foundation::math::premul_over_in_place;
use crate::paint::color::Rgba;
use crate::render::backend::FrameRGBA;
use std::ffi::OsString;
use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

/// Where and how [`FfmpegSink`] writes its MP4.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Replace an existing file at `out_path`.
    pub overwrite: bool,
    /// Color behind the drop. Video has no alpha, so every frame is flattened onto it.
    pub background: Rgba,
}

impl FfmpegSinkOpts {
    /// Overwriting output to `out_path` on a white background.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            background: Rgba::new(1.0, 1.0, 1.0, 1.0),
        }
    }
}

/// Sink that encodes frames to H.264 MP4 through the system `ffmpeg`.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    session: Option<Session>,
}

struct Session {
    cfg: SinkConfig,
    order: FrameOrder,
    encoder: Encoder,
    backdrop: Vec<u8>,
    scratch: Vec<u8>,
}

impl FfmpegSink {
    /// Sink writing to `opts.out_path` once a run begins.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            session: None,
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> WaterdropResult<()> {
        let canvas = cfg.validate()?;
        if !canvas.width.is_multiple_of(2) || !canvas.height.is_multiple_of(2) {
            return Err(WaterdropError::validation(format!(
                "mp4 output needs even dimensions, got {}x{}",
                canvas.width, canvas.height
            )));
        }
        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(WaterdropError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(WaterdropError::encode("ffmpeg was not found on PATH"));
        }

        let encoder = Encoder::spawn(encoder_args(&self.opts, &cfg))?;
        tracing::debug!(out = %self.opts.out_path.display(), "ffmpeg started");
        self.session = Some(Session {
            backdrop: opaque_backdrop(self.opts.background, canvas.rgba8_len()),
            scratch: vec![0; canvas.rgba8_len()],
            cfg,
            order: FrameOrder::default(),
            encoder,
        });
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> WaterdropResult<()> {
        let s = self
            .session
            .as_mut()
            .ok_or_else(|| WaterdropError::encode("ffmpeg sink not started"))?;
        s.cfg.check_frame(frame)?;
        s.order.accept(idx)?;

        s.scratch.copy_from_slice(&s.backdrop);
        if !premul_over_in_place(&mut s.scratch, &frame.data) {
            return Err(WaterdropError::encode("frame does not match the video buffer"));
        }
        s.encoder.write(&s.scratch)
    }

    fn end(&mut self) -> WaterdropResult<()> {
        let s = self
            .session
            .take()
            .ok_or_else(|| WaterdropError::encode("ffmpeg sink not started"))?;
        s.encoder.finish()
    }
}

/// A running `ffmpeg` process fed through stdin, with stderr collected on a side thread.
struct Encoder {
    child: Child,
    stdin: Option<ChildStdin>,
    stderr: JoinHandle<std::io::Result<Vec<u8>>>,
}

impl Encoder {
    fn spawn(args: Vec<OsString>) -> WaterdropResult<Self> {
        let mut child = Command::new("ffmpeg")
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| WaterdropError::encode(format!("failed to spawn ffmpeg: {e}")))?;

        let (Some(stdin), Some(mut err)) = (child.stdin.take(), child.stderr.take()) else {
            let _ = child.kill();
            return Err(WaterdropError::encode("ffmpeg pipes were not opened"));
        };
        let stderr = std::thread::spawn(move || {
            let mut buf = Vec::new();
            err.read_to_end(&mut buf)?;
            Ok(buf)
        });
        Ok(Self {
            child,
            stdin: Some(stdin),
            stderr,
        })
    }

    fn write(&mut self, rgba: &[u8]) -> WaterdropResult<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| WaterdropError::encode("ffmpeg stdin is closed"))?;
        stdin
            .write_all(rgba)
            .map_err(|e| WaterdropError::encode(format!("ffmpeg stopped accepting frames: {e}")))
    }

    /// Close stdin and wait for the file to be finalized.
    fn finish(mut self) -> WaterdropResult<()> {
        drop(self.stdin.take());
        let status = self
            .child
            .wait()
            .map_err(|e| WaterdropError::encode(format!("waiting for ffmpeg: {e}")))?;
        let log = self
            .stderr
            .join()
            .map_err(|_| WaterdropError::encode("ffmpeg stderr reader panicked"))?
            .map_err(|e| WaterdropError::encode(format!("reading ffmpeg stderr: {e}")))?;
        if !status.success() {
            return Err(WaterdropError::encode(format!(
                "ffmpeg failed ({status}): {}",
                String::from_utf8_lossy(&log).trim()
            )));
        }
        Ok(())
    }
}

/// Command line for raw RGBA frames on stdin, encoded as yuv420p H.264 without audio.
pub(crate) fn encoder_args(opts: &FfmpegSinkOpts, cfg: &SinkConfig) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        if opts.overwrite { "-y" } else { "-n" },
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.push("-s".into());
    args.push(format!("{}x{}", cfg.width, cfg.height).into());
    args.push("-r".into());
    args.push(format!("{}/{}", cfg.fps.num, cfg.fps.den).into());
    args.extend(
        [
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]
        .into_iter()
        .map(OsString::from),
    );
    args.push(opts.out_path.clone().into_os_string());
    args
}

/// `len` bytes of `background` forced opaque, in premultiplied RGBA8.
pub(crate) fn opaque_backdrop(background: Rgba, len: usize) -> Vec<u8> {
    let px = background.with_alpha(1.0).to_rgba8_premul().to_array();
    px.iter().copied().cycle().take(len).collect()
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> WaterdropResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
