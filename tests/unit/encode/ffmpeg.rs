use super::*;
use crate::foundation::core::Fps;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::default(),
    }
}

fn flatten(frame: &[u8], background: Rgba) -> Vec<u8> {
    let mut out = opaque_backdrop(background, frame.len());
    assert!(premul_over_in_place(&mut out, frame));
    out
}

#[test]
fn transparent_pixels_show_the_background() {
    let bg = Rgba::from_css(10, 20, 30, 1.0);
    assert_eq!(flatten(&[0, 0, 0, 0], bg), vec![10, 20, 30, 255]);
}

#[test]
fn opaque_pixels_pass_through() {
    let bg = Rgba::from_css(10, 20, 30, 1.0);
    assert_eq!(flatten(&[1, 2, 3, 255], bg), vec![1, 2, 3, 255]);
}

#[test]
fn half_covered_pixel_mixes_with_white() {
    let white = FfmpegSinkOpts::new("x.mp4").background;
    assert_eq!(flatten(&[0, 0, 128, 128], white), vec![127, 127, 255, 255]);
}

#[test]
fn translucent_background_is_forced_opaque() {
    let backdrop = opaque_backdrop(Rgba::from_css(200, 0, 0, 0.25), 8);
    assert_eq!(backdrop, vec![200, 0, 0, 255, 200, 0, 0, 255]);
}

#[test]
fn encoder_args_describe_the_raw_input() {
    let mut opts = FfmpegSinkOpts::new("out/drop.mp4");
    opts.overwrite = false;
    let sink_cfg = SinkConfig {
        fps: Fps::new(30000, 1001).unwrap(),
        ..cfg(400, 300)
    };
    let args: Vec<String> = encoder_args(&opts, &sink_cfg)
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();

    assert_eq!(args[0], "-n");
    let after = |flag: &str| {
        let i = args.iter().position(|a| a == flag).unwrap();
        args[i + 1].clone()
    };
    assert_eq!(after("-s"), "400x300");
    assert_eq!(after("-r"), "30000/1001");
    assert_eq!(after("-c:v"), "libx264");
    assert_eq!(args.last().map(String::as_str), Some("out/drop.mp4"));
}

#[test]
fn begin_rejects_odd_and_empty_frames() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    let odd = sink.begin(cfg(401, 400)).unwrap_err();
    assert!(odd.to_string().contains("even"), "{odd}");
    assert!(sink.begin(cfg(0, 400)).is_err());
}

#[test]
fn refuses_to_overwrite_existing_output() {
    let dir = std::env::temp_dir().join(format!("waterdrop-ffmpeg-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let out = dir.join("exists.mp4");
    std::fs::write(&out, b"x").unwrap();

    let mut opts = FfmpegSinkOpts::new(&out);
    opts.overwrite = false;
    let mut sink = FfmpegSink::new(opts);
    let err = sink.begin(cfg(2, 2)).unwrap_err();
    assert!(err.to_string().contains("already exists"), "{err}");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn push_and_end_before_begin_fail() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    };
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}
