use super::*;
use crate::foundation::core::Fps;

fn tmp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("waterdrop-png-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn half_red() -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 1,
        data: vec![128, 0, 0, 128, 0, 0, 0, 0],
        premultiplied: true,
    }
}

#[test]
fn save_png_writes_straight_alpha() {
    let dir = tmp_dir("single");
    let path = dir.join("nested").join("f.png");
    save_png(&half_red(), &path).unwrap();

    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 1));
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 128]);
    assert_eq!(img.get_pixel(1, 0).0[3], 0);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn save_png_rejects_short_buffer() {
    let dir = tmp_dir("short");
    let mut f = half_red();
    f.data.truncate(4);
    assert!(save_png(&f, &dir.join("bad.png")).is_err());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn sequence_sink_names_frames_by_index() {
    let dir = tmp_dir("seq");
    let mut sink = PngSequenceSink::new(&dir).with_prefix("drop_");
    sink.begin(SinkConfig {
        width: 2,
        height: 1,
        fps: Fps::new(30, 1).unwrap(),
    })
    .unwrap();
    sink.push_frame(FrameIndex(0), &half_red()).unwrap();
    sink.push_frame(FrameIndex(12), &half_red()).unwrap();
    sink.end().unwrap();

    assert_eq!(
        sink.written(),
        &[dir.join("drop_00000.png"), dir.join("drop_00012.png")]
    );
    assert!(dir.join("drop_00012.png").is_file());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn sequence_sink_rejects_frames_before_begin_and_wrong_sizes() {
    let dir = tmp_dir("guard");
    let mut sink = PngSequenceSink::new(&dir);
    assert!(sink.push_frame(FrameIndex(0), &half_red()).is_err());

    sink.begin(SinkConfig {
        width: 4,
        height: 4,
        fps: Fps::default(),
    })
    .unwrap();
    assert!(sink.push_frame(FrameIndex(0), &half_red()).is_err());
    let _ = std::fs::remove_dir_all(&dir);
}
