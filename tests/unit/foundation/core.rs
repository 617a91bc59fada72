use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    let fps = Fps::new(30000, 1001).unwrap();
    assert!((fps.as_f64() - 29.97).abs() < 1e-2);
}

#[test]
fn fps_frame_duration_matches_rate() {
    let fps = Fps::new(50, 1).unwrap();
    assert_eq!(fps.frame_duration(), std::time::Duration::from_millis(20));
}

#[test]
fn canvas_center_and_limits() {
    let c = Canvas::new(400, 300).unwrap();
    assert_eq!(c.center(), Point::new(200.0, 150.0));
    assert_eq!(c.rgba8_len(), 400 * 300 * 4);
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
}

#[test]
fn premul_rounds_to_nearest() {
    let p = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(p.to_array(), [128, 64, 0, 128]);
}
