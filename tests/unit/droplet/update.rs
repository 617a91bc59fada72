use super::*;
use crate::droplet::state::DropParams;
use crate::foundation::core::Point;

fn square() -> Canvas {
    Canvas::new(400, 400).unwrap()
}

fn default_drop() -> WaterDrop {
    WaterDrop::new(DropParams::default(), square()).unwrap()
}

fn run(drop: &mut WaterDrop, canvas: Canvas, n: usize) -> Vec<StepReport> {
    (0..n).map(|_| drop.update(canvas)).collect()
}

#[test]
fn ten_updates_without_bounce_match_closed_form() {
    let mut d = default_drop();
    let reports = run(&mut d, square(), 10);
    assert!(reports.iter().all(|r| *r == StepReport::default()));

    assert_eq!(d.center, Point::new(200.0, 205.0));
    assert!((d.radius - 31.5).abs() < 1e-9, "radius={}", d.radius);
    assert!((d.alpha - (0.6 + 0.4 * (11.5 / 20.0))).abs() < 1e-9);
    assert!((d.alpha - 0.83).abs() < 1e-9);
    assert_eq!(d.speed_y, 0.5);
}

#[test]
fn pulse_flips_on_first_update_past_max_and_not_before() {
    let mut d = default_drop();
    let reports = run(&mut d, square(), 66);
    assert!(reports.iter().all(|r| r.pulse_flipped.is_none()));
    assert_eq!(d.pulse, PulseDirection::Grow);
    assert!((d.radius - 39.9).abs() < 1e-9);

    let r = d.update(square());
    assert_eq!(r.pulse_flipped, Some(PulseDirection::Shrink));
    assert_eq!(d.pulse, PulseDirection::Shrink);
    assert!((d.radius - 40.05).abs() < 1e-9);
}

#[test]
fn pulse_flips_back_on_first_update_below_min() {
    let mut d = default_drop();
    run(&mut d, square(), 67);
    assert_eq!(d.pulse, PulseDirection::Shrink);

    let reports = run(&mut d, square(), 133);
    assert!(reports.iter().all(|r| r.pulse_flipped.is_none()));
    assert!((d.radius - 20.1).abs() < 1e-9);

    let r = d.update(square());
    assert_eq!(r.pulse_flipped, Some(PulseDirection::Grow));
    assert!((d.radius - 19.95).abs() < 1e-9);
}

#[test]
fn full_pulse_cycle_returns_to_start_radius() {
    let mut d = default_drop();
    run(&mut d, square(), 268);
    assert!((d.radius - 30.0).abs() < 1e-9, "radius={}", d.radius);
    assert_eq!(d.pulse, PulseDirection::Grow);
}

#[test]
fn radius_and_alpha_stay_bounded_over_long_runs() {
    let canvas = Canvas::new(320, 200).unwrap();
    let mut d = WaterDrop::new(DropParams::default(), canvas).unwrap();
    let step = d.params.pulse_step;
    for _ in 0..10_000 {
        d.update(canvas);
        assert!(d.radius >= d.params.min_radius - step);
        assert!(d.radius <= d.params.max_radius + step);
        assert!((0.6..=1.0).contains(&d.alpha), "alpha={}", d.alpha);
        assert_eq!(d.alpha, d.params.opacity_for_radius(d.radius));
    }
}

#[test]
fn bottom_bounce_flips_once_while_overlapping_edge() {
    let canvas = Canvas::new(200, 100).unwrap();
    let params = DropParams {
        y: Some(69.9),
        ..DropParams::default()
    };
    let mut d = WaterDrop::new(params, canvas).unwrap();

    let reports = run(&mut d, canvas, 5);
    assert_eq!(reports[0].bounced, Some(Edge::Bottom));
    let bounces = reports.iter().filter(|r| r.bounced.is_some()).count();
    assert_eq!(bounces, 1);
    assert_eq!(d.speed_y, -0.5);
}

#[test]
fn top_bounce_reverses_upward_motion() {
    let canvas = Canvas::new(200, 100).unwrap();
    let params = DropParams {
        y: Some(30.1),
        speed_y: -0.5,
        ..DropParams::default()
    };
    let mut d = WaterDrop::new(params, canvas).unwrap();

    let r = d.update(canvas);
    assert_eq!(r.bounced, Some(Edge::Top));
    assert_eq!(d.speed_y, 0.5);
    assert!((d.center.y - 29.6).abs() < 1e-9);
}

#[test]
fn drop_oscillates_between_edges() {
    let canvas = Canvas::new(200, 100).unwrap();
    let mut d = WaterDrop::new(DropParams::default(), canvas).unwrap();
    let reports = run(&mut d, canvas, 2_000);
    let bottoms = reports
        .iter()
        .filter(|r| r.bounced == Some(Edge::Bottom))
        .count();
    let tops = reports
        .iter()
        .filter(|r| r.bounced == Some(Edge::Top))
        .count();
    assert!(bottoms > 0 && tops > 0);
    assert!(bottoms.abs_diff(tops) <= 1);
    assert_eq!(d.center.x, 100.0);
}
