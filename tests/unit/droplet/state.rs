use super::*;

fn canvas() -> Canvas {
    Canvas::new(400, 300).unwrap()
}

#[test]
fn new_drop_starts_centered_with_initial_values() {
    let d = WaterDrop::new(DropParams::default(), canvas()).unwrap();
    assert_eq!(d.center, Point::new(200.0, 150.0));
    assert_eq!(d.radius, 30.0);
    assert_eq!(d.speed_y, 0.5);
    assert_eq!(d.pulse, PulseDirection::Grow);
    assert_eq!(d.alpha, 0.8);
}

#[test]
fn explicit_position_overrides_center() {
    let params = DropParams {
        x: Some(10.0),
        y: Some(50.0),
        ..DropParams::default()
    };
    let d = WaterDrop::new(params, canvas()).unwrap();
    assert_eq!(d.center, Point::new(10.0, 50.0));
}

#[test]
fn opacity_maps_radius_bounds_onto_alpha_range() {
    let p = DropParams::default();
    assert!((p.opacity_for_radius(20.0) - 0.6).abs() < 1e-12);
    assert!((p.opacity_for_radius(30.0) - 0.8).abs() < 1e-12);
    assert!((p.opacity_for_radius(40.0) - 1.0).abs() < 1e-12);
    // One step past a bound stays clamped.
    assert_eq!(p.opacity_for_radius(40.05), 1.0);
    assert_eq!(opacity_for_radius(19.95, &p), 0.6);
}

#[test]
fn validation_rejects_bad_bounds() {
    let c = canvas();
    let bad = [
        DropParams {
            min_radius: 40.0,
            max_radius: 20.0,
            ..DropParams::default()
        },
        DropParams {
            min_radius: 0.0,
            ..DropParams::default()
        },
        DropParams {
            radius: 50.0,
            ..DropParams::default()
        },
        DropParams {
            pulse_step: 0.0,
            ..DropParams::default()
        },
        DropParams {
            min_alpha: 0.9,
            max_alpha: 0.5,
            ..DropParams::default()
        },
        DropParams {
            speed_y: f64::NAN,
            ..DropParams::default()
        },
    ];
    for p in bad {
        assert!(p.validate(c).is_err(), "{p:?}");
    }
}

#[test]
fn validation_rejects_drop_taller_than_canvas() {
    let c = Canvas::new(400, 60).unwrap();
    assert!(DropParams::default().validate(c).is_err());
}

#[test]
fn pulse_sign() {
    assert_eq!(PulseDirection::Grow.sign(), 1.0);
    assert_eq!(PulseDirection::Shrink.sign(), -1.0);
}

#[test]
fn opacity_with_swapped_alpha_bounds_stays_in_range() {
    let params = DropParams {
        min_alpha: 1.0,
        max_alpha: 0.6,
        ..DropParams::default()
    };
    let below = params.opacity_for_radius(0.0);
    let above = params.opacity_for_radius(100.0);
    assert_eq!(below, 1.0);
    assert_eq!(above, 0.6);
    assert_eq!(opacity_for_radius(35.0, &params), params.opacity_for_radius(35.0));
}
