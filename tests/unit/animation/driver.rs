use super::*;
use crate::animation::scheduler::FrameBudget;
use crate::droplet::state::DropParams;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::{Canvas, Circle, Point, Rect};
use crate::render::backend::Paint;
use crate::render::cpu::CpuSurface;
use crate::render::draw::StopStyle;

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Rect(Rect),
    Circle(Circle),
}

struct Recorder {
    canvas: Canvas,
    ops: Vec<(Op, Paint)>,
}

impl Surface for Recorder {
    fn size(&self) -> Canvas {
        self.canvas
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> WaterdropResult<()> {
        self.ops.push((Op::Rect(rect), paint.clone()));
        Ok(())
    }

    fn fill_circle(&mut self, circle: Circle, paint: &Paint) -> WaterdropResult<()> {
        self.ops.push((Op::Circle(circle), paint.clone()));
        Ok(())
    }

    fn snapshot(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: vec![0; self.canvas.rgba8_len()],
            premultiplied: true,
        }
    }
}

fn cpu_animation(w: u32, h: u32) -> Animation<CpuSurface> {
    let canvas = Canvas::new(w, h).unwrap();
    let drop = WaterDrop::new(DropParams::default(), canvas).unwrap();
    let surface = CpuSurface::new(canvas).unwrap();
    Animation::new(drop, surface, AnimationSettings::default()).unwrap()
}

#[test]
fn tick_fades_then_draws_updated_drop() {
    let canvas = Canvas::default();
    let drop = WaterDrop::new(DropParams::default(), canvas).unwrap();
    let rec = Recorder {
        canvas,
        ops: Vec::new(),
    };
    let mut anim = Animation::new(drop, rec, AnimationSettings::default()).unwrap();
    anim.tick().unwrap();

    let ops = &anim.surface().ops;
    assert_eq!(ops.len(), 3);
    assert_eq!(
        ops[0],
        (Op::Rect(canvas.rect()), Paint::Solid(DEFAULT_TRAIL))
    );
    // The body is drawn after the update moved the drop by one step.
    assert_eq!(
        ops[1].0,
        Op::Circle(Circle::new(Point::new(200.0, 200.5), 30.15))
    );
    assert!(matches!(ops[1].1, Paint::Radial(_)));
    assert!(matches!(ops[2].1, Paint::Solid(_)));
    assert_eq!(anim.next_frame_index(), FrameIndex(1));
}

#[test]
fn run_pushes_every_granted_frame() {
    let mut anim = cpu_animation(100, 100);
    let mut sink = InMemorySink::new();
    let stats = anim.run(&mut FrameBudget::new(5), &mut sink).unwrap();

    assert_eq!(stats.frames, 5);
    assert!(sink.is_ended());
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (100, 100));
    assert_eq!(cfg.fps, Fps::default());
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1, 2, 3, 4]);
}

#[test]
fn advance_to_matches_update_count() {
    let mut anim = cpu_animation(100, 100);
    let frame = anim.advance_to(FrameIndex(9)).unwrap();
    assert_eq!((frame.width, frame.height), (100, 100));
    let d = anim.water_drop();
    assert_eq!(d.center, Point::new(50.0, 55.0));
    assert!((d.radius - 31.5).abs() < 1e-9);
    assert!((d.alpha - 0.83).abs() < 1e-9);

    // Asking again for a rendered frame does not tick.
    anim.advance_to(FrameIndex(3)).unwrap();
    assert_eq!(anim.next_frame_index(), FrameIndex(10));
}

#[test]
fn trail_builds_up_away_from_the_drop() {
    let mut anim = cpu_animation(120, 100);
    let frame = anim.advance_to(FrameIndex(29)).unwrap();

    let corner = frame.pixel(1, 1).unwrap();
    assert!(corner[3] > 150, "{corner:?}");
    assert!(corner[2] >= corner[0], "{corner:?}");

    let body = frame.pixel(75, 65).unwrap();
    assert!(body[2] > body[0], "{body:?}");
}

#[test]
fn counts_bounces_and_flips() {
    let mut anim = cpu_animation(100, 80);
    let stats = anim
        .run(&mut FrameBudget::new(200), &mut InMemorySink::new())
        .unwrap();
    assert!(stats.bounces >= 1);
    assert_eq!(stats.pulse_flips, 1);
}

#[test]
fn new_rejects_broken_style() {
    let canvas = Canvas::new(100, 100).unwrap();
    let drop = WaterDrop::new(DropParams::default(), canvas).unwrap();
    let mut settings = AnimationSettings::default();
    settings.style.stops = vec![StopStyle::fixed(2.0, Rgba::new(1.0, 1.0, 1.0, 1.0))];
    assert!(Animation::new(drop, CpuSurface::new(canvas).unwrap(), settings).is_err());
}

#[test]
fn new_rejects_drop_too_tall_for_surface() {
    let drop = WaterDrop::new(DropParams::default(), Canvas::default()).unwrap();
    let small = CpuSurface::new(Canvas::new(100, 60).unwrap()).unwrap();
    assert!(Animation::new(drop, small, AnimationSettings::default()).is_err());
}
