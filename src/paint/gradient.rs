use crate::foundation::core::{Circle, Point};
use crate::foundation::error::{WaterdropError, WaterdropResult};
use crate::foundation::math::{lerp, unit_to_u8};
use crate::paint::color::Rgba;
use serde::{Deserialize, Serialize};

/// One gradient color stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Position along the gradient, `0..=1`.
    pub offset: f64,
    /// Color at `offset`.
    pub color: Rgba,
}

impl ColorStop {
    /// Build a stop.
    pub fn new(offset: f64, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Two-point conical gradient with canvas `createRadialGradient` semantics.
///
/// The gradient is the family of circles interpolated from `start` (t = 0) to `end` (t = 1); a
/// point takes the color of the largest `t` whose circle passes through it with a non-negative
/// radius. Outside `[0, 1]` the edge stops are padded. Colors interpolate in premultiplied space.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    /// Inner circle (t = 0).
    pub start: Circle,
    /// Outer circle (t = 1).
    pub end: Circle,
    /// Stops sorted by offset.
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    /// Gradient between two circles with no stops yet.
    pub fn new(start: Circle, end: Circle) -> Self {
        Self {
            start,
            end,
            stops: Vec::new(),
        }
    }

    /// Append a stop.
    pub fn add_stop(&mut self, offset: f64, color: Rgba) {
        self.stops.push(ColorStop::new(offset, color));
    }

    /// Builder form of [`RadialGradient::add_stop`].
    pub fn with_stop(mut self, offset: f64, color: Rgba) -> Self {
        self.add_stop(offset, color);
        self
    }

    /// Check radii and stop ordering.
    pub fn validate(&self) -> WaterdropResult<()> {
        if !(self.start.radius >= 0.0 && self.end.radius >= 0.0) {
            return Err(WaterdropError::validation(
                "gradient radii must be non-negative",
            ));
        }
        validate_stops(&self.stops)
    }

    /// Gradient parameter for `p`, or `None` where no circle of the family covers it.
    pub fn t_at(&self, p: Point) -> Option<f64> {
        let c0 = self.start.center;
        let r0 = self.start.radius;
        let cd = self.end.center - c0;
        let dr = self.end.radius - r0;
        let pd = p - c0;

        let a = cd.dot(cd) - dr * dr;
        let b = pd.dot(cd) + r0 * dr;
        let c = pd.dot(pd) - r0 * r0;
        let radius_ok = |t: f64| r0 + t * dr >= 0.0;

        if a.abs() < 1e-12 {
            if b.abs() < 1e-12 {
                return None;
            }
            let t = c / (2.0 * b);
            return radius_ok(t).then_some(t);
        }

        let disc = b * b - a * c;
        if disc < 0.0 {
            return None;
        }
        let sq = disc.sqrt();
        let t1 = (b + sq) / a;
        let t2 = (b - sq) / a;
        let (hi, lo) = if t1 >= t2 { (t1, t2) } else { (t2, t1) };
        if radius_ok(hi) {
            Some(hi)
        } else if radius_ok(lo) {
            Some(lo)
        } else {
            None
        }
    }

    /// Premultiplied color at gradient parameter `t` (padded outside `[0, 1]`).
    pub fn color_at(&self, t: f64) -> [f64; 4] {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return [0.0; 4];
        };
        let t = t.clamp(0.0, 1.0);
        if t <= first.offset {
            return first.color.premul_f64();
        }
        if t >= last.offset {
            return last.color.premul_f64();
        }

        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t < a.offset || t > b.offset {
                continue;
            }
            let span = b.offset - a.offset;
            if span <= 0.0 {
                return b.color.premul_f64();
            }
            let k = (t - a.offset) / span;
            let ca = a.color.premul_f64();
            let cb = b.color.premul_f64();
            return [
                lerp(ca[0], cb[0], k),
                lerp(ca[1], cb[1], k),
                lerp(ca[2], cb[2], k),
                lerp(ca[3], cb[3], k),
            ];
        }
        last.color.premul_f64()
    }

    /// Premultiplied color at `p`; transparent where the gradient is undefined.
    pub fn sample(&self, p: Point) -> [f64; 4] {
        match self.t_at(p) {
            Some(t) => self.color_at(t),
            None => [0.0; 4],
        }
    }

    /// Rasterize a `width x height` window whose top-left pixel sits at `origin`.
    ///
    /// Pixels are sampled at their centers; output is premultiplied RGBA8, row-major.
    pub fn rasterize(&self, origin: Point, width: u32, height: u32) -> Vec<u8> {
        let mut bytes = vec![0u8; (width as usize) * (height as usize) * 4];
        for y in 0..height {
            let py = origin.y + f64::from(y) + 0.5;
            for x in 0..width {
                let px = origin.x + f64::from(x) + 0.5;
                let c = self.sample(Point::new(px, py));
                let idx = ((y as usize) * (width as usize) + (x as usize)) * 4;
                bytes[idx] = unit_to_u8(c[0]);
                bytes[idx + 1] = unit_to_u8(c[1]);
                bytes[idx + 2] = unit_to_u8(c[2]);
                bytes[idx + 3] = unit_to_u8(c[3]);
            }
        }
        bytes
    }
}

/// Check that stops exist, sit in `[0, 1]` and never decrease.
pub fn validate_stops(stops: &[ColorStop]) -> WaterdropResult<()> {
    if stops.is_empty() {
        return Err(WaterdropError::validation(
            "gradient needs at least one color stop",
        ));
    }
    let mut prev = 0.0;
    for s in stops {
        if !(0.0..=1.0).contains(&s.offset) {
            return Err(WaterdropError::validation(format!(
                "color stop offset {} is outside 0..=1",
                s.offset
            )));
        }
        if s.offset < prev {
            return Err(WaterdropError::validation(
                "color stop offsets must be non-decreasing",
            ));
        }
        prev = s.offset;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/paint/gradient.rs"]
mod tests;
