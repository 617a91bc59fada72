use crate::droplet::state::WaterDrop;
use crate::foundation::core::{Circle, Point};
use crate::foundation::error::{WaterdropError, WaterdropResult};
use crate::paint::color::Rgba;
use crate::paint::gradient::{ColorStop, RadialGradient, validate_stops};
use crate::render::backend::{Paint, Surface};
use serde::{Deserialize, Serialize};

/// Default trail fill: light lavender at 10% opacity.
pub const DEFAULT_TRAIL: Rgba = Rgba::new(224.0 / 255.0, 224.0 / 255.0, 1.0, 0.1);

/// One body gradient stop.
///
/// With `alpha_from_drop` set, the stop's alpha becomes `drop.alpha * alpha_from_drop` and
/// `color.a` is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopStyle {
    /// Position along the gradient, `0..=1`.
    pub offset: f64,
    /// Stop color.
    pub color: Rgba,
    /// Multiplier of the drop opacity used as the stop alpha.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha_from_drop: Option<f64>,
}

impl StopStyle {
    /// Stop with a fixed color.
    pub fn fixed(offset: f64, color: Rgba) -> Self {
        Self {
            offset,
            color,
            alpha_from_drop: None,
        }
    }

    /// Stop whose alpha follows the drop opacity.
    pub fn following(offset: f64, color: Rgba, k: f64) -> Self {
        Self {
            offset,
            color,
            alpha_from_drop: Some(k),
        }
    }

    fn resolve(&self, drop_alpha: f64) -> ColorStop {
        let color = match self.alpha_from_drop {
            Some(k) => self.color.with_alpha(drop_alpha * k),
            None => self.color,
        };
        ColorStop::new(self.offset, color)
    }
}

/// Look of the drop. All geometry is expressed in multiples of the current radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropStyle {
    /// Offset of the inner gradient circle toward the upper-left.
    pub inner_offset: f64,
    /// Radius of the inner gradient circle.
    pub inner_radius: f64,
    /// Body gradient stops.
    pub stops: Vec<StopStyle>,
    /// Offset of the highlight dot toward the upper-left.
    pub highlight_offset: f64,
    /// Radius of the highlight dot.
    pub highlight_radius: f64,
    /// Highlight color; its alpha is replaced by `highlight_alpha * drop.alpha`.
    pub highlight_color: Rgba,
    /// Multiplier of the drop opacity used for the highlight.
    pub highlight_alpha: f64,
}

impl Default for DropStyle {
    fn default() -> Self {
        Self {
            inner_offset: 0.3,
            inner_radius: 0.1,
            stops: vec![
                StopStyle::fixed(0.0, Rgba::from_css(255, 255, 255, 0.6)),
                StopStyle::fixed(0.3, Rgba::from_css(100, 150, 255, 0.0)),
                StopStyle::following(0.8, Rgba::from_css(50, 100, 200, 1.0), 1.0),
                StopStyle::following(1.0, Rgba::from_css(50, 100, 200, 1.0), 0.5),
            ],
            highlight_offset: 0.5,
            highlight_radius: 0.1,
            highlight_color: Rgba::from_css(255, 255, 255, 1.0),
            highlight_alpha: 0.9,
        }
    }
}

impl DropStyle {
    /// Check stop layout and geometry factors.
    pub fn validate(&self) -> WaterdropResult<()> {
        let factors = [
            ("inner_offset", self.inner_offset),
            ("inner_radius", self.inner_radius),
            ("highlight_offset", self.highlight_offset),
            ("highlight_radius", self.highlight_radius),
            ("highlight_alpha", self.highlight_alpha),
        ];
        for (name, v) in factors {
            if !v.is_finite() || v < 0.0 {
                return Err(WaterdropError::validation(format!(
                    "style.{name} must be finite and >= 0"
                )));
            }
        }
        let stops = self
            .stops
            .iter()
            .map(|s| s.resolve(1.0))
            .collect::<Vec<_>>();
        validate_stops(&stops)
    }

    /// Highlight dot geometry for `drop`.
    pub fn highlight_circle(&self, drop: &WaterDrop) -> Circle {
        let r = drop.radius;
        let off = self.highlight_offset * r;
        Circle::new(
            Point::new(drop.center.x - off, drop.center.y - off),
            self.highlight_radius * r,
        )
    }

    /// Highlight color for `drop`.
    pub fn highlight_paint(&self, drop: &WaterDrop) -> Rgba {
        self.highlight_color.with_alpha(self.highlight_alpha * drop.alpha)
    }
}

/// Body gradient for the current drop state.
pub fn drop_gradient(drop: &WaterDrop, style: &DropStyle) -> RadialGradient {
    let r = drop.radius;
    let off = style.inner_offset * r;
    let inner = Circle::new(
        Point::new(drop.center.x - off, drop.center.y - off),
        style.inner_radius * r,
    );
    let outer = Circle::new(drop.center, r);

    let mut gradient = RadialGradient::new(inner, outer);
    gradient.stops = style.stops.iter().map(|s| s.resolve(drop.alpha)).collect();
    gradient
}

/// Paint `drop` onto `surface`: gradient body first, then the highlight dot.
///
/// The drop is only read.
pub fn draw_drop(
    surface: &mut dyn Surface,
    drop: &WaterDrop,
    style: &DropStyle,
) -> WaterdropResult<()> {
    let body = Circle::new(drop.center, drop.radius);
    surface.fill_circle(body, &Paint::Radial(drop_gradient(drop, style)))?;
    surface.fill_circle(
        style.highlight_circle(drop),
        &Paint::Solid(style.highlight_paint(drop)),
    )
}

/// Cover the whole surface with `trail`, fading what previous frames left behind.
pub fn fade_trail(surface: &mut dyn Surface, trail: Rgba) -> WaterdropResult<()> {
    let rect = surface.size().rect();
    surface.fill_rect(rect, &Paint::Solid(trail))
}

#[cfg(test)]
#[path = "../../tests/unit/render/draw.rs"]
mod tests;
