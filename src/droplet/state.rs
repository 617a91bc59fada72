use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{WaterdropError, WaterdropResult};
use serde::{Deserialize, Serialize};

/// Sign of the radius change applied each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PulseDirection {
    /// Radius increases by one pulse step per frame.
    #[default]
    Grow,
    /// Radius decreases by one pulse step per frame.
    Shrink,
}

impl PulseDirection {
    /// `+1.0` for [`PulseDirection::Grow`], `-1.0` for [`PulseDirection::Shrink`].
    pub fn sign(self) -> f64 {
        match self {
            Self::Grow => 1.0,
            Self::Shrink => -1.0,
        }
    }
}

/// Construction parameters for a [`WaterDrop`].
///
/// Defaults reproduce the classic effect: radius 30 pulsing between 20 and 40 by 0.15 per frame,
/// drifting vertically at 0.5 px per frame, opacity mapped onto `[0.6, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropParams {
    /// Initial center x. `None` centers the drop horizontally.
    pub x: Option<f64>,
    /// Initial center y. `None` centers the drop vertically.
    pub y: Option<f64>,
    /// Initial radius.
    pub radius: f64,
    /// Lower pulse bound.
    pub min_radius: f64,
    /// Upper pulse bound.
    pub max_radius: f64,
    /// Signed vertical velocity in px per frame (positive is down).
    pub speed_y: f64,
    /// Radius change per frame.
    pub pulse_step: f64,
    /// Initial pulse direction.
    pub pulse: PulseDirection,
    /// Initial opacity, used until the first update derives it from the radius.
    pub alpha: f64,
    /// Opacity at `min_radius`.
    pub min_alpha: f64,
    /// Opacity at `max_radius`.
    pub max_alpha: f64,
}

impl Default for DropParams {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            radius: 30.0,
            min_radius: 20.0,
            max_radius: 40.0,
            speed_y: 0.5,
            pulse_step: 0.15,
            pulse: PulseDirection::Grow,
            alpha: 0.8,
            min_alpha: 0.6,
            max_alpha: 1.0,
        }
    }
}

impl DropParams {
    /// Check the parameters against each other and against the surface they will move on.
    pub fn validate(&self, canvas: Canvas) -> WaterdropResult<()> {
        let finite = [
            self.radius,
            self.min_radius,
            self.max_radius,
            self.speed_y,
            self.pulse_step,
            self.alpha,
            self.min_alpha,
            self.max_alpha,
        ]
        .iter()
        .chain(self.x.iter())
        .chain(self.y.iter())
        .all(|v| v.is_finite());
        if !finite {
            return Err(WaterdropError::validation(
                "drop parameters must be finite numbers",
            ));
        }
        if self.min_radius <= 0.0 || self.min_radius >= self.max_radius {
            return Err(WaterdropError::validation(format!(
                "drop radius bounds must satisfy 0 < min_radius < max_radius (got {} and {})",
                self.min_radius, self.max_radius
            )));
        }
        if self.radius < self.min_radius || self.radius > self.max_radius {
            return Err(WaterdropError::validation(format!(
                "initial drop radius {} is outside [{}, {}]",
                self.radius, self.min_radius, self.max_radius
            )));
        }
        if self.pulse_step <= 0.0 {
            return Err(WaterdropError::validation("pulse_step must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.min_alpha)
            || !(0.0..=1.0).contains(&self.max_alpha)
            || self.min_alpha > self.max_alpha
        {
            return Err(WaterdropError::validation(
                "drop alpha range must satisfy 0 <= min_alpha <= max_alpha <= 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(WaterdropError::validation("initial drop alpha must be in 0..=1"));
        }
        if 2.0 * self.max_radius > f64::from(canvas.height) {
            return Err(WaterdropError::validation(format!(
                "drop diameter {} does not fit a {}px tall canvas",
                2.0 * self.max_radius,
                canvas.height
            )));
        }
        Ok(())
    }

    /// Opacity for `radius`, mapped linearly from the radius bounds onto the alpha range.
    ///
    /// The result stays between `min_alpha` and `max_alpha`, even for unvalidated params where
    /// the two are swapped.
    pub fn opacity_for_radius(&self, radius: f64) -> f64 {
        let span = self.max_radius - self.min_radius;
        let k = (radius - self.min_radius) / span;
        let alpha = self.min_alpha + (self.max_alpha - self.min_alpha) * k;
        let (lo, hi) = if self.min_alpha <= self.max_alpha {
            (self.min_alpha, self.max_alpha)
        } else {
            (self.max_alpha, self.min_alpha)
        };
        alpha.max(lo).min(hi)
    }
}

/// Free-function form of [`DropParams::opacity_for_radius`].
pub fn opacity_for_radius(radius: f64, params: &DropParams) -> f64 {
    params.opacity_for_radius(radius)
}

/// The animated drop: one circle drifting vertically while its radius pulses.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterDrop {
    /// Parameters the drop was built from (bounds, step sizes, alpha range).
    pub params: DropParams,
    /// Current center.
    pub center: Point,
    /// Current radius.
    pub radius: f64,
    /// Current signed vertical velocity.
    pub speed_y: f64,
    /// Current pulse direction.
    pub pulse: PulseDirection,
    /// Current opacity.
    pub alpha: f64,
}

impl WaterDrop {
    /// Validate `params` and place the drop on `canvas` (centered unless positioned explicitly).
    pub fn new(params: DropParams, canvas: Canvas) -> WaterdropResult<Self> {
        canvas.validate()?;
        params.validate(canvas)?;
        let center = canvas.center();
        Ok(Self {
            center: Point::new(params.x.unwrap_or(center.x), params.y.unwrap_or(center.y)),
            radius: params.radius,
            speed_y: params.speed_y,
            pulse: params.pulse,
            alpha: params.alpha,
            params,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/droplet/state.rs"]
mod tests;
