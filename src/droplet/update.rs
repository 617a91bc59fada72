use crate::droplet::state::{PulseDirection, WaterDrop};
use crate::foundation::core::Canvas;

/// Surface edge a drop bounced off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// `y - radius` went below 0.
    Top,
    /// `y + radius` went past the surface height.
    Bottom,
}

/// What changed direction during one [`WaterDrop::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// Edge the drop bounced off, if any.
    pub bounced: Option<Edge>,
    /// New pulse direction, if the pulse flipped.
    pub pulse_flipped: Option<PulseDirection>,
}

impl WaterDrop {
    /// Advance the drop by one frame on a surface of size `canvas`.
    ///
    /// Order: move, bounce, pulse, derive opacity. A bounce only fires while the drop is still
    /// heading into the edge it crossed, so overlapping an edge for several frames flips the
    /// velocity once.
    pub fn update(&mut self, canvas: Canvas) -> StepReport {
        let mut report = StepReport::default();

        self.center.y += self.speed_y;

        let height = f64::from(canvas.height);
        if self.center.y + self.radius > height && self.speed_y > 0.0 {
            self.speed_y = -self.speed_y;
            report.bounced = Some(Edge::Bottom);
        } else if self.center.y - self.radius < 0.0 && self.speed_y < 0.0 {
            self.speed_y = -self.speed_y;
            report.bounced = Some(Edge::Top);
        }

        self.radius += self.pulse.sign() * self.params.pulse_step;
        if self.radius > self.params.max_radius {
            if self.pulse != PulseDirection::Shrink {
                report.pulse_flipped = Some(PulseDirection::Shrink);
            }
            self.pulse = PulseDirection::Shrink;
        } else if self.radius < self.params.min_radius {
            if self.pulse != PulseDirection::Grow {
                report.pulse_flipped = Some(PulseDirection::Grow);
            }
            self.pulse = PulseDirection::Grow;
        }

        self.alpha = self.params.opacity_for_radius(self.radius);

        if let Some(edge) = report.bounced {
            tracing::debug!(?edge, y = self.center.y, speed_y = self.speed_y, "drop bounced");
        }
        if let Some(dir) = report.pulse_flipped {
            tracing::debug!(?dir, radius = self.radius, "pulse flipped");
        }
        report
    }
}

#[cfg(test)]
#[path = "../../tests/unit/droplet/update.rs"]
mod tests;
