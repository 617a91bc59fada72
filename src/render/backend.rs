use crate::foundation::core::{Canvas, Circle, Rect};
use crate::foundation::error::WaterdropResult;
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::paint::color::Rgba;
use crate::paint::gradient::RadialGradient;

/// A rendered frame as RGBA8 pixels.
///
/// Frames read back from a [`Surface`] are **premultiplied alpha**; the `premultiplied` flag makes
/// this explicit at API boundaries.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA8 of the pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Pixel data converted to straight alpha, the layout image files expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut out);
        }
        out
    }
}

/// How a shape is filled.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    /// Flat straight-alpha color.
    Solid(Rgba),
    /// Two-point radial gradient in surface coordinates.
    Radial(RadialGradient),
}

impl From<Rgba> for Paint {
    fn from(c: Rgba) -> Self {
        Self::Solid(c)
    }
}

impl From<RadialGradient> for Paint {
    fn from(g: RadialGradient) -> Self {
        Self::Radial(g)
    }
}

/// A fixed-size 2D drawing surface that keeps its pixels between frames.
///
/// Every fill composites source-over onto what is already there, like a canvas 2D context.
pub trait Surface {
    /// Surface size, fixed for the lifetime of the surface.
    fn size(&self) -> Canvas;

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> WaterdropResult<()>;

    /// Fill a full circle.
    fn fill_circle(&mut self, circle: Circle, paint: &Paint) -> WaterdropResult<()>;

    /// Read back the current pixels.
    fn snapshot(&self) -> FrameRGBA;
}
