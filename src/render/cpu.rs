use crate::foundation::core::{Canvas, Circle, Rect, Vec2};
use crate::foundation::error::{WaterdropError, WaterdropResult};
use crate::foundation::math::premul_over_in_place;
use crate::paint::color::Rgba;
use crate::paint::gradient::RadialGradient;
use crate::render::backend::{FrameRGBA, Paint, Surface};
use std::sync::Arc;
use vello_cpu::kurbo::Shape as _;

/// Curve flattening tolerance for circle outlines, in pixels.
const PATH_TOLERANCE: f64 = 0.1;

/// CPU raster surface powered by `vello_cpu`.
///
/// `vello_cpu` renders into a fresh buffer, so each fill is rendered into a scratch pixmap and
/// then composited premul-over onto the persistent target.
pub struct CpuSurface {
    canvas: Canvas,
    width: u16,
    height: u16,

    target: vello_cpu::Pixmap,
    scratch: Option<vello_cpu::Pixmap>,
    ctx: Option<vello_cpu::RenderContext>,
}

#[derive(Clone, Copy, Debug)]
enum Fill {
    Rect(Rect),
    Circle(Circle),
}

impl Fill {
    fn bounds(self) -> Rect {
        match self {
            Self::Rect(r) => r,
            Self::Circle(c) => Rect::new(
                c.center.x - c.radius,
                c.center.y - c.radius,
                c.center.x + c.radius,
                c.center.y + c.radius,
            ),
        }
    }

    /// Outline shifted by `-offset`, in `vello_cpu`'s geometry types.
    fn to_cpu_path(self, offset: Vec2) -> vello_cpu::kurbo::BezPath {
        match self {
            Self::Rect(r) => vello_cpu::kurbo::Rect::new(
                r.x0 - offset.x,
                r.y0 - offset.y,
                r.x1 - offset.x,
                r.y1 - offset.y,
            )
            .to_path(PATH_TOLERANCE),
            Self::Circle(c) => vello_cpu::kurbo::Circle::new(
                (c.center.x - offset.x, c.center.y - offset.y),
                c.radius,
            )
            .to_path(PATH_TOLERANCE),
        }
    }
}

impl CpuSurface {
    /// Create a transparent surface of size `canvas`.
    pub fn new(canvas: Canvas) -> WaterdropResult<Self> {
        canvas.validate()?;
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| WaterdropError::render("surface width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| WaterdropError::render("surface height exceeds u16"))?;
        Ok(Self {
            canvas,
            width,
            height,
            target: vello_cpu::Pixmap::new(width, height),
            scratch: None,
            ctx: None,
        })
    }

    /// Overwrite every pixel with `color` (no blending).
    pub fn clear(&mut self, color: Rgba) {
        let px = color.to_rgba8_premul().to_array();
        for d in self.target.data_as_u8_slice_mut().chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
    }

    fn fill(&mut self, shape: Fill, paint: &Paint) -> WaterdropResult<()> {
        match paint {
            Paint::Solid(c) => {
                if c.a <= 0.0 {
                    return Ok(());
                }
                let [r, g, b, a] = c.to_rgba8();
                let path = shape.to_cpu_path(Vec2::ZERO);
                self.composite(|ctx| {
                    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
                    ctx.fill_path(&path);
                })
            }
            Paint::Radial(gradient) => {
                let Some((origin, w, h)) = self.pixel_window(shape.bounds()) else {
                    return Ok(());
                };
                let img = gradient_image(gradient, origin, w, h)?;
                let path = shape.to_cpu_path(origin);
                self.composite(|ctx| {
                    ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
                    ctx.set_paint(img);
                    ctx.fill_path(&path);
                })
            }
        }
    }

    /// Integer pixel window covering `bounds`, clipped to the surface.
    fn pixel_window(&self, bounds: Rect) -> Option<(Vec2, u32, u32)> {
        let x0 = bounds.x0.floor().max(0.0);
        let y0 = bounds.y0.floor().max(0.0);
        let x1 = bounds.x1.ceil().min(f64::from(self.canvas.width));
        let y1 = bounds.y1.ceil().min(f64::from(self.canvas.height));
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((Vec2::new(x0, y0), (x1 - x0) as u32, (y1 - y0) as u32))
    }

    fn composite(&mut self, f: impl FnOnce(&mut vello_cpu::RenderContext)) -> WaterdropResult<()> {
        let (width, height) = (self.width, self.height);
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        f(&mut ctx);
        ctx.flush();

        let mut tmp = self
            .scratch
            .take()
            .unwrap_or_else(|| vello_cpu::Pixmap::new(width, height));
        tmp.data_as_u8_slice_mut().fill(0);
        ctx.render_to_pixmap(&mut tmp);

        let ok = premul_over_in_place(self.target.data_as_u8_slice_mut(), tmp.data_as_u8_slice());
        self.scratch = Some(tmp);
        self.ctx = Some(ctx);
        if !ok {
            return Err(WaterdropError::render("scratch and target pixmaps differ in size"));
        }
        Ok(())
    }
}

impl Surface for CpuSurface {
    fn size(&self) -> Canvas {
        self.canvas
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> WaterdropResult<()> {
        self.fill(Fill::Rect(rect), paint)
    }

    fn fill_circle(&mut self, circle: Circle, paint: &Paint) -> WaterdropResult<()> {
        if circle.radius <= 0.0 {
            return Ok(());
        }
        self.fill(Fill::Circle(circle), paint)
    }

    fn snapshot(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.target.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

fn gradient_image(
    gradient: &RadialGradient,
    origin: Vec2,
    width: u32,
    height: u32,
) -> WaterdropResult<vello_cpu::Image> {
    let bytes = gradient.rasterize(origin.to_point(), width, height);
    let pixmap = pixmap_from_premul_bytes(&bytes, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> WaterdropResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| WaterdropError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| WaterdropError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(WaterdropError::render("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; gradient bytes are already premultiplied.
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
