use kurbo::{BezPath, Circle, Line, Shape, StrokeOpts};

use crate::{
    foundation::{
        core::Canvas,
        error::{BoardError, BoardResult},
    },
    render::artifact::{DrawOp, LayerToggles, LayeredScene},
};

/// Rasterized pixels for one scene.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

#[derive(Clone, Debug)]
pub struct RasterSettings {
    /// Straight RGBA background; `None` leaves the frame transparent.
    pub clear_rgba: Option<[u8; 4]>,
    /// Flattening tolerance for circles and stroke outlines, in pixels.
    pub tolerance: f64,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            clear_rgba: Some([0, 0, 0, 255]),
            tolerance: 0.1,
        }
    }
}

/// CPU rasterizer for [`LayeredScene`]s, backed by `vello_cpu`.
pub struct CpuRasterizer {
    width: u16,
    height: u16,
    settings: RasterSettings,
}

impl CpuRasterizer {
    pub fn new(canvas: Canvas, settings: RasterSettings) -> BoardResult<Self> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| BoardError::render("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| BoardError::render("canvas height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(BoardError::render("canvas must be non-empty"));
        }
        Ok(Self {
            width,
            height,
            settings,
        })
    }

    pub fn rasterize(
        &mut self,
        scene: &LayeredScene,
        toggles: LayerToggles,
    ) -> BoardResult<FrameRGBA> {
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);

        if let Some([r, g, b, a]) = self.settings.clear_rgba {
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(self.width),
                f64::from(self.height),
            ));
        }

        for op in scene.ops(toggles) {
            let Some(path) = outline(op, self.settings.tolerance) else {
                continue;
            };
            let color = op_color(op);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                color.r, color.g, color.b, color.a,
            ));
            ctx.fill_path(&bezpath_to_cpu(&path));
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn op_color(op: &DrawOp) -> crate::foundation::core::Rgba8 {
    match *op {
        DrawOp::Line { color, .. } | DrawOp::Disc { color, .. } | DrawOp::Ring { color, .. } => {
            color
        }
    }
}

/// Fillable outline of a draw op; `None` for degenerate geometry.
fn outline(op: &DrawOp, tolerance: f64) -> Option<BezPath> {
    match *op {
        DrawOp::Line {
            from, to, width, ..
        } => {
            if width <= 0.0 || from == to {
                return None;
            }
            let style = kurbo::Stroke::new(width);
            Some(kurbo::stroke(
                Line::new(from, to).path_elements(tolerance),
                &style,
                &StrokeOpts::default(),
                tolerance,
            ))
        }
        DrawOp::Disc { center, radius, .. } => {
            if radius <= 0.0 {
                return None;
            }
            Some(Circle::new(center, radius).to_path(tolerance))
        }
        DrawOp::Ring {
            center,
            radius,
            width,
            ..
        } => {
            if radius <= 0.0 || width <= 0.0 {
                return None;
            }
            let style = kurbo::Stroke::new(width);
            Some(kurbo::stroke(
                Circle::new(center, radius).path_elements(tolerance),
                &style,
                &StrokeOpts::default(),
                tolerance,
            ))
        }
    }
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
