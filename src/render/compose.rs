use crate::{
    config::BoardConfig,
    epicycle::{
        rig::{EpicycleRig, RigFrame, reconstruct_trail},
        sequencer::EpicycleChain,
    },
    foundation::{
        core::{Canvas, FrameIndex, Point, Rgba8},
        error::{BoardError, BoardResult},
    },
    render::artifact::{DrawOp, FrameArtifact, LayeredScene},
    spectrum::{component::SpectrumPair, dft::transform},
    stroke::points::Stroke,
};

/// Colors and sizes used when composing frames.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameStyle {
    pub path: Rgba8,
    pub phasor: Rgba8,
    pub guide: Rgba8,
    pub x_marker: Rgba8,
    pub y_marker: Rgba8,
    pub stroke_dot: Rgba8,
    pub trail_dot: Rgba8,
    pub line_width: f64,
    pub marker_radius: f64,
    pub stroke_dot_radius: f64,
    pub trail_dot_radius: f64,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            path: Rgba8::new(64, 64, 64, 64),
            phasor: Rgba8::new(150, 150, 150, 255),
            guide: Rgba8::WHITE,
            x_marker: Rgba8::new(255, 0, 0, 100),
            y_marker: Rgba8::new(0, 255, 0, 100),
            stroke_dot: Rgba8::new(192, 192, 192, 255),
            trail_dot: Rgba8::WHITE,
            line_width: 1.0,
            marker_radius: 6.0,
            stroke_dot_radius: 3.0,
            trail_dot_radius: 4.0,
        }
    }
}

/// Everything needed to compose any frame of one stroke's animation.
///
/// Built once per computed stroke and shared read-only by every worker.
#[derive(Clone, Debug)]
pub struct FrameSource {
    pub spectra: SpectrumPair,
    pub rig: EpicycleRig,
    /// Reconstructed point for every frame index.
    pub trail: Vec<Point>,
    pub canvas: Canvas,
    pub style: FrameStyle,
    /// Stroke revision the spectra were computed from.
    pub revision: u64,
}

impl FrameSource {
    /// Center the stroke on the canvas origin, transform both axes (magnitude-sorted) and
    /// reconstruct the trailing path.
    #[tracing::instrument(skip_all, fields(points = stroke.len(), revision = stroke.revision()))]
    pub fn from_stroke(stroke: &Stroke, config: &BoardConfig, style: FrameStyle) -> Self {
        let canvas = config.canvas;
        let (xs, ys) = stroke.centered_samples(canvas.half_extent());
        let spectra = SpectrumPair {
            x: transform(&xs, true),
            y: transform(&ys, true),
        };
        let rig = EpicycleRig::for_canvas(canvas, config.x_rig_offset, config.y_rig_offset);
        let trail = reconstruct_trail(&rig, &spectra, config.trail);
        tracing::debug!(frames = spectra.len(), "computed spectra");
        Self {
            spectra,
            rig,
            trail,
            canvas,
            style,
            revision: stroke.revision(),
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.spectra.len() as u64
    }
}

/// Compose the layered geometry for `frame`.
///
/// Fails if `frame` is outside `0..N` or the result holds non-finite coordinates.
pub fn compose_frame(source: &FrameSource, frame: FrameIndex) -> BoardResult<FrameArtifact> {
    if frame.0 >= source.frame_count() {
        return Err(BoardError::prerender(format!(
            "frame {} is out of range (frame count {})",
            frame.0,
            source.frame_count()
        )));
    }
    if source.trail.len() != source.spectra.len() {
        return Err(BoardError::prerender(
            "trail length does not match spectrum length",
        ));
    }

    let style = &source.style;
    let RigFrame {
        x_chain,
        y_chain,
        point,
    } = source.rig.render(&source.spectra, frame.0);

    let mut scene = LayeredScene::default();
    push_chain(&mut scene, &x_chain, style);
    push_chain(&mut scene, &y_chain, style);

    scene.drawing.push(DrawOp::Disc {
        center: x_chain.tip,
        radius: style.marker_radius,
        color: style.x_marker,
    });
    scene.drawing.push(DrawOp::Disc {
        center: y_chain.tip,
        radius: style.marker_radius,
        color: style.y_marker,
    });

    // Guides run from each chain's tip across the reconstructed point to the canvas edge.
    let (w, h) = (f64::from(source.canvas.width), f64::from(source.canvas.height));
    let vertical_end = if point.y >= x_chain.tip.y {
        Point::new(x_chain.tip.x, h)
    } else {
        Point::new(x_chain.tip.x, 0.0)
    };
    let horizontal_end = if point.x >= y_chain.tip.x {
        Point::new(w, y_chain.tip.y)
    } else {
        Point::new(0.0, y_chain.tip.y)
    };
    scene.drawing.push(DrawOp::Line {
        from: x_chain.tip,
        to: vertical_end,
        width: style.line_width,
        color: style.guide,
    });
    scene.drawing.push(DrawOp::Line {
        from: y_chain.tip,
        to: horizontal_end,
        width: style.line_width,
        color: style.guide,
    });

    let upto = frame.as_usize();
    for i in 1..upto {
        scene.drawing.push(DrawOp::Line {
            from: source.trail[i - 1],
            to: source.trail[i],
            width: style.line_width,
            color: style.path,
        });
        scene.dots.push(DrawOp::Disc {
            center: source.trail[i],
            radius: style.trail_dot_radius,
            color: style.trail_dot,
        });
    }

    scene.ensure_finite()?;
    Ok(FrameArtifact {
        frame,
        point,
        scene,
    })
}

fn push_chain(scene: &mut LayeredScene, chain: &EpicycleChain, style: &FrameStyle) {
    for c in &chain.circles {
        scene.epicycles.push(DrawOp::Ring {
            center: c.center,
            radius: c.radius,
            width: style.line_width,
            color: style.phasor,
        });
        scene.drawing.push(DrawOp::Line {
            from: c.center,
            to: c.tip(),
            width: style.line_width,
            color: style.phasor,
        });
    }
}

/// The raw stroke drawn up to (excluding) point `upto`, as shown while drawing or revealing.
pub fn compose_stroke(points: &[Point], upto: usize, style: &FrameStyle) -> LayeredScene {
    let upto = upto.min(points.len());
    let mut scene = LayeredScene::default();
    for i in 1..upto {
        scene.drawing.push(DrawOp::Line {
            from: points[i - 1],
            to: points[i],
            width: style.line_width,
            color: style.path,
        });
        scene.dots.push(DrawOp::Disc {
            center: points[i],
            radius: style.stroke_dot_radius,
            color: style.stroke_dot,
        });
    }
    scene
}

#[cfg(test)]
#[path = "../../tests/unit/render/compose.rs"]
mod tests;
