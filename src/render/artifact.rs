use crate::foundation::{
    core::{FrameIndex, Point, Rgba8},
    error::{BoardError, BoardResult},
};

/// Backend-agnostic drawing primitive.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub enum DrawOp {
    Line {
        from: Point,
        to: Point,
        width: f64,
        color: Rgba8,
    },
    /// Filled circle.
    Disc {
        center: Point,
        radius: f64,
        color: Rgba8,
    },
    /// Circle outline.
    Ring {
        center: Point,
        radius: f64,
        width: f64,
        color: Rgba8,
    },
}

impl DrawOp {
    fn is_finite(&self) -> bool {
        match *self {
            DrawOp::Line {
                from, to, width, ..
            } => from.is_finite() && to.is_finite() && width.is_finite(),
            DrawOp::Disc { center, radius, .. } => center.is_finite() && radius.is_finite(),
            DrawOp::Ring {
                center,
                radius,
                width,
                ..
            } => center.is_finite() && radius.is_finite() && width.is_finite(),
        }
    }
}

/// Which optional layers the rendering collaborator should draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LayerToggles {
    pub show_dots: bool,
    pub show_epicycles: bool,
}

/// Geometry split into independently toggled layers.
///
/// Paint order is `epicycles`, `drawing`, `dots`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct LayeredScene {
    pub drawing: Vec<DrawOp>,
    pub dots: Vec<DrawOp>,
    pub epicycles: Vec<DrawOp>,
}

impl LayeredScene {
    pub fn ops(&self, toggles: LayerToggles) -> impl Iterator<Item = &DrawOp> {
        let epicycles: &[DrawOp] = if toggles.show_epicycles {
            &self.epicycles
        } else {
            &[]
        };
        let dots: &[DrawOp] = if toggles.show_dots { &self.dots } else { &[] };
        epicycles.iter().chain(&self.drawing).chain(dots)
    }

    pub fn op_count(&self) -> usize {
        self.drawing.len() + self.dots.len() + self.epicycles.len()
    }

    pub(crate) fn ensure_finite(&self) -> BoardResult<()> {
        let bad = self
            .drawing
            .iter()
            .chain(&self.dots)
            .chain(&self.epicycles)
            .any(|op| !op.is_finite());
        if bad {
            return Err(BoardError::render("scene contains non-finite geometry"));
        }
        Ok(())
    }
}

/// The renderable result for one animation frame. Immutable once produced.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameArtifact {
    pub frame: FrameIndex,
    /// Reconstructed stroke point at this frame.
    pub point: Point,
    pub scene: LayeredScene,
}

#[cfg(test)]
#[path = "../../tests/unit/render/artifact.rs"]
mod tests;
