use std::sync::Arc;

use crate::foundation::core::{Point, Vec2};

/// The freehand stroke being drawn, in canvas coordinates.
///
/// Every mutation bumps `revision`, which is how derived data (spectra, cached frames) knows it
/// is stale.
#[derive(Clone, Debug, Default)]
pub struct Stroke {
    points: Vec<Point>,
    revision: u64,
}

impl Stroke {
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            points,
            revision: 0,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Immutable copy of the current point list.
    pub fn snapshot(&self) -> Arc<[Point]> {
        Arc::from(self.points.as_slice())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Append `p` unless it repeats the last sample. Returns whether the stroke changed.
    pub fn push_distinct(&mut self, p: Point) -> bool {
        if self.points.last() == Some(&p) {
            return false;
        }
        self.points.push(p);
        self.revision += 1;
        true
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.revision += 1;
    }

    pub fn replace(&mut self, points: Vec<Point>) {
        self.points = points;
        self.revision += 1;
    }

    /// Split into per-axis sample sequences, each shifted by `-offset`.
    pub fn centered_samples(&self, offset: Vec2) -> (Vec<f64>, Vec<f64>) {
        self.points
            .iter()
            .map(|p| (p.x - offset.x, p.y - offset.y))
            .unzip()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stroke/points.rs"]
mod tests;
