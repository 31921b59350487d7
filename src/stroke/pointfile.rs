//! Plain-text point files: one `"<x>, <y>"` line per point.
//!
//! Reading is all-or-nothing. Lines that do not split into exactly two comma-separated fields
//! are skipped, but a field that is not a real number rejects the whole file.

use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
};

use crate::foundation::{
    core::Point,
    error::{BoardError, BoardResult},
};

pub fn parse_points(text: &str) -> BoardResult<Vec<Point>> {
    let mut points = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split(',').collect();
        let [x, y] = fields.as_slice() else {
            continue;
        };
        let parse = |field: &str| {
            field.trim().parse::<f64>().map_err(|e| {
                BoardError::point_file(format!(
                    "line {}: invalid number '{}': {e}",
                    lineno + 1,
                    field.trim()
                ))
            })
        };
        points.push(Point::new(parse(*x)?, parse(*y)?));
    }
    Ok(points)
}

pub fn format_points(points: &[Point]) -> String {
    let mut out = String::with_capacity(points.len() * 24);
    for p in points {
        let _ = writeln!(out, "{:.6}, {:.6}", p.x, p.y);
    }
    out
}

pub fn read_points(path: &Path) -> BoardResult<Vec<Point>> {
    let text = std::fs::read_to_string(path)?;
    parse_points(&text)
}

pub fn write_points(path: &Path, points: &[Point]) -> BoardResult<()> {
    std::fs::write(path, format_points(points))?;
    Ok(())
}

/// Where the board saves and loads strokes.
///
/// `load` returns `Ok(None)` when the user cancelled the selection.
pub trait PointStore {
    fn load(&mut self) -> BoardResult<Option<Vec<Point>>>;
    fn save(&mut self, points: &[Point]) -> BoardResult<()>;
}

/// A [`PointStore`] bound to a single file path.
#[derive(Clone, Debug)]
pub struct FilePointStore {
    path: PathBuf,
}

impl FilePointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PointStore for FilePointStore {
    fn load(&mut self) -> BoardResult<Option<Vec<Point>>> {
        read_points(&self.path).map(Some)
    }

    fn save(&mut self, points: &[Point]) -> BoardResult<()> {
        write_points(&self.path, points)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stroke/pointfile.rs"]
mod tests;
