use std::f64::consts::TAU;

use crate::{foundation::core::Point, spectrum::component::Spectrum};

/// One rotating phasor of a chain, positioned for a specific frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Epicycle {
    /// Where this phasor is anchored (the tip of the previous one).
    pub center: Point,
    pub radius: f64,
    /// Angle in radians, measured counter-clockwise on screen (y grows downward).
    pub angle: f64,
}

impl Epicycle {
    /// End of this phasor's radius vector, i.e. the center of the next one.
    pub fn tip(&self) -> Point {
        Point::new(
            self.center.x + self.radius * self.angle.cos(),
            self.center.y - self.radius * self.angle.sin(),
        )
    }
}

/// A full phasor chain for one axis and one frame.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct EpicycleChain {
    pub circles: Vec<Epicycle>,
    pub tip: Point,
}

/// Lay out the phasor chain of `spectrum` at `frame`.
///
/// Components are chained in the spectrum's order starting at `start`; for component `k`
/// `radius = |X_k| / N` and `angle = 2 pi frame freq_k / N + arg(X_k) + global_phase`. The
/// returned tip is independent of that order.
pub fn render_chain(
    spectrum: &Spectrum,
    frame: u64,
    start: Point,
    global_phase: f64,
) -> EpicycleChain {
    let n = spectrum.len() as f64;
    let mut current = start;
    let mut circles = Vec::with_capacity(spectrum.len());

    for c in spectrum {
        let epicycle = Epicycle {
            center: current,
            radius: c.magnitude() / n,
            angle: TAU * (frame as f64) * (c.freq as f64) / n + c.phase() + global_phase,
        };
        current = epicycle.tip();
        circles.push(epicycle);
    }

    EpicycleChain {
        circles,
        tip: current,
    }
}

/// Tip of the chain without materializing the circle descriptors.
pub fn chain_tip(spectrum: &Spectrum, frame: u64, start: Point, global_phase: f64) -> Point {
    let n = spectrum.len() as f64;
    spectrum.iter().fold(start, |p, c| {
        let radius = c.magnitude() / n;
        let angle = TAU * (frame as f64) * (c.freq as f64) / n + c.phase() + global_phase;
        Point::new(p.x + radius * angle.cos(), p.y - radius * angle.sin())
    })
}

#[cfg(test)]
#[path = "../../tests/unit/epicycle/sequencer.rs"]
mod tests;
