use std::f64::consts::FRAC_PI_2;

use crate::{
    epicycle::sequencer::{EpicycleChain, chain_tip, render_chain},
    foundation::core::{Canvas, Point, Vec2},
    spectrum::{component::SpectrumPair, idft::evaluate_at},
};

/// Anchor and phase offset of one axis' phasor chain.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AxisRig {
    pub anchor: Point,
    pub global_phase: f64,
}

/// The two chains that together redraw a stroke.
///
/// The x chain hangs from the top of the canvas and only its tip's x coordinate is used; the
/// y chain hangs from the left edge, rotated by `-pi/2`, and only its tip's y is used.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EpicycleRig {
    pub x: AxisRig,
    pub y: AxisRig,
}

/// Both chains laid out for one frame plus the point they reconstruct.
#[derive(Clone, Debug, PartialEq)]
pub struct RigFrame {
    pub x_chain: EpicycleChain,
    pub y_chain: EpicycleChain,
    pub point: Point,
}

impl EpicycleRig {
    /// Rig for a stroke that was centered by subtracting `canvas.half_extent()`.
    ///
    /// `x_rig_offset` is the x chain's distance from the top edge and `y_rig_offset` the y
    /// chain's distance from the left edge.
    pub fn for_canvas(canvas: Canvas, x_rig_offset: f64, y_rig_offset: f64) -> Self {
        let half = canvas.half_extent();
        Self {
            x: AxisRig {
                anchor: Point::new(half.x, x_rig_offset),
                global_phase: 0.0,
            },
            y: AxisRig {
                anchor: Point::new(y_rig_offset, half.y),
                global_phase: -FRAC_PI_2,
            },
        }
    }

    /// Offset that maps centered samples back onto the canvas.
    pub fn center_offset(&self) -> Vec2 {
        Vec2::new(self.x.anchor.x, self.y.anchor.y)
    }

    pub fn render(&self, spectra: &SpectrumPair, frame: u64) -> RigFrame {
        let x_chain = render_chain(&spectra.x, frame, self.x.anchor, self.x.global_phase);
        let y_chain = render_chain(&spectra.y, frame, self.y.anchor, self.y.global_phase);
        let point = Point::new(x_chain.tip.x, y_chain.tip.y);
        RigFrame {
            x_chain,
            y_chain,
            point,
        }
    }

    /// The reconstructed point for `frame`, skipping the circle descriptors.
    pub fn trace_point(&self, spectra: &SpectrumPair, frame: u64) -> Point {
        let tx = chain_tip(&spectra.x, frame, self.x.anchor, self.x.global_phase);
        let ty = chain_tip(&spectra.y, frame, self.y.anchor, self.y.global_phase);
        Point::new(tx.x, ty.y)
    }
}

/// How the trailing path behind the moving tip is produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailMode {
    /// Inverse transform of both spectra, shifted back onto the canvas.
    #[default]
    Smoothed,
    /// The rig's own reconstructed point for every frame.
    Traced,
}

/// Reconstructed point for every frame index `0..N`.
pub fn reconstruct_trail(rig: &EpicycleRig, spectra: &SpectrumPair, mode: TrailMode) -> Vec<Point> {
    let n = spectra.len();
    match mode {
        TrailMode::Smoothed => {
            let offset = rig.center_offset();
            (0..n)
                .map(|i| {
                    Point::new(
                        evaluate_at(&spectra.x, i as f64),
                        evaluate_at(&spectra.y, i as f64),
                    ) + offset
                })
                .collect()
        }
        TrailMode::Traced => (0..n).map(|i| rig.trace_point(spectra, i as u64)).collect(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/epicycle/rig.rs"]
mod tests;
