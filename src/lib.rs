#![forbid(unsafe_code)]
//! Redraw a freehand stroke as two chains of rotating epicycles.
//!
//! The stroke's x and y coordinates are transformed separately with a discrete Fourier
//! transform; each spectrum drives a chain of circles whose tips trace one axis, and the
//! reconstructed point sits where the two tips' guides cross. Frames can be pre-rendered on a
//! rayon pool before playback starts.

pub mod config;
pub mod epicycle;
pub mod foundation;
pub mod orchestrator;
pub mod prerender;
pub mod render;
pub mod spectrum;
pub mod stroke;

pub use config::BoardConfig;
pub use epicycle::{
    rig::{EpicycleRig, RigFrame, TrailMode, reconstruct_trail},
    sequencer::{Epicycle, EpicycleChain, chain_tip, render_chain},
};
pub use foundation::{
    core::{BezPath, Canvas, FrameIndex, FrameRange, Point, Rgba8, Vec2},
    error::{BoardError, BoardResult},
};
pub use orchestrator::{
    session::{Display, Session, TickOutput},
    state::{Board, BoardState, Effect, Event, transition},
};
pub use prerender::pipeline::{BatchReport, PrerenderOpts, PrerenderProgress, Prerenderer};
pub use render::{
    artifact::{DrawOp, FrameArtifact, LayerToggles, LayeredScene},
    compose::{FrameSource, FrameStyle, compose_frame, compose_stroke},
    cpu::{CpuRasterizer, FrameRGBA, RasterSettings},
};
pub use spectrum::{
    component::{SpectralComponent, Spectrum, SpectrumPair},
    dft::transform,
    idft::{evaluate_at, inverse},
};
pub use stroke::{
    pointfile::{
        FilePointStore, PointStore, format_points, parse_points, read_points, write_points,
    },
    points::Stroke,
};
