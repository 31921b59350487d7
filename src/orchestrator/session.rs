use std::{collections::VecDeque, sync::Arc};

use crate::{
    config::BoardConfig,
    foundation::{core::FrameIndex, error::BoardResult},
    orchestrator::state::{Board, BoardState, Effect, Event, transition},
    prerender::pipeline::{PrerenderProgress, Prerenderer},
    render::{
        artifact::{FrameArtifact, LayerToggles, LayeredScene},
        compose::{compose_frame, compose_stroke},
    },
    stroke::pointfile::PointStore,
};

/// What the rendering collaborator should show for the current tick.
#[derive(Clone, Debug)]
pub enum Display {
    /// Nothing board-specific (setup, start screen, end).
    Idle,
    /// The raw stroke, fully drawn or partially revealed.
    Stroke(LayeredScene),
    /// Pre-render progress bar.
    Progress { rendered: u64, total: u64 },
    /// One animation frame.
    Frame(Arc<FrameArtifact>),
}

#[derive(Clone, Debug)]
pub struct TickOutput {
    pub state: BoardState,
    pub display: Display,
    pub toggles: LayerToggles,
}

/// Runtime around the pure [`transition`] function.
///
/// The session owns the collaborators the board cannot touch itself (point store, pre-render
/// pool) and feeds their results back in as events.
pub struct Session {
    board: Board,
    prerenderer: Prerenderer,
    store: Box<dyn PointStore + Send>,
    notices: Vec<String>,
}

impl Session {
    pub fn new(config: BoardConfig, store: Box<dyn PointStore + Send>) -> BoardResult<Self> {
        config.validate()?;
        let prerenderer = Prerenderer::new(config.prerender.clone())?;
        Ok(Self {
            board: Board::new(config),
            prerenderer,
            store,
            notices: Vec::new(),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> BoardState {
        self.board.state()
    }

    pub fn progress(&self) -> PrerenderProgress {
        self.prerenderer.progress()
    }

    /// Drain the non-fatal notices produced so far.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    /// Deliver one event and everything it triggers.
    pub fn handle(&mut self, event: Event) {
        let mut queue = VecDeque::from([event]);
        while let Some(ev) = queue.pop_front() {
            let before = self.board.state();
            let (board, effects) = transition(std::mem::take(&mut self.board), ev);
            self.board = board;
            let after = self.board.state();
            if before != after {
                tracing::info!(from = ?before, to = ?after, "board state changed");
            }
            for effect in effects {
                if let Some(feedback) = self.apply(effect) {
                    queue.push_back(feedback);
                }
            }
        }
    }

    /// One clock beat: advance the board, then describe what to draw.
    pub fn tick(&mut self) -> TickOutput {
        self.handle(Event::Tick);
        self.output()
    }

    pub fn output(&mut self) -> TickOutput {
        TickOutput {
            state: self.board.state(),
            display: self.display(),
            toggles: self.board.toggles(),
        }
    }

    fn display(&mut self) -> Display {
        let board = &self.board;
        match board.state() {
            BoardState::Preparing | BoardState::Start | BoardState::End => Display::Idle,
            BoardState::Drawing | BoardState::Computing => Display::Stroke(compose_stroke(
                board.stroke().points(),
                board.stroke().len(),
                board.style(),
            )),
            BoardState::Revealing => Display::Stroke(compose_stroke(
                board.stroke().points(),
                board.reveal_cursor(),
                board.style(),
            )),
            BoardState::Prerendering => {
                let progress = self.prerenderer.progress();
                Display::Progress {
                    rendered: progress.rendered(),
                    total: progress.total(),
                }
            }
            BoardState::Fourier => {
                let frame = FrameIndex(board.frame_cursor());
                if !board.live_playback()
                    && let Some(artifact) = self.prerenderer.frame(frame)
                {
                    return Display::Frame(artifact);
                }
                let Some(source) = board.source() else {
                    return Display::Idle;
                };
                match compose_frame(source, frame) {
                    Ok(artifact) => Display::Frame(Arc::new(artifact)),
                    Err(e) => {
                        tracing::warn!(frame = frame.0, error = %e, "live frame failed");
                        self.notices.push(format!("Unable to draw frame {}: {e}", frame.0));
                        Display::Idle
                    }
                }
            }
        }
    }

    fn apply(&mut self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::SavePoints(points) => {
                if let Err(e) = self.store.save(&points) {
                    tracing::warn!(error = %e, "saving points failed");
                    self.notices.push("Unable to write points to file.".to_string());
                } else {
                    tracing::info!(points = points.len(), "points saved");
                }
                None
            }
            Effect::LoadPoints => match self.store.load() {
                Ok(Some(points)) => {
                    tracing::info!(points = points.len(), "points loaded");
                    Some(Event::PointsLoaded(Some(points)))
                }
                Ok(None) => None,
                Err(e) => {
                    tracing::warn!(error = %e, "loading points failed");
                    Some(Event::PointsLoaded(None))
                }
            },
            Effect::BeginPrerender(source) => {
                self.prerenderer.begin(source);
                None
            }
            Effect::PrerenderBatch => match self.prerenderer.step_batch() {
                Ok(Some(report)) => Some(Event::BatchRendered {
                    rendered: report.rendered,
                    total: report.total,
                }),
                Ok(None) => {
                    let progress = self.prerenderer.progress();
                    Some(Event::BatchRendered {
                        rendered: progress.rendered(),
                        total: progress.total(),
                    })
                }
                Err(e) => Some(Event::PrerenderFailed(e.to_string())),
            },
            Effect::DiscardFrames => {
                self.prerenderer.reset();
                None
            }
            Effect::Notice(msg) => {
                tracing::info!(notice = %msg);
                self.notices.push(msg);
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/orchestrator/session.rs"]
mod tests;
