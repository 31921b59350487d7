use std::sync::Arc;

use crate::{
    config::BoardConfig,
    foundation::core::Point,
    render::{
        artifact::LayerToggles,
        compose::{FrameSource, FrameStyle},
    },
    stroke::points::Stroke,
};

/// Where the board is in its draw → reveal → compute → play loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
pub enum BoardState {
    #[default]
    Preparing,
    Start,
    Drawing,
    Revealing,
    Computing,
    Prerendering,
    Fourier,
    /// Terminal; not reached in normal operation.
    End,
}

/// Input delivered to the board, either by the user, the clock or the session itself.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// One beat of the external fixed-rate clock.
    Tick,
    /// Primary pointer held at a canvas position.
    PointerDown(Point),
    /// The start button.
    Begin,
    Clear,
    Save,
    Load,
    /// Result of a [`Effect::LoadPoints`]; `None` when the file could not be read.
    PointsLoaded(Option<Vec<Point>>),
    /// Start the Fourier animation for the current stroke.
    Play,
    SkipReveal,
    SetShowDots(bool),
    SetShowEpicycles(bool),
    /// A pre-render batch was committed.
    BatchRendered { rendered: u64, total: u64 },
    PrerenderFailed(String),
    /// Stop for good.
    Quit,
}

/// Work the board asks its runtime to perform.
#[derive(Clone, Debug)]
pub enum Effect {
    SavePoints(Arc<[Point]>),
    LoadPoints,
    BeginPrerender(Arc<FrameSource>),
    PrerenderBatch,
    /// Drop every cached frame and reset the pre-render cursor.
    DiscardFrames,
    Notice(String),
}

/// Everything the animation loop knows, threaded through [`transition`].
#[derive(Clone, Debug)]
pub struct Board {
    config: BoardConfig,
    style: FrameStyle,
    state: BoardState,
    stroke: Stroke,
    reveal_cursor: usize,
    skip_reveal: bool,
    frame_cursor: u64,
    toggles: LayerToggles,
    source: Option<Arc<FrameSource>>,
    /// The pre-render cache holds every frame of `source`.
    frames_ready: bool,
    /// Compose frames on each tick instead of reading the cache.
    live_playback: bool,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl Board {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            config,
            style: FrameStyle::default(),
            state: BoardState::Preparing,
            stroke: Stroke::default(),
            reveal_cursor: 0,
            skip_reveal: false,
            frame_cursor: 0,
            toggles: LayerToggles::default(),
            source: None,
            frames_ready: false,
            live_playback: false,
        }
    }

    pub fn with_style(mut self, style: FrameStyle) -> Self {
        self.style = style;
        self
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn style(&self) -> &FrameStyle {
        &self.style
    }

    pub fn stroke(&self) -> &Stroke {
        &self.stroke
    }

    pub fn reveal_cursor(&self) -> usize {
        self.reveal_cursor
    }

    pub fn frame_cursor(&self) -> u64 {
        self.frame_cursor
    }

    pub fn toggles(&self) -> LayerToggles {
        self.toggles
    }

    pub fn source(&self) -> Option<&Arc<FrameSource>> {
        self.source.as_ref()
    }

    pub fn frames_ready(&self) -> bool {
        self.frames_ready
    }

    pub fn live_playback(&self) -> bool {
        self.live_playback
    }

    /// Forget the computed spectra and cached frames.
    fn invalidate(&mut self, effects: &mut Vec<Effect>) {
        if self.source.is_some() || self.frames_ready {
            effects.push(Effect::DiscardFrames);
        }
        self.source = None;
        self.frames_ready = false;
        self.live_playback = false;
    }

    fn has_current_source(&self) -> bool {
        self.source
            .as_ref()
            .is_some_and(|s| s.revision == self.stroke.revision())
    }

    fn enter_fourier(&mut self, live: bool) {
        self.state = BoardState::Fourier;
        self.frame_cursor = 0;
        self.live_playback = live;
    }

    fn frame_count(&self) -> u64 {
        self.source.as_ref().map_or(0, |s| s.frame_count())
    }
}

/// Advance the board by one event.
///
/// Pure: all I/O and worker-pool work is requested through the returned effects.
pub fn transition(mut board: Board, event: Event) -> (Board, Vec<Effect>) {
    let mut effects = Vec::new();

    match event {
        Event::SetShowDots(on) => board.toggles.show_dots = on,
        Event::SetShowEpicycles(on) => board.toggles.show_epicycles = on,
        Event::Quit => {
            if board.state == BoardState::Prerendering {
                board.invalidate(&mut effects);
            }
            board.state = BoardState::End;
        }
        event => step_state(&mut board, event, &mut effects),
    }

    (board, effects)
}

fn step_state(board: &mut Board, event: Event, effects: &mut Vec<Effect>) {
    use BoardState as S;

    match (board.state, event) {
        (S::End, _) => {}

        (S::Preparing, Event::Tick) => board.state = S::Start,

        (S::Start, Event::Begin | Event::PointerDown(_)) => board.state = S::Drawing,

        (S::Drawing, Event::PointerDown(p)) => {
            if board.stroke.push_distinct(p) {
                board.invalidate(effects);
            }
        }
        (S::Drawing, Event::Save) => effects.push(Effect::SavePoints(board.stroke.snapshot())),
        (S::Drawing, Event::Load) => effects.push(Effect::LoadPoints),
        (S::Drawing, Event::PointsLoaded(Some(points))) if !points.is_empty() => {
            board.stroke.replace(points);
            board.invalidate(effects);
        }
        // A file with no usable lines counts as unreadable.
        (S::Drawing, Event::PointsLoaded(_)) => {
            effects.push(Effect::Notice("Unable to read points from file.".to_string()));
        }
        (S::Drawing, Event::Play) => {
            if !board.stroke.is_empty() {
                board.state = S::Revealing;
                board.reveal_cursor = 0;
                board.skip_reveal = false;
                board.frame_cursor = 0;
            }
        }

        (S::Revealing, Event::SkipReveal) => board.skip_reveal = true,
        (S::Revealing, Event::Tick) => {
            if board.reveal_cursor < board.stroke.len() && !board.skip_reveal {
                board.reveal_cursor += 1;
            } else {
                board.skip_reveal = false;
                board.state = S::Computing;
            }
        }

        (S::Computing, Event::Tick) => compute(board, effects),

        (S::Prerendering, Event::Tick) => effects.push(Effect::PrerenderBatch),
        (S::Prerendering, Event::BatchRendered { rendered, total }) => {
            if rendered >= total {
                board.frames_ready = true;
                board.enter_fourier(false);
            }
        }
        (S::Prerendering, Event::PrerenderFailed(msg)) => {
            effects.push(Effect::DiscardFrames);
            effects.push(Effect::Notice(format!("Prerendering failed, playing live: {msg}")));
            board.frames_ready = false;
            board.enter_fourier(true);
        }

        (S::Fourier, Event::Tick) => {
            if board.frame_cursor + 1 < board.frame_count() {
                board.frame_cursor += 1;
            } else {
                board.state = S::Drawing;
            }
        }

        (S::Drawing | S::Revealing | S::Prerendering | S::Fourier, Event::Clear) => {
            board.stroke.clear();
            board.invalidate(effects);
            board.reveal_cursor = 0;
            board.frame_cursor = 0;
            board.state = S::Drawing;
        }

        _ => {}
    }
}

/// Spectra for the current stroke, then either playback or pre-rendering.
fn compute(board: &mut Board, effects: &mut Vec<Effect>) {
    if board.has_current_source() && board.frames_ready {
        board.enter_fourier(false);
        return;
    }

    let source = Arc::new(FrameSource::from_stroke(
        &board.stroke,
        &board.config,
        board.style,
    ));
    board.source = Some(Arc::clone(&source));
    board.frames_ready = false;

    if board.config.prerender.enabled {
        board.state = BoardState::Prerendering;
        board.frame_cursor = 0;
        effects.push(Effect::BeginPrerender(source));
    } else {
        board.enter_fourier(true);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/orchestrator/state.rs"]
mod tests;
