use std::sync::Mutex;

use super::*;
use crate::{
    foundation::{
        core::{Canvas, Point},
        error::BoardError,
    },
    prerender::pipeline::PrerenderOpts,
};

#[derive(Clone, Default)]
struct MemoryStore {
    saved: Arc<Mutex<Option<Vec<Point>>>>,
    fail: bool,
}

impl PointStore for MemoryStore {
    fn load(&mut self) -> BoardResult<Option<Vec<Point>>> {
        if self.fail {
            return Err(BoardError::point_file("unreadable"));
        }
        Ok(self.saved.lock().unwrap().clone())
    }

    fn save(&mut self, points: &[Point]) -> BoardResult<()> {
        if self.fail {
            return Err(BoardError::point_file("read-only"));
        }
        *self.saved.lock().unwrap() = Some(points.to_vec());
        Ok(())
    }
}

fn config(prerender: bool) -> BoardConfig {
    BoardConfig {
        canvas: Canvas {
            width: 320,
            height: 240,
        },
        prerender: PrerenderOpts {
            enabled: prerender,
            batch_size: 3,
            threads: Some(2),
            ..PrerenderOpts::default()
        },
        ..BoardConfig::default()
    }
}

fn drawing_session(prerender: bool, store: MemoryStore) -> Session {
    let mut session = Session::new(config(prerender), Box::new(store)).unwrap();
    session.tick();
    session.handle(Event::Begin);
    assert_eq!(session.state(), BoardState::Drawing);
    session
}

fn draw_triangle(session: &mut Session) {
    for (x, y) in [(100.0, 100.0), (200.0, 100.0), (150.0, 180.0), (120.0, 150.0), (90.0, 120.0)] {
        session.handle(Event::PointerDown(Point::new(x, y)));
    }
}

/// Tick until playback finishes, collecting the frame shown on every Fourier tick.
fn play_out(session: &mut Session) -> Vec<Arc<FrameArtifact>> {
    session.handle(Event::Play);
    let mut frames = Vec::new();
    for _ in 0..1_000 {
        let out = session.tick();
        match (out.state, out.display) {
            (BoardState::Fourier, Display::Frame(f)) => frames.push(f),
            (BoardState::Drawing, _) if !frames.is_empty() => break,
            _ => {}
        }
    }
    frames
}

#[test]
fn prerendered_playback_shows_every_frame_in_order() {
    let mut session = drawing_session(true, MemoryStore::default());
    draw_triangle(&mut session);

    let frames = play_out(&mut session);
    let order: Vec<u64> = frames.iter().map(|f| f.frame.0).collect();
    assert_eq!(order, vec![0, 1, 2, 3, 4]);
    assert!(session.progress().is_complete());
    assert_eq!(session.state(), BoardState::Drawing);
}

#[test]
fn live_playback_matches_prerendered_frames() {
    let mut cached = drawing_session(true, MemoryStore::default());
    draw_triangle(&mut cached);
    let a = play_out(&mut cached);

    let mut live = drawing_session(false, MemoryStore::default());
    draw_triangle(&mut live);
    let b = play_out(&mut live);

    assert_eq!(a.len(), b.len());
    for (fa, fb) in a.iter().zip(&b) {
        assert_eq!(**fa, **fb);
    }
}

#[test]
fn prerendering_reports_progress() {
    let mut session = drawing_session(true, MemoryStore::default());
    draw_triangle(&mut session);
    session.handle(Event::Play);
    session.handle(Event::SkipReveal);

    let mut seen = Vec::new();
    for _ in 0..20 {
        let out = session.tick();
        if let Display::Progress { rendered, total } = out.display {
            assert_eq!(total, 5);
            seen.push(rendered);
        }
        if out.state == BoardState::Fourier {
            break;
        }
    }
    // Batches of 3: the first tick only sets up the run.
    assert_eq!(seen, vec![0, 3]);
}

#[test]
fn clearing_mid_prerender_resets_progress() {
    let mut session = drawing_session(true, MemoryStore::default());
    draw_triangle(&mut session);
    session.handle(Event::Play);
    session.handle(Event::SkipReveal);
    while session.state() != BoardState::Prerendering {
        session.tick();
    }
    session.tick();
    assert_eq!(session.progress().rendered(), 3);

    session.handle(Event::Clear);
    assert_eq!(session.state(), BoardState::Drawing);
    assert_eq!(session.progress().rendered(), 0);
    assert_eq!(session.progress().total(), 0);
    assert!(session.board().stroke().is_empty());
}

#[test]
fn save_then_load_round_trips_through_the_store() {
    let store = MemoryStore::default();
    let saved = Arc::clone(&store.saved);
    let mut session = drawing_session(true, store);
    draw_triangle(&mut session);
    session.handle(Event::Save);
    assert_eq!(saved.lock().unwrap().as_ref().map(Vec::len), Some(5));

    session.handle(Event::Clear);
    session.handle(Event::Load);
    assert_eq!(session.board().stroke().len(), 5);
    assert!(session.take_notices().is_empty());
}

#[test]
fn store_failures_become_notices() {
    let store = MemoryStore {
        fail: true,
        ..MemoryStore::default()
    };
    let mut session = drawing_session(true, store);
    draw_triangle(&mut session);

    session.handle(Event::Save);
    session.handle(Event::Load);
    let notices = session.take_notices();
    assert_eq!(
        notices,
        vec![
            "Unable to write points to file.".to_string(),
            "Unable to read points from file.".to_string(),
        ]
    );
    assert_eq!(session.board().stroke().len(), 5);
    assert!(session.take_notices().is_empty());
}

#[test]
fn revealing_displays_a_growing_stroke() {
    let mut session = drawing_session(true, MemoryStore::default());
    draw_triangle(&mut session);
    session.handle(Event::Play);

    let out = session.tick();
    assert_eq!(out.state, BoardState::Revealing);
    let Display::Stroke(first) = out.display else {
        panic!("expected stroke display");
    };
    let Display::Stroke(second) = session.tick().display else {
        panic!("expected stroke display");
    };
    assert!(second.op_count() > first.op_count());
}

#[test]
fn invalid_config_is_rejected() {
    let mut cfg = config(true);
    cfg.tick_hz = 0;
    assert!(Session::new(cfg, Box::new(MemoryStore::default())).is_err());
}

#[test]
fn loading_a_file_without_points_is_reported() {
    let store = MemoryStore::default();
    *store.saved.lock().unwrap() = Some(Vec::new());
    let mut session = drawing_session(true, store);
    draw_triangle(&mut session);

    session.handle(Event::Load);
    assert_eq!(
        session.take_notices(),
        vec!["Unable to read points from file.".to_string()]
    );
    assert_eq!(session.board().stroke().len(), 5);
}
