use super::*;
use crate::{
    config::BoardConfig,
    foundation::core::{Canvas, Point},
    render::compose::FrameStyle,
    stroke::points::Stroke,
};

fn circle_source(n: usize) -> Arc<FrameSource> {
    let points = (0..n)
        .map(|i| {
            let t = std::f64::consts::TAU * i as f64 / n as f64;
            Point::new(200.0 + 80.0 * t.cos(), 150.0 + 60.0 * t.sin())
        })
        .collect();
    let cfg = BoardConfig {
        canvas: Canvas {
            width: 400,
            height: 300,
        },
        ..BoardConfig::default()
    };
    Arc::new(FrameSource::from_stroke(
        &Stroke::from_points(points),
        &cfg,
        FrameStyle::default(),
    ))
}

fn sequential_opts(batch_size: usize) -> PrerenderOpts {
    PrerenderOpts {
        parallel: false,
        batch_size,
        ..PrerenderOpts::default()
    }
}

#[test]
fn cursor_moves_in_whole_batches_with_a_short_tail() {
    let mut pre = Prerenderer::new(sequential_opts(10)).unwrap();
    pre.begin(circle_source(23));

    let mut seen = Vec::new();
    while let Some(report) = pre.step_batch().unwrap() {
        assert_eq!(report.rendered, pre.rendered_count());
        assert_eq!(report.range.end.0, report.rendered);
        seen.push(report.rendered);
    }
    assert_eq!(seen, vec![10, 20, 23]);
    assert!(pre.is_complete());
    assert!(pre.step_batch().unwrap().is_none());
}

#[test]
fn frames_beyond_the_cursor_are_never_served() {
    let mut pre = Prerenderer::new(sequential_opts(4)).unwrap();
    pre.begin(circle_source(9));
    assert!(pre.frame(FrameIndex(0)).is_none());

    pre.step_batch().unwrap();
    assert!(pre.frame(FrameIndex(3)).is_some());
    assert!(pre.frame(FrameIndex(4)).is_none());
    assert!(pre.frames().is_none());
}

#[test]
fn parallel_and_sequential_runs_are_identical() {
    let source = circle_source(37);

    let mut seq = Prerenderer::new(sequential_opts(10)).unwrap();
    seq.begin(Arc::clone(&source));
    seq.run_to_completion().unwrap();

    let mut par = Prerenderer::new(PrerenderOpts {
        parallel: true,
        batch_size: 10,
        threads: Some(4),
        ..PrerenderOpts::default()
    })
    .unwrap();
    par.begin(source);
    assert_eq!(par.run_to_completion().unwrap(), 4);

    let a = seq.frames().unwrap();
    let b = par.frames().unwrap();
    assert_eq!(a.len(), 37);
    for (fa, fb) in a.iter().zip(&b) {
        assert_eq!(**fa, **fb);
    }
}

#[test]
fn reset_discards_every_frame() {
    let mut pre = Prerenderer::new(sequential_opts(5)).unwrap();
    let progress = pre.progress();
    pre.begin(circle_source(12));
    pre.step_batch().unwrap();
    assert_eq!(progress.rendered(), 5);
    assert_eq!(progress.total(), 12);

    pre.reset();
    assert_eq!(progress.rendered(), 0);
    assert_eq!(progress.total(), 0);
    assert!(pre.frame(FrameIndex(0)).is_none());
    assert!(pre.source().is_none());
    assert!(pre.step_batch().unwrap().is_none());
}

#[test]
fn begin_replaces_a_finished_cache() {
    let mut pre = Prerenderer::new(sequential_opts(50)).unwrap();
    pre.begin(circle_source(8));
    pre.run_to_completion().unwrap();
    assert!(pre.is_complete());

    pre.begin(circle_source(6));
    assert_eq!(pre.rendered_count(), 0);
    assert!(!pre.is_complete());
    pre.run_to_completion().unwrap();
    assert_eq!(pre.frames().unwrap().len(), 6);
}

#[test]
fn failed_frames_hold_the_cursor() {
    let mut broken = (*circle_source(6)).clone();
    broken.trail.pop();

    let mut pre = Prerenderer::new(sequential_opts(4)).unwrap();
    pre.begin(Arc::new(broken));
    let err = pre.step_batch().unwrap_err();
    assert!(matches!(err, BoardError::Prerender(_)));
    assert_eq!(pre.rendered_count(), 0);
    assert!(pre.frame(FrameIndex(0)).is_none());
}

#[test]
fn progress_fraction_and_zero_threads() {
    let progress = PrerenderProgress::default();
    assert_eq!(progress.fraction(), 0.0);
    assert!(!progress.is_complete());

    let opts = PrerenderOpts {
        threads: Some(0),
        ..PrerenderOpts::default()
    };
    assert!(Prerenderer::new(opts).is_err());
}
