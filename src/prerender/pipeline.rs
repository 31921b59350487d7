use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
    mpsc,
};

use rayon::prelude::*;

use crate::{
    foundation::{
        core::{FrameIndex, FrameRange},
        error::{BoardError, BoardResult},
    },
    render::{
        artifact::FrameArtifact,
        compose::{FrameSource, compose_frame},
    },
};

/// Pre-render batching/threading configuration.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PrerenderOpts {
    /// Pre-render every frame before playback. When off, frames are composed live each tick.
    pub enabled: bool,
    /// Dispatch each batch to a dedicated rayon pool instead of the calling thread.
    pub parallel: bool,
    /// Frames per batch; `renderedCount` only moves at batch boundaries.
    pub batch_size: usize,
    /// Worker threads (parallel mode only). `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for PrerenderOpts {
    fn default() -> Self {
        Self {
            enabled: true,
            parallel: true,
            batch_size: 10,
            threads: Some(10),
        }
    }
}

impl PrerenderOpts {
    pub fn validate(&self) -> BoardResult<()> {
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(BoardError::validation("prerender 'threads' must be >= 1 when set"));
        }
        Ok(())
    }
}

/// Shareable view of pre-render progress.
///
/// `rendered()` always names a contiguous prefix of frames that are fully written.
#[derive(Clone, Debug, Default)]
pub struct PrerenderProgress {
    rendered: Arc<AtomicU64>,
    total: Arc<AtomicU64>,
}

impl PrerenderProgress {
    pub fn rendered(&self) -> u64 {
        self.rendered.load(Ordering::Acquire)
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Acquire)
    }

    pub fn fraction(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.rendered() as f64 / total as f64
    }

    pub fn is_complete(&self) -> bool {
        let total = self.total();
        total > 0 && self.rendered() >= total
    }

    fn restart(&self, total: u64) {
        self.rendered.store(0, Ordering::Release);
        self.total.store(total, Ordering::Release);
    }

    fn advance_to(&self, rendered: u64) {
        self.rendered.fetch_max(rendered, Ordering::AcqRel);
    }
}

/// Outcome of one committed batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchReport {
    pub range: FrameRange,
    pub rendered: u64,
    pub total: u64,
}

/// Worker-to-coordinator message.
struct FrameDone {
    frame: FrameIndex,
    result: BoardResult<FrameArtifact>,
}

/// Computes every frame of a [`FrameSource`] ahead of playback.
///
/// Each batch is fanned out to the worker pool; workers only send `FrameDone` messages and the
/// calling thread is the single coordinator that writes cache slots and moves the progress
/// cursor once the whole batch has joined.
pub struct Prerenderer {
    opts: PrerenderOpts,
    pool: Option<rayon::ThreadPool>,
    source: Option<Arc<FrameSource>>,
    frames: Vec<Option<Arc<FrameArtifact>>>,
    progress: PrerenderProgress,
}

impl Prerenderer {
    pub fn new(opts: PrerenderOpts) -> BoardResult<Self> {
        opts.validate()?;
        let pool = if opts.parallel {
            Some(build_thread_pool(opts.threads)?)
        } else {
            None
        };
        Ok(Self {
            opts,
            pool,
            source: None,
            frames: Vec::new(),
            progress: PrerenderProgress::default(),
        })
    }

    /// Start over for a new source, discarding every cached frame.
    pub fn begin(&mut self, source: Arc<FrameSource>) {
        let total = source.frame_count();
        tracing::debug!(total, revision = source.revision, "prerender begin");
        self.frames = vec![None; total as usize];
        self.progress.restart(total);
        self.source = Some(source);
    }

    /// Drop the source and every cached frame; progress returns to zero.
    pub fn reset(&mut self) {
        if self.source.is_some() {
            tracing::debug!("prerender cache discarded");
        }
        self.source = None;
        self.frames.clear();
        self.progress.restart(0);
    }

    pub fn source(&self) -> Option<&Arc<FrameSource>> {
        self.source.as_ref()
    }

    pub fn progress(&self) -> PrerenderProgress {
        self.progress.clone()
    }

    pub fn rendered_count(&self) -> u64 {
        self.progress.rendered()
    }

    pub fn is_complete(&self) -> bool {
        self.source
            .as_ref()
            .is_some_and(|s| self.progress.rendered() >= s.frame_count())
    }

    /// A cached frame, only if it lies inside the committed prefix.
    pub fn frame(&self, frame: FrameIndex) -> Option<Arc<FrameArtifact>> {
        if frame.0 >= self.progress.rendered() {
            return None;
        }
        self.frames.get(frame.as_usize()).and_then(|f| f.clone())
    }

    /// Render and commit the next batch. Returns `None` once every frame is rendered.
    ///
    /// A failed frame is reported as an error; frames before it in the batch are committed,
    /// the cursor never moves past it.
    #[tracing::instrument(skip(self), fields(rendered = self.progress.rendered()))]
    pub fn step_batch(&mut self) -> BoardResult<Option<BatchReport>> {
        let Some(source) = self.source.clone() else {
            return Ok(None);
        };
        let total = source.frame_count();
        let start = self.progress.rendered();
        if start >= total {
            return Ok(None);
        }
        let batch = normalized_batch_size(self.opts.batch_size);
        let end = (start + batch).min(total);
        let range = FrameRange::new(FrameIndex(start), FrameIndex(end))?;

        let (tx, rx) = mpsc::channel::<FrameDone>();
        match self.pool.as_ref() {
            Some(pool) => pool.install(|| {
                (range.start.0..range.end.0)
                    .into_par_iter()
                    .for_each_with(tx, |tx, f| {
                        let frame = FrameIndex(f);
                        let _ = tx.send(FrameDone {
                            frame,
                            result: compose_frame(&source, frame),
                        });
                    });
            }),
            None => {
                for frame in range.iter() {
                    let _ = tx.send(FrameDone {
                        frame,
                        result: compose_frame(&source, frame),
                    });
                }
                drop(tx);
            }
        }

        // Every sender is gone once the batch has joined, so this drains exactly one batch.
        let mut results: Vec<Option<BoardResult<FrameArtifact>>> =
            (0..range.len_frames()).map(|_| None).collect();
        for done in rx {
            let slot = (done.frame.0 - start) as usize;
            results[slot] = Some(done.result);
        }

        let mut committed = start;
        for (offset, result) in results.into_iter().enumerate() {
            let frame = start + offset as u64;
            match result {
                Some(Ok(artifact)) => {
                    self.frames[frame as usize] = Some(Arc::new(artifact));
                    committed = frame + 1;
                }
                Some(Err(e)) => {
                    self.progress.advance_to(committed);
                    tracing::warn!(frame, error = %e, "frame failed to render");
                    return Err(BoardError::prerender(format!("frame {frame}: {e}")));
                }
                None => {
                    self.progress.advance_to(committed);
                    return Err(BoardError::prerender(format!(
                        "frame {frame}: worker produced no result"
                    )));
                }
            }
        }

        self.progress.advance_to(end);
        tracing::debug!(start, end, total, "prerender batch committed");
        Ok(Some(BatchReport {
            range,
            rendered: end,
            total,
        }))
    }

    /// Run batches until every frame is cached. Returns the number of batches run.
    pub fn run_to_completion(&mut self) -> BoardResult<u64> {
        let mut batches = 0;
        while self.step_batch()?.is_some() {
            batches += 1;
        }
        Ok(batches)
    }

    /// All cached frames, in frame order, if rendering has completed.
    pub fn frames(&self) -> Option<Vec<Arc<FrameArtifact>>> {
        if !self.is_complete() {
            return None;
        }
        self.frames.iter().cloned().collect()
    }
}

fn build_thread_pool(threads: Option<usize>) -> BoardResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("prerender-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| BoardError::prerender(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_batch_size(batch_size: usize) -> u64 {
    if batch_size == 0 {
        1
    } else {
        batch_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/prerender/pipeline.rs"]
mod tests;
