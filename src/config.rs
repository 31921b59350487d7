use std::path::Path;

use crate::{
    epicycle::rig::TrailMode,
    foundation::{
        core::Canvas,
        error::{BoardError, BoardResult},
    },
    prerender::pipeline::PrerenderOpts,
};

/// Board-wide settings.
///
/// Loaded from JSON; every field is optional and falls back to [`BoardConfig::default`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub canvas: Canvas,
    /// Rate of the external clock driving the tick loop.
    pub tick_hz: u32,
    /// Distance of the x-axis chain's anchor from the top edge.
    pub x_rig_offset: f64,
    /// Distance of the y-axis chain's anchor from the left edge.
    pub y_rig_offset: f64,
    pub trail: TrailMode,
    pub prerender: PrerenderOpts,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            tick_hz: 60,
            x_rig_offset: 100.0,
            y_rig_offset: 200.0,
            trail: TrailMode::Smoothed,
            prerender: PrerenderOpts::default(),
        }
    }
}

impl BoardConfig {
    pub fn from_json_str(s: &str) -> BoardResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| BoardError::validation(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> BoardResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Apply `FOURIER_BOARD_*` environment overrides. Unparsable or zero values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok());
        self
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let positive = |key: &str| {
            lookup(key)
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|&n| n > 0)
        };
        if let Some(n) = positive("FOURIER_BOARD_BATCH_SIZE") {
            self.prerender.batch_size = n;
        }
        if let Some(n) = positive("FOURIER_BOARD_THREADS") {
            self.prerender.threads = Some(n);
        }
        match lookup("FOURIER_BOARD_PRERENDER").as_deref().map(str::trim) {
            Some("1") => self.prerender.enabled = true,
            Some("0") => self.prerender.enabled = false,
            _ => {}
        }
    }

    pub fn validate(&self) -> BoardResult<()> {
        self.canvas.validate()?;
        if self.tick_hz == 0 {
            return Err(BoardError::validation("tick_hz must be > 0"));
        }
        if !self.x_rig_offset.is_finite() || !self.y_rig_offset.is_finite() {
            return Err(BoardError::validation("rig offsets must be finite"));
        }
        self.prerender.validate()
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / f64::from(self.tick_hz.max(1)))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
