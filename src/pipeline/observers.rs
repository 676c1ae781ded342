//! Observers for training runs

use std::sync::{Arc, Mutex};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::training::EpisodeOutcome;
use crate::{Result, ports::Observer};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    catches: usize,
    escapes: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            catches: 0,
            escapes: 0,
        }
    }

    fn message(&self) -> String {
        format!("caught:{} escaped:{}", self.catches, self.escapes)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, outcome: &EpisodeOutcome) -> Result<()> {
        if outcome.caught {
            self.catches += 1;
        } else {
            self.escapes += 1;
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(outcome.episode as u64);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Catch statistics over one window of consecutive episodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSummary {
    /// Last episode of the window
    pub last_episode: usize,
    pub episodes: usize,
    pub catch_rate: f64,
    pub mean_steps: f64,
}

/// Metrics observer - Tracks catch rate per window of episodes
///
/// Useful for watching the pursuit balance shift as the exploration rate
/// decays. Clones share the recorded windows, so a copy kept outside the
/// pipeline can read them once the run is over.
#[derive(Clone)]
pub struct MetricsObserver {
    window: usize,
    catches: usize,
    steps: usize,
    seen: usize,
    windows: Arc<Mutex<Vec<WindowSummary>>>,
}

impl MetricsObserver {
    /// Create a metrics observer summarising every `window` episodes
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            catches: 0,
            steps: 0,
            seen: 0,
            windows: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Completed windows so far
    pub fn windows(&self) -> Vec<WindowSummary> {
        self.windows.lock().unwrap().clone()
    }

    fn close_window(&mut self, last_episode: usize) {
        if self.seen == 0 {
            return;
        }
        let summary = WindowSummary {
            last_episode,
            episodes: self.seen,
            catch_rate: self.catches as f64 / self.seen as f64,
            mean_steps: self.steps as f64 / self.seen as f64,
        };
        info!(
            last_episode,
            catch_rate = summary.catch_rate,
            mean_steps = summary.mean_steps,
            "window closed"
        );
        self.windows.lock().unwrap().push(summary);
        self.catches = 0;
        self.steps = 0;
        self.seen = 0;
    }
}

impl Observer for MetricsObserver {
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        self.catches = 0;
        self.steps = 0;
        self.seen = 0;
        self.windows.lock().unwrap().clear();
        Ok(())
    }

    fn on_episode_end(&mut self, outcome: &EpisodeOutcome) -> Result<()> {
        self.seen += 1;
        self.steps += outcome.steps;
        if outcome.caught {
            self.catches += 1;
        }
        if self.seen == self.window {
            self.close_window(outcome.episode);
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        let last = self
            .windows
            .lock()
            .unwrap()
            .last()
            .map_or(0, |w| w.last_episode)
            + self.seen;
        self.close_window(last);
        Ok(())
    }
}
