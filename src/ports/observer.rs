//! Observer port - abstraction for training observation
//!
//! Observers see training events without the training loop depending on any
//! particular output format.

use crate::{Result, pipeline::EpisodeOutcome};

/// Observer trait for monitoring training and evaluation
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. `on_episode_end(outcome)` - After every episode
/// 3. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use catmouse::{pipeline::EpisodeOutcome, ports::Observer};
///
/// struct CatchCounter {
///     catches: usize,
/// }
///
/// impl Observer for CatchCounter {
///     fn on_episode_end(&mut self, outcome: &EpisodeOutcome) -> catmouse::Result<()> {
///         if outcome.caught {
///             self.catches += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when a run starts.
    ///
    /// Does nothing by default.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each episode with its outcome.
    ///
    /// Does nothing by default.
    fn on_episode_end(&mut self, _outcome: &EpisodeOutcome) -> Result<()> {
        Ok(())
    }

    /// Called when a run ends.
    ///
    /// Does nothing by default.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
