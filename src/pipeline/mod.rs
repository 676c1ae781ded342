//! Training and evaluation pipeline
//!
//! This module provides:
//! - The pursuit environment that applies actions to positions
//! - Training and evaluation loops for a cat/mouse pair
//! - Observers for progress and catch-rate metrics

pub mod env;
pub mod observers;
pub mod training;

pub use env::{PursuitEnv, StepOutcome};
pub use observers::{MetricsObserver, ProgressObserver, WindowSummary};
pub use training::{EpisodeOutcome, TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::Observer;
