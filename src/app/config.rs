//! Hyperparameters for agent creation.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, q_learning::Role};

/// Default learning rate α for both roles
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
/// Default discount rate γ for both roles
pub const DEFAULT_DISCOUNT_RATE: f64 = 0.1;
/// Exploration rate at episode zero
pub const DEFAULT_MAX_EXPLORATION_RATE: f64 = 1.0;
/// Floor of the exploration schedule
pub const DEFAULT_MIN_EXPLORATION_RATE: f64 = 0.0001;
/// Exponential decay per episode
pub const DEFAULT_EXPLORATION_DECAY_RATE: f64 = 0.0001;
/// Episodes between Q-table snapshots
pub const DEFAULT_SNAPSHOT_INTERVAL: u64 = 1000;

/// Configuration for creating a pursuit agent.
///
/// An immutable bundle handed to each agent at construction; nothing here is
/// process-global.
///
/// # Examples
///
/// ```
/// use catmouse::app::AgentConfig;
/// use catmouse::q_learning::Role;
///
/// let config = AgentConfig::for_role(Role::Cat)
///     .with_learning_rate(0.2)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Learning rate α
    pub learning_rate: f64,
    /// Discount rate γ
    pub discount_rate: f64,
    /// Exploration rate at episode zero
    pub max_exploration_rate: f64,
    /// Lower bound of the exploration rate
    pub min_exploration_rate: f64,
    /// Exponential decay constant of the exploration schedule
    pub exploration_decay_rate: f64,
    /// Snapshot the Q-table every this many episodes
    pub snapshot_interval: u64,
    /// Treat the opponent's cell as blocked when picking greedy moves
    pub exclude_opponent_cell: bool,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    /// Defaults for a role.
    ///
    /// Cat and mouse currently share the same constants; the role is the
    /// extension point for tuning them apart.
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Cat | Role::Mouse => Self {
                learning_rate: DEFAULT_LEARNING_RATE,
                discount_rate: DEFAULT_DISCOUNT_RATE,
                max_exploration_rate: DEFAULT_MAX_EXPLORATION_RATE,
                min_exploration_rate: DEFAULT_MIN_EXPLORATION_RATE,
                exploration_decay_rate: DEFAULT_EXPLORATION_DECAY_RATE,
                snapshot_interval: DEFAULT_SNAPSHOT_INTERVAL,
                exclude_opponent_cell: false,
                seed: None,
            },
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_rate(mut self, discount_rate: f64) -> Self {
        self.discount_rate = discount_rate;
        self
    }

    /// Set the exploration schedule `max(min, max * exp(-decay * episode))`.
    pub fn with_exploration(mut self, max: f64, min: f64, decay: f64) -> Self {
        self.max_exploration_rate = max;
        self.min_exploration_rate = min;
        self.exploration_decay_rate = decay;
        self
    }

    pub fn with_snapshot_interval(mut self, interval: u64) -> Self {
        self.snapshot_interval = interval;
        self
    }

    pub fn with_opponent_exclusion(mut self, exclude: bool) -> Self {
        self.exclude_opponent_cell = exclude;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfiguration { message });

        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return invalid(format!(
                "learning rate {} must be in (0, 1]",
                self.learning_rate
            ));
        }
        if !(0.0..1.0).contains(&self.discount_rate) {
            return invalid(format!(
                "discount rate {} must be in [0, 1)",
                self.discount_rate
            ));
        }
        if !(0.0..=1.0).contains(&self.min_exploration_rate)
            || !(0.0..=1.0).contains(&self.max_exploration_rate)
        {
            return invalid(format!(
                "exploration rates {}..{} must lie in [0, 1]",
                self.min_exploration_rate, self.max_exploration_rate
            ));
        }
        if self.min_exploration_rate > self.max_exploration_rate {
            return invalid(format!(
                "minimum exploration rate {} exceeds maximum {}",
                self.min_exploration_rate, self.max_exploration_rate
            ));
        }
        if !(self.exploration_decay_rate.is_finite() && self.exploration_decay_rate >= 0.0) {
            return invalid(format!(
                "exploration decay rate {} must be finite and non-negative",
                self.exploration_decay_rate
            ));
        }
        if self.snapshot_interval == 0 {
            return invalid("snapshot interval must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::for_role(Role::Cat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_defaults_validate() {
        for role in [Role::Cat, Role::Mouse] {
            let config = AgentConfig::for_role(role);
            assert!(config.validate().is_ok());
            assert_eq!(config.max_exploration_rate, 1.0);
            assert_eq!(config.min_exploration_rate, 0.0001);
            assert_eq!(config.snapshot_interval, 1000);
            assert!(!config.exclude_opponent_cell);
        }
    }

    #[test]
    fn test_rejects_out_of_range_rates() {
        let base = AgentConfig::default();
        assert!(base.clone().with_learning_rate(0.0).validate().is_err());
        assert!(base.clone().with_learning_rate(1.5).validate().is_err());
        assert!(base.clone().with_discount_rate(1.0).validate().is_err());
        assert!(base.clone().with_discount_rate(f64::NAN).validate().is_err());
        assert!(base.clone().with_snapshot_interval(0).validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_exploration_bounds() {
        let config = AgentConfig::default().with_exploration(0.1, 0.5, 0.01);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration { .. })
        ));
        let negative_decay = AgentConfig::default().with_exploration(1.0, 0.0, -1.0);
        assert!(negative_decay.validate().is_err());
    }

    #[test]
    fn test_builder_sets_seed() {
        let config = AgentConfig::for_role(Role::Mouse).with_seed(7);
        assert_eq!(config.seed, Some(7));
    }
}
