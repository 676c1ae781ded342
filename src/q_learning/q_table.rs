//! Dense Q-table with the one-step Q-learning update

use serde::{Deserialize, Serialize};

use crate::maze::{ACTION_COUNT, Action};

/// Q-table with one row per joint state and one column per action
///
/// The shape is fixed at construction. Values start at zero unless restored
/// from a snapshot and change only through [`QTable::q_learning_update`] or
/// [`QTable::set`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    values: Vec<[f64; ACTION_COUNT]>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl QTable {
    /// Create a zero-filled Q-table with `rows` joint states
    pub fn new(rows: usize, learning_rate: f64, discount_factor: f64) -> Self {
        Self::from_values(vec![[0.0; ACTION_COUNT]; rows], learning_rate, discount_factor)
    }

    /// Wrap existing values, e.g. restored from a snapshot
    pub fn from_values(
        values: Vec<[f64; ACTION_COUNT]>,
        learning_rate: f64,
        discount_factor: f64,
    ) -> Self {
        Self {
            values,
            learning_rate,
            discount_factor,
        }
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: usize, action: Action) -> f64 {
        self.values[state][action.index()]
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: usize, action: Action, value: f64) {
        self.values[state][action.index()] = value;
    }

    /// All action values of a state
    pub fn row(&self, state: usize) -> &[f64; ACTION_COUNT] {
        &self.values[state]
    }

    /// Maximum Q-value over every action of a state
    pub fn max_q(&self, state: usize) -> f64 {
        self.values[state]
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Select greedy action (highest Q-value) among `legal_actions`
    ///
    /// Ties go to the action listed first. Falls back to [`Action::Stay`] when
    /// `legal_actions` is empty.
    pub fn greedy_action(&self, state: usize, legal_actions: &[Action]) -> Action {
        let mut best: Option<(Action, f64)> = None;
        for &action in legal_actions {
            let q = self.get(state, action);
            match best {
                Some((_, best_q)) if q <= best_q => {}
                _ => best = Some((action, q)),
            }
        }
        best.map(|(action, _)| action).unwrap_or(Action::Stay)
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// Returns the new Q(s,a).
    pub fn q_learning_update(
        &mut self,
        state: usize,
        action: Action,
        reward: f64,
        next_state: usize,
    ) -> f64 {
        let current_q = self.get(state, action);
        let max_next_q = self.max_q(next_state);
        let td_target = reward + self.discount_factor * max_next_q;
        let td_error = td_target - current_q;
        let new_q = current_q + self.learning_rate * td_error;
        self.set(state, action, new_q);
        new_q
    }

    /// Number of joint-state rows
    pub fn rows(&self) -> usize {
        self.values.len()
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    pub(crate) fn values(&self) -> &[[f64; ACTION_COUNT]] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qtable_initialization() {
        let qtable = QTable::new(4, 0.5, 0.99);
        assert_eq!(qtable.rows(), 4);
        for action in Action::ALL {
            assert_eq!(qtable.get(3, action), 0.0);
        }
    }

    #[test]
    fn test_qtable_set_get() {
        let mut qtable = QTable::new(2, 0.5, 0.99);
        qtable.set(1, Action::Left, 1.5);
        assert_eq!(qtable.get(1, Action::Left), 1.5);
        assert_eq!(qtable.get(0, Action::Left), 0.0);
    }

    #[test]
    fn test_max_q() {
        let mut qtable = QTable::new(1, 0.5, 0.99);
        qtable.set(0, Action::Up, 0.5);
        qtable.set(0, Action::Down, 1.5);
        qtable.set(0, Action::Left, -0.8);
        assert_eq!(qtable.max_q(0), 1.5);
    }

    #[test]
    fn test_greedy_action() {
        let mut qtable = QTable::new(1, 0.5, 0.99);
        qtable.set(0, Action::Up, 0.5);
        qtable.set(0, Action::Down, 1.5);
        qtable.set(0, Action::Right, 0.8);

        let legal = vec![Action::Up, Action::Down, Action::Right];
        assert_eq!(qtable.greedy_action(0, &legal), Action::Down);
    }

    #[test]
    fn test_greedy_action_respects_legal_set() {
        let mut qtable = QTable::new(1, 0.5, 0.99);
        qtable.set(0, Action::Up, 9.0);
        qtable.set(0, Action::Stay, -1.0);

        let legal = vec![Action::Right, Action::Stay];
        assert_eq!(qtable.greedy_action(0, &legal), Action::Right);
    }

    #[test]
    fn test_greedy_ties_pick_first_listed() {
        let qtable = QTable::new(1, 0.5, 0.99);
        let legal = vec![Action::Left, Action::Right, Action::Stay];
        assert_eq!(qtable.greedy_action(0, &legal), Action::Left);
    }

    #[test]
    fn test_q_learning_update() {
        let mut qtable = QTable::new(2, 0.5, 0.99);
        qtable.set(1, Action::Up, 1.0);
        qtable.set(1, Action::Down, 2.0);

        let new_q = qtable.q_learning_update(0, Action::Stay, 0.0, 1);

        // Q(s,stay) = 0.0 + 0.5 * (0.0 + 0.99 * 2.0 - 0.0) = 0.99
        assert!((new_q - 0.99).abs() < 1e-12);
        assert_eq!(qtable.get(0, Action::Stay), new_q);
    }

    #[test]
    fn test_update_uses_max_over_all_actions() {
        let mut qtable = QTable::new(2, 1.0, 0.5);
        qtable.set(1, Action::Stay, 4.0);

        qtable.q_learning_update(0, Action::Up, 1.0, 1);

        // α = 1 replaces the value with the TD target 1 + 0.5 * 4
        assert!((qtable.get(0, Action::Up) - 3.0).abs() < 1e-12);
    }
}
