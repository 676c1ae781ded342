//! Q-learning pursuit agent
//!
//! One agent type serves both roles. The [`Role`] decides which cell is the
//! agent's own and the sign of the reward; everything else comes from the
//! [`AgentConfig`] it was built with.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Result,
    app::AgentConfig,
    maze::{ACTION_COUNT, Action, Cell, Maze, distance, valid_moves},
    ports::TableRepository,
    q_learning::{QTable, QTableSnapshot, Role, StateIndex},
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// How an action is picked
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SelectionMode {
    /// ε-greedy with the agent's current exploration rate
    Train,
    /// Greedy, except a random action with probability `noise`
    Evaluate { noise: f64 },
}

/// A single environment step as seen by the learner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Action taken by the learning agent
    pub action: Action,
    pub old_cat: Cell,
    pub new_cat: Cell,
    pub old_mouse: Cell,
    pub new_mouse: Cell,
}

/// Q-learning agent for one side of the pursuit
///
/// Owns the maze it was built for, the joint-state index derived from it,
/// its Q-table, its exploration rate and the last episode its schedule was
/// advanced to.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    role: Role,
    config: AgentConfig,
    maze: Maze,
    index: StateIndex,
    q_table: QTable,
    exploration_rate: f64,
    episode: u64,
    rng: StdRng,
}

impl QLearningAgent {
    /// Create an agent with a zero-filled Q-table.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if `config` fails
    /// validation.
    pub fn new(role: Role, maze: Maze, config: AgentConfig) -> Result<Self> {
        config.validate()?;
        let index = StateIndex::new(&maze);
        let q_table = QTable::new(index.len(), config.learning_rate, config.discount_rate);
        Ok(Self::assemble(role, maze, index, q_table, config, 0))
    }

    /// Restore an agent from a saved snapshot.
    ///
    /// The agent picks up at the snapshot's episode: the exploration rate is
    /// the one scheduled for that episode and further training continues the
    /// episode numbering from there.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TableShapeMismatch`] if the snapshot was
    /// trained on a maze with a different number of free cells, plus the
    /// errors of [`QTableSnapshot::validate_for`] and [`AgentConfig::validate`].
    pub fn from_snapshot(
        role: Role,
        maze: Maze,
        config: AgentConfig,
        snapshot: QTableSnapshot,
    ) -> Result<Self> {
        config.validate()?;
        let index = StateIndex::new(&maze);
        snapshot.validate_for(role, &index)?;
        let q_table =
            QTable::from_values(snapshot.values, config.learning_rate, config.discount_rate);
        Ok(Self::assemble(role, maze, index, q_table, config, snapshot.episode))
    }

    fn assemble(
        role: Role,
        maze: Maze,
        index: StateIndex,
        q_table: QTable,
        config: AgentConfig,
        episode: u64,
    ) -> Self {
        let mut agent = Self {
            role,
            exploration_rate: config.max_exploration_rate,
            episode,
            rng: build_rng(config.seed),
            config,
            maze,
            index,
            q_table,
        };
        agent.exploration_rate = agent.scheduled_exploration(episode);
        agent
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.config.seed = Some(seed);
        self
    }

    /// Choose an action for the joint state (cat, mouse).
    ///
    /// In [`SelectionMode::Train`] a uniformly random action is returned with
    /// probability equal to the exploration rate; in
    /// [`SelectionMode::Evaluate`] with probability `noise`. Otherwise the
    /// legal action with the highest Q-value is chosen, ties going to the
    /// lowest action index. Random actions range over all five actions; the
    /// environment turns illegal ones into a stay.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownJointState`] if either position is not a
    /// free cell of the agent's maze.
    pub fn select_action(
        &mut self,
        cat: Cell,
        mouse: Cell,
        mode: SelectionMode,
    ) -> Result<Action> {
        let state = self.index.index_of(cat, mouse)?;

        let random_probability = match mode {
            SelectionMode::Train => self.exploration_rate,
            SelectionMode::Evaluate { noise } => noise,
        };
        if self.rng.random::<f64>() < random_probability {
            return Ok(Action::ALL[self.rng.random_range(0..ACTION_COUNT)]);
        }

        let own = self.role.own_cell(cat, mouse);
        let occupied = self
            .config
            .exclude_opponent_cell
            .then(|| self.role.opponent_cell(cat, mouse));
        let legal = valid_moves(&self.maze, own, occupied);
        Ok(self.q_table.greedy_action(state, &legal))
    }

    /// Shaped reward of a transition for this agent's role.
    ///
    /// Compares the shortest-path distance between cat and mouse before and
    /// after the step; see [`Role::reward`].
    pub fn compute_reward(&self, transition: &Transition) -> f64 {
        let old = distance(&self.maze, transition.old_cat, transition.old_mouse);
        let new = distance(&self.maze, transition.new_cat, transition.new_mouse);
        self.role.reward(old, new)
    }

    /// Fold a transition into the Q-table and return the reward it earned.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownJointState`] if the old or new joint
    /// state is not indexed. The table is left untouched in that case.
    pub fn update_policy(&mut self, transition: &Transition) -> Result<f64> {
        let state = self.index.index_of(transition.old_cat, transition.old_mouse)?;
        let next_state = self.index.index_of(transition.new_cat, transition.new_mouse)?;
        let reward = self.compute_reward(transition);

        let new_q = self
            .q_table
            .q_learning_update(state, transition.action, reward, next_state);
        debug!(
            role = %self.role,
            action = %transition.action,
            reward,
            q = new_q,
            "Q-table updated"
        );
        Ok(reward)
    }

    /// Exploration rate scheduled for an episode:
    /// `max(min, max_rate * exp(-decay * episode))`.
    pub fn scheduled_exploration(&self, episode: u64) -> f64 {
        let decayed = self.config.max_exploration_rate
            * (-self.config.exploration_decay_rate * episode as f64).exp();
        decayed.max(self.config.min_exploration_rate)
    }

    /// Advance the exploration schedule to `episode`, snapshotting the
    /// Q-table to `repository` every `snapshot_interval` episodes.
    ///
    /// # Errors
    ///
    /// Propagates storage errors from the repository.
    pub fn update_exploration(
        &mut self,
        episode: u64,
        repository: &dyn TableRepository,
    ) -> Result<()> {
        self.exploration_rate = self.scheduled_exploration(episode);
        self.episode = episode;

        if episode.is_multiple_of(self.config.snapshot_interval) {
            let snapshot = self.snapshot(episode);
            let name = snapshot.name();
            repository.save(&snapshot, &name)?;
            info!(
                "Epsilon: {} | saving Q-table {name}",
                self.exploration_rate
            );
        }
        Ok(())
    }

    /// Capture the Q-table as a snapshot tagged with `episode`.
    pub fn snapshot(&self, episode: u64) -> QTableSnapshot {
        QTableSnapshot {
            version: QTableSnapshot::VERSION,
            role: self.role,
            episode,
            exploration_rate: self.exploration_rate,
            free_cells: self.index.free_cells(),
            values: self.q_table.values().to_vec(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn state_index(&self) -> &StateIndex {
        &self.index
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn q_table_mut(&mut self) -> &mut QTable {
        &mut self.q_table
    }

    pub fn exploration_rate(&self) -> f64 {
        self.exploration_rate
    }

    /// Last episode passed to [`update_exploration`], or the episode of the
    /// snapshot this agent was restored from. Zero for a fresh agent.
    ///
    /// [`update_exploration`]: QLearningAgent::update_exploration
    pub fn episode(&self) -> u64 {
        self.episode
    }
}
