//! Dependency injection container for the pursuit application.
//!
//! The container owns the storage backend and builds agents wired to it.

use std::{path::PathBuf, sync::Arc};

use super::config::AgentConfig;
use crate::{
    Result,
    adapters::MsgPackRepository,
    maze::Maze,
    ports::TableRepository,
    q_learning::{QLearningAgent, QTableSnapshot, Role},
};

/// Default directory for Q-table snapshots
pub const DEFAULT_DATA_DIR: &str = "data";

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```
/// use catmouse::app::{AgentConfig, App};
/// use catmouse::maze::Maze;
/// use catmouse::q_learning::Role;
///
/// let app = App::new();
/// let maze = Maze::open(3, 3)?;
/// let cat = app.create_agent(Role::Cat, &maze, AgentConfig::for_role(Role::Cat))?;
/// # let _ = cat;
/// # Ok::<(), catmouse::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use catmouse::adapters::InMemoryRepository;
/// use catmouse::app::App;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Repository for Q-table persistence
    table_repository: Arc<dyn TableRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app storing snapshots under [`DEFAULT_DATA_DIR`].
    pub fn new() -> Self {
        Self::with_data_dir(DEFAULT_DATA_DIR)
    }

    /// Create an app storing MessagePack snapshots under `dir`.
    pub fn with_data_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            table_repository: Arc::new(MsgPackRepository::new(dir)),
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// Get the table repository.
    pub fn table_repository(&self) -> Arc<dyn TableRepository + Send + Sync> {
        Arc::clone(&self.table_repository)
    }

    fn seeded(&self, config: AgentConfig) -> AgentConfig {
        match (config.seed, self.default_seed) {
            (None, Some(seed)) => config.with_seed(seed),
            _ => config,
        }
    }

    /// Create an untrained agent for `role` on `maze`.
    ///
    /// A seed in `config` wins over the app's default seed.
    pub fn create_agent(
        &self,
        role: Role,
        maze: &Maze,
        config: AgentConfig,
    ) -> Result<QLearningAgent> {
        QLearningAgent::new(role, maze.clone(), self.seeded(config))
    }

    /// Load an agent from the snapshot stored under `name`.
    ///
    /// # Errors
    ///
    /// Fails if the snapshot is missing, belongs to the other role, or was
    /// trained on a maze with a different number of free cells.
    pub fn load_agent(
        &self,
        role: Role,
        maze: &Maze,
        name: &str,
        config: AgentConfig,
    ) -> Result<QLearningAgent> {
        let snapshot = self.table_repository.load(name)?;
        QLearningAgent::from_snapshot(role, maze.clone(), self.seeded(config), snapshot)
    }

    /// Save an agent's Q-table tagged with `episode`, returning the name it
    /// was stored under.
    pub fn save_agent(&self, agent: &QLearningAgent, episode: u64) -> Result<String> {
        let snapshot = agent.snapshot(episode);
        let name = QTableSnapshot::name_for(agent.role(), episode);
        self.table_repository.save(&snapshot, &name)?;
        Ok(name)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
///
/// Primarily used for testing to inject in-memory repositories and control
/// randomness.
pub struct AppBuilder {
    table_repository: Option<Arc<dyn TableRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    /// Create a new app builder.
    pub fn new() -> Self {
        Self {
            table_repository: None,
            default_seed: None,
        }
    }

    /// Set the table repository.
    pub fn with_repository<R>(mut self, repository: R) -> Self
    where
        R: TableRepository + Send + Sync + 'static,
    {
        self.table_repository = Some(Arc::new(repository));
        self
    }

    /// Set the default random seed for all agents.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app.
    ///
    /// Falls back to a MessagePack repository under [`DEFAULT_DATA_DIR`].
    pub fn build(self) -> App {
        App {
            table_repository: self
                .table_repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new(DEFAULT_DATA_DIR))),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{adapters::InMemoryRepository, maze::Action};

    #[test]
    fn test_create_agent_uses_default_seed() {
        let app = App::for_testing()
            .with_repository(InMemoryRepository::new())
            .with_default_seed(42)
            .build();
        let maze = Maze::open(2, 2).unwrap();

        let agent = app
            .create_agent(Role::Cat, &maze, AgentConfig::for_role(Role::Cat))
            .unwrap();
        assert_eq!(agent.config().seed, Some(42));

        let explicit = app
            .create_agent(Role::Cat, &maze, AgentConfig::for_role(Role::Cat).with_seed(7))
            .unwrap();
        assert_eq!(explicit.config().seed, Some(7));
    }

    #[test]
    fn test_save_and_load_agent() {
        let repo = InMemoryRepository::new();
        let app = App::for_testing().with_repository(repo.clone()).build();
        let maze = Maze::open(2, 2).unwrap();

        let mut agent = app
            .create_agent(Role::Mouse, &maze, AgentConfig::for_role(Role::Mouse))
            .unwrap();
        agent.q_table_mut().set(3, Action::Down, -2.5);

        let name = app.save_agent(&agent, 3000).unwrap();
        assert_eq!(name, "QTableMouse3000");
        assert!(repo.contains(&name));

        let loaded = app
            .load_agent(Role::Mouse, &maze, &name, AgentConfig::for_role(Role::Mouse))
            .unwrap();
        assert_eq!(loaded.q_table(), agent.q_table());
    }

    #[test]
    fn test_load_agent_for_other_role_fails() {
        let app = App::for_testing()
            .with_repository(InMemoryRepository::new())
            .build();
        let maze = Maze::open(2, 2).unwrap();
        let cat = app
            .create_agent(Role::Cat, &maze, AgentConfig::for_role(Role::Cat))
            .unwrap();
        let name = app.save_agent(&cat, 0).unwrap();

        assert!(
            app.load_agent(Role::Mouse, &maze, &name, AgentConfig::for_role(Role::Mouse))
                .is_err()
        );
    }
}
