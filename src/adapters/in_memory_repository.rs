//! In-memory Q-table repository for testing.
//!
//! This adapter provides a pure in-memory implementation of TableRepository,
//! enabling fast tests without any file system I/O.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::{Result, error::Error, ports::TableRepository, q_learning::QTableSnapshot};

/// In-memory repository for testing.
///
/// Stores serialized snapshots in a shared HashMap. All clones share the same
/// underlying storage.
///
/// # Examples
///
/// ```
/// use catmouse::adapters::InMemoryRepository;
/// use catmouse::app::AgentConfig;
/// use catmouse::maze::Maze;
/// use catmouse::ports::TableRepository;
/// use catmouse::q_learning::{QLearningAgent, Role};
///
/// let repo = InMemoryRepository::new();
/// let agent = QLearningAgent::new(Role::Cat, Maze::open(2, 2)?, AgentConfig::default())?;
///
/// repo.save(&agent.snapshot(0), "QTableCat0")?;
/// let loaded = repo.load("QTableCat0")?;
/// assert_eq!(loaded.values.len(), 16);
/// # Ok::<(), catmouse::Error>(())
/// ```
#[derive(Clone)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Get the number of snapshots currently stored.
    pub fn count(&self) -> usize {
        self.storage.lock().unwrap().len()
    }

    /// Clear all stored snapshots.
    pub fn clear(&self) {
        self.storage.lock().unwrap().clear();
    }

    /// Check if a snapshot exists under the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.storage.lock().unwrap().contains_key(name)
    }

    /// Stored snapshot names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.storage.lock().unwrap().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRepository for InMemoryRepository {
    fn save(&self, snapshot: &QTableSnapshot, name: &str) -> Result<()> {
        let bytes = rmp_serde::to_vec(snapshot).map_err(|e| Error::SerializationContext {
            operation: "serialize Q-table for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage.lock().unwrap().insert(name.to_string(), bytes);
        Ok(())
    }

    fn load(&self, name: &str) -> Result<QTableSnapshot> {
        let storage = self.storage.lock().unwrap();

        let bytes = storage.get(name).ok_or_else(|| Error::Io {
            operation: format!("load Q-table '{name}' from in-memory storage"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;

        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "deserialize Q-table from in-memory storage".to_string(),
            message: e.to_string(),
        })
    }
}
