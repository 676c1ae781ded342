//! Serialized form of a trained Q-table.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    maze::ACTION_COUNT,
    q_learning::{Role, StateIndex},
};

/// Snapshot of one agent's Q-table, tagged with role and episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTableSnapshot {
    pub version: u32,
    pub role: Role,
    pub episode: u64,
    pub exploration_rate: f64,
    /// Free cells of the maze the table was trained on
    pub free_cells: usize,
    pub values: Vec<[f64; ACTION_COUNT]>,
}

impl QTableSnapshot {
    pub const VERSION: u32 = 1;

    /// Storage name for a role at an episode, e.g. `QTableCat1000`.
    pub fn name_for(role: Role, episode: u64) -> String {
        format!("QTable{}{episode}", role.name())
    }

    pub fn name(&self) -> String {
        Self::name_for(self.role, self.episode)
    }

    /// Check that this snapshot can back an agent of `role` on the maze
    /// behind `index`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedSnapshotVersion`] for a different format version
    /// - [`Error::TableRoleMismatch`] if it was trained for the other role
    /// - [`Error::TableShapeMismatch`] if the row count is not `free_cells²`
    pub fn validate_for(&self, role: Role, index: &StateIndex) -> Result<()> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedSnapshotVersion {
                version: self.version,
                expected: Self::VERSION,
            });
        }
        if self.role != role {
            return Err(Error::TableRoleMismatch {
                expected: role.name().to_string(),
                got: self.role.name().to_string(),
            });
        }
        if self.values.len() != index.len() {
            return Err(Error::TableShapeMismatch {
                expected: index.len(),
                got: self.values.len(),
                free_cells: index.free_cells(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Maze;

    fn snapshot(role: Role, rows: usize) -> QTableSnapshot {
        QTableSnapshot {
            version: QTableSnapshot::VERSION,
            role,
            episode: 2000,
            exploration_rate: 0.5,
            free_cells: 2,
            values: vec![[0.25; ACTION_COUNT]; rows],
        }
    }

    #[test]
    fn test_snapshot_name() {
        assert_eq!(QTableSnapshot::name_for(Role::Cat, 1000), "QTableCat1000");
        assert_eq!(snapshot(Role::Mouse, 4).name(), "QTableMouse2000");
    }

    #[test]
    fn test_msgpack_roundtrip() {
        let saved = snapshot(Role::Cat, 4);
        let bytes = rmp_serde::to_vec(&saved).unwrap();
        let loaded: QTableSnapshot = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_validate_checks_shape() {
        let index = StateIndex::new(&Maze::open(1, 2).unwrap());
        assert!(snapshot(Role::Cat, 4).validate_for(Role::Cat, &index).is_ok());
        assert!(matches!(
            snapshot(Role::Cat, 9).validate_for(Role::Cat, &index),
            Err(Error::TableShapeMismatch {
                expected: 4,
                got: 9,
                free_cells: 2
            })
        ));
    }

    #[test]
    fn test_validate_checks_role_and_version() {
        let index = StateIndex::new(&Maze::open(1, 2).unwrap());
        assert!(matches!(
            snapshot(Role::Mouse, 4).validate_for(Role::Cat, &index),
            Err(Error::TableRoleMismatch { .. })
        ));

        let mut old = snapshot(Role::Cat, 4);
        old.version = 0;
        assert!(matches!(
            old.validate_for(Role::Cat, &index),
            Err(Error::UnsupportedSnapshotVersion { version: 0, .. })
        ));
    }
}
