//! Repository port for Q-table persistence.
//!
//! This module defines the trait boundary between the learning core and the
//! storage layer for Q-table snapshots.

use crate::{Result, q_learning::QTableSnapshot};

/// Port for persisting and loading Q-table snapshots.
///
/// Snapshots are addressed by name, e.g. `QTableCat1000`. How a name maps to
/// storage (file path, map key) is up to the adapter.
///
/// # Examples
///
/// ```no_run
/// use catmouse::ports::TableRepository;
/// use catmouse::q_learning::QTableSnapshot;
///
/// fn backup<R: TableRepository>(repo: &R, snapshot: &QTableSnapshot) -> catmouse::Result<()> {
///     repo.save(snapshot, &snapshot.name())
/// }
/// ```
pub trait TableRepository {
    /// Save a snapshot, replacing any snapshot stored under the same name.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The storage location cannot be created or written to
    /// - Serialization fails
    fn save(&self, snapshot: &QTableSnapshot, name: &str) -> Result<()>;

    /// Load a snapshot by name.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No snapshot is stored under `name`
    /// - The stored data cannot be deserialized
    fn load(&self, name: &str) -> Result<QTableSnapshot>;
}
