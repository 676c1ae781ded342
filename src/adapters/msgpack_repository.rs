//! MessagePack implementation of the Q-table repository.
//!
//! This adapter implements the TableRepository port using rmp_serde for
//! compact binary serialization.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{Result, error::Error, ports::TableRepository, q_learning::QTableSnapshot};

/// MessagePack-based Q-table repository.
///
/// Stores each snapshot as `<root>/<name>.msgpack`. Saving over an existing
/// name replaces the file.
///
/// # Examples
///
/// ```no_run
/// use catmouse::adapters::MsgPackRepository;
/// use catmouse::ports::TableRepository;
///
/// let repo = MsgPackRepository::new("data");
/// let snapshot = repo.load("QTableCat1000")?;
/// # Ok::<(), catmouse::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MsgPackRepository {
    root: PathBuf,
}

impl MsgPackRepository {
    /// Create a repository rooted at `root`. The directory is created on the
    /// first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing a snapshot name.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.msgpack"))
    }
}

impl TableRepository for MsgPackRepository {
    fn save(&self, snapshot: &QTableSnapshot, name: &str) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|source| Error::Io {
            operation: format!("create directory {:?}", self.root),
            source,
        })?;

        let path = self.path_for(name);
        let file = File::create(&path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, snapshot).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize Q-table to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("write file {path:?}"),
            source,
        })?;

        Ok(())
    }

    fn load(&self, name: &str) -> Result<QTableSnapshot> {
        let path = self.path_for(name);
        let file = File::open(&path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        rmp_serde::decode::from_read(BufReader::new(file)).map_err(|e| {
            Error::SerializationContext {
                operation: "deserialize Q-table from MessagePack".to_string(),
                message: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::q_learning::Role;

    fn snapshot(episode: u64, fill: f64) -> QTableSnapshot {
        QTableSnapshot {
            version: QTableSnapshot::VERSION,
            role: Role::Cat,
            episode,
            exploration_rate: 0.3,
            free_cells: 2,
            values: vec![[fill; 5]; 4],
        }
    }

    #[test]
    fn test_msgpack_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = MsgPackRepository::new(temp_dir.path().join("data"));

        let saved = snapshot(1000, 0.5);
        repo.save(&saved, &saved.name()).expect("Failed to save");
        assert!(repo.path_for("QTableCat1000").exists());

        let loaded = repo.load("QTableCat1000").expect("Failed to load");
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_repeated_save_overwrites() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = MsgPackRepository::new(temp_dir.path());

        repo.save(&snapshot(1000, 0.5), "QTableCat1000").unwrap();
        repo.save(&snapshot(1000, 2.0), "QTableCat1000").unwrap();

        let loaded = repo.load("QTableCat1000").unwrap();
        assert_eq!(loaded.values[0][0], 2.0);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_reports_failed_write() {
        let full = Path::new("/dev/full");
        if !full.exists() {
            return;
        }
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = MsgPackRepository::new(temp_dir.path());
        std::os::unix::fs::symlink(full, repo.path_for("QTableCat0")).unwrap();

        let result = repo.save(&snapshot(0, 1.0), "QTableCat0");
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = MsgPackRepository::new(temp_dir.path());
        assert!(matches!(repo.load("QTableCat42"), Err(Error::Io { .. })));
    }

    #[test]
    fn test_load_garbage_returns_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = MsgPackRepository::new(temp_dir.path());
        fs::write(repo.path_for("broken"), b"not msgpack").unwrap();
        assert!(matches!(
            repo.load("broken"),
            Err(Error::SerializationContext { .. })
        ));
    }
}
