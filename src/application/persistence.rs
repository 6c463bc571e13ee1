//! Family tree persistence
//!
//! The tree lives as one JSON document under a single well-known key in
//! storage local to the device. Loading never fails on bad content: an
//! unparsable or structurally broken document is replaced by the default
//! single-member tree, and the reason is reported alongside.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, FileOp, IoResultExt};
use crate::domain::{validate, TreeDocument};
use crate::infrastructure::traits::FileSystem;

/// Storage key used by earlier versions of the widget.
pub const DEFAULT_STORAGE_KEY: &str = "familyTreeData";

/// Where a loaded tree came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    /// Parsed from storage.
    Stored,
    /// Parsed from storage written before members had ids; `assigned`
    /// members received new ids that are not saved yet.
    Migrated { assigned: usize },
    /// Nothing stored yet; default tree.
    Missing,
    /// Stored content was unusable; default tree.
    Recovered { reason: String },
}

#[derive(Debug, Clone)]
pub struct LoadedTree {
    pub tree: TreeDocument,
    pub source: LoadSource,
}

/// Load/save boundary for the family tree.
pub trait PersistenceAdapter: Send + Sync {
    /// Read the stored tree, falling back to the default on bad content.
    ///
    /// Only I/O failures other than "nothing stored" are errors.
    fn load(&self) -> ApplicationResult<LoadedTree>;

    /// Replace the stored tree.
    fn save(&self, tree: &TreeDocument) -> ApplicationResult<()>;
}

/// Turn stored text into a tree, or explain why it cannot be used.
pub fn decode(raw: &str) -> Result<LoadedTree, String> {
    let mut tree: TreeDocument =
        serde_json::from_str(raw).map_err(|e| format!("parse: {e}"))?;
    let assigned = tree.assign_missing_ids();
    let violations = validate(&tree);
    if let Some(first) = violations.first() {
        return Err(format!(
            "invalid tree ({} violation(s)), first: {}",
            violations.len(),
            first
        ));
    }
    let source = if assigned == 0 {
        LoadSource::Stored
    } else {
        LoadSource::Migrated { assigned }
    };
    Ok(LoadedTree { tree, source })
}

pub fn encode(tree: &TreeDocument) -> ApplicationResult<String> {
    serde_json::to_string_pretty(tree).map_err(|e| ApplicationError::OperationFailed {
        context: "serialize family tree".to_string(),
        source: Box::new(e),
    })
}

fn from_raw(raw: Option<String>) -> LoadedTree {
    match raw {
        None => LoadedTree {
            tree: TreeDocument::default(),
            source: LoadSource::Missing,
        },
        Some(raw) => match decode(&raw) {
            Ok(loaded) => loaded,
            Err(reason) => {
                warn!("stored family tree unusable, starting fresh: {}", reason);
                LoadedTree {
                    tree: TreeDocument::default(),
                    source: LoadSource::Recovered { reason },
                }
            }
        },
    }
}

/// JSON file `<dir>/<key>.json`.
pub struct JsonFileStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(fs: Arc<dyn FileSystem>, dir: &Path, key: &str) -> Self {
        Self {
            fs,
            path: dir.join(format!("{key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceAdapter for JsonFileStore {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> ApplicationResult<LoadedTree> {
        if !self.fs.exists(&self.path) {
            debug!("no stored tree");
            return Ok(from_raw(None));
        }
        let raw = self
            .fs
            .read_to_string(&self.path)
            .file_context(FileOp::ReadTree, &self.path)?;
        Ok(from_raw(Some(raw)))
    }

    #[instrument(level = "debug", skip(self, tree), fields(path = %self.path.display()))]
    fn save(&self, tree: &TreeDocument) -> ApplicationResult<()> {
        let json = encode(tree)?;
        self.fs
            .ensure_parent(&self.path)
            .file_context(FileOp::CreateDir, &self.path)?;
        self.fs
            .write_atomic(&self.path, &json)
            .file_context(FileOp::SaveTree, &self.path)?;
        debug!("saved {} bytes", json.len());
        Ok(())
    }
}

/// In-process store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    raw: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with raw text, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

impl PersistenceAdapter for MemoryStore {
    fn load(&self) -> ApplicationResult<LoadedTree> {
        Ok(from_raw(self.raw()))
    }

    fn save(&self, tree: &TreeDocument) -> ApplicationResult<()> {
        let json = encode(tree)?;
        let mut guard = self.raw.lock().map_err(|_| ApplicationError::OperationFailed {
            context: "memory store lock poisoned".to_string(),
            source: "poisoned".into(),
        })?;
        *guard = Some(json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_empty_store_when_loading_then_default_root() {
        let loaded = MemoryStore::new().load().unwrap();
        assert_eq!(loaded.source, LoadSource::Missing);
        assert_eq!(loaded.tree.name, "Root Family");
    }

    #[test]
    fn given_garbage_when_loading_then_recovers_with_default() {
        let loaded = MemoryStore::with_raw("{not json").load().unwrap();
        assert!(matches!(loaded.source, LoadSource::Recovered { .. }));
        assert!(loaded.tree.is_leaf());
    }

    #[test]
    fn given_rank_violation_when_loading_then_recovers_with_default() {
        let raw = r#"{"name": "R", "attributes": {"rank": 1, "hasChildren": true},
                      "children": [{"name": "C", "attributes": {"rank": 5}}]}"#;
        let loaded = MemoryStore::with_raw(raw).load().unwrap();
        let LoadSource::Recovered { reason } = loaded.source else {
            panic!("expected recovery");
        };
        assert!(reason.contains("rank"), "{reason}");
    }

    #[test]
    fn given_overflowing_root_rank_when_loading_then_recovers_without_panic() {
        let raw = r#"{"name": "R", "attributes": {"rank": 4294967295, "hasChildren": true},
                      "children": [{"name": "C", "attributes": {"rank": 1}}]}"#;
        let loaded = MemoryStore::with_raw(raw).load().unwrap();
        assert!(matches!(loaded.source, LoadSource::Recovered { .. }));
        assert!(loaded.tree.is_leaf());
    }

    #[test]
    fn given_root_rank_seven_when_loading_then_recovers_with_default() {
        let raw = r#"{"name": "R", "attributes": {"rank": 7}}"#;
        let loaded = MemoryStore::with_raw(raw).load().unwrap();
        let LoadSource::Recovered { reason } = loaded.source else {
            panic!("expected recovery");
        };
        assert!(reason.contains("root rank"), "{reason}");
        assert_eq!(loaded.tree.attributes.rank, 1);
    }

    #[test]
    fn given_document_without_ids_when_loading_then_migrated() {
        let raw = r#"{"name": "R", "attributes": {"rank": 1, "hasChildren": true},
                      "children": [{"name": "C", "attributes": {"rank": 2}}]}"#;
        let loaded = MemoryStore::with_raw(raw).load().unwrap();
        assert_eq!(loaded.source, LoadSource::Migrated { assigned: 2 });
    }

    #[test]
    fn given_saved_tree_when_loading_then_equal() {
        let store = MemoryStore::new();
        let tree = TreeDocument::default();
        store.save(&tree).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.source, LoadSource::Stored);
        assert_eq!(loaded.tree, tree);
    }
}
