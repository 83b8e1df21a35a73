//! The generic store interface and its validity oracle.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::local_store::LocalFsStore;
use crate::store_path::{StoreDir, StorePath};
use crate::{Error, Result};

/// Answers whether a store path is registered as trustworthy.
///
/// Validity is independent of physical presence: a path may exist on disk
/// and still be unregistered.
pub trait ValidPaths: Send + Sync {
  fn is_valid(&self, path: &StorePath) -> bool;

  /// Every registered path, in no particular order.
  fn all(&self) -> Vec<StorePath>;
}

/// A store as seen by callers that don't care how it is realized.
pub trait Store: Send + Sync {
  fn store_dir(&self) -> &StoreDir;

  fn is_valid_path(&self, path: &StorePath) -> bool;

  /// Short human-readable identifier, used in error messages.
  fn uri(&self) -> String;

  /// Recover the local filesystem store behind a generic handle, if there is one.
  fn as_local_fs(self: Arc<Self>) -> Option<Arc<LocalFsStore>> {
    None
  }

  fn print_store_path(&self, path: &StorePath) -> String {
    self.store_dir().print_path(path)
  }
}

/// Immutable set of registered store paths.
#[derive(Debug, Clone, Default)]
pub struct ValidPathSet {
  paths: HashSet<StorePath>,
}

impl ValidPathSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Load a registry file: a JSON array of base names.
  ///
  /// Returns an empty set if the file doesn't exist.
  pub fn load(path: &Path) -> Result<Self> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "no path registry, starting empty");
        return Ok(Self::new());
      }
      Err(e) => return Err(Error::io(path, e)),
    };

    let paths: Vec<StorePath> = serde_json::from_str(&content).map_err(|e| Error::Registry {
      path: path.to_path_buf(),
      message: e.to_string(),
    })?;

    debug!(path = %path.display(), count = paths.len(), "loaded path registry");
    Ok(paths.into_iter().collect())
  }

  pub fn len(&self) -> usize {
    self.paths.len()
  }

  pub fn is_empty(&self) -> bool {
    self.paths.is_empty()
  }
}

impl FromIterator<StorePath> for ValidPathSet {
  fn from_iter<I: IntoIterator<Item = StorePath>>(iter: I) -> Self {
    Self {
      paths: iter.into_iter().collect(),
    }
  }
}

impl ValidPaths for ValidPathSet {
  fn is_valid(&self, path: &StorePath) -> bool {
    self.paths.contains(path)
  }

  fn all(&self) -> Vec<StorePath> {
    self.paths.iter().cloned().collect()
  }
}
