//! Store-aware file tree accessor.

use std::io::Write;
use std::sync::Arc;

use tracing::debug;

use super::LocalFsStore;
use crate::accessor::{DirEntries, PosixAccessor, SourceAccessor, Stat};
use crate::canon_path::CanonPath;
use crate::store::Store;
use crate::{Error, Result};

/// Serves virtual store paths (`/nix/store/<hash>-<name>/...`) from the store's real root.
///
/// Holds no mutable state, so one accessor can be shared across threads.
pub struct LocalStoreAccessor {
  store: Arc<LocalFsStore>,
  require_valid_path: bool,
  real: PosixAccessor,
}

impl LocalStoreAccessor {
  pub fn new(store: Arc<LocalFsStore>, require_valid_path: bool) -> Self {
    let real = PosixAccessor::new(store.real_root());
    Self {
      store,
      require_valid_path,
      real,
    }
  }

  /// Map a virtual path to its location under the real root, enforcing validity.
  fn to_real_path(&self, path: &CanonPath) -> Result<CanonPath> {
    let (store_path, rest) = self.store.store_dir().to_store_path(path)?;
    if self.require_valid_path && !self.store.is_valid_path(&store_path) {
      debug!(path = %path, "refusing access to unregistered store path");
      return Err(Error::InvalidPath(self.store.print_store_path(&store_path)));
    }

    let mut real = CanonPath::root();
    real.push(&store_path.to_string());
    Ok(real.join(&rest))
  }
}

impl SourceAccessor for LocalStoreAccessor {
  fn maybe_lstat(&self, path: &CanonPath) -> Result<Option<Stat>> {
    // The store directory and its parents have no single backing directory.
    if self.store.store_dir().as_canon().is_within(path) {
      return Ok(Some(Stat::directory()));
    }
    self.real.maybe_lstat(&self.to_real_path(path)?)
  }

  fn read_directory(&self, path: &CanonPath) -> Result<DirEntries> {
    self.real.read_directory(&self.to_real_path(path)?)
  }

  fn read_file(&self, path: &CanonPath, sink: &mut dyn Write, size_callback: &mut dyn FnMut(u64)) -> Result<()> {
    self.real.read_file(&self.to_real_path(path)?, sink, size_callback)
  }

  fn read_link(&self, path: &CanonPath) -> Result<String> {
    self.real.read_link(&self.to_real_path(path)?)
  }
}
