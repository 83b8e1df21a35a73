//! The store realized on a local filesystem.
//!
//! # Layout
//!
//! ```text
//! <real root>/                  # configured root, or the store directory itself
//! └── <hash>-<name>/...         # store path contents
//! <log dir>/drvs/
//! ├── <first 2>/<rest>[.bz2]    # sharded build logs
//! └── <base>[.bz2]              # flat build logs
//! <state dir>/valid-paths.json  # registered store paths
//! ```

mod accessor;
mod logs;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::archive;
use crate::config::LocalFsStoreConfig;
use crate::store::{Store, ValidPathSet, ValidPaths};
use crate::store_path::{StoreDir, StorePath};
use crate::{Error, Result};

pub use accessor::LocalStoreAccessor;

pub struct LocalFsStore {
  config: LocalFsStoreConfig,
  valid_paths: Arc<dyn ValidPaths>,
}

impl LocalFsStore {
  pub fn new(config: LocalFsStoreConfig, valid_paths: Arc<dyn ValidPaths>) -> Self {
    Self { config, valid_paths }
  }

  /// Open a store, loading its path registry from the state directory.
  pub fn open(config: LocalFsStoreConfig) -> Result<Self> {
    let valid_paths = ValidPathSet::load(&config.valid_paths_file())?;
    debug!(
      store_dir = %config.store_dir,
      real_root = %real_root_of(&config).display(),
      registered = valid_paths.len(),
      "opened local store"
    );
    Ok(Self::new(config, Arc::new(valid_paths)))
  }

  pub fn config(&self) -> &LocalFsStoreConfig {
    &self.config
  }

  /// The real directory that holds the store path directories.
  pub fn real_root(&self) -> PathBuf {
    real_root_of(&self.config)
  }

  /// Real on-disk location of a store path.
  pub fn real_path(&self, path: &StorePath) -> PathBuf {
    self.real_root().join(path.to_string())
  }

  /// A read-only file tree over the store's virtual paths.
  ///
  /// With `require_valid_path`, paths not registered in the store are refused.
  pub fn get_accessor(self: &Arc<Self>, require_valid_path: bool) -> LocalStoreAccessor {
    LocalStoreAccessor::new(Arc::clone(self), require_valid_path)
  }

  /// Serialize a valid store path into `sink` as an archive.
  pub fn export_archive(&self, path: &StorePath, sink: &mut dyn Write) -> Result<()> {
    if !self.is_valid_path(path) {
      return Err(Error::PathNotValid(self.print_store_path(path)));
    }
    archive::dump_path(&self.real_path(path), sink)
  }

  /// Registered store paths, sorted by base name.
  pub fn query_valid_paths(&self) -> Vec<StorePath> {
    let mut paths = self.valid_paths.all();
    paths.sort();
    paths
  }
}

fn real_root_of(config: &LocalFsStoreConfig) -> PathBuf {
  match &config.root_dir {
    Some(root) => root.clone(),
    None => PathBuf::from(config.store_dir.as_canon().abs()),
  }
}

impl Store for LocalFsStore {
  fn store_dir(&self) -> &StoreDir {
    &self.config.store_dir
  }

  fn is_valid_path(&self, path: &StorePath) -> bool {
    self.valid_paths.is_valid(path)
  }

  fn uri(&self) -> String {
    match &self.config.root_dir {
      Some(root) => format!("local?root={}", root.display()),
      None => "local".to_string(),
    }
  }

  fn as_local_fs(self: Arc<Self>) -> Option<Arc<LocalFsStore>> {
    Some(self)
  }
}

/// Get an accessor from a generic store handle.
///
/// Fails with `NotLocalFsStore` if the handle isn't backed by a local filesystem store.
pub fn fs_accessor(store: Arc<dyn Store>, require_valid_path: bool) -> Result<LocalStoreAccessor> {
  let uri = store.uri();
  let local = store.as_local_fs().ok_or(Error::NotLocalFsStore(uri))?;
  Ok(local.get_accessor(require_valid_path))
}
