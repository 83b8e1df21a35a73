//! Error types for lstore-lib

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in store operations
#[derive(Debug, Error)]
pub enum Error {
  /// The validity gate rejected a path: it may exist on disk but is not registered.
  #[error("path '{0}' is not a valid store path")]
  InvalidPath(String),

  /// Export of a path that is not registered in the store.
  #[error("path '{0}' is not valid")]
  PathNotValid(String),

  #[error("invalid store path '{path}': {reason}")]
  BadStorePath { path: String, reason: String },

  #[error("path '{path}' is not in the store directory '{store_dir}'")]
  NotInStore { path: String, store_dir: String },

  #[error("store '{0}' is not a local filesystem store")]
  NotLocalFsStore(String),

  #[error("path '{0}' does not exist")]
  PathNotFound(String),

  #[error("path '{0}' is not a directory")]
  NotADirectory(String),

  #[error("path '{0}' is not a regular file")]
  NotARegularFile(String),

  #[error("path '{0}' is not a symlink")]
  NotASymlink(String),

  /// A directory entry name or symlink target that can't be represented as a `CanonPath`.
  #[error("path '{0}' has a name or symlink target that is not valid UTF-8")]
  NonUtf8Name(String),

  #[error("IO error on '{}': {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to decompress {method} data: {message}")]
  Decompression { method: String, message: String },

  #[error("unknown compression method '{0}'")]
  UnknownCompression(String),

  #[error("unsupported store URI '{0}'")]
  UnsupportedStoreUri(String),

  #[error("failed to load path registry '{}': {message}", path.display())]
  Registry { path: PathBuf, message: String },
}

impl Error {
  pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    Error::Io {
      path: path.into(),
      source,
    }
  }
}
