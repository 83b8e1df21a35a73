//! Build log lookup.
//!
//! Logs have been written under two layouts over time, each either plain or
//! bzip2-compressed:
//!
//! ```text
//! <log dir>/drvs/<first 2 chars>/<rest>[.bz2]   # sharded
//! <log dir>/drvs/<base name>[.bz2]              # flat
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::LocalFsStore;
use crate::compression::decompress;
use crate::consts::DRVS_LOG_DIR;
use crate::store_path::StorePath;
use crate::{Error, Result};

impl LocalFsStore {
  /// Find the build log of `path`, searching the sharded layout before the flat one.
  ///
  /// Returns `Ok(None)` when no log exists. A compressed log that can't be read or
  /// decompressed is skipped.
  pub fn get_build_log(&self, path: &StorePath) -> Result<Option<Vec<u8>>> {
    for log_path in log_candidates(&self.config().log_dir, path) {
      if exists(&log_path) {
        debug!(path = %log_path.display(), "found build log");
        return fs::read(&log_path).map(Some).map_err(|e| Error::io(&log_path, e));
      }

      let bz2_path = with_bz2_suffix(&log_path);
      if !exists(&bz2_path) {
        continue;
      }

      let decompressed = fs::read(&bz2_path)
        .map_err(|e| Error::io(&bz2_path, e))
        .and_then(|data| decompress("bzip2", &data));
      match decompressed {
        Ok(log) => {
          debug!(path = %bz2_path.display(), "found compressed build log");
          return Ok(Some(log));
        }
        Err(e) => {
          debug!(path = %bz2_path.display(), error = %e, "skipping unreadable compressed build log");
        }
      }
    }

    Ok(None)
  }
}

/// Plain log locations for `path`: sharded first, then flat.
fn log_candidates(log_dir: &Path, path: &StorePath) -> [PathBuf; 2] {
  let base_name = path.to_string();
  let drvs = log_dir.join(DRVS_LOG_DIR);
  let (shard, rest) = base_name.split_at(2);
  [drvs.join(shard).join(rest), drvs.join(&base_name)]
}

fn with_bz2_suffix(path: &Path) -> PathBuf {
  let mut name = path.as_os_str().to_owned();
  name.push(".bz2");
  PathBuf::from(name)
}

fn exists(path: &Path) -> bool {
  fs::symlink_metadata(path).is_ok()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::local_store::tests::test_store;
  use std::io::Write;
  use tempfile::TempDir;
  use tracing_test::traced_test;

  const DRV: &str = "7rjj86a15146cq1d3qy068lml7n8ykzm-hello-2.12.drv";

  fn drv() -> StorePath {
    StorePath::from_base_name(DRV).unwrap()
  }

  fn sharded(temp: &TempDir) -> PathBuf {
    temp.path().join("log/drvs/7r/jj86a15146cq1d3qy068lml7n8ykzm-hello-2.12.drv")
  }

  fn flat(temp: &TempDir) -> PathBuf {
    temp.path().join("log/drvs").join(DRV)
  }

  fn write(path: &Path, data: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, data).unwrap();
  }

  fn bzip2_bytes(data: &[u8]) -> Vec<u8> {
    let mut encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
  }

  #[test]
  fn candidates_are_sharded_then_flat() {
    let [first, second] = log_candidates(Path::new("/logs"), &drv());
    assert_eq!(first, PathBuf::from("/logs/drvs/7r/jj86a15146cq1d3qy068lml7n8ykzm-hello-2.12.drv"));
    assert_eq!(second, PathBuf::from("/logs/drvs").join(DRV));
    assert_eq!(with_bz2_suffix(&second), PathBuf::from("/logs/drvs").join(format!("{}.bz2", DRV)));
  }

  #[test]
  fn missing_log_is_none() {
    let temp = TempDir::new().unwrap();
    let store = test_store(&temp);
    assert_eq!(store.get_build_log(&drv()).unwrap(), None);
  }

  #[test]
  fn sharded_plain_log_wins_over_flat() {
    let temp = TempDir::new().unwrap();
    let store = test_store(&temp);
    write(&sharded(&temp), b"sharded");
    write(&flat(&temp), b"flat");

    assert_eq!(store.get_build_log(&drv()).unwrap(), Some(b"sharded".to_vec()));
  }

  #[test]
  fn flat_plain_log_is_found() {
    let temp = TempDir::new().unwrap();
    let store = test_store(&temp);
    write(&flat(&temp), b"flat");

    assert_eq!(store.get_build_log(&drv()).unwrap(), Some(b"flat".to_vec()));
  }

  #[test]
  fn compressed_log_is_decompressed() {
    let temp = TempDir::new().unwrap();
    let store = test_store(&temp);
    write(&with_bz2_suffix(&sharded(&temp)), &bzip2_bytes(b"compressed log"));

    assert_eq!(store.get_build_log(&drv()).unwrap(), Some(b"compressed log".to_vec()));
  }

  #[test]
  fn sharded_compressed_log_wins_over_flat_plain() {
    let temp = TempDir::new().unwrap();
    let store = test_store(&temp);
    write(&with_bz2_suffix(&sharded(&temp)), &bzip2_bytes(b"sharded compressed"));
    write(&flat(&temp), b"flat plain");

    assert_eq!(store.get_build_log(&drv()).unwrap(), Some(b"sharded compressed".to_vec()));
  }

  #[test]
  fn unreadable_plain_log_is_an_error() {
    let temp = TempDir::new().unwrap();
    let store = test_store(&temp);
    // A directory at the sharded location passes the existence check but reads fail.
    fs::create_dir_all(sharded(&temp)).unwrap();
    write(&flat(&temp), b"flat");

    assert!(matches!(store.get_build_log(&drv()), Err(Error::Io { .. })));
  }

  #[test]
  fn plain_log_preferred_over_compressed_sibling() {
    let temp = TempDir::new().unwrap();
    let store = test_store(&temp);
    write(&flat(&temp), b"plain");
    write(&with_bz2_suffix(&flat(&temp)), &bzip2_bytes(b"compressed"));

    assert_eq!(store.get_build_log(&drv()).unwrap(), Some(b"plain".to_vec()));
  }

  #[test]
  #[traced_test]
  fn corrupt_compressed_log_falls_through_to_flat() {
    let temp = TempDir::new().unwrap();
    let store = test_store(&temp);
    write(&with_bz2_suffix(&sharded(&temp)), b"not bzip2 at all");
    write(&with_bz2_suffix(&flat(&temp)), &bzip2_bytes(b"flat compressed"));

    assert_eq!(store.get_build_log(&drv()).unwrap(), Some(b"flat compressed".to_vec()));
    assert!(logs_contain("skipping unreadable compressed build log"));
  }

  #[test]
  fn corrupt_compressed_log_alone_is_none() {
    let temp = TempDir::new().unwrap();
    let store = test_store(&temp);
    write(&with_bz2_suffix(&sharded(&temp)), b"garbage");
    write(&with_bz2_suffix(&flat(&temp)), b"more garbage");

    assert_eq!(store.get_build_log(&drv()).unwrap(), None);
  }
}
