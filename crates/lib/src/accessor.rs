//! Read-only file tree access.
//!
//! `SourceAccessor` is the generic capability: stat, list, read, readlink over
//! `CanonPath`s. `PosixAccessor` implements it over a real directory.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::canon_path::CanonPath;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
  Regular,
  Directory,
  Symlink,
  /// Sockets, devices, fifos.
  Misc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
  pub kind: FileKind,
  /// Size in bytes, for regular files.
  pub size: Option<u64>,
  pub is_executable: bool,
}

impl Stat {
  pub fn directory() -> Self {
    Self {
      kind: FileKind::Directory,
      size: None,
      is_executable: false,
    }
  }
}

/// Directory entries by name. The kind is `None` when it can't be determined cheaply.
pub type DirEntries = BTreeMap<String, Option<FileKind>>;

pub trait SourceAccessor: Send + Sync {
  /// Stat without following a final symlink. `Ok(None)` if nothing is there.
  fn maybe_lstat(&self, path: &CanonPath) -> Result<Option<Stat>>;

  fn read_directory(&self, path: &CanonPath) -> Result<DirEntries>;

  /// Stream the contents of a regular file into `sink`.
  ///
  /// `size_callback` receives the total size before any byte is written.
  fn read_file(&self, path: &CanonPath, sink: &mut dyn Write, size_callback: &mut dyn FnMut(u64)) -> Result<()>;

  fn read_link(&self, path: &CanonPath) -> Result<String>;

  fn lstat(&self, path: &CanonPath) -> Result<Stat> {
    self
      .maybe_lstat(path)?
      .ok_or_else(|| Error::PathNotFound(path.abs().to_string()))
  }

  fn path_exists(&self, path: &CanonPath) -> Result<bool> {
    Ok(self.maybe_lstat(path)?.is_some())
  }

  fn read_file_to_vec(&self, path: &CanonPath) -> Result<Vec<u8>> {
    let mut contents = Vec::new();
    self.read_file(path, &mut contents, &mut |_: u64| {})?;
    Ok(contents)
  }
}

/// Accessor over the real filesystem, rooted at a directory.
///
/// `CanonPath` `/a/b` maps to `<root>/a/b`.
#[derive(Debug, Clone)]
pub struct PosixAccessor {
  root: PathBuf,
}

impl PosixAccessor {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// The real path behind `path`.
  pub fn real_path(&self, path: &CanonPath) -> PathBuf {
    if path.is_root() {
      self.root.clone()
    } else {
      self.root.join(path.rel())
    }
  }
}

impl Default for PosixAccessor {
  fn default() -> Self {
    Self::new("/")
  }
}

fn kind_of(file_type: fs::FileType) -> FileKind {
  if file_type.is_file() {
    FileKind::Regular
  } else if file_type.is_dir() {
    FileKind::Directory
  } else if file_type.is_symlink() {
    FileKind::Symlink
  } else {
    FileKind::Misc
  }
}

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
  use std::os::unix::fs::PermissionsExt;
  metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &fs::Metadata) -> bool {
  false
}

impl SourceAccessor for PosixAccessor {
  fn maybe_lstat(&self, path: &CanonPath) -> Result<Option<Stat>> {
    let real = self.real_path(path);
    let metadata = match fs::symlink_metadata(&real) {
      Ok(metadata) => metadata,
      Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => return Ok(None),
      Err(e) => return Err(Error::io(real, e)),
    };

    let kind = kind_of(metadata.file_type());
    Ok(Some(Stat {
      kind,
      size: (kind == FileKind::Regular).then(|| metadata.len()),
      is_executable: kind == FileKind::Regular && is_executable(&metadata),
    }))
  }

  fn read_directory(&self, path: &CanonPath) -> Result<DirEntries> {
    if self.lstat(path)?.kind != FileKind::Directory {
      return Err(Error::NotADirectory(path.abs().to_string()));
    }

    let real = self.real_path(path);
    let mut entries = DirEntries::new();
    for entry in fs::read_dir(&real).map_err(|e| Error::io(&real, e))? {
      let entry = entry.map_err(|e| Error::io(&real, e))?;
      let kind = entry.file_type().ok().map(kind_of);
      let name = entry.file_name().into_string().map_err(|name| {
        let mut child = path.clone();
        child.push(&name.to_string_lossy());
        Error::NonUtf8Name(child.abs().to_string())
      })?;
      entries.insert(name, kind);
    }
    Ok(entries)
  }

  fn read_file(&self, path: &CanonPath, sink: &mut dyn Write, size_callback: &mut dyn FnMut(u64)) -> Result<()> {
    let stat = self.lstat(path)?;
    if stat.kind != FileKind::Regular {
      return Err(Error::NotARegularFile(path.abs().to_string()));
    }

    let real = self.real_path(path);
    let mut file = fs::File::open(&real).map_err(|e| Error::io(&real, e))?;
    let size = file.metadata().map_err(|e| Error::io(&real, e))?.len();
    size_callback(size);
    io::copy(&mut file, sink).map_err(|e| Error::io(&real, e))?;
    Ok(())
  }

  fn read_link(&self, path: &CanonPath) -> Result<String> {
    if self.lstat(path)?.kind != FileKind::Symlink {
      return Err(Error::NotASymlink(path.abs().to_string()));
    }

    let real = self.real_path(path);
    let target = fs::read_link(&real).map_err(|e| Error::io(&real, e))?;
    target
      .into_os_string()
      .into_string()
      .map_err(|_| Error::NonUtf8Name(path.abs().to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn accessor_with_tree() -> (TempDir, PosixAccessor) {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("dir/sub")).unwrap();
    fs::write(temp.path().join("dir/file.txt"), "hello").unwrap();
    #[cfg(unix)]
    std::os::unix::fs::symlink("file.txt", temp.path().join("dir/link")).unwrap();
    let accessor = PosixAccessor::new(temp.path());
    (temp, accessor)
  }

  #[test]
  fn lstat_reports_kind_and_size() {
    let (_temp, accessor) = accessor_with_tree();
    let stat = accessor.lstat(&CanonPath::new("/dir/file.txt")).unwrap();
    assert_eq!(stat.kind, FileKind::Regular);
    assert_eq!(stat.size, Some(5));
    assert_eq!(accessor.lstat(&CanonPath::new("/dir")).unwrap().kind, FileKind::Directory);
  }

  #[test]
  fn maybe_lstat_missing_is_none() {
    let (_temp, accessor) = accessor_with_tree();
    assert!(accessor.maybe_lstat(&CanonPath::new("/nope")).unwrap().is_none());
    assert!(accessor.maybe_lstat(&CanonPath::new("/dir/file.txt/below")).unwrap().is_none());
    assert!(matches!(
      accessor.lstat(&CanonPath::new("/nope")),
      Err(Error::PathNotFound(_))
    ));
  }

  #[test]
  fn read_directory_lists_entries() {
    let (_temp, accessor) = accessor_with_tree();
    let entries = accessor.read_directory(&CanonPath::new("/dir")).unwrap();
    assert_eq!(entries.get("file.txt"), Some(&Some(FileKind::Regular)));
    assert_eq!(entries.get("sub"), Some(&Some(FileKind::Directory)));
  }

  #[test]
  fn read_directory_on_file_fails() {
    let (_temp, accessor) = accessor_with_tree();
    assert!(matches!(
      accessor.read_directory(&CanonPath::new("/dir/file.txt")),
      Err(Error::NotADirectory(_))
    ));
  }

  #[test]
  fn read_file_reports_size_first() {
    let (_temp, accessor) = accessor_with_tree();
    let mut sink = Vec::new();
    let mut reported = None;
    accessor
      .read_file(&CanonPath::new("/dir/file.txt"), &mut sink, &mut |size: u64| reported = Some(size))
      .unwrap();
    assert_eq!(sink, b"hello");
    assert_eq!(reported, Some(5));
  }

  #[test]
  fn read_file_on_directory_fails() {
    let (_temp, accessor) = accessor_with_tree();
    assert!(matches!(
      accessor.read_file_to_vec(&CanonPath::new("/dir")),
      Err(Error::NotARegularFile(_))
    ));
  }

  #[test]
  #[cfg(unix)]
  fn read_link_returns_target() {
    let (_temp, accessor) = accessor_with_tree();
    assert_eq!(accessor.read_link(&CanonPath::new("/dir/link")).unwrap(), "file.txt");
    assert_eq!(
      accessor.lstat(&CanonPath::new("/dir/link")).unwrap().kind,
      FileKind::Symlink
    );
    assert!(matches!(
      accessor.read_link(&CanonPath::new("/dir/file.txt")),
      Err(Error::NotASymlink(_))
    ));
  }

  #[test]
  #[cfg(target_os = "linux")]
  fn non_utf8_names_are_rejected_not_mangled() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let (temp, accessor) = accessor_with_tree();
    let name = OsStr::from_bytes(b"caf\xe9");
    fs::write(temp.path().join("dir").join(name), "x").unwrap();
    std::os::unix::fs::symlink(name, temp.path().join("dir/sub/bad-link")).unwrap();

    assert!(matches!(
      accessor.read_directory(&CanonPath::new("/dir")),
      Err(Error::NonUtf8Name(path)) if path == "/dir/caf\u{FFFD}"
    ));
    assert!(matches!(
      accessor.read_link(&CanonPath::new("/dir/sub/bad-link")),
      Err(Error::NonUtf8Name(_))
    ));
  }
}
