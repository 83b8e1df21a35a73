//! Store path naming.
//!
//! A store path is named by its base name `<hash>-<name>`, where the hash is
//! 32 characters of the Nix base32 alphabet. The store directory turns base
//! names into absolute virtual paths and back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::canon_path::CanonPath;
use crate::consts::{DEFAULT_STORE_DIR, NIX_BASE32_CHARS, STORE_PATH_HASH_LEN, STORE_PATH_MAX_NAME_LEN};
use crate::{Error, Result};

/// An immutable, content-addressed store entry, independent of any store directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StorePath {
  hash: String,
  name: String,
}

impl StorePath {
  /// Parse a base name such as `7rjj86a15146cq1d3qy068lml7n8ykzm-hello-2.12`.
  pub fn from_base_name(base_name: &str) -> Result<Self> {
    let bad = |reason: &str| Error::BadStorePath {
      path: base_name.to_string(),
      reason: reason.to_string(),
    };

    if base_name.len() < STORE_PATH_HASH_LEN + 2 {
      return Err(bad("base name is too short"));
    }
    let Some((hash, rest)) = base_name.split_at_checked(STORE_PATH_HASH_LEN) else {
      return Err(bad("hash contains characters outside the base32 alphabet"));
    };
    if !hash.chars().all(|c| NIX_BASE32_CHARS.contains(c)) {
      return Err(bad("hash contains characters outside the base32 alphabet"));
    }
    let Some(name) = rest.strip_prefix('-') else {
      return Err(bad("missing '-' after the hash"));
    };
    validate_name(name).map_err(|reason| bad(&reason))?;

    Ok(Self {
      hash: hash.to_string(),
      name: name.to_string(),
    })
  }

  pub fn hash_part(&self) -> &str {
    &self.hash
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn is_derivation(&self) -> bool {
    self.name.ends_with(".drv")
  }
}

fn validate_name(name: &str) -> std::result::Result<(), String> {
  if name.is_empty() {
    return Err("name is empty".to_string());
  }
  if name.len() > STORE_PATH_MAX_NAME_LEN {
    return Err(format!("name is longer than {} characters", STORE_PATH_MAX_NAME_LEN));
  }
  if name.starts_with('.') {
    return Err("name starts with '.'".to_string());
  }
  if let Some(c) = name
    .chars()
    .find(|c| !(c.is_ascii_alphanumeric() || "+-._?=".contains(*c)))
  {
    return Err(format!("name contains forbidden character '{}'", c));
  }
  Ok(())
}

/// Renders the base name, without any store directory.
impl fmt::Display for StorePath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{}", self.hash, self.name)
  }
}

impl FromStr for StorePath {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::from_base_name(s)
  }
}

impl TryFrom<String> for StorePath {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> {
    Self::from_base_name(&s)
  }
}

impl From<StorePath> for String {
  fn from(path: StorePath) -> Self {
    path.to_string()
  }
}

/// The canonical store directory, e.g. `/nix/store`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreDir(CanonPath);

impl StoreDir {
  pub fn new(path: impl Into<CanonPath>) -> Self {
    Self(path.into())
  }

  pub fn as_canon(&self) -> &CanonPath {
    &self.0
  }

  /// Absolute virtual path of `path`, e.g. `/nix/store/<hash>-<name>`.
  pub fn print_path(&self, path: &StorePath) -> String {
    let mut printed = self.0.clone();
    printed.push(&path.to_string());
    printed.abs().to_string()
  }

  /// Parse an absolute path that names a store path exactly.
  pub fn parse_path(&self, path: &str) -> Result<StorePath> {
    let (store_path, rest) = self.to_store_path(&CanonPath::new(path))?;
    if !rest.is_root() {
      return Err(Error::BadStorePath {
        path: path.to_string(),
        reason: "path points inside a store path".to_string(),
      });
    }
    Ok(store_path)
  }

  /// Accept either a full store path or a bare base name.
  pub fn parse_path_or_base_name(&self, path: &str) -> Result<StorePath> {
    if path.starts_with('/') {
      self.parse_path(path)
    } else {
      StorePath::from_base_name(path)
    }
  }

  /// Split a virtual path into the store path it lies in and the remainder below it.
  ///
  /// `/nix/store/<base>/bin/hello` yields `(<base>, /bin/hello)`.
  pub fn to_store_path(&self, path: &CanonPath) -> Result<(StorePath, CanonPath)> {
    let not_in_store = || Error::NotInStore {
      path: path.abs().to_string(),
      store_dir: self.0.abs().to_string(),
    };

    let below = path.strip_prefix(&self.0).ok_or_else(not_in_store)?;
    let mut components = below.components();
    let base_name = components.next().ok_or_else(not_in_store)?;
    let store_path = StorePath::from_base_name(base_name)?;

    let mut rest = CanonPath::root();
    for component in components {
      rest.push(component);
    }
    Ok((store_path, rest))
  }
}

impl Default for StoreDir {
  fn default() -> Self {
    Self::new(DEFAULT_STORE_DIR)
  }
}

impl fmt::Display for StoreDir {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
