//! Canonical virtual paths.
//!
//! A `CanonPath` is always absolute, slash-separated, and free of empty,
//! `.` and `..` components. The root is `/`; no other path has a trailing slash.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CanonPath(String);

impl CanonPath {
  /// Canonicalize `raw`, interpreting it relative to the root.
  ///
  /// `..` at the root stays at the root.
  pub fn new(raw: &str) -> Self {
    let mut path = Self::root();
    path.extend(raw);
    path
  }

  pub fn root() -> Self {
    Self("/".to_string())
  }

  pub fn is_root(&self) -> bool {
    self.0.len() == 1
  }

  /// The absolute form, e.g. `/nix/store`.
  pub fn abs(&self) -> &str {
    &self.0
  }

  /// The path without its leading slash; empty for the root.
  pub fn rel(&self) -> &str {
    &self.0[1..]
  }

  pub fn components(&self) -> impl Iterator<Item = &str> {
    self.rel().split('/').filter(|c| !c.is_empty())
  }

  /// Last component, or `None` for the root.
  pub fn base_name(&self) -> Option<&str> {
    if self.is_root() {
      return None;
    }
    self.0.rsplit('/').next()
  }

  pub fn parent(&self) -> Option<CanonPath> {
    if self.is_root() {
      return None;
    }
    match self.0.rfind('/') {
      Some(0) | None => Some(Self::root()),
      Some(idx) => Some(Self(self.0[..idx].to_string())),
    }
  }

  /// Append a single component. `name` must not contain a slash.
  pub fn push(&mut self, name: &str) {
    debug_assert!(!name.contains('/'), "component '{}' contains a slash", name);
    match name {
      "" | "." => {}
      ".." => self.pop(),
      _ => {
        if !self.is_root() {
          self.0.push('/');
        }
        self.0.push_str(name);
      }
    }
  }

  /// Append every component of `raw`, resolving `.` and `..`.
  pub fn extend(&mut self, raw: &str) {
    for component in raw.split('/') {
      self.push(component);
    }
  }

  pub fn join(&self, other: &CanonPath) -> CanonPath {
    let mut joined = self.clone();
    joined.extend(other.rel());
    joined
  }

  fn pop(&mut self) {
    if let Some(parent) = self.parent() {
      *self = parent;
    }
  }

  /// True if `self` equals `dir` or lies somewhere beneath it.
  pub fn is_within(&self, dir: &CanonPath) -> bool {
    if dir.is_root() {
      return true;
    }
    self.0 == dir.0 || (self.0.starts_with(&dir.0) && self.0.as_bytes().get(dir.0.len()) == Some(&b'/'))
  }

  /// The part of `self` below `dir`, or `None` if `self` is not within `dir`.
  pub fn strip_prefix(&self, dir: &CanonPath) -> Option<CanonPath> {
    if !self.is_within(dir) {
      return None;
    }
    if dir.is_root() {
      return Some(self.clone());
    }
    Some(CanonPath::new(&self.0[dir.0.len()..]))
  }
}

impl fmt::Display for CanonPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<String> for CanonPath {
  fn from(raw: String) -> Self {
    Self::new(&raw)
  }
}

impl From<&str> for CanonPath {
  fn from(raw: &str) -> Self {
    Self::new(raw)
  }
}

impl From<CanonPath> for String {
  fn from(path: CanonPath) -> Self {
    path.0
  }
}
