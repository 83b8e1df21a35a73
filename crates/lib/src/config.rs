//! Local filesystem store configuration.
//!
//! Options arrive as a string params bag (typically the query of a store URI,
//! e.g. `local?root=/tmp/store`). Defaults come from `LSTORE_*` environment
//! variables, then from the built-in constants.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::consts::{
  DEFAULT_LOG_DIR, DEFAULT_STATE_DIR, DEFAULT_STORE_DIR, ENV_LOG_DIR, ENV_STATE_DIR, ENV_STORE_DIR,
  VALID_PATHS_FILENAME,
};
use crate::store_path::StoreDir;

/// Raw store options, keyed by option name.
pub type StoreParams = BTreeMap<String, String>;

/// Name and description of a store option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettingInfo {
  pub name: &'static str,
  pub description: &'static str,
}

pub const ROOT_SETTING: SettingInfo = SettingInfo {
  name: "root",
  description: "Directory prefixed to all other paths.",
};

pub const STORE_SETTING: SettingInfo = SettingInfo {
  name: "store",
  description: "Logical location of the store directory.",
};

pub const LOG_SETTING: SettingInfo = SettingInfo {
  name: "log",
  description: "Directory where build logs are stored.",
};

pub const STATE_SETTING: SettingInfo = SettingInfo {
  name: "state",
  description: "Directory where the store keeps its state, including the path registry.",
};

pub const LOCAL_FS_SETTINGS: &[SettingInfo] = &[ROOT_SETTING, STORE_SETTING, LOG_SETTING, STATE_SETTING];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalFsStoreConfig {
  pub store_dir: StoreDir,
  /// Real directory holding the store's contents, when it differs from `store_dir`.
  pub root_dir: Option<PathBuf>,
  pub log_dir: PathBuf,
  pub state_dir: PathBuf,
}

impl LocalFsStoreConfig {
  /// Build a configuration from `params`.
  ///
  /// A non-empty `root_dir` becomes the root unless `params` already names one.
  pub fn new(root_dir: &str, params: &StoreParams) -> Self {
    let root_dir = if !root_dir.is_empty() && !params.contains_key(ROOT_SETTING.name) {
      Some(PathBuf::from(root_dir))
    } else {
      params
        .get(ROOT_SETTING.name)
        .filter(|root| !root.is_empty())
        .map(PathBuf::from)
    };

    let store_dir = params
      .get(STORE_SETTING.name)
      .cloned()
      .unwrap_or_else(|| env_or(ENV_STORE_DIR, DEFAULT_STORE_DIR));

    Self {
      store_dir: StoreDir::new(store_dir.as_str()),
      root_dir,
      log_dir: path_param(params, LOG_SETTING.name, ENV_LOG_DIR, DEFAULT_LOG_DIR),
      state_dir: path_param(params, STATE_SETTING.name, ENV_STATE_DIR, DEFAULT_STATE_DIR),
    }
  }

  pub fn from_params(params: &StoreParams) -> Self {
    Self::new("", params)
  }

  pub fn valid_paths_file(&self) -> PathBuf {
    self.state_dir.join(VALID_PATHS_FILENAME)
  }
}

impl Default for LocalFsStoreConfig {
  fn default() -> Self {
    Self::from_params(&StoreParams::new())
  }
}

fn env_or(var: &str, default: &str) -> String {
  std::env::var(var).unwrap_or_else(|_| default.to_string())
}

fn path_param(params: &StoreParams, name: &str, var: &str, default: &str) -> PathBuf {
  params
    .get(name)
    .map(PathBuf::from)
    .unwrap_or_else(|| PathBuf::from(env_or(var, default)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  fn params(pairs: &[(&str, &str)]) -> StoreParams {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
  }

  #[test]
  fn root_hint_becomes_root_when_unset() {
    let config = LocalFsStoreConfig::new("/tmp/root", &StoreParams::new());
    assert_eq!(config.root_dir, Some(PathBuf::from("/tmp/root")));
  }

  #[test]
  fn explicit_root_param_wins_over_hint() {
    let config = LocalFsStoreConfig::new("/tmp/hint", &params(&[("root", "/tmp/explicit")]));
    assert_eq!(config.root_dir, Some(PathBuf::from("/tmp/explicit")));
  }

  #[test]
  fn empty_hint_uses_params() {
    let config = LocalFsStoreConfig::new("", &params(&[("root", "/tmp/explicit")]));
    assert_eq!(config.root_dir, Some(PathBuf::from("/tmp/explicit")));

    let config = LocalFsStoreConfig::new("", &StoreParams::new());
    assert_eq!(config.root_dir, None);
  }

  #[test]
  fn empty_root_param_means_unset() {
    let config = LocalFsStoreConfig::new("/tmp/hint", &params(&[("root", "")]));
    assert_eq!(config.root_dir, None);
  }

  #[test]
  fn root_setting_description() {
    assert_eq!(ROOT_SETTING.description, "Directory prefixed to all other paths.");
    assert!(LOCAL_FS_SETTINGS.iter().any(|s| s.name == "root"));
  }

  #[test]
  #[serial]
  fn defaults_come_from_environment() {
    temp_env::with_vars(
      [
        (ENV_STORE_DIR, Some("/custom/store")),
        (ENV_LOG_DIR, Some("/custom/log")),
        (ENV_STATE_DIR, Some("/custom/state")),
      ],
      || {
        let config = LocalFsStoreConfig::default();
        assert_eq!(config.store_dir, StoreDir::new("/custom/store"));
        assert_eq!(config.log_dir, PathBuf::from("/custom/log"));
        assert_eq!(config.valid_paths_file(), PathBuf::from("/custom/state/valid-paths.json"));
      },
    );
  }

  #[test]
  #[serial]
  fn params_override_environment() {
    temp_env::with_vars([(ENV_LOG_DIR, Some("/custom/log"))], || {
      let config = LocalFsStoreConfig::from_params(&params(&[("log", "/param/log"), ("store", "/param/store")]));
      assert_eq!(config.log_dir, PathBuf::from("/param/log"));
      assert_eq!(config.store_dir, StoreDir::new("/param/store"));
    });
  }

  #[test]
  #[serial]
  fn builtin_defaults_without_environment() {
    temp_env::with_vars(
      [
        (ENV_STORE_DIR, None::<&str>),
        (ENV_LOG_DIR, None::<&str>),
        (ENV_STATE_DIR, None::<&str>),
      ],
      || {
        let config = LocalFsStoreConfig::default();
        assert_eq!(config.store_dir, StoreDir::new(DEFAULT_STORE_DIR));
        assert_eq!(config.log_dir, PathBuf::from(DEFAULT_LOG_DIR));
        assert_eq!(config.state_dir, PathBuf::from(DEFAULT_STATE_DIR));
      },
    );
  }
}
