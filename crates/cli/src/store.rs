//! Opening stores from the `--store` URI.

use std::sync::Arc;

use anyhow::{Context, Result, bail};

use lstore_lib::{LocalFsStore, Store, StoreReference};

/// Open the store named by `uri`. Only local stores can be opened.
pub fn open_store(uri: &str) -> Result<Arc<dyn Store>> {
  Ok(open_local(uri)?)
}

pub fn open_local(uri: &str) -> Result<Arc<LocalFsStore>> {
  match StoreReference::parse(uri)? {
    StoreReference::Local(config) => {
      let store = LocalFsStore::open(config).with_context(|| format!("Failed to open store '{}'", uri))?;
      Ok(Arc::new(store))
    }
    StoreReference::S3(config) => bail!(
      "store '{}' is a binary cache (bucket '{}'); only local stores can be read",
      uri,
      config.bucket_name
    ),
  }
}
