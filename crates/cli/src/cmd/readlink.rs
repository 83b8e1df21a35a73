use anyhow::{Context, Result};

use lstore_lib::{CanonPath, SourceAccessor, fs_accessor};

use crate::store::open_store;

pub fn cmd_readlink(store_uri: &str, path: &str, check: bool) -> Result<()> {
  let accessor = fs_accessor(open_store(store_uri)?, check)?;
  let path = CanonPath::new(path);

  let target = accessor
    .read_link(&path)
    .with_context(|| format!("Failed to read link '{}'", path))?;
  println!("{}", target);

  Ok(())
}
