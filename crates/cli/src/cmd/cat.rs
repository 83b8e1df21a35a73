use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::debug;

use lstore_lib::{CanonPath, SourceAccessor, fs_accessor};

use crate::store::open_store;

pub fn cmd_cat(store_uri: &str, path: &str, check: bool) -> Result<()> {
  let accessor = fs_accessor(open_store(store_uri)?, check)?;
  let path = CanonPath::new(path);

  let stdout = io::stdout();
  let mut out = stdout.lock();
  accessor
    .read_file(&path, &mut out, &mut |size: u64| debug!(path = %path, size, "streaming file"))
    .with_context(|| format!("Failed to read '{}'", path))?;
  out.flush()?;

  Ok(())
}
