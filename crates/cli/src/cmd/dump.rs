use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};

use lstore_lib::Store;
use lstore_lib::archive::NarHasher;

use crate::store::open_local;

pub fn cmd_dump(store_uri: &str, path: &str, hash: bool) -> Result<()> {
  let store = open_local(store_uri)?;
  let store_path = store.store_dir().parse_path_or_base_name(path)?;

  if hash {
    let mut hasher = NarHasher::new();
    store
      .export_archive(&store_path, &mut hasher)
      .with_context(|| format!("Failed to hash '{}'", path))?;
    println!("{}", hasher.finish());
    return Ok(());
  }

  let stdout = io::stdout();
  let mut out = BufWriter::new(stdout.lock());
  store
    .export_archive(&store_path, &mut out)
    .with_context(|| format!("Failed to dump '{}'", path))?;
  out.flush()?;

  Ok(())
}
