use anyhow::{Context, Result};
use serde::Serialize;

use lstore_lib::{CanonPath, DirEntries, FileKind, SourceAccessor, Stat, Store, fs_accessor};

use crate::output::{OutputFormat, format_bytes, kind_marker, print_json};
use crate::store::open_store;

#[derive(Serialize)]
struct Listing {
  path: CanonPath,
  stat: Stat,
  #[serde(skip_serializing_if = "Option::is_none")]
  entries: Option<DirEntries>,
}

pub fn cmd_ls(store_uri: &str, path: &str, check: bool, output: OutputFormat) -> Result<()> {
  let store = open_store(store_uri)?;
  let path = CanonPath::new(path);
  // The store directory and its parents are synthesized and can't be listed.
  let synthesized = store.store_dir().as_canon().is_within(&path);
  let accessor = fs_accessor(store, check)?;

  let stat = accessor.lstat(&path).with_context(|| format!("Failed to stat '{}'", path))?;
  let entries = if stat.kind == FileKind::Directory && !synthesized {
    Some(
      accessor
        .read_directory(&path)
        .with_context(|| format!("Failed to list '{}'", path))?,
    )
  } else {
    None
  };

  if output.is_json() {
    return print_json(&Listing { path, stat, entries });
  }

  match entries {
    Some(entries) => {
      for (name, kind) in &entries {
        println!("{} {}", kind_marker(*kind), name);
      }
    }
    None => {
      let size = stat.size.map(format_bytes).unwrap_or_default();
      println!("{} {} {}", kind_marker(Some(stat.kind)), path, size);
    }
  }

  Ok(())
}
