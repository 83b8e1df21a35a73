use std::io::{self, Write};

use anyhow::{Result, bail};

use lstore_lib::Store;

use crate::store::open_local;

pub fn cmd_log(store_uri: &str, path: &str) -> Result<()> {
  let store = open_local(store_uri)?;
  let store_path = store.store_dir().parse_path_or_base_name(path)?;

  let Some(log) = store.get_build_log(&store_path)? else {
    bail!("no build log available for '{}'", store.print_store_path(&store_path));
  };

  let mut out = io::stdout().lock();
  out.write_all(&log)?;
  out.flush()?;

  Ok(())
}
