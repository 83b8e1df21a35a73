use anyhow::Result;

use lstore_lib::Store;

use crate::output::{OutputFormat, print_info, print_json};
use crate::store::open_local;

pub fn cmd_valid_paths(store_uri: &str, output: OutputFormat) -> Result<()> {
  let store = open_local(store_uri)?;
  let printed: Vec<String> = store
    .query_valid_paths()
    .iter()
    .map(|path| store.print_store_path(path))
    .collect();

  if output.is_json() {
    return print_json(&printed);
  }

  if printed.is_empty() {
    print_info("No registered store paths.");
  }
  for path in printed {
    println!("{}", path);
  }

  Ok(())
}
