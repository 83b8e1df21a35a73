//! Show the configuration a store URI resolves to.

use anyhow::Result;

use lstore_lib::config::LOCAL_FS_SETTINGS;
use lstore_lib::remote::S3_SETTINGS;
use lstore_lib::{SettingInfo, StoreReference};

use crate::output::{OutputFormat, print_info, print_json, print_stat, print_warning};

pub fn cmd_show_config(store_uri: &str, output: OutputFormat) -> Result<()> {
  let reference = StoreReference::parse(store_uri)?;

  if output.is_json() {
    let json = match &reference {
      StoreReference::Local(config) => serde_json::json!({
        "type": "local",
        "config": config,
        "settings": LOCAL_FS_SETTINGS,
      }),
      StoreReference::S3(config) => serde_json::json!({
        "type": "s3",
        "config": config,
        "settings": S3_SETTINGS,
      }),
    };
    return print_json(&json);
  }

  match &reference {
    StoreReference::Local(config) => {
      print_info(&format!("Local store '{}'", store_uri));
      print_stat("Store directory", &config.store_dir.to_string());
      let real_root = match &config.root_dir {
        Some(root) => root.display().to_string(),
        None => config.store_dir.to_string(),
      };
      print_stat("Real root", &real_root);
      print_stat("Log directory", &config.log_dir.display().to_string());
      print_stat("State directory", &config.state_dir.display().to_string());
      print_settings(LOCAL_FS_SETTINGS);
    }
    StoreReference::S3(config) => {
      print_warning("Binary cache stores are configuration only; lstore does not contact them");
      print_info(&format!("S3 binary cache '{}'", store_uri));
      print_stat("Bucket", &config.bucket_name);
      print_stat("Region", &config.region);
      if let Some(endpoint) = &config.endpoint {
        print_stat("Endpoint", endpoint);
      }
      print_stat("Multipart upload", &config.multipart_upload.to_string());
      print_settings(S3_SETTINGS);
    }
  }

  Ok(())
}

fn print_settings(settings: &[SettingInfo]) {
  println!();
  println!("Settings:");
  for setting in settings {
    print_stat(setting.name, setting.description);
  }
}
