//! Configuration for object-store-backed binary caches.
//!
//! This only carries settings; talking to the bucket is left to the cache
//! implementation that consumes it.

use serde::Serialize;
use tracing::warn;

use crate::config::{SettingInfo, StoreParams};

/// Default part size for multipart uploads (5 MiB).
pub const DEFAULT_BUFFER_SIZE: u64 = 5 * 1024 * 1024;

pub const DEFAULT_REGION: &str = "us-east-1";

pub const S3_SETTINGS: &[SettingInfo] = &[
  SettingInfo {
    name: "profile",
    description: "The name of the AWS configuration profile to use.",
  },
  SettingInfo {
    name: "region",
    description: "The region of the S3 bucket.",
  },
  SettingInfo {
    name: "scheme",
    description: "The scheme used for S3 requests, `https` or `http`.",
  },
  SettingInfo {
    name: "endpoint",
    description: "The URL of the endpoint of an S3-compatible service.",
  },
  SettingInfo {
    name: "narinfo-compression",
    description: "Compression method for `.narinfo` files.",
  },
  SettingInfo {
    name: "ls-compression",
    description: "Compression method for `.ls` files.",
  },
  SettingInfo {
    name: "log-compression",
    description: "Compression method for `log/*` files.",
  },
  SettingInfo {
    name: "multipart-upload",
    description: "Whether to use multi-part uploads.",
  },
  SettingInfo {
    name: "buffer-size",
    description: "Size (in bytes) of each part in multi-part uploads.",
  },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct S3BinaryCacheStoreConfig {
  pub scheme: String,
  /// Stored exactly as given; no trimming or validation.
  pub bucket_name: String,
  pub profile: Option<String>,
  pub region: String,
  pub request_scheme: Option<String>,
  pub endpoint: Option<String>,
  pub narinfo_compression: Option<String>,
  pub ls_compression: Option<String>,
  pub log_compression: Option<String>,
  pub multipart_upload: bool,
  pub buffer_size: u64,
}

impl S3BinaryCacheStoreConfig {
  /// Build from the URI scheme, the bucket name and the remaining params.
  ///
  /// Never fails: unknown keys and unparsable values are logged and ignored.
  pub fn new(scheme: &str, bucket_name: &str, params: &StoreParams) -> Self {
    let mut config = Self {
      scheme: scheme.to_string(),
      bucket_name: bucket_name.to_string(),
      profile: None,
      region: DEFAULT_REGION.to_string(),
      request_scheme: None,
      endpoint: None,
      narinfo_compression: None,
      ls_compression: None,
      log_compression: None,
      multipart_upload: false,
      buffer_size: DEFAULT_BUFFER_SIZE,
    };

    for (key, value) in params {
      match key.as_str() {
        "profile" => config.profile = Some(value.clone()),
        "region" => config.region = value.clone(),
        "scheme" => config.request_scheme = Some(value.clone()),
        "endpoint" => config.endpoint = Some(value.clone()),
        "narinfo-compression" => config.narinfo_compression = Some(value.clone()),
        "ls-compression" => config.ls_compression = Some(value.clone()),
        "log-compression" => config.log_compression = Some(value.clone()),
        "multipart-upload" => match parse_bool(value) {
          Some(enabled) => config.multipart_upload = enabled,
          None => warn!(key = %key, value = %value, "ignoring invalid boolean store setting"),
        },
        "buffer-size" => match value.parse() {
          Ok(size) => config.buffer_size = size,
          Err(_) => warn!(key = %key, value = %value, "ignoring invalid size store setting"),
        },
        _ => warn!(key = %key, "unknown S3 store setting"),
      }
    }

    config
  }
}

fn parse_bool(value: &str) -> Option<bool> {
  match value {
    "true" | "1" | "yes" => Some(true),
    "false" | "0" | "no" => Some(false),
    _ => None,
  }
}
