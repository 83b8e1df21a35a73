//! Store URIs.
//!
//! Supported forms:
//! - `local`, `local?root=/tmp/store&log=/tmp/log`
//! - `/abs/path` (local store rooted there)
//! - `s3://<bucket>?region=...`

use url::Url;
use url::form_urlencoded;

use crate::config::{LocalFsStoreConfig, StoreParams};
use crate::remote::S3BinaryCacheStoreConfig;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreReference {
  Local(LocalFsStoreConfig),
  S3(S3BinaryCacheStoreConfig),
}

impl StoreReference {
  pub fn parse(uri: &str) -> Result<Self> {
    let (head, query) = match uri.split_once('?') {
      Some((head, query)) => (head, query),
      None => (uri, ""),
    };

    if head == "local" {
      return Ok(Self::Local(LocalFsStoreConfig::from_params(&parse_query(query))));
    }

    if head.starts_with('/') {
      return Ok(Self::Local(LocalFsStoreConfig::new(head, &parse_query(query))));
    }

    let url = Url::parse(uri).map_err(|_| Error::UnsupportedStoreUri(uri.to_string()))?;
    match url.scheme() {
      "s3" => {
        let bucket = url
          .host_str()
          .ok_or_else(|| Error::UnsupportedStoreUri(uri.to_string()))?;
        let params: StoreParams = url.query_pairs().into_owned().collect();
        Ok(Self::S3(S3BinaryCacheStoreConfig::new("s3", bucket, &params)))
      }
      _ => Err(Error::UnsupportedStoreUri(uri.to_string())),
    }
  }
}

fn parse_query(query: &str) -> StoreParams {
  form_urlencoded::parse(query.as_bytes()).into_owned().collect()
}
