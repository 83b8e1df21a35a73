//! lstore-lib: local realization of a content-addressed store
//!
//! This crate maps the virtual store namespace (`/nix/store/<hash>-<name>/...`)
//! onto a real directory tree:
//! - `LocalFsStore`: the store on disk, with archive export and build-log lookup
//! - `LocalStoreAccessor`: a read-only file tree gated by path validity
//! - `S3BinaryCacheStoreConfig`: configuration carrier for object-store caches
//! - `StoreReference`: store URI parsing into one of the above configurations

pub mod accessor;
pub mod archive;
pub mod canon_path;
pub mod compression;
pub mod config;
pub mod consts;
pub mod error;
pub mod local_store;
pub mod reference;
pub mod remote;
pub mod store;
pub mod store_path;

pub use accessor::{DirEntries, FileKind, PosixAccessor, SourceAccessor, Stat};
pub use canon_path::CanonPath;
pub use config::{LocalFsStoreConfig, SettingInfo, StoreParams};
pub use error::Error;
pub use local_store::{LocalFsStore, LocalStoreAccessor, fs_accessor};
pub use reference::StoreReference;
pub use remote::S3BinaryCacheStoreConfig;
pub use store::{Store, ValidPathSet, ValidPaths};
pub use store_path::{StoreDir, StorePath};

/// Result type for store operations
pub type Result<T> = std::result::Result<T, Error>;
