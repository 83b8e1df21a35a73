/// Canonical store directory used when nothing overrides it.
pub const DEFAULT_STORE_DIR: &str = "/nix/store";

/// Directory holding build logs.
pub const DEFAULT_LOG_DIR: &str = "/nix/var/log/nix";

/// Directory holding store state (the validity registry).
pub const DEFAULT_STATE_DIR: &str = "/nix/var/nix";

/// Subdirectory of the log directory holding per-derivation logs.
pub const DRVS_LOG_DIR: &str = "drvs";

/// File in the state directory listing registered store paths.
pub const VALID_PATHS_FILENAME: &str = "valid-paths.json";

/// Length of the hash part of a store path base name.
pub const STORE_PATH_HASH_LEN: usize = 32;

/// Maximum length of the name part of a store path base name.
pub const STORE_PATH_MAX_NAME_LEN: usize = 211;

/// Characters of the base32 alphabet used for store path hashes.
pub const NIX_BASE32_CHARS: &str = "0123456789abcdfghijklmnpqrsvwxyz";

/// Magic string opening every archive.
pub const NAR_MAGIC: &str = "nix-archive-1";

pub const ENV_STORE_DIR: &str = "LSTORE_STORE_DIR";
pub const ENV_LOG_DIR: &str = "LSTORE_LOG_DIR";
pub const ENV_STATE_DIR: &str = "LSTORE_STATE_DIR";
