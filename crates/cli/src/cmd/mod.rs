mod cat;
mod dump;
mod log;
mod ls;
mod readlink;
mod show_config;
mod valid_paths;

pub use cat::cmd_cat;
pub use dump::cmd_dump;
pub use log::cmd_log;
pub use ls::cmd_ls;
pub use readlink::cmd_readlink;
pub use show_config::cmd_show_config;
pub use valid_paths::cmd_valid_paths;
