mod cmd;
mod output;
mod store;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::*;
use output::{OutputFormat, print_error};

/// Read-only access to a local content-addressed store
#[derive(Parser)]
#[command(name = "lstore")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Store URI: `local`, `local?root=DIR`, `/path/to/root` or `s3://bucket`
  #[arg(long, global = true, env = "LSTORE_STORE", default_value = "local")]
  store: String,

  /// Serve paths even if they are not registered in the store
  #[arg(long, global = true)]
  no_check: bool,

  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value = "text")]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Show a path in the store and list it if it is a directory
  Ls {
    /// Virtual path, e.g. /nix/store/<hash>-<name>/bin
    path: String,
  },

  /// Write the contents of a file in the store to stdout
  Cat {
    /// Virtual path of a regular file
    path: String,
  },

  /// Print the target of a symlink in the store
  Readlink {
    /// Virtual path of a symlink
    path: String,
  },

  /// Serialize a store path as an archive on stdout
  Dump {
    /// Store path or base name
    path: String,

    /// Print the archive hash instead of the archive
    #[arg(long)]
    hash: bool,
  },

  /// Print the build log of a store path
  Log {
    /// Store path or base name
    path: String,
  },

  /// Show the resolved store configuration
  ShowConfig,

  /// List the store paths registered as valid
  ValidPaths,
}

fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let check = !cli.no_check;
  let result = match cli.command {
    Commands::Ls { path } => cmd_ls(&cli.store, &path, check, cli.output),
    Commands::Cat { path } => cmd_cat(&cli.store, &path, check),
    Commands::Readlink { path } => cmd_readlink(&cli.store, &path, check),
    Commands::Dump { path, hash } => cmd_dump(&cli.store, &path, hash),
    Commands::Log { path } => cmd_log(&cli.store, &path),
    Commands::ShowConfig => cmd_show_config(&cli.store, cli.output),
    Commands::ValidPaths => cmd_valid_paths(&cli.store, cli.output),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}
