/*!
 * Configuration handling for statjson
 */

use std::ffi::OsString;

use clap::Parser;
use clap_complete::Shell;

use crate::error::Result;
use crate::types::Naming;

/// Environment variable holding the log level filter
pub const LOG_LEVEL_ENV: &str = "STATJSON_LOG_LEVEL";

/// Command-line arguments for statjson
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "statjson",
    version = env!("CARGO_PKG_VERSION"),
    about = "stat(2) output as JSON",
    long_about = "Reports the type, permissions, ownership, timestamps and platform-specific attributes of each path as a JSON array, one element per path in argument order."
)]
pub struct Args {
    /// Files to examine
    #[clap(value_name = "FILE", required_unless_present = "generate")]
    pub paths: Vec<OsString>,

    /// Examine a final symlink itself instead of its target
    #[clap(short = 'P', long)]
    pub no_dereference: bool,

    /// Use descriptive field names (`inode`, `access_time`) instead of `st_*` names
    #[clap(short = 'N', long)]
    pub human_names: bool,

    /// Number of threads used to examine paths
    #[clap(short = 'j', long, default_value = "1")]
    pub threads: usize,

    /// Print JSON on a single line
    #[clap(long)]
    pub compact: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Paths to examine, in output order
    pub paths: Vec<OsString>,

    /// Whether to follow a final symlink
    pub follow_symlinks: bool,

    /// Key scheme for records
    pub naming: Naming,

    /// Number of threads to use for processing
    pub num_threads: usize,

    /// Single-line output
    pub compact: bool,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            paths: args.paths,
            follow_symlinks: !args.no_dereference,
            naming: Naming::from_human(args.human_names),
            num_threads: args.threads,
            compact: args.compact,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        crate::ensure!(
            self.num_threads > 0,
            Config,
            "thread count must be at least 1"
        );
        crate::ensure!(!self.paths.is_empty(), InvalidArgument, "no files given");
        Ok(())
    }
}
