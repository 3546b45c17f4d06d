use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "defindex")]
#[command(author, version, about = "Symbol declaration index and autoload map builder")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Project directory (default: current directory)
    #[arg(short = 'C', long, global = true)]
    pub dir: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create .defindex/config.toml with default settings
    Init {
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Build the autoload map for all configured roots
    Build {
        /// Drop cached indexes first and rescan every root
        #[arg(long)]
        flush: bool,

        /// Write the map to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete the cached indexes of all configured roots
    Flush,

    /// Find the file declaring a symbol
    Lookup {
        /// Symbol kind: class, function, type or constant
        kind: String,

        /// Symbol name (case-insensitive except for constants)
        name: String,
    },

    /// Show cache state for each configured root
    Status,
}
