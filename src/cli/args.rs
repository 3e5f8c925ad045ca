//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

/// Landed-title localisation extractor: region assignment and per-region attribute tables
#[derive(Parser, Debug)]
#[command(name = "titloc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Mod directory (default: configured mod_dir or cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub mod_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write titles with their attributes and regions as JSON
    Extract {
        #[command(flatten)]
        inputs: InputArgs,
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// Nest titles under their region instead of a flat table
        #[arg(short, long)]
        grouped: bool,
    },

    /// List every title with its resolved region
    Regions {
        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Count titles per region
    Summary {
        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Show the title hierarchy with resolved regions
    Tree {
        #[command(flatten)]
        inputs: InputArgs,
        /// Only show the subtree of this title
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Input overrides; anything not given comes from the configured mod layout.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Landed-title JSON file or directory (repeatable)
    #[arg(long = "titles", value_hint = ValueHint::AnyPath)]
    pub titles: Vec<PathBuf>,

    /// Region definition JSON file or directory (repeatable)
    #[arg(long = "regions", value_hint = ValueHint::AnyPath)]
    pub regions: Vec<PathBuf>,

    /// Culture group JSON file or directory (repeatable)
    #[arg(long = "cultures", value_hint = ValueHint::AnyPath)]
    pub cultures: Vec<PathBuf>,

    /// Additional attribute key (repeatable)
    #[arg(short, long = "key")]
    pub keys: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
