//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// In-memory table-of-contents editor: add, rename, delete and reorder nested nodes
#[derive(Parser, Debug)]
#[command(name = "tocedit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Directory holding a local .tocedit.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an edit script against an in-memory forest
    Run {
        /// Script file (default: stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        script: Option<PathBuf>,
        /// Start from this JSON document instead of an empty forest
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        import: Option<PathBuf>,
        /// Print the final forest as JSON
        #[arg(short, long)]
        export: bool,
    },

    /// Render a JSON document as a tree
    Show {
        /// JSON document
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Expand every node
        #[arg(short, long)]
        all: bool,
        /// Append node ids to titles
        #[arg(long)]
        ids: bool,
    },

    /// Check a JSON document for duplicate ids and empty titles
    Validate {
        /// JSON document
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
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

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,

    /// Print config template
    Template,
}
