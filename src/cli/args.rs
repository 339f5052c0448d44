//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::config::OutputFormat;
use crate::domain::{DropPosition, KindFilter};

/// Layer tree reordering: drag sessions, drop classification and cycle-safe moves
#[derive(Parser, Debug)]
#[command(name = "layertree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output on stderr (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Output format for trees (default from config)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Config file instead of the global one
    #[arg(long, global = true, env = "LAYERTREE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a layer tree
    Show {
        /// Tree document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Drop one node onto another
    Move {
        /// Tree document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Id of the dragged node
        dragged: String,
        /// Id of the drop target (`__main_level__` for the root level)
        target: String,
        /// Where to land relative to the target
        #[arg(short, long, default_value_t = DropPosition::Before)]
        position: DropPosition,
    },

    /// Move a node to the end of the root level
    Promote {
        /// Tree document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Id of the node to promote
        id: String,
    },

    /// Append a node as the last child of a group
    Append {
        /// Tree document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Id of the dragged node
        id: String,
        /// Id of the receiving group
        group: String,
    },

    /// Replay a scripted drag interaction
    Replay {
        /// Tree document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Event script (.toml or .json)
        #[arg(value_hint = ValueHint::FilePath)]
        script: PathBuf,
    },

    /// Print node ids in layer order
    Order {
        /// Tree document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Filter layers by name and/or kind
    Filter {
        /// Tree document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Case-insensitive name search
        #[arg(short, long)]
        name: Option<String>,
        /// Layer kind: all, vector, raster, wms
        #[arg(short, long, default_value = "all")]
        kind: KindFilter,
    },

    /// Show layer and group counts
    Stats {
        /// Tree document (.json or .toml)
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
    /// Show effective config
    Show,

    /// Print config template
    Template,

    /// Show config path
    Path,
}
