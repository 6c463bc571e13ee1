//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::application::Language;

/// Family tree manager: browse, edit and export a family tree
#[derive(Parser, Debug)]
#[command(name = "famtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Directory holding the stored tree (overrides config)
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,

    /// UI language (overrides config)
    #[arg(short, long, global = true, value_enum)]
    pub lang: Option<Language>,

    /// Admin code unlocking add/delete
    #[arg(long, global = true, env = "FAMTREE_LOGIN_CODE", hide_env_values = true)]
    pub admin_code: Option<String>,

    /// Family name shown in titles and exports (overrides config)
    #[arg(long, global = true)]
    pub family_name: Option<String>,

    /// Family origin shown in exports (overrides config)
    #[arg(long, global = true)]
    pub family_origin: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the family tree
    Show {
        /// Names only (read-only view)
        #[arg(short, long)]
        compact: bool,
        /// Show member ids (for --by-id edits)
        #[arg(long)]
        ids: bool,
    },

    /// Show family statistics
    Stats,

    /// Find members by name
    Search {
        /// Case-insensitive part of a name
        query: String,
    },

    /// Add a member under a parent (admin)
    Add {
        /// Parent name, or id with --by-id
        parent: String,
        /// Name of the new member
        #[arg(short, long)]
        name: String,
        /// Birth date (YYYY-MM-DD)
        #[arg(short, long, default_value = "")]
        birth: String,
        /// Member is married
        #[arg(short, long)]
        married: bool,
        /// Member has children (informational; derived from the tree)
        #[arg(long)]
        has_children: bool,
        /// Spouse's name
        #[arg(short, long, default_value = "")]
        spouse: String,
        /// Wealth level 1-5
        #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
        wealth: u8,
        /// Treat PARENT as a member id
        #[arg(long)]
        by_id: bool,
    },

    /// Delete a member and its descendants (admin)
    Delete {
        /// Member name, or id with --by-id
        member: String,
        /// Treat MEMBER as a member id
        #[arg(long)]
        by_id: bool,
    },

    /// Export the tree to a paginated text document
    Export {
        /// Output file or directory (default: export.dir from config)
        #[arg(short, long, value_hint = ValueHint::AnyPath)]
        output: Option<PathBuf>,
    },

    /// Check the admin code
    Login,

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

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config and storage paths
    Path,
}
