use std::path::PathBuf;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct CLI {
    #[command(subcommand)]
    pub(crate) command: DevsyncCommand,
}

#[derive(Debug, Subcommand, Clone, PartialEq)]
pub enum DevsyncCommand {
    /// Installs the pinned Node.js runtime and pnpm into the repo-local bin root.
    /// Already-matching tools are left untouched
    Sync {
        /// Repository root. Defaults to the current directory
        #[clap(long)]
        reporoot: Option<PathBuf>,
    },
    /// Shows desired vs. installed versions for the managed tools
    Status {
        /// Repository root. Defaults to the current directory
        #[clap(long)]
        reporoot: Option<PathBuf>,
    },
    /// Output the shim and backing binary path of a managed tool, if they exist
    Which {
        name: String,
        /// Repository root. Defaults to the current directory
        #[clap(long)]
        reporoot: Option<PathBuf>,
    },
    /// Removes the repo-local `.devsync` directory and everything in it
    Uninstall {
        /// Repository root. Defaults to the current directory
        #[clap(long)]
        reporoot: Option<PathBuf>,
    },
    /// Empties the user-level download cache
    Clean,
}
