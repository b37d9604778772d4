//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::OutputFormat;

/// Codec and filter engine for ARSDK command frames
#[derive(Parser)]
#[command(
    name = "arcommands",
    version,
    about = "Codec and filter engine for ARSDK command frames",
    long_about = "Encodes, decodes and filters drone command frames addressed by \
                  (project, class, command), using a versioned command dictionary."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Output format (defaults to the configured one)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Decode one command buffer given as hex (stdin when omitted)
    Decode {
        /// Hex bytes, e.g. 01000100
        hex: Option<String>,
    },
    /// Encode a command from its name and argument values
    Encode {
        /// Command name: project.Class.Command
        name: String,
        /// One value per declared argument; enums by member name or value
        #[arg(allow_negative_numbers = true)]
        args: Vec<String>,
    },
    /// Split a datagram into network frames and decode its commands
    Dissect {
        /// Hex bytes of the datagram (stdin when omitted)
        hex: Option<String>,
    },
    /// Show the filter status of a command
    Filter {
        /// Command name: project.Class.Command
        name: String,
    },
    /// List dictionary commands
    List {
        /// Only list commands of this project
        project: Option<String>,
    },
    /// Check that a dictionary only appends to an older one
    Compat {
        /// Older dictionary file
        old: PathBuf,
        /// Newer dictionary file (defaults to the configured dictionary)
        new: Option<PathBuf>,
    },
    /// Compare two version codes
    #[command(name = "compare-versions")]
    CompareVersions {
        v1: String,
        v2: String,
    },
    /// Generate default configuration file
    Init {
        /// Path where to create the configuration file
        #[arg(long, short = 'p')]
        path: Option<PathBuf>,
    },
    /// Validate configuration file, dictionary and filter rules
    Check,
    /// Display version information
    Version,
}
