//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Query X12 EDI interchanges and reconstruct the matched fragments as delimited EDI text
#[derive(Parser, Debug)]
#[command(name = "ediq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Raise log verbosity (-d, -dd, -ddd)
    #[arg(short = 'd', long = "debug", action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Select nodes and print each as one reconstructed EDI record
    Query {
        /// Selection expression, e.g. //AK2 or //CTX01-02
        #[arg(short, long)]
        epath: String,

        /// Transaction loop schema (optional)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        schema_file: Option<PathBuf>,

        /// Format output, one segment per line
        #[arg(short, long)]
        format: bool,

        /// EDI input; use '-' for standard input
        file: String,
    },

    /// Show the parsed node structure as a tree
    Tree {
        /// Transaction loop schema (optional)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        schema_file: Option<PathBuf>,

        /// EDI input; use '-' for standard input
        file: String,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
