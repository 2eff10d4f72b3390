use clap::Subcommand;
use std::path::PathBuf;

pub mod execute;
pub mod gmd;

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect a GMD file and display its structure
    Inspect {
        /// GMD file to inspect
        path: PathBuf,

        /// Write the report as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Load models strictly and report problems
    Validate {
        /// GMD files or directories (searched recursively)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Load a model and save it again
    Resave {
        /// Source GMD file
        source: PathBuf,

        /// Output GMD file
        destination: PathBuf,
    },
}
