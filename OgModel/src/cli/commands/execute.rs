//! Command dispatch

use super::{Commands, gmd};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying model operation fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Inspect { path, output } => gmd::inspect(path, output.as_deref()),
            Commands::Validate { paths, quiet } => gmd::validate(paths, *quiet),
            Commands::Resave {
                source,
                destination,
            } => gmd::resave(source, destination),
        }
    }
}
