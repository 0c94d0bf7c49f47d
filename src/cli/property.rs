//! Property record arguments

use std::{fs, path::PathBuf};

use clap::Args;
use vigilo_cart::properties::Property;

use crate::cli::CliError;

/// A property record given inline or as a file.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub(crate) struct PropertyArgs {
    /// Property record as JSON
    #[arg(long)]
    property: Option<String>,

    /// File holding the property record as JSON
    #[arg(long)]
    file: Option<PathBuf>,
}

impl PropertyArgs {
    pub(crate) fn into_property(self) -> Result<Property, CliError> {
        let json = match (self.property, self.file) {
            (Some(json), _) => json,
            (None, Some(path)) => fs::read_to_string(&path).map_err(|source| {
                CliError::PropertyFile {
                    path: path.clone(),
                    source,
                }
            })?,
            (None, None) => return Err(CliError::MissingProperty),
        };

        serde_json::from_str(&json).map_err(CliError::Property)
    }
}
