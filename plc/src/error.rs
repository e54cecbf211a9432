use std::io;

use plc_config::ConfigError;
use plc_latex::{LatexError, PageError};
use thiserror::Error;

/// Top-level error type for the plc crate.
#[derive(Debug, Error)]
pub enum PlcError {
  #[error(
    "Couldn't find the `{selector}` element of page `{page}`. Something must \
     have changed on the website layout."
  )]
  MissingContent { page: String, selector: String },

  #[error("Failed to convert page `{page}`: {source}")]
  Convert {
    page:   String,
    #[source]
    source: LatexError,
  },

  #[error("Page error: {0}")]
  Page(#[from] PageError),

  #[error("Configuration error: {0}")]
  Config(#[from] ConfigError),

  #[error("Template error: {0}")]
  Template(String),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("Serde error: {0}")]
  Serde(#[from] serde_json::Error),
}

impl From<tera::Error> for PlcError {
  fn from(e: tera::Error) -> Self {
    Self::Template(e.to_string())
  }
}
