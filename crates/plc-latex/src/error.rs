//! Error types for page access and LaTeX conversion.
use std::time::Duration;

/// Result type for [`Page`](crate::page::Page) operations.
pub type PageResult<T> = Result<T, PageError>;

/// Result type for conversion passes.
pub type LatexResult<T> = Result<T, LatexError>;

/// Errors reported by a page backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
  #[error("No element matches `{0}`")]
  MissingElement(String),

  #[error("Element is no longer attached to the document")]
  StaleReference,

  #[error("Timed out after {timeout:?} waiting on `{selector}`")]
  Timeout { selector: String, timeout: Duration },

  #[error("Invalid selector `{0}`")]
  InvalidSelector(String),

  #[error("Page backend error: {0}")]
  Backend(String),
}

/// Errors raised by the conversion pipeline.
///
/// [`LatexError::MissingElement`] and [`LatexError::StaleReference`] are
/// recovered locally where a single unit (one annotation, one word) is
/// affected. Everything else aborts the current page.
#[derive(Debug, thiserror::Error)]
pub enum LatexError {
  #[error("Required element `{0}` is missing")]
  MissingElement(String),

  #[error("Stale element reference")]
  StaleReference,

  #[error("Link has no destination (link text: `{text}`)")]
  UnsupportedLink { text: String },

  #[error("Unknown style type `{0}`")]
  Configuration(String),

  #[error(
    "Annotation popup `{selector}` was supposed to disappear, but did not \
     within {timeout:?}"
  )]
  StuckPopup { selector: String, timeout: Duration },

  #[error(transparent)]
  Page(PageError),
}

impl From<PageError> for LatexError {
  fn from(e: PageError) -> Self {
    match e {
      PageError::MissingElement(selector) => Self::MissingElement(selector),
      PageError::StaleReference => Self::StaleReference,
      other => Self::Page(other),
    }
  }
}
