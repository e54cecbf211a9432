//! Markup conventions of the source site.

/// Base URL under which links count as internal cross references.
pub const INTERNAL_LINK_PREFIX: &str =
  "https://www.dartmouth.edu/~milton/reading_room/pl/";

/// Class names and selectors the passes look for.
///
/// The defaults describe the reading room edition; every field can be
/// overridden should the markup move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConventions {
  /// Links starting with this prefix (or with `../`) are internal.
  pub internal_link_prefix: String,

  /// Class of line number markers.
  pub line_class: String,

  /// Class of the (single, reused) annotation popup.
  pub annotation_class: String,

  /// Selector of annotation buttons.
  pub annotation_candidate_selector: String,

  /// Selector of archaic words carrying their modern spelling in `title`.
  pub tooltip_selector: String,
}

impl Default for SiteConventions {
  fn default() -> Self {
    Self {
      internal_link_prefix:          INTERNAL_LINK_PREFIX.to_string(),
      line_class:                    "line".to_string(),
      annotation_class:              "annotation".to_string(),
      annotation_candidate_selector: "a[class='annotBtn tooltipstered']"
        .to_string(),
      tooltip_selector:              "span[class='tooltip tooltipstered']"
        .to_string(),
    }
  }
}

impl SiteConventions {
  /// Selector matching the annotation popup.
  #[must_use]
  pub fn annotation_selector(&self) -> String {
    format!(".{}", self.annotation_class)
  }

  /// Use a different internal link prefix.
  #[must_use]
  pub fn with_internal_link_prefix(mut self, prefix: impl Into<String>) -> Self {
    self.internal_link_prefix = prefix.into();
    self
  }
}
