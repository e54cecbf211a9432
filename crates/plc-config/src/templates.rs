use std::fmt;

/// Error type for template operations.
#[derive(Debug)]
pub enum TemplateError {
  /// The requested configuration format is not supported.
  UnsupportedFormat(String),
}

impl fmt::Display for TemplateError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::UnsupportedFormat(format) => {
        write!(f, "Unsupported config format: {format}")
      },
    }
  }
}

impl std::error::Error for TemplateError {}

/// Default configuration template in TOML, commented so a new user can tell
/// what each field does.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# plc Configuration File

# Output directory; json/ and tex/ are created below it
output_dir = "build"

# Directory of saved pages; every *.html file becomes one book, ordered by
# file name and labelled by its file stem
# input_dir = "pages"

# Directory with overrides for book.tex, content.tex and main.tex
# template_dir = "templates"

# Links below this URL are turned into cross references
internal_link_prefix = "https://www.dartmouth.edu/~milton/reading_room/pl/"

# Seconds to wait for an annotation popup to open or close
annotation_timeout_secs = 2.0

# Milliseconds between two checks while waiting on a popup
poll_interval_ms = 50

# Drop every non-ASCII character from the converted text
strip_non_ascii = false

# Turn named anchors into \label{} targets
word_labels = false

# Leave annotations out of the book
disable_annotations = false

# How archaic spellings are typeset: "ruby", "modern" or "archaic"
spelling = "ruby"

# Recrawl pages that were already converted
force = false

# Pages to convert, in order. The key is used as label prefix and as the
# name of the generated files.
[pages]
# book_1 = "pages/book_1.html"
# book_2 = "pages/book_2.html"
"#;

/// Default configuration template in JSON format.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "output_dir": "build",
  "internal_link_prefix": "https://www.dartmouth.edu/~milton/reading_room/pl/",
  "annotation_timeout_secs": 2.0,
  "poll_interval_ms": 50,
  "strip_non_ascii": false,
  "word_labels": false,
  "disable_annotations": false,
  "spelling": "ruby",
  "force": false,
  "pages": {
    "book_1": "pages/book_1.html",
    "book_2": "pages/book_2.html"
  }
}
"#;

/// Get the correct configuration template based on the requested format.
///
/// # Errors
///
/// Returns an error if the requested format is not supported.
pub fn get_template(format: &str) -> Result<&'static str, TemplateError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(TemplateError::UnsupportedFormat(format.to_string())),
  }
}
