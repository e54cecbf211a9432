//! LaTeX escaping of extracted text.
use std::{collections::HashMap, sync::OnceLock};

use regex::Regex;

/// Literal characters with a special meaning in LaTeX, and their escaped
/// replacements.
pub const ESCAPE_MAPPING: &[(&str, &str)] = &[
  ("&", r"\&"),
  ("%", r"\%"),
  ("$", r"\$"),
  ("#", r"\#"),
  ("_", r"\_"),
  ("{", r"\{"),
  ("}", r"\}"),
  ("~", r"\textasciitilde{}"),
  ("^", r"\^{}"),
  ("\\", r"\textbackslash{}"),
  ("<", r"\textless{}"),
  (">", r"\textgreater{}"),
];

/// A compiled literal → replacement table.
///
/// All keys are folded into a single alternation, longest key first, so the
/// longest applicable key wins at every position and replacements are never
/// rescanned.
#[derive(Debug, Clone)]
pub struct EscapeTable {
  pattern:      Option<Regex>,
  replacements: HashMap<String, String>,
}

impl EscapeTable {
  /// Compile a mapping into a table.
  ///
  /// # Errors
  ///
  /// Returns an error if the combined pattern exceeds the regex size limits.
  pub fn new(mapping: &[(&str, &str)]) -> Result<Self, regex::Error> {
    let replacements: HashMap<String, String> = mapping
      .iter()
      .filter(|(key, _)| !key.is_empty())
      .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
      .collect();

    let mut keys: Vec<&str> = replacements.keys().map(String::as_str).collect();
    // Longest first; ties broken lexically so the pattern is deterministic.
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let pattern = if keys.is_empty() {
      None
    } else {
      let alternation = keys
        .iter()
        .map(|key| regex::escape(key))
        .collect::<Vec<_>>()
        .join("|");
      Some(Regex::new(&alternation)?)
    };

    Ok(Self {
      pattern,
      replacements,
    })
  }

  /// The table for [`ESCAPE_MAPPING`], compiled once.
  #[must_use]
  pub fn latex() -> &'static Self {
    static TABLE: OnceLock<EscapeTable> = OnceLock::new();
    TABLE.get_or_init(|| {
      Self::new(ESCAPE_MAPPING).unwrap_or_else(|e| {
        log::error!("Failed to compile LaTeX escape table: {e}");
        Self {
          pattern:      None,
          replacements: HashMap::new(),
        }
      })
    })
  }

  /// Replace every key occurrence in `text`.
  #[must_use]
  pub fn escape(&self, text: &str) -> String {
    let Some(pattern) = &self.pattern else {
      return text.to_string();
    };

    pattern
      .replace_all(text, |caps: &regex::Captures<'_>| {
        self
          .replacements
          .get(&caps[0])
          .cloned()
          .unwrap_or_else(|| caps[0].to_string())
      })
      .into_owned()
  }
}

/// Escape `text` through `table`.
#[must_use]
pub fn tex_escape(text: &str, table: &EscapeTable) -> String {
  table.escape(text)
}

/// Prefix every `target` not already preceded by a backslash with one.
///
/// Running it on its own output is a no-op.
#[must_use]
pub fn escape_unescaped(text: &str, target: char) -> String {
  let mut out = String::with_capacity(text.len() + 8);
  let mut prev = None;

  for c in text.chars() {
    if c == target && prev != Some('\\') {
      out.push('\\');
    }
    out.push(c);
    prev = Some(c);
  }

  out
}

/// Escape every `#` that is not escaped yet.
#[must_use]
pub fn escape_hashtag(text: &str) -> String {
  escape_unescaped(text, '#')
}

/// Drop every character outside ASCII, returning the kept text and the
/// number of dropped characters.
#[must_use]
pub fn strip_non_ascii(text: &str) -> (String, usize) {
  let kept: String = text.chars().filter(char::is_ascii).collect();
  let dropped = text.chars().count() - kept.chars().count();
  (kept, dropped)
}
