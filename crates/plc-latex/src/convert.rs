//! The per-block conversion pipeline.
use std::time::Duration;

use log::{debug, warn};

use crate::{
  annotation::AnnotationExtractor,
  error::LatexResult,
  escape::{escape_hashtag, escape_unescaped, strip_non_ascii},
  labels::{insert_line_labels, insert_word_labels},
  page::Page,
  site::SiteConventions,
  spelling::insert_modern_spelling,
};

/// Default bound on popup appearance and disappearance.
pub const DEFAULT_ANNOTATION_TIMEOUT: Duration = Duration::from_secs(2);

/// Options for [`Converter`].
#[derive(Debug, Clone)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Independent pass toggles"
)]
pub struct ConvertOptions {
  /// Markup conventions of the source site.
  pub site: SiteConventions,

  /// How long to wait for an annotation popup to open or close.
  pub annotation_timeout: Duration,

  /// Fold annotation popups into footnotes.
  pub annotations: bool,

  /// Overlay archaic words with their modern spelling.
  pub modern_spelling: bool,

  /// Turn named anchors into labels and blank every other anchor.
  pub word_labels: bool,

  /// Drop every non-ASCII character from the result.
  pub strip_non_ascii: bool,
}

impl Default for ConvertOptions {
  fn default() -> Self {
    Self {
      site:               SiteConventions::default(),
      annotation_timeout: DEFAULT_ANNOTATION_TIMEOUT,
      annotations:        true,
      modern_spelling:    true,
      word_labels:        false,
      strip_non_ascii:    false,
    }
  }
}

/// Converts content blocks of a page into LaTeX.
#[derive(Debug, Clone, Default)]
pub struct Converter {
  options: ConvertOptions,
}

impl Converter {
  #[must_use]
  pub const fn new(options: ConvertOptions) -> Self {
    Self { options }
  }

  #[must_use]
  pub const fn options(&self) -> &ConvertOptions {
    &self.options
  }

  /// Convert one content block (a paragraph or an argument) in place and
  /// return its LaTeX text.
  ///
  /// Labels go first because annotation clicks restructure the block, and
  /// the spelling overlay runs last because it revisits nodes the annotation
  /// pass may have replaced.
  ///
  /// # Errors
  ///
  /// Fails on page-level errors: a popup that does not close, a link without
  /// destination, or a backend failure.
  pub fn convert_block_to_latex<P: Page>(
    &self,
    page: &mut P,
    root: &P::Node,
    label_prefix: &str,
  ) -> LatexResult<String> {
    let site = &self.options.site;

    let labels = insert_line_labels(page, root, &site.line_class, label_prefix)?;
    debug!("Inserted {labels} line labels");

    if self.options.word_labels {
      let words = insert_word_labels(page, root, label_prefix)?;
      debug!("Inserted {words} word labels");
    }

    if self.options.annotations {
      let extractor =
        AnnotationExtractor::new(site, self.options.annotation_timeout);
      let annotations =
        extractor.insert_annotations(page, root, label_prefix)?;
      debug!("Inserted {} footnotes", annotations.len());
    }

    if self.options.modern_spelling {
      let words = insert_modern_spelling(page, root, &site.tooltip_selector)?;
      debug!("Overlaid {words} archaic spellings");
    }

    let text = page.text(root)?;
    Ok(self.finish_text(&text, label_prefix))
  }

  fn finish_text(&self, text: &str, label_prefix: &str) -> String {
    let text = finish_text(text);
    if !self.options.strip_non_ascii {
      return text;
    }

    let (kept, dropped) = strip_non_ascii(&text);
    if dropped > 0 {
      warn!("Dropped {dropped} non-ASCII characters from a block of `{label_prefix}`");
    }
    kept
  }
}

/// Escape the extracted text of a block: bare `&`, newlines as LaTeX line
/// breaks, then bare `#`.
#[must_use]
pub fn finish_text(text: &str) -> String {
  let text = escape_unescaped(text, '&');
  let text = text.replace('\n', "\\\\\n");
  escape_hashtag(&text)
}
