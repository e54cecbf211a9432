//! Annotation popups folded into footnotes.
//!
//! The site shows scholarly commentary in a single popup element that is
//! reused by every annotation button: a click opens it with the button's
//! commentary, a second click on the same button closes it again. Each
//! candidate therefore walks the same sequence of [`AnnotationState`]s, and
//! the popup must be gone before the next candidate is clicked.
//!
//! A popup that never opens only costs that one footnote. A popup that never
//! closes would leak into every following candidate, so it aborts the page.
use std::{fmt, time::Duration};

use log::{debug, trace, warn};

use crate::{
  dom,
  error::{LatexError, LatexResult, PageError},
  page::Page,
  site::SiteConventions,
  style::style_element,
};

/// Commentary read from one popup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Annotation {
  /// Text of the popup's first italic element, without trailing
  /// punctuation.
  pub keyword_phrase: String,
  /// Remaining popup text after the keyword and its separator.
  pub explanation:    String,
}

impl Annotation {
  /// Split a popup's plain `text` around its italic `keyword`.
  #[must_use]
  pub fn from_popup_text(text: &str, keyword: Option<&str>) -> Self {
    let text = text.trim();
    let Some(keyword) = keyword.map(str::trim).filter(|k| !k.is_empty())
    else {
      return Self {
        keyword_phrase: String::new(),
        explanation:    text.to_string(),
      };
    };

    let keyword_phrase = keyword
      .trim_end_matches(|c: char| c.is_ascii_punctuation())
      .trim_end()
      .to_string();

    let rest = text
      .find(keyword)
      .map_or(text, |start| &text[start + keyword.len()..]);
    let explanation = rest
      .trim_start_matches(|c: char| {
        c.is_whitespace() || matches!(c, ':' | ';' | ',' | '.' | '-' | '—')
      })
      .trim_end()
      .to_string();

    Self {
      keyword_phrase,
      explanation,
    }
  }
}

/// Lifecycle of one annotation candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationState {
  Idle,
  Triggering,
  AwaitingPopup,
  PopupPresent,
  Styling,
  Dismissing,
  AwaitingDismissal,
  Done,
  Failed,
}

impl fmt::Display for AnnotationState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Idle => "idle",
      Self::Triggering => "triggering",
      Self::AwaitingPopup => "awaiting popup",
      Self::PopupPresent => "popup present",
      Self::Styling => "styling",
      Self::Dismissing => "dismissing",
      Self::AwaitingDismissal => "awaiting dismissal",
      Self::Done => "done",
      Self::Failed => "failed",
    };
    f.write_str(name)
  }
}

/// Popup descendants restyled before the footnote text is taken, in order.
const POPUP_STYLES: &[(&str, &str)] = &[
  ("i", "annotation_keyword"),
  ("blockquote", "quote"),
  ("a", "link"),
];

/// Drives candidates through the click / read / dismiss cycle.
#[derive(Debug, Clone)]
pub struct AnnotationExtractor<'a> {
  site:    &'a SiteConventions,
  timeout: Duration,
}

impl<'a> AnnotationExtractor<'a> {
  #[must_use]
  pub const fn new(site: &'a SiteConventions, timeout: Duration) -> Self {
    Self { site, timeout }
  }

  /// Fold the popup of every candidate under `root`, in document order, into
  /// a footnote appended to the candidate. Same-page links inside popups
  /// resolve to labels under `label_prefix`.
  ///
  /// Returns the annotations that were inserted; candidates whose popup
  /// never appeared are skipped.
  ///
  /// # Errors
  ///
  /// Returns [`LatexError::StuckPopup`] if a popup does not close again, and
  /// propagates fatal styling errors such as
  /// [`LatexError::UnsupportedLink`].
  pub fn insert_annotations<P: Page>(
    &self,
    page: &mut P,
    root: &P::Node,
    label_prefix: &str,
  ) -> LatexResult<Vec<Annotation>> {
    let candidates =
      page.find_by_selector(root, &self.site.annotation_candidate_selector)?;
    debug!("Found {} annotation candidates", candidates.len());

    let mut annotations = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
      if let Some(annotation) =
        self.process_candidate(page, candidate, label_prefix)?
      {
        annotations.push(annotation);
      }
    }

    Ok(annotations)
  }

  /// Run one candidate through the state machine.
  ///
  /// # Errors
  ///
  /// See [`Self::insert_annotations`].
  pub fn process_candidate<P: Page>(
    &self,
    page: &mut P,
    candidate: &P::Node,
    label_prefix: &str,
  ) -> LatexResult<Option<Annotation>> {
    let selector = self.site.annotation_selector();
    let mut state = AnnotationState::Idle;

    advance(&mut state, AnnotationState::Triggering, candidate);
    page.click(candidate)?;

    advance(&mut state, AnnotationState::AwaitingPopup, candidate);
    let popup = match page.wait_until_present(&selector, self.timeout) {
      Ok(popup) => popup,
      Err(PageError::Timeout { .. } | PageError::MissingElement(_)) => {
        advance(&mut state, AnnotationState::Failed, candidate);
        warn!(
          "Couldn't find the annotation for {candidate:?} within {:?}, \
           skipping",
          self.timeout
        );
        return Ok(None);
      },
      Err(e) => return Err(e.into()),
    };

    advance(&mut state, AnnotationState::PopupPresent, candidate);
    let annotation = read_annotation(page, &popup)?;
    self.stylize_popup(page, &popup, label_prefix)?;

    advance(&mut state, AnnotationState::Styling, candidate);
    style_element(page, &popup, "footnote", self.site, label_prefix)?;
    style_element(page, candidate, "annotated", self.site, label_prefix)?;
    let footnote = page.text(&popup)?;
    dom::append(page, candidate, &footnote)?;

    advance(&mut state, AnnotationState::Dismissing, candidate);
    page.click(candidate)?;

    advance(&mut state, AnnotationState::AwaitingDismissal, candidate);
    page
      .wait_until_absent(&selector, self.timeout)
      .map_err(|e| {
        match e {
          PageError::Timeout { selector, timeout } => {
            LatexError::StuckPopup { selector, timeout }
          },
          other => other.into(),
        }
      })?;

    advance(&mut state, AnnotationState::Done, candidate);
    debug!(
      "Annotated `{}`: {}",
      annotation.keyword_phrase, annotation.explanation
    );
    Ok(Some(annotation))
  }

  /// Restyle keywords, quotes and links inside the popup, then normalise the
  /// trailing period.
  fn stylize_popup<P: Page>(
    &self,
    page: &mut P,
    popup: &P::Node,
    label_prefix: &str,
  ) -> LatexResult<()> {
    for (tag, style) in POPUP_STYLES {
      // Queried per tag: earlier rewrites replace the nodes found later.
      // Innermost first: restyling an element detaches its descendants.
      for node in page.find_by_tag(popup, tag)?.into_iter().rev() {
        style_element(page, &node, style, self.site, label_prefix)?;
      }
    }

    dom::transform(page, popup, |markup| {
      format!("{}.", markup.trim_end_matches('.').trim_end())
    })?;
    Ok(())
  }
}

/// Read the keyword phrase and explanation off an open popup.
fn read_annotation<P: Page>(
  page: &P,
  popup: &P::Node,
) -> LatexResult<Annotation> {
  let text = page.text(popup)?;
  let keyword = match page.find_by_tag(popup, "i")?.first() {
    Some(italic) => Some(page.text(italic)?),
    None => None,
  };
  Ok(Annotation::from_popup_text(&text, keyword.as_deref()))
}

fn advance<N: fmt::Debug>(
  state: &mut AnnotationState,
  next: AnnotationState,
  candidate: &N,
) {
  trace!("annotation {candidate:?}: {state} -> {next}");
  *state = next;
}
