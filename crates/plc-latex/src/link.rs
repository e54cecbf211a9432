//! Hyperlink classification.
//!
//! Links into the edition itself become `\ref{}`s to the labels emitted by
//! [`crate::labels`]; everything else becomes an `\href{}{}`.
use log::debug;

use crate::{
  dom,
  error::{LatexError, LatexResult},
  escape::{EscapeTable, tex_escape},
  labels::label,
  page::Page,
};

/// Where a link points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
  /// Same-site reference. `label` is `None` when there is no fragment to
  /// point at.
  Internal { label: Option<String> },
  /// Anything else.
  External { href: String },
}

/// Classify `href` against the internal base URL.
///
/// Internal links are those starting with `internal_prefix` or `../`. Their
/// label is `<book>_<fragment>`, with `<book>` the second-to-last path
/// segment. Links into the current page (`#frag`, or a bare file name such
/// as `text.shtml#frag`) resolve to `<label_prefix>_<fragment>`.
#[must_use]
pub fn classify_link(
  href: &str,
  internal_prefix: &str,
  label_prefix: &str,
) -> LinkTarget {
  if let Some((path, fragment)) = href.split_once('#')
    && is_same_page(path)
  {
    return LinkTarget::Internal {
      label: (!fragment.is_empty()).then(|| label(label_prefix, fragment)),
    };
  }

  let internal = (!internal_prefix.is_empty()
    && href.starts_with(internal_prefix))
    || href.starts_with("../");

  if !internal {
    return LinkTarget::External {
      href: href.to_string(),
    };
  }

  let parts: Vec<&str> = href.split('#').collect();
  let target = match parts.as_slice() {
    [path, fragment] => {
      path.rsplit('/').nth(1).map(|book| label(book, fragment))
    },
    _ => None,
  };

  LinkTarget::Internal { label: target }
}

/// A path resolving to the page it appears on: empty, or a bare file name
/// without scheme or directory.
fn is_same_page(path: &str) -> bool {
  path.is_empty() || !(path.contains(':') || path.contains('/'))
}

/// Rewrite the anchor `node` according to its `href`.
///
/// Internal links keep their text and get `\ref{label}` appended; external
/// links are wrapped as `\href{url}{text}`.
///
/// # Errors
///
/// Returns [`LatexError::UnsupportedLink`] when the anchor has no `href`.
pub fn insert_link<P: Page>(
  page: &mut P,
  node: &P::Node,
  internal_prefix: &str,
  label_prefix: &str,
) -> LatexResult<LinkTarget> {
  let href = page
    .attribute(node, "href")?
    .filter(|href| !href.is_empty());

  let Some(href) = href else {
    return Err(LatexError::UnsupportedLink {
      text: page.text(node).unwrap_or_default(),
    });
  };

  let target = classify_link(&href, internal_prefix, label_prefix);
  match &target {
    LinkTarget::Internal { label: Some(label) } => {
      dom::append(page, node, &format!("\\ref{{{label}}}"))?;
    },
    LinkTarget::Internal { label: None } => {
      debug!("Internal link `{href}` has no fragment, leaving it as is");
    },
    LinkTarget::External { href } => {
      let front =
        format!("\\href{{{}}}{{", tex_escape(href, EscapeTable::latex()));
      dom::wrap(page, node, &front, "}")?;
    },
  }

  Ok(target)
}
