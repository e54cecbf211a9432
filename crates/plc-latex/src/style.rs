//! Named styles applied to page elements.
use log::trace;

use crate::{
  dom,
  error::{LatexError, LatexResult},
  link,
  page::Page,
  site::SiteConventions,
};

/// How a style rewrites an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
  /// Surround the inner markup with `prefix` and `suffix`.
  Wrap {
    prefix: &'static str,
    suffix: &'static str,
  },
  /// Classify the element as a hyperlink, see [`link::insert_link`].
  Link,
}

/// Every style the pipeline knows about.
pub const STYLE_MAPPING: &[(&str, Style)] = &[
  ("annotation_keyword", Style::Wrap {
    prefix: "\\emph{",
    suffix: "}",
  }),
  ("quote", Style::Wrap {
    prefix: "\\begin{quote}",
    suffix: "\\end{quote}",
  }),
  ("link", Style::Link),
  ("annotated", Style::Wrap {
    prefix: "\\emph{",
    suffix: "}",
  }),
  ("footnote", Style::Wrap {
    prefix: "\\footnote{",
    suffix: "}",
  }),
];

/// Look up a style by name.
///
/// # Errors
///
/// Returns [`LatexError::Configuration`] for names missing from
/// [`STYLE_MAPPING`].
pub fn lookup_style(name: &str) -> LatexResult<Style> {
  STYLE_MAPPING
    .iter()
    .find(|(style_name, _)| *style_name == name)
    .map(|(_, style)| *style)
    .ok_or_else(|| LatexError::Configuration(name.to_string()))
}

/// Apply the style called `name` to `node`. Same-page links resolve to
/// labels under `label_prefix`.
///
/// # Errors
///
/// Returns [`LatexError::Configuration`] for unknown styles, and whatever
/// the style itself fails with.
pub fn style_element<P: Page>(
  page: &mut P,
  node: &P::Node,
  name: &str,
  site: &SiteConventions,
  label_prefix: &str,
) -> LatexResult<()> {
  trace!("style {node:?} as `{name}`");
  match lookup_style(name)? {
    Style::Wrap { prefix, suffix } => {
      dom::wrap(page, node, prefix, suffix)?;
    },
    Style::Link => {
      link::insert_link(
        page,
        node,
        &site.internal_link_prefix,
        label_prefix,
      )?;
    },
  }
  Ok(())
}
