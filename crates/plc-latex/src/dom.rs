//! Primitive in-place rewrites of an element's inner markup.
//!
//! Strings inserted by [`wrap`], [`append`] and [`replace`] are text: they are
//! HTML-encoded before insertion so LaTeX fragments containing `<`, `>` or
//! `&` read back verbatim from the rendered text. [`transform`] works on raw
//! markup.
use html_escape::encode_text;
use log::trace;

use crate::{error::PageResult, page::Page};

/// Inner content becomes `front` + old inner markup + `back`.
///
/// # Errors
///
/// Propagates page errors, most notably stale references.
pub fn wrap<P: Page>(
  page: &mut P,
  node: &P::Node,
  front: &str,
  back: &str,
) -> PageResult<()> {
  let old = page.inner_markup(node)?;
  let markup = format!("{}{old}{}", encode_text(front), encode_text(back));
  trace!("wrap {node:?} in `{front}` … `{back}`");
  page.set_inner_markup(node, &markup)
}

/// Inner content becomes old inner markup + `text`.
///
/// Returns the plain-text length, in characters, of the content before the
/// append.
///
/// # Errors
///
/// Propagates page errors, most notably stale references.
pub fn append<P: Page>(
  page: &mut P,
  node: &P::Node,
  text: &str,
) -> PageResult<usize> {
  let old_len = page.text(node)?.chars().count();
  let old = page.inner_markup(node)?;
  let markup = format!("{old}{}", encode_text(text));
  trace!("append `{text}` to {node:?}");
  page.set_inner_markup(node, &markup)?;
  Ok(old_len)
}

/// Inner content becomes `text`, discarding all descendants.
///
/// # Errors
///
/// Propagates page errors, most notably stale references.
pub fn replace<P: Page>(
  page: &mut P,
  node: &P::Node,
  text: &str,
) -> PageResult<()> {
  page.set_inner_markup(node, &encode_text(text))
}

/// Inner content becomes `op(old inner markup)`.
///
/// An identity `op` forces a read-modify-write, which surfaces stale handles
/// before any attribute of the node is trusted.
///
/// # Errors
///
/// Propagates page errors, most notably stale references.
pub fn transform<P, F>(page: &mut P, node: &P::Node, op: F) -> PageResult<()>
where
  P: Page,
  F: FnOnce(&str) -> String,
{
  let old = page.inner_markup(node)?;
  page.set_inner_markup(node, &op(&old))
}
