//! The page capability consumed by every conversion pass.
//!
//! The pipeline never owns a page. It borrows one for the duration of a
//! single page's processing and reaches the DOM exclusively through this
//! trait, which keeps the passes independent of whether the page is a live
//! browser session or a saved snapshot.
use std::{
  thread,
  time::{Duration, Instant},
};

use crate::error::{PageError, PageResult};

/// Query and mutation capabilities of one loaded page.
///
/// Node handles are cheap to clone and may become stale: once an ancestor's
/// inner markup is replaced, handles to the old descendants fail with
/// [`PageError::StaleReference`].
///
/// Mutating operations take `&mut self`; one page is driven by at most one
/// pipeline invocation at a time.
pub trait Page {
  /// Handle to one element of the page.
  type Node: Clone + std::fmt::Debug;

  /// The document root.
  fn root(&self) -> Self::Node;

  /// Rendered plain text of `node`.
  ///
  /// # Errors
  ///
  /// Returns [`PageError::StaleReference`] if the node is detached.
  fn text(&self, node: &Self::Node) -> PageResult<String>;

  /// Value of attribute `name`, or `None` when absent.
  ///
  /// # Errors
  ///
  /// Returns [`PageError::StaleReference`] if the node is detached.
  fn attribute(&self, node: &Self::Node, name: &str)
  -> PageResult<Option<String>>;

  /// Serialized markup of the node's children.
  ///
  /// # Errors
  ///
  /// Returns [`PageError::StaleReference`] if the node is detached.
  fn inner_markup(&self, node: &Self::Node) -> PageResult<String>;

  /// Replace all children of `node` with the parsed `markup`.
  ///
  /// # Errors
  ///
  /// Returns [`PageError::StaleReference`] if the node is detached.
  fn set_inner_markup(
    &mut self,
    node: &Self::Node,
    markup: &str,
  ) -> PageResult<()>;

  /// Descendant elements with the given tag name, in document order.
  ///
  /// # Errors
  ///
  /// Returns [`PageError::StaleReference`] if `root` is detached.
  fn find_by_tag(
    &self,
    root: &Self::Node,
    tag: &str,
  ) -> PageResult<Vec<Self::Node>>;

  /// Descendant elements carrying the class token `class`.
  ///
  /// # Errors
  ///
  /// Returns [`PageError::StaleReference`] if `root` is detached.
  fn find_by_class(
    &self,
    root: &Self::Node,
    class: &str,
  ) -> PageResult<Vec<Self::Node>>;

  /// Descendant elements matching a CSS selector.
  ///
  /// # Errors
  ///
  /// Returns [`PageError::InvalidSelector`] for unparsable selectors and
  /// [`PageError::StaleReference`] if `root` is detached.
  fn find_by_selector(
    &self,
    root: &Self::Node,
    selector: &str,
  ) -> PageResult<Vec<Self::Node>>;

  /// First descendant matching `selector`.
  ///
  /// # Errors
  ///
  /// Returns [`PageError::MissingElement`] when nothing matches.
  fn find_first(
    &self,
    root: &Self::Node,
    selector: &str,
  ) -> PageResult<Self::Node> {
    self
      .find_by_selector(root, selector)?
      .into_iter()
      .next()
      .ok_or_else(|| PageError::MissingElement(selector.to_string()))
  }

  /// Dispatch a synthetic activation on `node`.
  ///
  /// # Errors
  ///
  /// Returns [`PageError::StaleReference`] if the node is detached.
  fn click(&mut self, node: &Self::Node) -> PageResult<()>;

  /// Block until an element matching `selector` exists, or `timeout`
  /// elapses.
  ///
  /// # Errors
  ///
  /// Returns [`PageError::Timeout`] when the element never shows up.
  fn wait_until_present(
    &self,
    selector: &str,
    timeout: Duration,
  ) -> PageResult<Self::Node>;

  /// Block until no element matches `selector`, or `timeout` elapses.
  ///
  /// # Errors
  ///
  /// Returns [`PageError::Timeout`] when a match is still present.
  fn wait_until_absent(
    &self,
    selector: &str,
    timeout: Duration,
  ) -> PageResult<()>;
}

/// Run `probe` until it yields a value or `timeout` elapses.
///
/// The probe runs at least once, so a zero timeout is a single check. Between
/// attempts the calling thread sleeps for `interval` (never past the
/// deadline). Returns `Ok(None)` on timeout.
///
/// # Errors
///
/// Propagates the first error returned by `probe`.
pub fn poll_until<T, F>(
  timeout: Duration,
  interval: Duration,
  mut probe: F,
) -> PageResult<Option<T>>
where
  F: FnMut() -> PageResult<Option<T>>,
{
  let start = Instant::now();
  loop {
    if let Some(value) = probe()? {
      return Ok(Some(value));
    }

    let elapsed = start.elapsed();
    if elapsed >= timeout {
      return Ok(None);
    }

    thread::sleep(interval.min(timeout - elapsed));
  }
}
