use std::{cell::RefCell, time::Duration};

use kuchikikiki::NodeRef;
use plc_latex::{HtmlPage, Page, PageResult};

/// Wraps an [`HtmlPage`] and records every capability call as
/// `"<operation> <node>"`.
///
/// With `sticky_popups` set, clicks never close an open popup, which is how a
/// misbehaving site leaves the annotation widget.
pub struct RecordingPage {
  pub inner:         HtmlPage,
  pub calls:         RefCell<Vec<String>>,
  pub sticky_popups: bool,
}

impl RecordingPage {
  pub fn parse(html: &str) -> Self {
    Self {
      inner:         HtmlPage::parse(html).with_poll_interval(Duration::from_millis(1)),
      calls:         RefCell::new(Vec::new()),
      sticky_popups: false,
    }
  }

  pub fn sticky(mut self) -> Self {
    self.sticky_popups = true;
    self
  }

  /// The node with the given `id`.
  pub fn by_id(&self, id: &str) -> NodeRef {
    self
      .inner
      .find_first(&self.inner.root(), &format!("#{id}"))
      .expect("element should exist")
  }

  /// Recorded calls of one operation.
  pub fn calls_of(&self, operation: &str) -> Vec<String> {
    self
      .calls
      .borrow()
      .iter()
      .filter(|call| call.split(' ').next() == Some(operation))
      .cloned()
      .collect()
  }

  /// Index of the first recorded call starting with `prefix`.
  pub fn first_call(&self, prefix: &str) -> Option<usize> {
    self
      .calls
      .borrow()
      .iter()
      .position(|call| call.starts_with(prefix))
  }

  /// Index of the last recorded call starting with `prefix`.
  pub fn last_call(&self, prefix: &str) -> Option<usize> {
    self
      .calls
      .borrow()
      .iter()
      .rposition(|call| call.starts_with(prefix))
  }

  fn record(&self, operation: &str, subject: &str) {
    self.calls.borrow_mut().push(format!("{operation} {subject}"));
  }
}

/// `tag#id` for elements, `#document` or `#node` otherwise.
pub fn describe(node: &NodeRef) -> String {
  if node.as_document().is_some() {
    return "#document".to_string();
  }
  node.as_element().map_or_else(
    || "#node".to_string(),
    |element| {
      let id = element
        .attributes
        .borrow()
        .get("id")
        .map(|id| format!("#{id}"))
        .unwrap_or_default();
      format!("{}{id}", &*element.name.local)
    },
  )
}

impl Page for RecordingPage {
  type Node = NodeRef;

  fn root(&self) -> NodeRef {
    self.inner.root()
  }

  fn text(&self, node: &NodeRef) -> PageResult<String> {
    self.record("text", &describe(node));
    self.inner.text(node)
  }

  fn attribute(&self, node: &NodeRef, name: &str) -> PageResult<Option<String>> {
    self.record("attribute", &format!("{} {name}", describe(node)));
    self.inner.attribute(node, name)
  }

  fn inner_markup(&self, node: &NodeRef) -> PageResult<String> {
    self.record("inner_markup", &describe(node));
    self.inner.inner_markup(node)
  }

  fn set_inner_markup(&mut self, node: &NodeRef, markup: &str) -> PageResult<()> {
    self.record("set_inner_markup", &describe(node));
    self.inner.set_inner_markup(node, markup)
  }

  fn find_by_tag(&self, root: &NodeRef, tag: &str) -> PageResult<Vec<NodeRef>> {
    self.record("find_by_tag", tag);
    self.inner.find_by_tag(root, tag)
  }

  fn find_by_class(
    &self,
    root: &NodeRef,
    class: &str,
  ) -> PageResult<Vec<NodeRef>> {
    self.record("find_by_class", class);
    self.inner.find_by_class(root, class)
  }

  fn find_by_selector(
    &self,
    root: &NodeRef,
    selector: &str,
  ) -> PageResult<Vec<NodeRef>> {
    self.record("find_by_selector", selector);
    self.inner.find_by_selector(root, selector)
  }

  fn click(&mut self, node: &NodeRef) -> PageResult<()> {
    self.record("click", &describe(node));
    let open = !self
      .inner
      .find_by_selector(&self.inner.root(), ".annotation")?
      .is_empty();
    if open && self.sticky_popups {
      return Ok(());
    }
    self.inner.click(node)
  }

  fn wait_until_present(
    &self,
    selector: &str,
    timeout: Duration,
  ) -> PageResult<NodeRef> {
    self.record("wait_until_present", selector);
    self.inner.wait_until_present(selector, timeout)
  }

  fn wait_until_absent(
    &self,
    selector: &str,
    timeout: Duration,
  ) -> PageResult<()> {
    self.record("wait_until_absent", selector);
    self.inner.wait_until_absent(selector, timeout)
  }
}
