//! [`Page`] over a parsed snapshot of the site.
//!
//! The snapshot is a static document, so the annotation widget is emulated:
//! clicking a candidate copies the commentary it points at into a popup
//! element, clicking again removes the popup. Everything else is plain DOM
//! access through `kuchikikiki`.
mod text;

use std::{fs, io, path::Path, time::Duration};

use kuchikikiki::{Attribute, ExpandedName, NodeRef, parse_html};
use log::trace;
use markup5ever::{QualName, local_name, ns};
use tendril::TendrilSink;

pub use self::text::rendered_text;
use crate::{
  error::{PageError, PageResult},
  page::{Page, poll_until},
};

/// Default sleep between two probes of a wait.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A loaded HTML document.
#[derive(Debug, Clone)]
pub struct HtmlPage {
  document:      NodeRef,
  popup_class:   String,
  poll_interval: Duration,
}

impl HtmlPage {
  /// Parse a complete document or a body fragment.
  #[must_use]
  pub fn parse(html: &str) -> Self {
    Self {
      document:      parse_html().one(html),
      popup_class:   "annotation".to_string(),
      poll_interval: DEFAULT_POLL_INTERVAL,
    }
  }

  /// Read and parse a saved page.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read.
  pub fn from_file(path: &Path) -> io::Result<Self> {
    let html = fs::read_to_string(path)?;
    Ok(Self::parse(&html))
  }

  #[must_use]
  pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
    self.poll_interval = interval;
    self
  }

  /// Class given to emulated annotation popups.
  #[must_use]
  pub fn with_popup_class(mut self, class: impl Into<String>) -> Self {
    self.popup_class = class.into();
    self
  }

  /// Serialize the whole document.
  ///
  /// # Errors
  ///
  /// Returns [`PageError::Backend`] if serialization fails.
  pub fn to_html(&self) -> PageResult<String> {
    serialize(&self.document)
  }

  fn ensure_attached(&self, node: &NodeRef) -> PageResult<()> {
    match node.inclusive_ancestors().last() {
      Some(top) if top == self.document => Ok(()),
      _ => Err(PageError::StaleReference),
    }
  }

  fn open_popups(&self) -> Vec<NodeRef> {
    self
      .document
      .descendants()
      .filter(|node| has_class(node, &self.popup_class))
      .collect()
  }

  fn element_by_id(&self, id: &str) -> Option<NodeRef> {
    self.document.descendants().find(|node| {
      node.as_element().is_some_and(|element| {
        element.attributes.borrow().get(local_name!("id")) == Some(id)
      })
    })
  }

  /// Identifier of the commentary a candidate points at.
  fn popup_source(node: &NodeRef) -> Option<String> {
    let element = node.as_element()?;
    let attributes = element.attributes.borrow();
    attributes
      .get("data-annotation")
      .or_else(|| {
        attributes
          .get(local_name!("href"))
          .and_then(|href| href.strip_prefix('#'))
      })
      .filter(|id| !id.is_empty())
      .map(ToString::to_string)
  }

  fn open_popup(&self, source: &NodeRef) -> PageResult<()> {
    let markup = inner_html(source)?;
    let popup = NodeRef::new_element(
      QualName::new(None, ns!(html), local_name!("div")),
      vec![(ExpandedName::new("", "class"), Attribute {
        prefix: None,
        value:  self.popup_class.clone(),
      })],
    );
    replace_children(&popup, &markup);

    let body = self
      .document
      .select_first("body")
      .map_or_else(|()| self.document.clone(), |body| body.as_node().clone());
    body.append(popup);
    Ok(())
  }

  fn select(&self, root: &NodeRef, selector: &str) -> PageResult<Vec<NodeRef>> {
    self.ensure_attached(root)?;
    let matches = root
      .select(selector)
      .map_err(|()| PageError::InvalidSelector(selector.to_string()))?;

    Ok(
      matches
        .map(|element| element.as_node().clone())
        .filter(|node| node != root)
        .collect(),
    )
  }
}

impl Page for HtmlPage {
  type Node = NodeRef;

  fn root(&self) -> NodeRef {
    self.document.clone()
  }

  fn text(&self, node: &NodeRef) -> PageResult<String> {
    self.ensure_attached(node)?;
    Ok(rendered_text(node))
  }

  fn attribute(&self, node: &NodeRef, name: &str) -> PageResult<Option<String>> {
    self.ensure_attached(node)?;
    Ok(node.as_element().and_then(|element| {
      element.attributes.borrow().get(name).map(ToString::to_string)
    }))
  }

  fn inner_markup(&self, node: &NodeRef) -> PageResult<String> {
    self.ensure_attached(node)?;
    inner_html(node)
  }

  fn set_inner_markup(&mut self, node: &NodeRef, markup: &str) -> PageResult<()> {
    self.ensure_attached(node)?;
    replace_children(node, markup);
    Ok(())
  }

  fn find_by_tag(&self, root: &NodeRef, tag: &str) -> PageResult<Vec<NodeRef>> {
    self.ensure_attached(root)?;
    Ok(
      root
        .descendants()
        .filter(|node| {
          node.as_element().is_some_and(|element| {
            let name: &str = &element.name.local;
            name.eq_ignore_ascii_case(tag)
          })
        })
        .collect(),
    )
  }

  fn find_by_class(
    &self,
    root: &NodeRef,
    class: &str,
  ) -> PageResult<Vec<NodeRef>> {
    self.ensure_attached(root)?;
    Ok(root.descendants().filter(|node| has_class(node, class)).collect())
  }

  fn find_by_selector(
    &self,
    root: &NodeRef,
    selector: &str,
  ) -> PageResult<Vec<NodeRef>> {
    self.select(root, selector)
  }

  fn click(&mut self, node: &NodeRef) -> PageResult<()> {
    self.ensure_attached(node)?;

    let open = self.open_popups();
    if !open.is_empty() {
      trace!("click closes {} popup(s)", open.len());
      for popup in open {
        popup.detach();
      }
      return Ok(());
    }

    let Some(id) = Self::popup_source(node) else {
      trace!("click on {node:?} has no effect");
      return Ok(());
    };
    match self.element_by_id(&id) {
      Some(source) => {
        trace!("click opens popup for `{id}`");
        self.open_popup(&source)
      },
      None => {
        trace!("click points at missing `#{id}`");
        Ok(())
      },
    }
  }

  fn wait_until_present(
    &self,
    selector: &str,
    timeout: Duration,
  ) -> PageResult<NodeRef> {
    poll_until(timeout, self.poll_interval, || {
      Ok(self.select(&self.document, selector)?.into_iter().next())
    })?
    .ok_or_else(|| {
      PageError::Timeout {
        selector: selector.to_string(),
        timeout,
      }
    })
  }

  fn wait_until_absent(
    &self,
    selector: &str,
    timeout: Duration,
  ) -> PageResult<()> {
    poll_until(timeout, self.poll_interval, || {
      Ok(self.select(&self.document, selector)?.is_empty().then_some(()))
    })?
    .ok_or_else(|| {
      PageError::Timeout {
        selector: selector.to_string(),
        timeout,
      }
    })
  }
}

fn has_class(node: &NodeRef, class: &str) -> bool {
  node.as_element().is_some_and(|element| {
    element
      .attributes
      .borrow()
      .get(local_name!("class"))
      .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
  })
}

fn serialize(node: &NodeRef) -> PageResult<String> {
  let mut buf = Vec::new();
  node
    .serialize(&mut buf)
    .map_err(|e| PageError::Backend(e.to_string()))?;
  String::from_utf8(buf).map_err(|e| PageError::Backend(e.to_string()))
}

fn inner_html(node: &NodeRef) -> PageResult<String> {
  node.children().map(|child| serialize(&child)).collect()
}

/// Detach every child of `node`, then move the nodes parsed from `markup` in.
fn replace_children(node: &NodeRef, markup: &str) {
  for child in node.children().collect::<Vec<_>>() {
    child.detach();
  }

  let fragment = parse_html().one(format!("<html><body>{markup}</body></html>"));
  let Ok(body) = fragment.select_first("body") else {
    return;
  };
  for child in body.as_node().children().collect::<Vec<_>>() {
    node.append(child);
  }
}
