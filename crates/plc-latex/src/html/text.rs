//! An approximation of the browser's `innerText`.
use kuchikikiki::NodeRef;
use markup5ever::{LocalName, local_name};

/// Elements rendered on lines of their own.
fn is_block(name: &LocalName) -> bool {
  matches!(
    *name,
    local_name!("p")
      | local_name!("div")
      | local_name!("blockquote")
      | local_name!("li")
      | local_name!("ul")
      | local_name!("ol")
      | local_name!("tr")
      | local_name!("table")
      | local_name!("h1")
      | local_name!("h2")
      | local_name!("h3")
      | local_name!("h4")
      | local_name!("h5")
      | local_name!("h6")
      | local_name!("section")
      | local_name!("article")
      | local_name!("pre")
  )
}

fn is_hidden(node: &NodeRef) -> bool {
  let Some(element) = node.as_element() else {
    return false;
  };
  if matches!(
    element.name.local,
    local_name!("script") | local_name!("style") | local_name!("head")
  ) {
    return true;
  }

  let attributes = element.attributes.borrow();
  attributes.contains(local_name!("hidden"))
    || attributes.get(local_name!("style")).is_some_and(|style| {
      let style: String =
        style.chars().filter(|c| !c.is_ascii_whitespace()).collect();
      style.to_ascii_lowercase().contains("display:none")
    })
}

fn collect(node: &NodeRef, out: &mut String) {
  if let Some(text) = node.as_text() {
    out.extend(text.borrow().chars().map(|c| {
      if c.is_ascii_whitespace() { ' ' } else { c }
    }));
    return;
  }
  if is_hidden(node) {
    return;
  }

  let block = node.as_element().is_some_and(|element| {
    if element.name.local == local_name!("br") {
      out.push('\n');
    }
    is_block(&element.name.local)
  });

  if block {
    out.push('\n');
  }
  for child in node.children() {
    collect(&child, out);
  }
  if block {
    out.push('\n');
  }
}

/// Rendered text of `node`: whitespace collapsed, one line per block or
/// `<br>`, hidden content skipped, blank lines dropped.
#[must_use]
pub fn rendered_text(node: &NodeRef) -> String {
  let mut raw = String::new();
  collect(node, &mut raw);

  raw
    .lines()
    .map(|line| line.split_ascii_whitespace().collect::<Vec<_>>().join(" "))
    .filter(|line| !line.is_empty())
    .collect::<Vec<_>>()
    .join("\n")
}
