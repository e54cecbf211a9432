//! Line and word markers to `\label{}` targets.
use log::trace;

use crate::{dom, error::LatexResult, page::Page};

/// Namespaced label: `{prefix}_{id}`.
#[must_use]
pub fn label(prefix: &str, id: &str) -> String {
  format!("{prefix}_{id}")
}

/// Replace every line marker under `root` by its label.
///
/// Markers without an identifier are emptied: unlabeled lines cannot be
/// referenced. Returns the number of labels emitted.
///
/// # Errors
///
/// Propagates page errors.
pub fn insert_line_labels<P: Page>(
  page: &mut P,
  root: &P::Node,
  line_class: &str,
  label_prefix: &str,
) -> LatexResult<usize> {
  let markers = page.find_by_class(root, line_class)?;
  let mut labelled = 0;

  for marker in &markers {
    let id = page.attribute(marker, "id")?.unwrap_or_default();
    if id.is_empty() {
      dom::replace(page, marker, "")?;
    } else {
      trace!("line marker {id}");
      dom::replace(
        page,
        marker,
        &format!("\\label{{{}}}", label(label_prefix, &id)),
      )?;
      labelled += 1;
    }
  }

  Ok(labelled)
}

/// Replace named anchors under `root` by labels and blank every other anchor.
///
/// An anchor is a label target only when it has a `name` but neither an `id`
/// nor an `href`. Returns the number of labels emitted.
///
/// # Errors
///
/// Propagates page errors.
pub fn insert_word_labels<P: Page>(
  page: &mut P,
  root: &P::Node,
  label_prefix: &str,
) -> LatexResult<usize> {
  let anchors = page.find_by_tag(root, "a")?;
  let mut labelled = 0;

  for anchor in &anchors {
    let name = non_empty(page.attribute(anchor, "name")?);
    let id = non_empty(page.attribute(anchor, "id")?);
    let href = non_empty(page.attribute(anchor, "href")?);

    match (name, id, href) {
      (Some(name), None, None) => {
        dom::replace(
          page,
          anchor,
          &format!("\\label{{{}}}", label(label_prefix, &name)),
        )?;
        labelled += 1;
      },
      _ => dom::replace(page, anchor, "")?,
    }
  }

  Ok(labelled)
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]
  use super::*;
  use crate::html::HtmlPage;

  #[test]
  fn test_line_marker_with_id_becomes_label() {
    let mut page = HtmlPage::parse(
      r#"<p id="p"><span class="line" id="42">42</span>Of Man</p>"#,
    );
    let p = page.find_first(&page.root(), "#p").unwrap();
    let count = insert_line_labels(&mut page, &p, "line", "book1").unwrap();

    assert_eq!(count, 1);
    let marker = page.find_first(&p, ".line").unwrap();
    assert_eq!(page.inner_markup(&marker).unwrap(), "\\label{book1_42}");
  }

  #[test]
  fn test_line_marker_without_id_is_emptied() {
    let mut page = HtmlPage::parse(
      r#"<p id="p"><span class="line" id="">10</span>Sing</p>"#,
    );
    let p = page.find_first(&page.root(), "#p").unwrap();
    let count = insert_line_labels(&mut page, &p, "line", "book1").unwrap();

    assert_eq!(count, 0);
    let marker = page.find_first(&p, ".line").unwrap();
    assert_eq!(page.inner_markup(&marker).unwrap(), "");
    assert_eq!(page.text(&p).unwrap(), "Sing");
  }

  #[test]
  fn test_markers_outside_root_are_ignored() {
    let mut page = HtmlPage::parse(
      r#"<p id="a"><span class="line" id="1">1</span></p>
         <p id="b"><span class="line" id="2">2</span></p>"#,
    );
    let a = page.find_first(&page.root(), "#a").unwrap();
    insert_line_labels(&mut page, &a, "line", "x").unwrap();

    let b = page.find_first(&page.root(), "#b").unwrap();
    assert_eq!(page.text(&b).unwrap(), "2");
  }

  #[test]
  fn test_word_labels_only_for_pure_named_anchors() {
    let mut page = HtmlPage::parse(
      r##"<p id="p"><a name="chaos">Chaos</a> <a name="n" id="i">x</a> <a href="#y">y</a> rest</p>"##,
    );
    let p = page.find_first(&page.root(), "#p").unwrap();
    let count = insert_word_labels(&mut page, &p, "book2").unwrap();

    assert_eq!(count, 1);
    assert_eq!(page.text(&p).unwrap(), "\\label{book2_chaos} rest");
  }
}
