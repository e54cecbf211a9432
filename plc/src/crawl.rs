//! Extraction of one book page into its LaTeX parts.
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use plc_latex::{Converter, Page, PageError};
use serde::{Deserialize, Serialize};

use crate::error::PlcError;

/// Element holding the whole book text.
pub const CONTENT_SELECTOR: &str = "#content";
const TITLE_SELECTOR: &str = ".msubhead";
const SUBTITLE_SELECTOR: &str = ".msubsubhead";
const ARGUMENT_SELECTOR: &str = ".margument";
const END_SELECTOR: &str = ".title .mi";

/// The converted parts of one book, as persisted between crawl and render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookContent {
  /// Inner markup of the book heading.
  pub title:    Option<String>,
  /// Inner markup of the sub heading.
  pub subtitle: Option<String>,
  /// LaTeX of the introductory argument; empty when the page has none.
  #[serde(default)]
  pub argument: String,
  /// LaTeX of every verse paragraph, in document order.
  #[serde(default)]
  pub main:     Vec<String>,
  /// Inner markup of the closing line.
  pub end:      Option<String>,
}

/// Crawl one loaded page.
///
/// Blocks are converted in place, so a page can only be crawled once. Any
/// failure to convert a block is fatal for the page.
///
/// # Errors
///
/// Fails if the page has no content element or a block cannot be converted.
pub fn crawl_page<P: Page>(
  page: &mut P,
  name: &str,
  converter: &Converter,
  show_progress: bool,
) -> Result<BookContent, PlcError> {
  info!("Crawling {name}");
  let root = page.root();
  let content = match page.find_first(&root, CONTENT_SELECTOR) {
    Ok(content) => content,
    Err(PageError::MissingElement(selector)) => {
      return Err(PlcError::MissingContent {
        page: name.to_string(),
        selector,
      });
    },
    Err(e) => return Err(e.into()),
  };

  debug!("Reading meta data of {name}");
  let title = optional_markup(page, &content, TITLE_SELECTOR)?;
  let subtitle = optional_markup(page, &content, SUBTITLE_SELECTOR)?;

  debug!("Converting the argument of {name}");
  let argument = match first(page, &content, ARGUMENT_SELECTOR)? {
    Some(argument) => convert(page, converter, &argument, name)?,
    None => {
      debug!("{name} has no argument");
      String::new()
    },
  };

  // Every paragraph but the first, which holds the argument
  let paragraphs: Vec<_> =
    page.find_by_tag(&content, "p")?.into_iter().skip(1).collect();
  let progress = progress_bar(paragraphs.len(), name, show_progress);

  let mut main = Vec::with_capacity(paragraphs.len());
  for paragraph in &paragraphs {
    let latex = convert(page, converter, paragraph, name)
      .inspect_err(|_| progress.abandon())?;
    main.push(latex);
    progress.inc(1);
  }
  progress.finish_and_clear();

  let end = optional_markup(page, &root, END_SELECTOR)?;

  info!("Converted {} paragraphs of {name}", main.len());
  Ok(BookContent {
    title,
    subtitle,
    argument,
    main,
    end,
  })
}

fn convert<P: Page>(
  page: &mut P,
  converter: &Converter,
  block: &P::Node,
  name: &str,
) -> Result<String, PlcError> {
  converter
    .convert_block_to_latex(page, block, name)
    .map_err(|source| {
      PlcError::Convert {
        page: name.to_string(),
        source,
      }
    })
}

fn first<P: Page>(
  page: &P,
  root: &P::Node,
  selector: &str,
) -> Result<Option<P::Node>, PlcError> {
  match page.find_first(root, selector) {
    Ok(node) => Ok(Some(node)),
    Err(PageError::MissingElement(_)) => Ok(None),
    Err(e) => Err(e.into()),
  }
}

fn optional_markup<P: Page>(
  page: &P,
  root: &P::Node,
  selector: &str,
) -> Result<Option<String>, PlcError> {
  first(page, root, selector)?
    .map(|node| page.inner_markup(&node).map(|markup| markup.trim().to_string()))
    .transpose()
    .map_err(PlcError::from)
}

fn progress_bar(len: usize, name: &str, visible: bool) -> ProgressBar {
  if !visible {
    return ProgressBar::hidden();
  }

  let progress = ProgressBar::new(u64::try_from(len).unwrap_or(u64::MAX));
  match ProgressStyle::with_template(
    "{msg} [{bar:40.cyan/blue}] {pos}/{len} paragraphs ({eta})",
  ) {
    Ok(style) => progress.set_style(style.progress_chars("=> ")),
    Err(e) => debug!("Falling back to the default progress style: {e}"),
  }
  progress.set_message(name.to_string());
  progress
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]
  use plc_latex::{HtmlPage, LatexError};

  use super::*;

  const BOOK: &str = r#"
    <div class="title"><span class="mi">THE END OF THE FIRST BOOK.</span></div>
    <div id="content">
      <div class="msubhead">BOOK I.</div>
      <div class="msubsubhead">THE ARGUMENT</div>
      <p class="margument">This first Book proposes, first in brief, the whole Subject.</p>
      <p><span class="line" id="1"></span>Of Mans First Disobedience, and the Fruit<br>Of that Forbidden Tree</p>
      <p><span class="line" id="27"></span>Say first, for Heav'n hides nothing from thy view</p>
    </div>
  "#;

  #[test]
  fn test_crawl_collects_every_part() {
    let mut page = HtmlPage::parse(BOOK);
    let book =
      crawl_page(&mut page, "book_1", &Converter::default(), false).unwrap();

    assert_eq!(book.title.as_deref(), Some("BOOK I."));
    assert_eq!(book.subtitle.as_deref(), Some("THE ARGUMENT"));
    assert_eq!(
      book.argument,
      "This first Book proposes, first in brief, the whole Subject."
    );
    assert_eq!(book.main, [
      "\\label{book_1_1}Of Mans First Disobedience, and the Fruit\\\\\nOf that \
       Forbidden Tree",
      "\\label{book_1_27}Say first, for Heav'n hides nothing from thy view",
    ]);
    assert_eq!(book.end.as_deref(), Some("THE END OF THE FIRST BOOK."));
  }

  #[test]
  fn test_missing_content_is_fatal() {
    let mut page = HtmlPage::parse("<p>moved</p>");
    let err = crawl_page(&mut page, "book_1", &Converter::default(), false)
      .unwrap_err();

    assert!(matches!(
      err,
      PlcError::MissingContent { page, selector } if page == "book_1" && selector == "#content"
    ));
  }

  #[test]
  fn test_optional_parts_may_be_absent() {
    let mut page = HtmlPage::parse(
      r#"<div id="content"><p>intro</p><p>verse</p></div>"#,
    );
    let book =
      crawl_page(&mut page, "book_2", &Converter::default(), false).unwrap();

    assert_eq!(book.title, None);
    assert_eq!(book.argument, "");
    assert_eq!(book.main, ["verse"]);
    assert_eq!(book.end, None);
  }

  #[test]
  fn test_nested_popup_quotes_keep_every_paragraph() {
    let mut page = HtmlPage::parse(
      r#"
      <div id="content">
        <p class="margument">Arg.</p>
        <p><span class="line" id="1"></span>First <a class="annotBtn tooltipstered" data-annotation="n1">Zeal</a> verse</p>
        <p><span class="line" id="2"></span>Second <a class="annotBtn tooltipstered" data-annotation="n2">Zeal</a> verse</p>
      </div>
      <div hidden>
        <div id="n1"><i>Zeal</i> compare <blockquote>a<blockquote>b</blockquote></blockquote></div>
        <div id="n2"><i>Zeal</i> ardor.</div>
      </div>
      "#,
    );
    let book =
      crawl_page(&mut page, "book_1", &Converter::default(), false).unwrap();

    assert_eq!(book.main.len(), 2, "{:#?}", book.main);
    assert!(book.main[0].starts_with("\\label{book_1_1}First \\emph{Zeal}"));
    assert_eq!(book.main[0].matches("\\begin{quote}").count(), 2);
    assert_eq!(book.main[0].matches("\\end{quote}").count(), 2);
    assert_eq!(
      book.main[1],
      "\\label{book_1_2}Second \\emph{Zeal}\\footnote{\\emph{Zeal} ardor.} verse"
    );
  }

  #[test]
  fn test_failing_paragraph_fails_the_page() {
    let mut page = HtmlPage::parse(
      r#"
      <div id="content">
        <p class="margument">Arg.</p>
        <p><a class="annotBtn tooltipstered" data-annotation="n1">Sin</a></p>
      </div>
      <div hidden><div id="n1"><i>Sin</i> see <a name="x">there</a>.</div></div>
      "#,
    );
    let err = crawl_page(&mut page, "book_2", &Converter::default(), false)
      .unwrap_err();

    assert!(matches!(
      err,
      PlcError::Convert { page, source: LatexError::UnsupportedLink { .. } }
        if page == "book_2"
    ));
  }
}
