//! # plc-latex - annotated poem pages to LaTeX
//!
//! Converts the rendered HTML of one annotated poem page into LaTeX source.
//! Conversion happens in place: every pass rewrites the inner markup of live
//! page elements (line markers become `\label{}`s, annotation popups become
//! `\footnote{}`s, archaic spellings become `\ruby{}{}`), and the final text
//! is read back from the page and escaped.
//!
//! ## Quick Start
//!
//! ```rust
//! use plc_latex::{ConvertOptions, Converter, HtmlPage, Page};
//!
//! let mut page = HtmlPage::parse(
//!   r#"<div id="content"><p><span class="line" id="12"></span>Of Mans First Disobedience</p></div>"#,
//! );
//! let converter = Converter::new(ConvertOptions::default());
//! let root = page.root();
//! let block = page.find_first(&root, "p").unwrap();
//! let latex = converter
//!   .convert_block_to_latex(&mut page, &block, "book_1")
//!   .unwrap();
//!
//! assert_eq!(latex, "\\label{book_1_12}Of Mans First Disobedience");
//! ```
//!
//! ## Passes
//!
//! - [`labels`]: line and word markers to `\label{}` targets
//! - [`annotation`]: click-driven popups folded into footnotes
//! - [`spelling`]: tooltip spellings to `\ruby{}{}` dual text
//! - [`link`]: internal cross references and external `\href{}`s
//! - [`escape`]: LaTeX escaping of the extracted text
//!
//! The page itself is reached only through the [`Page`] trait. [`HtmlPage`]
//! implements it over a saved snapshot of the site.

pub mod annotation;
pub mod convert;
pub mod dom;
pub mod error;
pub mod escape;
pub mod html;
pub mod labels;
pub mod link;
pub mod page;
pub mod site;
pub mod spelling;
pub mod style;

pub use crate::{
  annotation::Annotation,
  convert::{ConvertOptions, Converter},
  error::{LatexError, LatexResult, PageError, PageResult},
  escape::{ESCAPE_MAPPING, EscapeTable, escape_hashtag, tex_escape},
  html::HtmlPage,
  page::Page,
  site::SiteConventions,
  style::Style,
};
