#![allow(clippy::expect_used, clippy::unwrap_used, reason = "Fine in tests")]
mod common;

use std::time::Duration;

use common::RecordingPage;
use plc_latex::{ConvertOptions, Converter, Page};

fn options() -> ConvertOptions {
  ConvertOptions {
    annotation_timeout: Duration::from_millis(50),
    ..Default::default()
  }
}

#[test]
fn test_passes_run_in_fixed_order() {
  let mut page = RecordingPage::parse(
    r#"
    <p id="block"><span class="line" id="1"></span><a name="w">Of</a> <span class="tooltip tooltipstered" title="man's">Mans</span></p>
    "#,
  );
  let block = page.by_id("block");

  Converter::new(ConvertOptions {
    word_labels: true,
    ..options()
  })
  .convert_block_to_latex(&mut page, &block, "book_1")
  .unwrap();

  let lines = page.first_call("find_by_class line").unwrap();
  let words = page.first_call("find_by_tag a").unwrap();
  let annotations = page
    .first_call("find_by_selector a[class='annotBtn tooltipstered']")
    .unwrap();
  let spelling = page
    .first_call("find_by_selector span[class='tooltip tooltipstered']")
    .unwrap();
  let text = page.first_call("text p#block").unwrap();

  assert!(lines < words, "{:#?}", page.calls.borrow());
  assert!(words < annotations);
  assert!(annotations < spelling);
  assert!(spelling < text);
}

#[test]
fn test_popup_is_dismissed_before_spellings_are_read() {
  let mut page = RecordingPage::parse(
    r#"
    <p id="block"><a class="annotBtn tooltipstered" data-annotation="n1">Zeal</a> of <span id="word" class="tooltip tooltipstered" title="man's">Mans</span></p>
    <div hidden><div id="n1"><i>Zeal</i> ardor.</div></div>
    "#,
  );
  let block = page.by_id("block");

  let latex = Converter::new(options())
    .convert_block_to_latex(&mut page, &block, "book_1")
    .unwrap();

  let last_click = page.last_call("click").unwrap();
  let dismissed = page.last_call("wait_until_absent").unwrap();
  let title = page.first_call("attribute span#word title").unwrap();
  assert!(last_click < dismissed, "{:#?}", page.calls.borrow());
  assert!(dismissed < title, "{:#?}", page.calls.borrow());
  assert_eq!(
    latex,
    "\\emph{Zeal}\\footnote{\\emph{Zeal} ardor.} of \\ruby{Mans}{man's}\\hphantom{}"
  );
}

#[test]
fn test_full_block_conversion() {
  let mut page = RecordingPage::parse(
    r#"
    <p id="block"><span class="line" id="1"></span>Of <a name="w">Mans</a> First <span class="tooltip tooltipstered" title="disobedience">Disobedience</span></p>
    "#,
  );
  let block = page.by_id("block");

  let latex = Converter::new(ConvertOptions {
    word_labels: true,
    ..options()
  })
  .convert_block_to_latex(&mut page, &block, "book_1")
  .unwrap();

  assert_eq!(
    latex,
    "\\label{book_1_1}Of \\label{book_1_w} First \
     \\ruby{Disobedience}{disobedience}\\hphantom{}"
  );
}

#[test]
fn test_disabled_passes_are_not_queried() {
  let mut page = RecordingPage::parse(r#"<p id="block">plain</p>"#);
  let block = page.by_id("block");

  Converter::new(ConvertOptions {
    annotations: false,
    modern_spelling: false,
    ..options()
  })
  .convert_block_to_latex(&mut page, &block, "book_1")
  .unwrap();

  assert!(page.calls_of("find_by_selector").is_empty());
  assert!(page.calls_of("find_by_tag").is_empty());
  assert!(page.calls_of("click").is_empty());
}

#[test]
fn test_ampersand_and_hashtag_are_escaped() {
  let mut page =
    RecordingPage::parse(r#"<p id="block">Fire &amp; Brimstone #1</p>"#);
  let block = page.by_id("block");

  let latex = Converter::new(options())
    .convert_block_to_latex(&mut page, &block, "book_1")
    .unwrap();

  assert_eq!(latex, "Fire \\& Brimstone \\#1");
}

#[test]
fn test_line_breaks_become_latex_newlines() {
  let mut page = RecordingPage::parse(
    r#"<p id="block">Of Mans First Disobedience, and the Fruit<br>Of that Forbidden Tree</p>"#,
  );
  let block = page.by_id("block");

  let latex = Converter::new(options())
    .convert_block_to_latex(&mut page, &block, "book_1")
    .unwrap();

  assert_eq!(
    latex,
    "Of Mans First Disobedience, and the Fruit\\\\\nOf that Forbidden Tree"
  );
}

#[test]
fn test_non_ascii_stripped_only_on_request() {
  let html = "<p id=\"block\">Ca\u{00EF}n and Abel</p>";

  let mut page = RecordingPage::parse(html);
  let block = page.by_id("block");
  let kept = Converter::new(options())
    .convert_block_to_latex(&mut page, &block, "book_11")
    .unwrap();
  assert_eq!(kept, "Ca\u{00EF}n and Abel");

  let mut page = RecordingPage::parse(html);
  let block = page.by_id("block");
  let stripped = Converter::new(ConvertOptions {
    strip_non_ascii: true,
    ..options()
  })
  .convert_block_to_latex(&mut page, &block, "book_11")
  .unwrap();
  assert_eq!(stripped, "Can and Abel");
}

#[test]
fn test_content_outside_block_is_untouched() {
  let mut page = RecordingPage::parse(
    r#"
    <p id="a"><span class="line" id="1"></span>first</p>
    <p id="b"><span class="line" id="2"></span>second</p>
    "#,
  );
  let a = page.by_id("a");
  let b = page.by_id("b");

  Converter::new(options())
    .convert_block_to_latex(&mut page, &a, "book_1")
    .unwrap();

  assert_eq!(page.inner.inner_markup(&b).unwrap(), r#"<span class="line" id="2"></span>second"#);
}
