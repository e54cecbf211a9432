#![allow(clippy::expect_used, clippy::unwrap_used, reason = "Fine in tests")]
use std::{fs, path::Path};

use plc::{crawl::BookContent, pipeline, utils::json};
use plc_config::{Config, SpellingMode};
use tempfile::tempdir;

const BOOK_1: &str = r##"<html><body>
<div id="content">
  <div class="msubhead">BOOK I.</div>
  <p class="margument">This first Book proposes the whole Subject.</p>
  <p><span class="line" id="L5"></span>Their <a class="annotBtn tooltipstered" data-annotation="n1">Zeal</a> grew</p>
</div>
<div class="title"><span class="mi">THE END OF THE FIRST BOOK.</span></div>
<div hidden><div id="n1"><i>Zeal.</i> Ardor.</div></div>
</body></html>"##;

const BOOK_2: &str = r#"<html><body>
<div id="content">
  <div class="msubhead">BOOK II.</div>
  <p class="margument">The Consultation begun.</p>
  <p><span class="line" id="1"></span>High on a Throne of Royal State</p>
</div>
</body></html>"#;

fn write_pages(dir: &Path) {
  fs::create_dir_all(dir).expect("Failed to create dir in test");
  fs::write(dir.join("book_1.html"), BOOK_1).expect("Failed to write page");
  fs::write(dir.join("book_2.html"), BOOK_2).expect("Failed to write page");
}

fn config(input_dir: &Path, output_dir: &Path) -> Config {
  Config {
    input_dir: Some(input_dir.to_path_buf()),
    output_dir: output_dir.to_path_buf(),
    poll_interval_ms: 1,
    annotation_timeout_secs: 0.2,
    ..Default::default()
  }
}

#[test]
fn test_pages_become_json_and_tex() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let input_dir = temp_dir.path().join("pages");
  let output_dir = temp_dir.path().join("build");
  write_pages(&input_dir);

  pipeline::run(&config(&input_dir, &output_dir)).unwrap();

  let book = json::read_book(&output_dir.join("json/book_1.json")).unwrap();
  assert_eq!(book.title.as_deref(), Some("BOOK I."));
  assert_eq!(book.argument, "This first Book proposes the whole Subject.");
  assert_eq!(book.main, [
    "\\label{book_1_L5}Their \\emph{Zeal}\\footnote{\\emph{Zeal.} Ardor.} grew"
  ]);

  let tex_dir = output_dir.join("tex");
  let chapter = fs::read_to_string(tex_dir.join("book_1.tex")).unwrap();
  assert!(chapter.contains("\\chapter{BOOK I.}"));
  assert!(chapter.contains("THE END OF THE FIRST BOOK."));

  let content = fs::read_to_string(tex_dir.join("content.tex")).unwrap();
  let first = content.find("\\input{book_1.tex}").unwrap();
  let second = content.find("\\input{book_2.tex}").unwrap();
  assert!(first < second);

  let main = fs::read_to_string(tex_dir.join("main.tex")).unwrap();
  assert!(main.contains("\\input{content}"));
  assert!(!main.contains("\\renewcommand"));
}

#[test]
fn test_converted_pages_are_not_recrawled() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let input_dir = temp_dir.path().join("pages");
  let output_dir = temp_dir.path().join("build");
  write_pages(&input_dir);

  let json_dir = output_dir.join("json");
  fs::create_dir_all(&json_dir).unwrap();
  let cached = BookContent {
    title: Some("CACHED".to_string()),
    ..Default::default()
  };
  json::write_book(&json_dir.join("book_1.json"), &cached).unwrap();

  let mut config = config(&input_dir, &output_dir);
  pipeline::run(&config).unwrap();
  assert_eq!(json::read_book(&json_dir.join("book_1.json")).unwrap(), cached);
  let chapter = fs::read_to_string(output_dir.join("tex/book_1.tex")).unwrap();
  assert!(chapter.contains("\\chapter{CACHED}"));

  config.force = true;
  pipeline::run(&config).unwrap();
  let recrawled = json::read_book(&json_dir.join("book_1.json")).unwrap();
  assert_eq!(recrawled.title.as_deref(), Some("BOOK I."));
}

#[test]
fn test_spelling_mode_reaches_main() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let input_dir = temp_dir.path().join("pages");
  let output_dir = temp_dir.path().join("build");
  write_pages(&input_dir);

  let config = Config {
    spelling: SpellingMode::Archaic,
    disable_annotations: true,
    ..config(&input_dir, &output_dir)
  };
  pipeline::run(&config).unwrap();

  let main = fs::read_to_string(output_dir.join("tex/main.tex")).unwrap();
  assert!(main.contains("\\renewcommand{\\ruby}[2]{#1}"));
  assert!(main.contains("\\renewcommand{\\footnote}[1]{}"));

  // Annotations are left out of the crawl as well
  let book = json::read_book(&output_dir.join("json/book_1.json")).unwrap();
  assert!(!book.main[0].contains("\\footnote"));
}

#[test]
fn test_page_without_content_fails() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let input_dir = temp_dir.path().join("pages");
  let output_dir = temp_dir.path().join("build");
  fs::create_dir_all(&input_dir).unwrap();
  fs::write(input_dir.join("book_9.html"), "<p>moved</p>").unwrap();

  let err = pipeline::run(&config(&input_dir, &output_dir)).unwrap_err();
  assert!(format!("{err:?}").contains("#content"));
}
