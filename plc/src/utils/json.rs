//! Per-page JSON persistence between crawling and rendering.
use std::{fs, path::Path};

use crate::{crawl::BookContent, error::PlcError};

/// Read a previously crawled book.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid book.
pub fn read_book(path: &Path) -> Result<BookContent, PlcError> {
  let content = fs::read_to_string(path)?;
  Ok(serde_json::from_str(&content)?)
}

/// Write a crawled book, replacing any earlier result.
///
/// # Errors
///
/// Returns an error if the book cannot be serialized or written.
pub fn write_book(path: &Path, book: &BookContent) -> Result<(), PlcError> {
  let content = serde_json::to_string_pretty(book)?;
  fs::write(path, content)?;
  Ok(())
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, clippy::unwrap_used, reason = "Fine in tests")]
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_book_survives_disk() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("book_1.json");
    let book = BookContent {
      title: Some("BOOK I.".to_string()),
      main: vec!["\\label{book_1_1}Of Mans".to_string()],
      ..Default::default()
    };

    write_book(&path, &book).unwrap();
    assert_eq!(read_book(&path).unwrap(), book);
  }

  #[test]
  fn test_missing_fields_default() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("book_2.json");
    fs::write(&path, r#"{ "title": null, "subtitle": null, "end": null }"#)
      .unwrap();

    let book = read_book(&path).unwrap();
    assert!(book.main.is_empty());
    assert!(book.argument.is_empty());
  }
}
