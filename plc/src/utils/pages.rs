//! Resolution of the pages a run converts.
use std::path::{Path, PathBuf};

use log::{trace, warn};
use plc_config::Config;
use walkdir::WalkDir;

/// Saved `*.html` pages directly inside `input_dir`, sorted by file name.
#[must_use]
pub fn collect_html_files(input_dir: &Path) -> Vec<PathBuf> {
  let mut files: Vec<PathBuf> = WalkDir::new(input_dir)
    .max_depth(1)
    .follow_links(true)
    .into_iter()
    .filter_map(Result::ok)
    .map(walkdir::DirEntry::into_path)
    .filter(|path| {
      path.is_file()
        && path
          .extension()
          .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
    })
    .collect();
  files.sort();

  trace!("Found {} saved pages in {}", files.len(), input_dir.display());
  files
}

/// Pages in conversion order: explicitly configured pages first, then the
/// pages found in the input directory, named by file stem. A discovered page
/// whose name is already configured is skipped.
#[must_use]
pub fn resolve_pages(config: &Config) -> Vec<(String, PathBuf)> {
  let mut pages: Vec<(String, PathBuf)> = config
    .pages
    .iter()
    .map(|(name, path)| (name.clone(), path.clone()))
    .collect();

  if let Some(input_dir) = &config.input_dir {
    for path in collect_html_files(input_dir) {
      let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
        warn!("Skipping page with unusable name: {}", path.display());
        continue;
      };
      if config.pages.contains_key(name) {
        warn!(
          "Page `{name}` is configured explicitly, ignoring {}",
          path.display()
        );
        continue;
      }
      pages.push((name.to_string(), path));
    }
  }

  pages
}
