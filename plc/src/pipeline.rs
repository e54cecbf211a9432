//! The `convert` run: crawl every page to JSON, then render the book.
use std::{fs, path::Path};

use color_eyre::eyre::{Context, Result};
use log::{error, info, warn};
use plc_config::{Config, SpellingMode};
use plc_latex::{Converter, HtmlPage};

use crate::{
  crawl::crawl_page,
  render::{MainFlags, Renderer},
  utils::{json, pages::resolve_pages},
};

/// Convert every configured page and write the LaTeX book below
/// `config.output_dir`.
///
/// # Errors
///
/// Returns an error if a page cannot be crawled or an output cannot be
/// written.
pub fn run(config: &Config) -> Result<()> {
  let json_dir = config.output_dir.join("json");
  let tex_dir = config.output_dir.join("tex");
  for dir in [&json_dir, &tex_dir] {
    fs::create_dir_all(dir).wrap_err_with(|| {
      format!("Failed to create output directory: {}", dir.display())
    })?;
  }

  let pages = resolve_pages(config);
  if pages.is_empty() {
    warn!("No pages to convert");
  }

  let converter = Converter::new(config.convert_options()?);
  let show_progress = log::log_enabled!(log::Level::Info);
  for (name, path) in &pages {
    let json_path = json_dir.join(format!("{name}.json"));
    if json_path.exists() && !config.force {
      info!("Skipping {name}, already converted (use --force to recrawl)");
      continue;
    }
    crawl_to_json(config, &converter, name, path, &json_path, show_progress)?;
  }

  let renderer = Renderer::new(config)?;
  let mut files = Vec::with_capacity(pages.len());
  for (name, _) in &pages {
    let json_path = json_dir.join(format!("{name}.json"));
    let book = json::read_book(&json_path)
      .wrap_err_with(|| format!("Failed to read {}", json_path.display()))?;

    let file = format!("{name}.tex");
    write_output(&tex_dir.join(&file), &renderer.render_book(name, &book)?)?;
    files.push(file);
  }

  write_output(
    &tex_dir.join("content.tex"),
    &renderer.render_content(&files)?,
  )?;
  write_output(
    &tex_dir.join("main.tex"),
    &renderer.render_main(main_flags(config))?,
  )?;

  info!("Wrote {} books to {}", files.len(), tex_dir.display());
  Ok(())
}

fn crawl_to_json(
  config: &Config,
  converter: &Converter,
  name: &str,
  path: &Path,
  json_path: &Path,
  show_progress: bool,
) -> Result<()> {
  let mut page = HtmlPage::from_file(path)
    .wrap_err_with(|| format!("Failed to read page {}", path.display()))?
    .with_poll_interval(config.poll_interval());

  let book = crawl_page(&mut page, name, converter, show_progress)
    .inspect_err(|e| error!("Giving up on {name}: {e}"))?;
  json::write_book(json_path, &book)
    .wrap_err_with(|| format!("Failed to write {}", json_path.display()))?;
  Ok(())
}

fn write_output(path: &Path, content: &str) -> Result<()> {
  fs::write(path, content)
    .wrap_err_with(|| format!("Failed to write {}", path.display()))
}

/// Template switches for the configured spelling and annotation settings.
#[must_use]
pub fn main_flags(config: &Config) -> MainFlags {
  MainFlags {
    force_modern_spelling:   config.spelling == SpellingMode::Modern,
    disable_modern_spelling: config.spelling == SpellingMode::Archaic,
    disable_annotations:     config.disable_annotations,
  }
}
