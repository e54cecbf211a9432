use std::path::PathBuf;

use clap::{Parser, Subcommand};
use plc_config::{Config, ConfigError, SpellingMode};

/// Command line interface for plc
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "plc: annotated poem pages to a LaTeX book"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times). Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the plc CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Convert saved pages to JSON and render the LaTeX book.
  Convert {
    /// Directory of saved `*.html` pages, one per book.
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// A single page to convert, as NAME=FILE (can be specified multiple
    /// times). NAME becomes the label prefix and the output file name.
    #[arg(short, long = "page", value_parser = parse_page, action = clap::ArgAction::Append)]
    pages: Vec<(String, PathBuf)>,

    /// Output directory for the generated JSON and LaTeX.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Recrawl pages that were already converted.
    #[arg(short, long)]
    force: bool,

    /// Leave annotations out of the book.
    #[arg(long)]
    disable_annotations: bool,

    /// Typeset archaic spellings only.
    #[arg(long, conflicts_with = "force_modern_spelling")]
    disable_modern_spelling: bool,

    /// Typeset modern spellings only.
    #[arg(long)]
    force_modern_spelling: bool,

    /// Drop non-ASCII characters from the converted text.
    #[arg(long)]
    strip_non_ascii: bool,

    /// Turn named anchors into labels.
    #[arg(long)]
    word_labels: bool,

    /// Seconds to wait for an annotation popup to open or close.
    #[arg(long = "annotation-timeout", value_name = "SECS")]
    annotation_timeout: Option<f64>,
  },

  /// Initialize a new plc configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "plc.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Export the default LaTeX templates to a directory for customization.
  ExportTemplates {
    /// Output directory for template files.
    #[arg(short, long, default_value = "templates")]
    output_dir: PathBuf,

    /// Whether to overwrite existing files.
    #[arg(long)]
    force: bool,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

impl Commands {
  /// Apply the flags of the `convert` subcommand on top of a loaded
  /// configuration. Flags only ever switch features on; absent options keep
  /// the configured value.
  ///
  /// # Errors
  ///
  /// Returns an error if the annotation timeout is negative.
  pub fn merge_into(&self, config: &mut Config) -> Result<(), ConfigError> {
    let Self::Convert {
      input_dir,
      pages,
      output_dir,
      force,
      disable_annotations,
      disable_modern_spelling,
      force_modern_spelling,
      strip_non_ascii,
      word_labels,
      annotation_timeout,
    } = self
    else {
      return Ok(());
    };

    if let Some(input_dir) = input_dir {
      config.input_dir = Some(input_dir.clone());
    }
    if let Some(output_dir) = output_dir {
      config.output_dir.clone_from(output_dir);
    }
    config.pages.extend(pages.iter().cloned());

    config.force |= *force;
    config.disable_annotations |= *disable_annotations;
    config.strip_non_ascii |= *strip_non_ascii;
    config.word_labels |= *word_labels;

    if *force_modern_spelling {
      config.spelling = SpellingMode::Modern;
    } else if *disable_modern_spelling {
      config.spelling = SpellingMode::Archaic;
    }

    if let Some(secs) = annotation_timeout {
      config.annotation_timeout_secs = *secs;
      config.annotation_timeout()?;
    }

    Ok(())
  }
}

fn parse_page(value: &str) -> Result<(String, PathBuf), String> {
  let (name, path) = value
    .split_once('=')
    .ok_or_else(|| format!("Invalid page '{value}'. Expected NAME=FILE"))?;
  let (name, path) = (name.trim(), path.trim());
  if name.is_empty() || path.is_empty() {
    return Err(format!("Invalid page '{value}'. Expected NAME=FILE"));
  }
  Ok((name.to_string(), PathBuf::from(path)))
}
