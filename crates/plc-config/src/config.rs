use std::{
  collections::HashMap,
  fmt,
  fs,
  path::{Path, PathBuf},
  str::FromStr,
  sync::OnceLock,
  time::Duration,
};

use indexmap::IndexMap;
use plc_latex::{ConvertOptions, SiteConventions, site::INTERNAL_LINK_PREFIX};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How archaic spellings are typeset in the final document.
///
/// The conversion always emits `\ruby{archaic}{modern}`; the mode only selects
/// which definition of `\ruby` the main document uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpellingMode {
  /// Archaic text with the modern spelling set above it.
  #[default]
  Ruby,
  /// Modern spelling only.
  Modern,
  /// Archaic spelling only.
  Archaic,
}

impl fmt::Display for SpellingMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Ruby => f.write_str("ruby"),
      Self::Modern => f.write_str("modern"),
      Self::Archaic => f.write_str("archaic"),
    }
  }
}

impl FromStr for SpellingMode {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "ruby" => Ok(Self::Ruby),
      "modern" => Ok(Self::Modern),
      "archaic" => Ok(Self::Archaic),
      _ => {
        Err(ConfigError::Config(format!(
          "Invalid value for 'spelling': '{s}'. Expected ruby, modern, or \
           archaic"
        )))
      },
    }
  }
}

/// Configuration for the plc converter.
///
/// Fields are typically loaded from a TOML or JSON config file, then adjusted
/// by `--config KEY=VALUE` overrides and CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Mirrors independent CLI flags"
)]
pub struct Config {
  /// Directory of saved `*.html` pages, one per book.
  pub input_dir: Option<PathBuf>,

  /// Output directory; `json/` and `tex/` are created below it.
  pub output_dir: PathBuf,

  /// Pages to convert, in document order: label prefix to saved page.
  pub pages: IndexMap<String, PathBuf>,

  /// Directory with template overrides (`book.tex`, `content.tex`,
  /// `main.tex`).
  pub template_dir: Option<PathBuf>,

  /// Links below this URL are cross references into the edition.
  pub internal_link_prefix: String,

  /// Seconds to wait for an annotation popup to open or close.
  pub annotation_timeout_secs: f64,

  /// Milliseconds between two probes while waiting on a popup.
  pub poll_interval_ms: u64,

  /// Drop non-ASCII characters from converted blocks.
  pub strip_non_ascii: bool,

  /// Turn named anchors into labels.
  pub word_labels: bool,

  /// Skip annotation footnotes entirely.
  pub disable_annotations: bool,

  /// How archaic spellings are typeset.
  pub spelling: SpellingMode,

  /// Recrawl pages whose JSON already exists.
  pub force: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      input_dir:               None,
      output_dir:              PathBuf::from("build"),
      pages:                   IndexMap::new(),
      template_dir:            None,
      internal_link_prefix:    INTERNAL_LINK_PREFIX.to_string(),
      annotation_timeout_secs: 2.0,
      poll_interval_ms:        50,
      strip_non_ascii:         false,
      word_labels:             false,
      disable_annotations:     false,
      spelling:                SpellingMode::Ruby,
      force:                   false,
    }
  }
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  #[allow(
    clippy::option_if_let_else,
    reason = "Clearer with explicit match on extension"
  )]
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| {
      ConfigError::Read {
        path: path.to_path_buf(),
        source,
      }
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
      Some(ext) => {
        match ext.to_lowercase().as_str() {
          "json" => {
            serde_json::from_str(&content).map_err(|source| {
              ConfigError::Json {
                path: path.to_path_buf(),
                source,
              }
            })
          },
          "toml" => {
            toml::from_str(&content).map_err(|source| {
              ConfigError::Toml {
                path: path.to_path_buf(),
                source,
              }
            })
          },
          _ => {
            Err(ConfigError::Config(format!(
              "Unsupported config file format: {}",
              path.display()
            )))
          },
        }
      },
      None => {
        Err(ConfigError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from the given files, or from a discovered file when
  /// none are given, then apply `KEY=VALUE` overrides.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded or an override is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      // Every error of from_file names the offending file
      let mut merged_config = Self::from_file(first)?;

      for config_path in rest {
        merged_config.merge(Self::from_file(config_path)?);
      }

      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }

      merged_config
    } else if let Some(discovered_config) = Self::find_config_file() {
      log::info!(
        "Using discovered config file: {}",
        discovered_config.display()
      );
      Self::from_file(&discovered_config)?
    } else {
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    Ok(config)
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// # Errors
  ///
  /// Returns an error if an override is not in KEY=VALUE format, names an
  /// unknown key, or carries a value of the wrong type.
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a single override. `pages.<name>=<path>` adds or replaces one
  /// page; an empty path removes it. Empty values clear optional paths.
  ///
  /// # Errors
  ///
  /// Returns an error for unknown keys and unparsable values.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    if let Some(name) = key.strip_prefix("pages.") {
      if value.is_empty() {
        self.pages.shift_remove(name);
      } else {
        self.pages.insert(name.to_string(), PathBuf::from(value));
      }
      return Ok(());
    }

    match key {
      "input_dir" => self.input_dir = optional_path(value),
      "output_dir" => self.output_dir = PathBuf::from(value),
      "template_dir" => self.template_dir = optional_path(value),
      "internal_link_prefix" => self.internal_link_prefix = value.to_string(),
      "annotation_timeout_secs" => {
        self.annotation_timeout_secs = value.parse().map_err(|_| {
          ConfigError::Config(format!(
            "Invalid value for '{key}': '{value}'. Expected a number of \
             seconds"
          ))
        })?;
      },
      "poll_interval_ms" => {
        self.poll_interval_ms = value.parse().map_err(|_| {
          ConfigError::Config(format!(
            "Invalid value for '{key}': '{value}'. Expected a positive integer"
          ))
        })?;
      },
      "strip_non_ascii" => self.strip_non_ascii = parse_bool(key, value)?,
      "word_labels" => self.word_labels = parse_bool(key, value)?,
      "disable_annotations" => {
        self.disable_annotations = parse_bool(key, value)?;
      },
      "spelling" => self.spelling = value.parse()?,
      "force" => self.force = parse_bool(key, value)?,
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'. See documentation for \
           supported keys."
        )));
      },
    }

    Ok(())
  }

  /// Merge another config into this one, with the other config's values
  /// taking precedence.
  ///
  /// # Merge Rules
  ///
  /// - [`Option<T>`] fields: other's [`Some`] value replaces this config's
  ///   value
  /// - `pages`: other's entries are added in order, replacing pages with the
  ///   same name in place
  /// - Plain fields: other's value always replaces
  pub fn merge(&mut self, other: Self) {
    if other.input_dir.is_some() {
      self.input_dir = other.input_dir;
    }
    if other.template_dir.is_some() {
      self.template_dir = other.template_dir;
    }
    self.pages.extend(other.pages);

    self.output_dir = other.output_dir;
    self.internal_link_prefix = other.internal_link_prefix;
    self.annotation_timeout_secs = other.annotation_timeout_secs;
    self.poll_interval_ms = other.poll_interval_ms;
    self.strip_non_ascii = other.strip_non_ascii;
    self.word_labels = other.word_labels;
    self.disable_annotations = other.disable_annotations;
    self.spelling = other.spelling;
    self.force = other.force;
  }

  /// Search for config files in common locations
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    static RESULT: OnceLock<Option<PathBuf>> = OnceLock::new();
    RESULT
      .get_or_init(|| {
        let config_filenames = [
          "plc.toml",
          "plc.json",
          ".plc.toml",
          ".plc.json",
          ".config/plc.toml",
          ".config/plc.json",
        ];

        let current_dir = std::env::current_dir().ok()?;
        for filename in &config_filenames {
          let config_path = current_dir.join(filename);
          if config_path.exists() {
            return Some(config_path);
          }
        }

        if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
          let xdg_config_dir = PathBuf::from(xdg_config_home);
          for filename in &["plc.toml", "plc.json"] {
            let config_path = xdg_config_dir.join(filename);
            if config_path.exists() {
              return Some(config_path);
            }
          }
        }

        None
      })
      .clone()
  }

  /// Check that the configuration names something to convert and that its
  /// numeric settings are usable.
  ///
  /// # Errors
  ///
  /// Returns an error if neither pages nor an input directory are given, or
  /// if the annotation timeout is negative or not finite.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.input_dir.is_none() && self.pages.is_empty() {
      return Err(ConfigError::Config(
        "At least one of input directory or pages must be provided."
          .to_string(),
      ));
    }

    self.annotation_timeout()?;
    Ok(())
  }

  /// Validate all paths specified in the configuration
  ///
  /// # Errors
  ///
  /// Returns an error if any configured path does not exist or is invalid.
  pub fn validate_paths(&self) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if let Some(ref input_dir) = self.input_dir {
      if !input_dir.exists() {
        errors.push(format!(
          "Input directory does not exist: {}",
          input_dir.display()
        ));
      } else if !input_dir.is_dir() {
        errors.push(format!(
          "Input directory path is not a directory: {}",
          input_dir.display()
        ));
      }
    }

    if let Some(ref template_dir) = self.template_dir {
      if !template_dir.exists() {
        errors.push(format!(
          "Template directory does not exist: {}",
          template_dir.display()
        ));
      } else if !template_dir.is_dir() {
        errors.push(format!(
          "Template directory path is not a directory: {}",
          template_dir.display()
        ));
      }
    }

    for (name, page) in &self.pages {
      if !page.is_file() {
        errors.push(format!(
          "Page '{name}' is not a file: {}",
          page.display()
        ));
      }
    }

    if !errors.is_empty() {
      let error_message = errors.join("\n");
      return Err(ConfigError::Config(format!(
        "Configuration path validation errors:\n{error_message}"
      )));
    }

    Ok(())
  }

  /// The annotation timeout as a [`Duration`].
  ///
  /// # Errors
  ///
  /// Returns an error if the configured value is negative or not finite.
  pub fn annotation_timeout(&self) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(self.annotation_timeout_secs).map_err(|_| {
      ConfigError::Config(format!(
        "Invalid value for 'annotation_timeout_secs': '{}'. Expected a \
         non-negative number of seconds",
        self.annotation_timeout_secs
      ))
    })
  }

  #[must_use]
  pub const fn poll_interval(&self) -> Duration {
    Duration::from_millis(self.poll_interval_ms)
  }

  /// Conversion options for the LaTeX pipeline.
  ///
  /// # Errors
  ///
  /// Returns an error if the annotation timeout is invalid.
  pub fn convert_options(&self) -> Result<ConvertOptions, ConfigError> {
    Ok(ConvertOptions {
      site:               SiteConventions::default()
        .with_internal_link_prefix(self.internal_link_prefix.clone()),
      annotation_timeout: self.annotation_timeout()?,
      annotations:        !self.disable_annotations,
      modern_spelling:    true,
      word_labels:        self.word_labels,
      strip_non_ascii:    self.strip_non_ascii,
    })
  }

  /// Get the path to a template override by name, if a template directory is
  /// configured. This method does not check if the returned path exists.
  #[must_use]
  pub fn get_template_file(&self, name: &str) -> Option<PathBuf> {
    self.template_dir.as_ref().map(|dir| dir.join(name))
  }

  /// Generate a default configuration file with commented explanations
  ///
  /// # Errors
  ///
  /// Returns an error if the template cannot be retrieved or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = crate::templates::get_template(format)
      .map_err(|e| ConfigError::Template(e.to_string()))?;

    fs::write(path, config_content).map_err(|source| {
      ConfigError::Write {
        path: path.to_path_buf(),
        source,
      }
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }

  /// Export embedded templates to a directory for customization
  ///
  /// # Errors
  ///
  /// Returns an error if the output directory cannot be created or a template
  /// cannot be written.
  pub fn export_templates(
    output_dir: &Path,
    force: bool,
  ) -> Result<(), ConfigError> {
    fs::create_dir_all(output_dir).map_err(|source| {
      ConfigError::Write {
        path: output_dir.to_path_buf(),
        source,
      }
    })?;

    let mut templates: Vec<_> = Self::get_template_sources().into_iter().collect();
    templates.sort_unstable_by_key(|(name, _)| *name);

    for (filename, content) in templates {
      let file_path = output_dir.join(filename);

      if file_path.exists() && !force {
        log::warn!(
          "File {} already exists. Use --force to overwrite.",
          file_path.display()
        );
        continue;
      }

      fs::write(&file_path, content).map_err(|source| {
        ConfigError::Write {
          path: file_path.clone(),
          source,
        }
      })?;
      log::info!("Exported template: {}", file_path.display());
    }

    Ok(())
  }

  /// Get mapping of template filenames to their embedded content
  fn get_template_sources() -> HashMap<&'static str, &'static str> {
    plc_templates::all_templates()
  }
}

fn optional_path(value: &str) -> Option<PathBuf> {
  (!value.is_empty()).then(|| PathBuf::from(value))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" => Ok(true),
    "false" | "no" | "0" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'. Expected true/false, \
         yes/no, or 1/0"
      )))
    },
  }
}
