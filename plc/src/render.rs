//! LaTeX rendering of crawled books through Tera templates.
use std::{collections::HashMap, fs};

use log::debug;
use plc_config::Config;
use plc_latex::{EscapeTable, tex_escape};
use serde_json::Value;
use tera::{Context, Tera};

use crate::{crawl::BookContent, error::PlcError};

const BOOK_TEMPLATE: &str = "book.tex";
const CONTENT_TEMPLATE: &str = "content.tex";
const MAIN_TEMPLATE: &str = "main.tex";

/// Switches rendered into `main.tex`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MainFlags {
  pub force_modern_spelling:   bool,
  pub disable_modern_spelling: bool,
  pub disable_annotations:     bool,
}

/// Holds the three LaTeX templates, with overrides from the configured
/// template directory taking precedence over the embedded defaults.
pub struct Renderer {
  tera: Tera,
}

impl Renderer {
  /// Load every template.
  ///
  /// # Errors
  ///
  /// Returns an error if an override cannot be read or a template does not
  /// parse.
  pub fn new(config: &Config) -> Result<Self, PlcError> {
    let mut tera = Tera::default();
    let mut templates: Vec<_> =
      plc_templates::all_templates().into_iter().collect();
    templates.sort_unstable_by_key(|(name, _)| *name);

    for (name, fallback) in templates {
      let content = load_template_content(config, name, fallback)?;
      tera.add_raw_template(name, &content)?;
    }
    tera.register_filter("tex_escape", tex_escape_filter);

    Ok(Self { tera })
  }

  /// Render the chapter of one book.
  ///
  /// # Errors
  ///
  /// Returns an error if the template fails to render.
  pub fn render_book(
    &self,
    name: &str,
    book: &BookContent,
  ) -> Result<String, PlcError> {
    let mut context = Context::new();
    context.insert("name", name);
    context.insert("title", &book.title);
    context.insert("subtitle", &book.subtitle);
    context.insert("argument", &book.argument);
    context.insert("main", &book.main);
    context.insert("end", &book.end);
    Ok(self.tera.render(BOOK_TEMPLATE, &context)?)
  }

  /// Render the list of chapter inputs, in the given order.
  ///
  /// # Errors
  ///
  /// Returns an error if the template fails to render.
  pub fn render_content(&self, files: &[String]) -> Result<String, PlcError> {
    let mut context = Context::new();
    context.insert("files", files);
    Ok(self.tera.render(CONTENT_TEMPLATE, &context)?)
  }

  /// Render the document preamble.
  ///
  /// # Errors
  ///
  /// Returns an error if the template fails to render.
  pub fn render_main(&self, flags: MainFlags) -> Result<String, PlcError> {
    let mut context = Context::new();
    context.insert("force_modern_spelling", &flags.force_modern_spelling);
    context.insert("disable_modern_spelling", &flags.disable_modern_spelling);
    context.insert("disable_annotations", &flags.disable_annotations);
    Ok(self.tera.render(MAIN_TEMPLATE, &context)?)
  }
}

fn load_template_content(
  config: &Config,
  name: &str,
  fallback: &str,
) -> Result<String, PlcError> {
  if let Some(path) = config.get_template_file(name)
    && path.is_file()
  {
    debug!("Using template override {}", path.display());
    return Ok(fs::read_to_string(&path)?);
  }
  Ok(fallback.to_string())
}

/// Decode HTML entities, then escape LaTeX specials. Used on heading markup
/// taken verbatim from the page.
fn tex_escape_filter(
  value: &Value,
  _args: &HashMap<String, Value>,
) -> tera::Result<Value> {
  let text = tera::try_get_value!("tex_escape", "value", String, value);
  let decoded = html_escape::decode_html_entities(&text);
  Ok(Value::String(tex_escape(&decoded, EscapeTable::latex())))
}
