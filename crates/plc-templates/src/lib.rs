use std::collections::HashMap;

pub const BOOK_TEMPLATE: &str = include_str!("../templates/book.tex");
pub const CONTENT_TEMPLATE: &str = include_str!("../templates/content.tex");
pub const MAIN_TEMPLATE: &str = include_str!("../templates/main.tex");

#[must_use]
pub fn all_templates() -> HashMap<&'static str, &'static str> {
  let mut templates = HashMap::new();
  templates.insert("book.tex", BOOK_TEMPLATE);
  templates.insert("content.tex", CONTENT_TEMPLATE);
  templates.insert("main.tex", MAIN_TEMPLATE);
  templates
}
