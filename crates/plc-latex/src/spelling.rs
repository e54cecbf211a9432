//! Archaic spellings to `\ruby{old}{modern}` dual text.
use log::{debug, warn};

use crate::{
  dom,
  error::{LatexResult, PageError, PageResult},
  page::Page,
};

/// Wrap every tooltip word under `root` as
/// `\ruby{<old>}{<modern>}\hphantom{}`.
///
/// A word whose handle went stale is skipped. Words without a modern
/// spelling are left alone. Returns the number of words converted.
///
/// # Errors
///
/// Propagates page errors other than stale references.
pub fn insert_modern_spelling<P: Page>(
  page: &mut P,
  root: &P::Node,
  tooltip_selector: &str,
) -> LatexResult<usize> {
  let words = page.find_by_selector(root, tooltip_selector)?;
  let mut converted = 0;

  for word in &words {
    match overlay_word(page, word) {
      Ok(true) => converted += 1,
      Ok(false) => {},
      Err(PageError::StaleReference) => {
        warn!("Skipping stale tooltip word {word:?}");
      },
      Err(e) => return Err(e.into()),
    }
  }

  Ok(converted)
}

fn overlay_word<P: Page>(page: &mut P, word: &P::Node) -> PageResult<bool> {
  // Round-trip first so a stale handle fails before its title is trusted
  dom::transform(page, word, str::to_owned)?;

  let Some(modern) = page.attribute(word, "title")?.filter(|t| !t.is_empty())
  else {
    debug!("Tooltip word {word:?} has no modern spelling");
    return Ok(false);
  };

  dom::wrap(
    page,
    word,
    "\\ruby{",
    &format!("}}{{{modern}}}\\hphantom{{}}"),
  )?;
  Ok(true)
}
