//! Task item detection and identifier generation.
//!
//! Whether a bullet item is a checkbox task is decided by two heuristics
//! tried in a fixed order: the parser's own task marker first, then a scan
//! of the leading text for bracket syntax the parser did not recognize
//! (`[ ]X` with no space, for example). Both depend on how the Markdown
//! parser tokenizes list items, so they live together here.

use pulldown_cmark::{Event, Tag};
use uuid::Uuid;

use super::SpannedEvent;

/// New identifier for a task list or task item. Unique within a document is
/// all that is required; a v4 UUID gives that without bookkeeping.
pub(crate) fn fresh_local_id() -> String {
    Uuid::new_v4().to_string()
}

/// Classify one list item body, given the events between its open and close.
///
/// Only the item head is inspected: scanning stops at the first nested
/// container so a checkbox in a sub-item never reclassifies its parent.
pub(crate) fn is_task_item(span: &[SpannedEvent<'_>]) -> bool {
    for (event, _) in span {
        match event {
            Event::TaskListMarker(_) => return true,
            Event::Start(Tag::Paragraph) => continue,
            Event::Start(_) => break,
            Event::Text(text) => return checkbox_prefix(text).is_some(),
            Event::Code(_) | Event::Html(_) | Event::InlineHtml(_) => break,
            _ => continue,
        }
    }
    false
}

/// Parse a leading `[ ]` / `[x]` / `[X]` checkbox out of a text run.
///
/// Returns the checked state and the remainder (leading whitespace intact so
/// the caller decides how much to strip). The bracket must be followed by
/// whitespace or end-of-run to count; `[x]ray` is just text.
pub(crate) fn checkbox_prefix(text: &str) -> Option<(bool, &str)> {
    let rest = text.trim_start().strip_prefix('[')?;
    let checked = match rest.chars().next()? {
        ' ' => false,
        'x' | 'X' => true,
        _ => return None,
    };
    let rest = rest[1..].strip_prefix(']')?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some((checked, rest))
    } else {
        None
    }
}
