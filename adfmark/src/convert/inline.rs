//! Inline span resolution.
//!
//! Turns the events between a block's open and close into text runs with
//! marks plus hard breaks. The resolver is a pure function of its input
//! slice: it owns no cursor into the wider stream and records no warnings
//! (lossy decisions at this level are the block resolver's business).
//!
//! Marks are kept on an active list that behaves like a stack but tolerates
//! out-of-order closes: a close event removes the nearest matching mark
//! from the top rather than blindly popping. Links additionally track a
//! per-open "had an href" flag so a close for an href-less link never
//! removes an unrelated mark.

use pulldown_cmark::{Event, Tag, TagEnd};

use crate::adf::{Inline, Mark};

use super::tasks::checkbox_prefix;
use super::SpannedEvent;

#[derive(Debug, Clone, Copy)]
pub(crate) struct InlineOptions {
    /// Soft breaks become hard breaks instead of single spaces.
    pub preserve_line_breaks: bool,
    /// Recognize leading checkbox markup, record its state, and emit
    /// nothing for it. Only set when resolving task item content.
    pub strip_checkbox_markup: bool,
}

#[derive(Debug, Default)]
pub(crate) struct InlineOutcome {
    pub nodes: Vec<Inline>,
    /// True when checkbox markup was seen and it was checked. The caller
    /// uses this as the task item's completion state.
    pub saw_checked_checkbox: bool,
}

pub(crate) fn resolve_inline(span: &[SpannedEvent<'_>], options: InlineOptions) -> InlineOutcome {
    let mut nodes: Vec<Inline> = Vec::new();
    let mut active: Vec<Mark> = Vec::new();
    let mut link_had_href: Vec<bool> = Vec::new();
    let mut saw_checked = false;
    let mut scanned_first_text = false;

    let mut cursor = 0;
    while cursor < span.len() {
        match &span[cursor].0 {
            Event::Text(text) => {
                let mut text: &str = text;
                if options.strip_checkbox_markup && !scanned_first_text {
                    if let Some((checked, rest)) = checkbox_prefix(text) {
                        saw_checked = checked;
                        text = rest;
                    }
                }
                scanned_first_text = true;
                push_run(&mut nodes, text, &active);
            }
            Event::Code(code) => {
                let mut marks = active.clone();
                if !marks.iter().any(|m| m.same_type(&Mark::Code)) {
                    marks.push(Mark::Code);
                }
                push_styled(&mut nodes, code, marks);
            }
            Event::SoftBreak => {
                if options.preserve_line_breaks {
                    nodes.push(Inline::HardBreak);
                } else {
                    push_run(&mut nodes, " ", &active);
                }
            }
            Event::HardBreak => nodes.push(Inline::HardBreak),
            Event::TaskListMarker(checked) => {
                if options.strip_checkbox_markup {
                    saw_checked = *checked;
                }
            }
            Event::Start(Tag::Emphasis) => active.push(Mark::Em),
            Event::End(TagEnd::Emphasis) => close_mark(&mut active, |m| matches!(m, Mark::Em)),
            Event::Start(Tag::Strong) => active.push(Mark::Strong),
            Event::End(TagEnd::Strong) => close_mark(&mut active, |m| matches!(m, Mark::Strong)),
            Event::Start(Tag::Strikethrough) => active.push(Mark::Strike),
            Event::End(TagEnd::Strikethrough) => {
                close_mark(&mut active, |m| matches!(m, Mark::Strike))
            }
            Event::Start(Tag::Link {
                dest_url, title, ..
            }) => {
                if dest_url.is_empty() {
                    link_had_href.push(false);
                } else {
                    let title = (!title.is_empty()).then(|| title.to_string());
                    active.push(Mark::link(dest_url.to_string(), title));
                    link_had_href.push(true);
                }
            }
            Event::End(TagEnd::Link) => {
                if link_had_href.pop().unwrap_or(false) {
                    close_mark(&mut active, |m| matches!(m, Mark::Link { .. }));
                }
            }
            Event::Start(Tag::Image {
                dest_url, title, ..
            }) => {
                let (alt, end_index) = image_alt_text(span, cursor);
                if dest_url.is_empty() {
                    push_run(&mut nodes, &alt, &active);
                } else {
                    let text = if alt.is_empty() {
                        dest_url.to_string()
                    } else {
                        alt
                    };
                    let mut marks = active.clone();
                    if !marks.iter().any(|m| matches!(m, Mark::Link { .. })) {
                        let title = (!title.is_empty()).then(|| title.to_string());
                        marks.push(Mark::link(dest_url.to_string(), title));
                    }
                    push_styled(&mut nodes, &text, marks);
                }
                cursor = end_index;
            }
            // Anything else carries no inline content of its own.
            _ => {}
        }
        cursor += 1;
    }

    InlineOutcome {
        nodes,
        saw_checked_checkbox: saw_checked,
    }
}

/// Fold a heading's content into bold paragraph content: every text run
/// gains a Strong mark, and runs whose mark sets now coincide are merged so
/// the no-fragmentation invariant holds after the rewrite.
pub(crate) fn embolden(nodes: Vec<Inline>) -> Vec<Inline> {
    let mut folded: Vec<Inline> = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Inline::Text(mut run) => {
                if !run.has_mark(&Mark::Strong) {
                    run.marks.push(Mark::Strong);
                }
                if let Some(Inline::Text(last)) = folded.last_mut() {
                    if last.marks == run.marks {
                        last.text.push_str(&run.text);
                        continue;
                    }
                }
                folded.push(Inline::Text(run));
            }
            other => folded.push(other),
        }
    }
    folded
}

/// Strip leading whitespace from the first text run, dropping the run if
/// nothing remains. Used on task item content after checkbox removal.
pub(crate) fn trim_leading_whitespace(nodes: &mut Vec<Inline>) {
    if let Some(Inline::Text(first)) = nodes.first_mut() {
        let trimmed = first.text.trim_start();
        if trimmed.is_empty() {
            nodes.remove(0);
        } else if trimmed.len() != first.text.len() {
            first.text = trimmed.to_string();
        }
    }
}

/// Append `text` under the current mark set, merging into the previous run
/// when the mark sets are identical.
fn push_run(nodes: &mut Vec<Inline>, text: &str, active: &[Mark]) {
    if text.is_empty() {
        return;
    }
    if let Some(Inline::Text(last)) = nodes.last_mut() {
        if last.marks.as_slice() == active {
            last.text.push_str(text);
            return;
        }
    }
    nodes.push(Inline::styled_text(text, active.to_vec()));
}

fn push_styled(nodes: &mut Vec<Inline>, text: &str, marks: Vec<Mark>) {
    if text.is_empty() {
        return;
    }
    if let Some(Inline::Text(last)) = nodes.last_mut() {
        if last.marks == marks {
            last.text.push_str(text);
            return;
        }
    }
    nodes.push(Inline::styled_text(text, marks));
}

/// Remove the nearest mark (scanning from the top) the predicate accepts.
fn close_mark(active: &mut Vec<Mark>, is_match: impl Fn(&Mark) -> bool) {
    if let Some(position) = active.iter().rposition(is_match) {
        active.remove(position);
    }
}

/// Flatten an image's alt content to plain text. Returns the text and the
/// index of the image's close event (or the span end if unclosed).
fn image_alt_text(span: &[SpannedEvent<'_>], start: usize) -> (String, usize) {
    let mut alt = String::new();
    let mut depth = 0usize;
    let mut index = start + 1;
    while index < span.len() {
        match &span[index].0 {
            Event::Start(Tag::Image { .. }) => depth += 1,
            Event::End(TagEnd::Image) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Event::Text(text) => alt.push_str(text),
            Event::Code(code) => alt.push_str(code),
            Event::SoftBreak | Event::HardBreak => alt.push(' '),
            _ => {}
        }
        index += 1;
    }
    (alt, index)
}
