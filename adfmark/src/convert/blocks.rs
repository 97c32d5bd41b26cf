//! Block-level resolution over the flat event stream.
//!
//! The resolver walks the parsed events with an explicit cursor. Containers
//! arrive as open/close pairs; each handler consumes everything up to and
//! including its close before returning, so the cursor always moves forward
//! and a missing close simply means the handler runs out at end-of-input.
//! Nested containers recurse through [`BlockResolver::resolve_sequence`].
//!
//! All preset-driven policy (heading gates, quote unwrapping, risky table
//! warnings) is applied here; the inline resolver below this layer stays
//! policy-free apart from two option flags.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Tag, TagEnd};

use crate::adf::{
    Block, Blockquote, BulletList, CodeBlock, Heading, Inline, ListItem, Mark, OrderedList,
    Paragraph, Table, TableCell, TableRow, TaskItem, TaskList, TaskState,
};
use crate::error::{ConversionWarning, ConvertError, WarningKind};
use crate::options::{ConversionPolicy, HeadingVerdict};

use super::inline::{self, InlineOptions};
use super::tasks;
use super::{LineIndex, SpannedEvent, WarningSink};

pub(crate) struct BlockResolver<'t, 'a> {
    tokens: &'t [SpannedEvent<'a>],
    cursor: usize,
    policy: &'t ConversionPolicy,
    lines: &'t LineIndex,
    source: &'t str,
    warnings: &'t mut WarningSink,
}

impl<'t, 'a> BlockResolver<'t, 'a> {
    pub(crate) fn new(
        tokens: &'t [SpannedEvent<'a>],
        policy: &'t ConversionPolicy,
        lines: &'t LineIndex,
        source: &'t str,
        warnings: &'t mut WarningSink,
    ) -> Self {
        BlockResolver {
            tokens,
            cursor: 0,
            policy,
            lines,
            source,
            warnings,
        }
    }

    /// Resolve the whole stream. A document always carries at least one
    /// block, so empty input yields a single empty paragraph.
    pub(crate) fn resolve_document(mut self) -> Result<Vec<Block>, ConvertError> {
        let mut blocks = self.resolve_sequence(None)?;
        if blocks.is_empty() {
            blocks.push(Block::empty_paragraph());
        }
        Ok(blocks)
    }

    /// Resolve blocks until the given close event (consuming it) or until
    /// the stream ends, whichever comes first.
    fn resolve_sequence(&mut self, until: Option<TagEnd>) -> Result<Vec<Block>, ConvertError> {
        let mut blocks = Vec::new();
        while self.cursor < self.tokens.len() {
            if let Some(end) = until {
                if matches!(&self.tokens[self.cursor].0, Event::End(e) if *e == end) {
                    self.cursor += 1;
                    return Ok(blocks);
                }
            }
            self.resolve_block(&mut blocks)?;
        }
        Ok(blocks)
    }

    fn resolve_block(&mut self, out: &mut Vec<Block>) -> Result<(), ConvertError> {
        let tokens = self.tokens;
        let (event, range) = &tokens[self.cursor];
        match event {
            Event::Start(Tag::Paragraph) => {
                self.cursor += 1;
                let span = self.take_span(TagEnd::Paragraph);
                let outcome = inline::resolve_inline(span, self.inline_options(false));
                out.push(Block::Paragraph(Paragraph::new(outcome.nodes)));
            }
            Event::Start(Tag::Heading { level, .. }) => {
                let end = TagEnd::Heading(*level);
                let level = heading_level(*level);
                let range = range.clone();
                self.cursor += 1;
                self.resolve_heading(level, end, &range, out)?;
            }
            Event::Start(tag @ Tag::BlockQuote(..)) => {
                let end = tag.to_end();
                let range = range.clone();
                self.cursor += 1;
                self.resolve_block_quote(end, &range, out)?;
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) if !info.trim().is_empty() => {
                        info.trim().to_string()
                    }
                    _ => self.policy.default_code_language.clone(),
                };
                self.cursor += 1;
                let span = self.take_span(TagEnd::CodeBlock);
                let mut text = String::new();
                for (event, _) in span {
                    if let Event::Text(chunk) = event {
                        text.push_str(chunk);
                    }
                }
                strip_one_trailing_newline(&mut text);
                out.push(Block::CodeBlock(CodeBlock::new(language, text)));
            }
            Event::Start(Tag::List(start)) => {
                let start = *start;
                self.cursor += 1;
                self.resolve_list(start, out)?;
            }
            Event::Start(Tag::Table(_)) => {
                let line = self.line_of(range);
                self.cursor += 1;
                let table = self.resolve_table();
                out.push(Block::Table(table));
                if self.policy.warns_on_risky_tables() {
                    self.warnings.record(
                        ConversionWarning::new(
                            WarningKind::RiskyFeature,
                            "tables render inconsistently in comments",
                        )
                        .with_line(line),
                    );
                }
            }
            Event::Rule => {
                let line = self.line_of(range);
                let original = self.snippet(range);
                if self.policy.strict_mode {
                    log::debug!("strict mode: aborting on a horizontal rule at line {line}");
                    return Err(ConvertError::new(
                        WarningKind::UnsupportedFeature,
                        "horizontal rules cannot be represented",
                    )
                    .with_line(line)
                    .with_original(original));
                }
                self.warnings.record(
                    ConversionWarning::new(
                        WarningKind::UnsupportedFeature,
                        "horizontal rule skipped",
                    )
                    .with_line(line)
                    .with_original(original),
                );
                self.cursor += 1;
            }
            event if is_inline_event(event) => {
                // Inline content with no enclosing block gets wrapped in a
                // paragraph rather than dropped.
                let start = self.cursor;
                while self.cursor < tokens.len() && is_inline_event(&tokens[self.cursor].0) {
                    self.cursor += 1;
                }
                let outcome =
                    inline::resolve_inline(&tokens[start..self.cursor], self.inline_options(false));
                if !outcome.nodes.is_empty() {
                    out.push(Block::paragraph(outcome.nodes));
                }
            }
            Event::Start(tag) => {
                // Unknown container: skip it whole, close included.
                let end = tag.to_end();
                self.cursor += 1;
                self.take_span(end);
            }
            _ => self.cursor += 1,
        }
        Ok(())
    }

    fn resolve_heading(
        &mut self,
        level: u8,
        end: TagEnd,
        range: &Range<usize>,
        out: &mut Vec<Block>,
    ) -> Result<(), ConvertError> {
        let span = self.take_span(end);
        let reason = match self.policy.heading_verdict(level) {
            HeadingVerdict::Allowed => {
                let outcome = inline::resolve_inline(span, self.inline_options(false));
                out.push(Block::Heading(Heading::new(level, outcome.nodes)));
                return Ok(());
            }
            HeadingVerdict::NotPermitted => format!(
                "headings are not permitted in the '{}' context",
                self.policy.preset
            ),
            HeadingVerdict::TooDeep => format!(
                "heading level {level} exceeds the maximum of {}",
                self.policy.max_heading_level
            ),
        };
        let line = self.line_of(range);
        let original = self.snippet(range);
        if self.policy.strict_mode {
            log::debug!("strict mode: aborting on a disallowed heading at line {line}");
            return Err(ConvertError::new(WarningKind::UnsupportedFeature, reason)
                .with_line(line)
                .with_original(original));
        }
        self.warnings.record(
            ConversionWarning::new(
                WarningKind::LossyConversion,
                format!("{reason}; emitted as bold text"),
            )
            .with_line(line)
            .with_original(original),
        );
        let outcome = inline::resolve_inline(span, self.inline_options(false));
        let mut content = inline::embolden(outcome.nodes);
        if content.is_empty() {
            // Keep the emphasis signal even for an empty heading.
            content.push(Inline::styled_text("", vec![Mark::Strong]));
        }
        out.push(Block::paragraph(content));
        Ok(())
    }

    fn resolve_block_quote(
        &mut self,
        end: TagEnd,
        range: &Range<usize>,
        out: &mut Vec<Block>,
    ) -> Result<(), ConvertError> {
        let line = self.line_of(range);
        let mut inner = self.resolve_sequence(Some(end))?;
        if inner.is_empty() {
            inner.push(Block::empty_paragraph());
        }
        if self.policy.unwraps_block_quotes() {
            self.warnings.record(
                ConversionWarning::new(
                    WarningKind::LossyConversion,
                    "block quotes are not supported in comments; quoted content was inlined",
                )
                .with_line(line),
            );
            out.extend(inner);
        } else {
            out.push(Block::Blockquote(Blockquote::new(inner)));
        }
        Ok(())
    }

    fn resolve_list(
        &mut self,
        start: Option<u64>,
        out: &mut Vec<Block>,
    ) -> Result<(), ConvertError> {
        let tokens = self.tokens;
        let end = TagEnd::List(start.is_some());

        if let Some(order) = start {
            let mut items = Vec::new();
            while self.cursor < tokens.len() {
                match &tokens[self.cursor].0 {
                    Event::End(e) if *e == end => {
                        self.cursor += 1;
                        break;
                    }
                    Event::Start(Tag::Item) => {
                        let item_range = tokens[self.cursor].1.clone();
                        self.cursor += 1;
                        items.push(self.resolve_list_item(&item_range)?);
                    }
                    _ => self.cursor += 1,
                }
            }
            out.push(Block::OrderedList(OrderedList::starting_at(order, items)));
            return Ok(());
        }

        // Bullet lists split into runs: consecutive task items form task
        // lists, consecutive regular items form bullet lists, and every
        // switch starts a new output block.
        let mut regular: Vec<ListItem> = Vec::new();
        let mut checks: Vec<TaskItem> = Vec::new();
        while self.cursor < tokens.len() {
            match &tokens[self.cursor].0 {
                Event::End(e) if *e == end => {
                    self.cursor += 1;
                    break;
                }
                Event::Start(Tag::Item) => {
                    let item_range = tokens[self.cursor].1.clone();
                    self.cursor += 1;
                    if tasks::is_task_item(self.peek_span(TagEnd::Item)) {
                        if !regular.is_empty() {
                            log::debug!("bullet list splits before a task item");
                            out.push(Block::BulletList(BulletList::new(std::mem::take(
                                &mut regular,
                            ))));
                        }
                        checks.push(self.resolve_task_item(&item_range)?);
                    } else {
                        if !checks.is_empty() {
                            log::debug!("bullet list splits before a regular item");
                            out.push(Block::TaskList(TaskList::new(
                                tasks::fresh_local_id(),
                                std::mem::take(&mut checks),
                            )));
                        }
                        regular.push(self.resolve_list_item(&item_range)?);
                    }
                }
                _ => self.cursor += 1,
            }
        }
        if !regular.is_empty() {
            out.push(Block::BulletList(BulletList::new(regular)));
        }
        if !checks.is_empty() {
            out.push(Block::TaskList(TaskList::new(
                tasks::fresh_local_id(),
                checks,
            )));
        }
        Ok(())
    }

    /// Resolve a regular list item body. Content other than paragraphs and
    /// nested bullet/ordered lists is dropped, with one warning per item no
    /// matter how many blocks were removed.
    fn resolve_list_item(&mut self, item_range: &Range<usize>) -> Result<ListItem, ConvertError> {
        let blocks = self.resolve_sequence(Some(TagEnd::Item))?;
        let total = blocks.len();
        let mut kept: Vec<Block> = blocks
            .into_iter()
            .filter(|block| {
                matches!(
                    block,
                    Block::Paragraph(_) | Block::BulletList(_) | Block::OrderedList(_)
                )
            })
            .collect();
        if kept.len() != total {
            self.warnings.record(
                ConversionWarning::new(
                    WarningKind::LossyConversion,
                    "unsupported content dropped from list item",
                )
                .with_line(self.line_of(item_range)),
            );
        }
        if kept.is_empty() {
            kept.push(Block::empty_paragraph());
        }
        Ok(ListItem::new(kept))
    }

    /// Resolve a task item body: the first inline run (bare or inside the
    /// first paragraph) becomes the content, everything after it is dropped.
    fn resolve_task_item(&mut self, item_range: &Range<usize>) -> Result<TaskItem, ConvertError> {
        let tokens = self.tokens;
        let mut content: Vec<Inline> = Vec::new();
        let mut state = TaskState::Todo;
        let mut consumed_first = false;
        let mut dropped = false;

        while self.cursor < tokens.len() {
            match &tokens[self.cursor].0 {
                Event::End(TagEnd::Item) => {
                    self.cursor += 1;
                    break;
                }
                Event::Start(Tag::Paragraph) => {
                    self.cursor += 1;
                    let span = self.take_span(TagEnd::Paragraph);
                    if consumed_first {
                        dropped = true;
                        continue;
                    }
                    consumed_first = true;
                    let outcome = inline::resolve_inline(span, self.inline_options(true));
                    state = TaskState::from_checked(outcome.saw_checked_checkbox);
                    content = outcome.nodes;
                    inline::trim_leading_whitespace(&mut content);
                }
                event if is_inline_event(event) => {
                    let start = self.cursor;
                    while self.cursor < tokens.len() && is_inline_event(&tokens[self.cursor].0) {
                        self.cursor += 1;
                    }
                    if consumed_first {
                        dropped = true;
                        continue;
                    }
                    consumed_first = true;
                    let outcome = inline::resolve_inline(
                        &tokens[start..self.cursor],
                        self.inline_options(true),
                    );
                    state = TaskState::from_checked(outcome.saw_checked_checkbox);
                    content = outcome.nodes;
                    inline::trim_leading_whitespace(&mut content);
                }
                Event::Start(tag) => {
                    let end = tag.to_end();
                    self.cursor += 1;
                    self.take_span(end);
                    dropped = true;
                }
                Event::Rule => {
                    self.cursor += 1;
                    dropped = true;
                }
                _ => self.cursor += 1,
            }
        }
        if dropped {
            self.warnings.record(
                ConversionWarning::new(
                    WarningKind::LossyConversion,
                    "task items only support inline content; extra content was dropped",
                )
                .with_line(self.line_of(item_range)),
            );
        }
        Ok(TaskItem::new(tasks::fresh_local_id(), state, content))
    }

    fn resolve_table(&mut self) -> Table {
        let tokens = self.tokens;
        let mut rows: Vec<TableRow> = Vec::new();
        while self.cursor < tokens.len() {
            match &tokens[self.cursor].0 {
                Event::End(TagEnd::Table) => {
                    self.cursor += 1;
                    break;
                }
                Event::Start(Tag::TableHead) => {
                    self.cursor += 1;
                    let cells = self.resolve_table_cells(TagEnd::TableHead, true);
                    rows.push(TableRow::new(cells));
                }
                Event::Start(Tag::TableRow) => {
                    self.cursor += 1;
                    let cells = self.resolve_table_cells(TagEnd::TableRow, false);
                    rows.push(TableRow::new(cells));
                }
                _ => self.cursor += 1,
            }
        }
        Table::new(rows)
    }

    /// Collect the cells of one row section. Every cell wraps its inline
    /// content in exactly one paragraph, empty cells included.
    fn resolve_table_cells(&mut self, end: TagEnd, header: bool) -> Vec<TableCell> {
        let tokens = self.tokens;
        let mut cells = Vec::new();
        while self.cursor < tokens.len() {
            match &tokens[self.cursor].0 {
                Event::End(e) if *e == end => {
                    self.cursor += 1;
                    break;
                }
                Event::Start(Tag::TableCell) => {
                    self.cursor += 1;
                    let span = self.take_span(TagEnd::TableCell);
                    let outcome = inline::resolve_inline(span, self.inline_options(false));
                    let paragraph = Block::Paragraph(Paragraph::new(outcome.nodes));
                    cells.push(if header {
                        TableCell::header(vec![paragraph])
                    } else {
                        TableCell::cell(vec![paragraph])
                    });
                }
                _ => self.cursor += 1,
            }
        }
        cells
    }

    /// Slice from the cursor up to (not including) the matching close event,
    /// without moving the cursor. Same-typed nested containers are depth
    /// counted so an inner close is not mistaken for ours.
    fn peek_span(&self, end: TagEnd) -> &'t [SpannedEvent<'a>] {
        let tokens = self.tokens;
        let start = self.cursor;
        let mut depth = 0usize;
        let mut index = start;
        while index < tokens.len() {
            match &tokens[index].0 {
                Event::Start(tag) if tag.to_end() == end => depth += 1,
                Event::End(e) if *e == end => {
                    if depth == 0 {
                        return &tokens[start..index];
                    }
                    depth -= 1;
                }
                _ => {}
            }
            index += 1;
        }
        &tokens[start..]
    }

    /// Like [`BlockResolver::peek_span`], but advances the cursor past the
    /// close event.
    fn take_span(&mut self, end: TagEnd) -> &'t [SpannedEvent<'a>] {
        let span = self.peek_span(end);
        self.cursor = (self.cursor + span.len() + 1).min(self.tokens.len());
        span
    }

    fn inline_options(&self, strip_checkbox_markup: bool) -> InlineOptions {
        InlineOptions {
            preserve_line_breaks: self.policy.preserve_line_breaks,
            strip_checkbox_markup,
        }
    }

    fn line_of(&self, range: &Range<usize>) -> usize {
        self.lines.line_at(range.start)
    }

    /// First source line of the construct, for warning context.
    fn snippet(&self, range: &Range<usize>) -> String {
        let raw = self.source.get(range.clone()).unwrap_or("");
        raw.lines().next().unwrap_or("").trim_end().to_string()
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Strip exactly one trailing line terminator, keeping any intentional
/// blank lines before it.
fn strip_one_trailing_newline(text: &mut String) {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
}

fn is_inline_event(event: &Event<'_>) -> bool {
    match event {
        Event::Text(_)
        | Event::Code(_)
        | Event::InlineHtml(_)
        | Event::SoftBreak
        | Event::HardBreak
        | Event::TaskListMarker(_)
        | Event::FootnoteReference(_) => true,
        Event::Start(tag) => matches!(
            tag,
            Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. } | Tag::Image { .. }
        ),
        Event::End(end) => matches!(
            end,
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link | TagEnd::Image
        ),
        _ => false,
    }
}
