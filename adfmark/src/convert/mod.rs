//! The conversion pipeline.
//!
//! Markdown text is tokenized once into a flat, source-spanned event
//! sequence, then handed to the block resolver which owns the cursor and
//! the warning log for the duration of the call. Nothing here is shared
//! across calls: concurrent conversions need no coordination.

mod blocks;
mod inline;
mod tasks;

use std::ops::Range;

use pulldown_cmark::{Event, Options, Parser};

use crate::adf::Document;
use crate::error::{ConversionWarning, ConvertError};
use crate::options::ConvertOptions;

use blocks::BlockResolver;

/// One parsed event plus the byte range of the source text it came from.
pub(crate) type SpannedEvent<'a> = (Event<'a>, Range<usize>);

/// A finished conversion: the document plus everything that was downgraded,
/// dropped, or flagged along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub document: Document,
    pub warnings: Vec<ConversionWarning>,
}

pub(crate) fn run(markdown: &str, options: &ConvertOptions) -> Result<Conversion, ConvertError> {
    let policy = options.resolve();
    let tokens = tokenize(markdown);
    log::debug!(
        "resolving {} markdown events under the '{}' preset",
        tokens.len(),
        policy.preset
    );
    let lines = LineIndex::new(markdown);
    let mut warnings = WarningSink::new();
    let resolver = BlockResolver::new(&tokens, &policy, &lines, markdown, &mut warnings);
    let blocks = resolver.resolve_document()?;
    Ok(Conversion {
        document: Document::new(blocks),
        warnings: warnings.into_warnings(),
    })
}

/// The parsed event stream in debug form, with source byte ranges. Feeds
/// the CLI's inspection output; the conversion itself goes through [`run`].
pub(crate) fn token_stream(markdown: &str) -> Vec<(String, Range<usize>)> {
    tokenize(markdown)
        .into_iter()
        .map(|(event, range)| (format!("{event:?}"), range))
        .collect()
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

pub(crate) fn tokenize(markdown: &str) -> Vec<SpannedEvent<'_>> {
    Parser::new_ext(markdown, parser_options())
        .into_offset_iter()
        .collect()
}

/// Append-only warning log for one conversion call. Every recursive helper
/// writes into the same sink, so warnings come out in document order.
pub(crate) struct WarningSink {
    warnings: Vec<ConversionWarning>,
}

impl WarningSink {
    pub(crate) fn new() -> Self {
        WarningSink {
            warnings: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, warning: ConversionWarning) {
        log::debug!("{warning}");
        self.warnings.push(warning);
    }

    pub(crate) fn into_warnings(self) -> Vec<ConversionWarning> {
        self.warnings
    }
}

/// Byte offset to 1-based line number lookup, built once per conversion.
pub(crate) struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub(crate) fn new(source: &str) -> Self {
        let mut starts = vec![0];
        for (index, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                starts.push(index + 1);
            }
        }
        LineIndex { starts }
    }

    pub(crate) fn line_at(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }
}
