//! Markdown to Atlassian Document Format (ADF) conversion
//!
//!     This crate turns Markdown text into the JSON document trees that
//!     Jira and Confluence accept. The parsing itself is not done here: we
//!     hand the text to pulldown-cmark and work from its flat event stream,
//!     so the interesting code is the tree builder that decides, construct
//!     by construct, what the target surface can actually render.
//!
//!     TLDR for callers:
//!         - Pick the preset matching where the output goes (a comment, a
//!           task, a story description) and call convert().
//!         - Use convert_with_warnings() when you want to show the user
//!           what was downgraded or dropped; the document is the same.
//!         - Nothing is ever lost silently: every downgrade appends a
//!           warning, and strict mode turns the irrecoverable ones into
//!           hard errors instead.
//!
//! Architecture
//!
//!     The split is between what a document IS (./adf) and how one gets
//!     BUILT (./convert). The adf module is dumb data plus serde; all
//!     decisions live in the convert module, driven by a policy record
//!     resolved once per call from the preset and the caller's overrides
//!     (./options.rs).
//!
//!     This is a pure lib: it powers the adfmark CLI but is shell agnostic.
//!     No printing, no env vars, no file IO in here.
//!
//!     The file structure:
//!     .
//!     ├── lib.rs
//!     ├── error.rs                # Warning/error types shared by both
//!     ├── options.rs              # Presets + policy resolution
//!     ├── adf                     # Output node model (serde shapes)
//!     │   ├── nodes.rs            # Block-level nodes + document root
//!     │   ├── inline.rs           # Text runs, breaks, cards
//!     │   └── marks.rs            # Formatting marks
//!     └── convert
//!         ├── blocks.rs           # Block resolver (cursor + policy)
//!         ├── inline.rs           # Inline resolver (marks, merging)
//!         └── tasks.rs            # Checkbox detection, local ids
//!
//! Testing
//!     tests
//!     └── markdown
//!         ├── <area>.rs
//!         └── ...
//!
//!     Note that rust does not by default discover tests in subdirectories,
//!     so we need to include these in the mod.
//!
//! Core Algorithm
//!
//!     The most complex part of the work is reconstructing a nested tree
//!     from the flat event stream while applying context rules: headings
//!     that the surface cannot show become bold paragraphs, bullet lists
//!     split into task lists and plain lists item run by item, block quotes
//!     unwrap in comments, and adjacent text runs with the same marks are
//!     merged so no consumer ever sees a fragmented paragraph. The block
//!     resolver (./convert/blocks.rs) owns a cursor over the event slice
//!     and a warning log; the inline resolver under it is a pure function
//!     from an event slice to finished inline nodes.
//!
//! Library Choices
//!
//!     This not being a Markdown parser means we offload all of the parsing
//!     to pulldown-cmark and never second-guess its grammar; the scope here
//!     is strictly events in, ADF out. Serialization is plain serde; the
//!     node types are shaped so that to_string() of a document is already
//!     canonical ADF JSON with no post-processing step.

pub mod adf;
pub mod error;
pub mod options;

mod convert;

pub use adf::Document;
pub use convert::Conversion;
pub use error::{ConversionWarning, ConvertError, WarningKind};
pub use options::{ConversionPolicy, ConvertOptions, HeadingVerdict, Preset};

use std::ops::Range;

/// Convert Markdown to an ADF document.
///
/// Downgrades happen silently here; use [`convert_with_warnings`] to see
/// them. Fails only when `strict_mode` is set and the input contains a
/// construct the active preset cannot represent.
pub fn convert(markdown: &str, options: ConvertOptions) -> Result<Document, ConvertError> {
    convert::run(markdown, &options).map(|conversion| conversion.document)
}

/// Convert Markdown to an ADF document, returning the warning log with it.
///
/// The document is identical to what [`convert`] produces. Strict-mode
/// aborts still fail rather than coming back as warnings.
pub fn convert_with_warnings(
    markdown: &str,
    options: ConvertOptions,
) -> Result<Conversion, ConvertError> {
    convert::run(markdown, &options)
}

/// The raw parser event stream with source byte ranges, in debug form.
/// Intended for inspection tooling, not conversion.
pub fn token_stream(markdown: &str) -> Vec<(String, Range<usize>)> {
    convert::token_stream(markdown)
}
