//! The Atlassian Document Format (ADF) node model.
//!
//! This module defines the output side of the conversion: a typed tree that
//! serializes to the JSON Atlassian products accept. Only the node types the
//! converter can produce from Markdown are modeled, plus the inline nodes
//! (cards, mentions, emoji) and marks (underline, text color) callers may
//! splice into a document they post-process.

pub mod inline;
pub mod marks;
pub mod nodes;

pub use inline::{Emoji, Inline, InlineCard, Mention, Text};
pub use marks::{LinkAttrs, Mark, TextColorAttrs};
pub use nodes::{
    Block, Blockquote, BulletList, CodeBlock, CodeBlockAttrs, Document, Heading, HeadingAttrs,
    ListItem, OrderedList, OrderedListAttrs, Paragraph, Table, TableCell, TableRow, TaskItem,
    TaskItemAttrs, TaskList, TaskListAttrs, TaskState,
};
