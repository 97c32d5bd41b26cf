//! Block-level nodes and the document root.
//!
//! These are deliberately dumb data types: construction helpers stamp out the
//! shapes, `serde` produces the canonical ADF JSON, and all conversion policy
//! lives in the engine. Node content is held as plain vectors so the engine
//! and tests can pattern-match structure directly.
//!
//! Serialization notes, since ADF is picky about them:
//! - every node carries a `"type"` discriminant,
//! - node attributes live under `"attrs"`,
//! - empty `content` is omitted rather than serialized as `[]` for nodes
//!   where an absent body is legal (paragraphs, task items, code blocks).

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use super::inline::Inline;

/// The document root: `{"type": "doc", "version": 1, "content": [...]}`.
///
/// A valid document always has at least one block; the conversion engine
/// substitutes one empty paragraph when the input produces nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub version: u32,
    pub content: Vec<Block>,
}

impl Document {
    pub fn new(content: Vec<Block>) -> Self {
        Document {
            version: 1,
            content,
        }
    }

    /// Compact ADF JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Pretty-printed ADF JSON (2-space indentation).
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Document", 3)?;
        state.serialize_field("type", "doc")?;
        state.serialize_field("version", &self.version)?;
        state.serialize_field("content", &self.content)?;
        state.end()
    }
}

/// One block-level node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    Paragraph(Paragraph),
    Heading(Heading),
    BulletList(BulletList),
    OrderedList(OrderedList),
    TaskList(TaskList),
    Blockquote(Blockquote),
    CodeBlock(CodeBlock),
    Table(Table),
}

impl Block {
    pub fn paragraph(content: Vec<Inline>) -> Self {
        Block::Paragraph(Paragraph::new(content))
    }

    /// The structurally minimal block: a paragraph with no content.
    pub fn empty_paragraph() -> Self {
        Block::Paragraph(Paragraph::empty())
    }
}

/// `{"type": "paragraph", "content": [...]}`; `content` is omitted entirely
/// for an empty paragraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paragraph {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Inline>,
}

impl Paragraph {
    pub fn new(content: Vec<Inline>) -> Self {
        Paragraph { content }
    }

    pub fn empty() -> Self {
        Paragraph {
            content: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    pub attrs: HeadingAttrs,
    pub content: Vec<Inline>,
}

impl Heading {
    pub fn new(level: u8, content: Vec<Inline>) -> Self {
        Heading {
            attrs: HeadingAttrs { level },
            content,
        }
    }

    pub fn level(&self) -> u8 {
        self.attrs.level
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingAttrs {
    /// 1 through 6.
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulletList {
    pub content: Vec<ListItem>,
}

impl BulletList {
    pub fn new(content: Vec<ListItem>) -> Self {
        BulletList { content }
    }
}

/// `{"type": "orderedList", "attrs": {"order": n}, "content": [...]}`. The
/// `attrs` object only appears when the source list starts at a number other
/// than 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderedList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attrs: Option<OrderedListAttrs>,
    pub content: Vec<ListItem>,
}

impl OrderedList {
    pub fn new(content: Vec<ListItem>) -> Self {
        OrderedList {
            attrs: None,
            content,
        }
    }

    pub fn starting_at(order: u64, content: Vec<ListItem>) -> Self {
        let attrs = if order == 1 {
            None
        } else {
            Some(OrderedListAttrs { order })
        };
        OrderedList { attrs, content }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderedListAttrs {
    pub order: u64,
}

/// Item of a bullet or ordered list. Content is restricted by the engine to
/// paragraphs and nested bullet/ordered lists; the type itself does not
/// enforce that, the conversion does.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub content: Vec<Block>,
}

impl ListItem {
    pub fn new(content: Vec<Block>) -> Self {
        ListItem { content }
    }
}

impl Serialize for ListItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ListItem", 2)?;
        state.serialize_field("type", "listItem")?;
        state.serialize_field("content", &self.content)?;
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskList {
    pub attrs: TaskListAttrs,
    pub content: Vec<TaskItem>,
}

impl TaskList {
    pub fn new(local_id: impl Into<String>, content: Vec<TaskItem>) -> Self {
        TaskList {
            attrs: TaskListAttrs {
                local_id: local_id.into(),
            },
            content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListAttrs {
    pub local_id: String,
}

/// A checkbox item. Content is inline-only; `content` is omitted on the wire
/// when the item has no text.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskItem {
    pub attrs: TaskItemAttrs,
    pub content: Vec<Inline>,
}

impl TaskItem {
    pub fn new(local_id: impl Into<String>, state: TaskState, content: Vec<Inline>) -> Self {
        TaskItem {
            attrs: TaskItemAttrs {
                local_id: local_id.into(),
                state,
            },
            content,
        }
    }

    pub fn state(&self) -> TaskState {
        self.attrs.state
    }
}

impl Serialize for TaskItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = if self.content.is_empty() { 2 } else { 3 };
        let mut state = serializer.serialize_struct("TaskItem", fields)?;
        state.serialize_field("type", "taskItem")?;
        state.serialize_field("attrs", &self.attrs)?;
        if !self.content.is_empty() {
            state.serialize_field("content", &self.content)?;
        }
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskItemAttrs {
    pub local_id: String,
    pub state: TaskState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskState {
    #[serde(rename = "TODO")]
    Todo,
    #[serde(rename = "DONE")]
    Done,
}

impl TaskState {
    pub fn from_checked(checked: bool) -> Self {
        if checked {
            TaskState::Done
        } else {
            TaskState::Todo
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Blockquote {
    pub content: Vec<Block>,
}

impl Blockquote {
    pub fn new(content: Vec<Block>) -> Self {
        Blockquote { content }
    }
}

/// A code block. The model keeps the text as one string; serialization wraps
/// it in the single text node ADF expects:
/// `{"type": "codeBlock", "attrs": {"language": ...}, "content": [{"type": "text", ...}]}`.
/// An empty code block serializes without `content`.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub attrs: CodeBlockAttrs,
    pub text: String,
}

impl CodeBlock {
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
        CodeBlock {
            attrs: CodeBlockAttrs {
                language: language.into(),
            },
            text: text.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.attrs.language
    }
}

impl Serialize for CodeBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = if self.text.is_empty() { 1 } else { 2 };
        let mut state = serializer.serialize_struct("CodeBlock", fields)?;
        state.serialize_field("attrs", &self.attrs)?;
        if !self.text.is_empty() {
            state.serialize_field("content", &[Inline::text(self.text.clone())])?;
        }
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeBlockAttrs {
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub content: Vec<TableRow>,
}

impl Table {
    pub fn new(content: Vec<TableRow>) -> Self {
        Table { content }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub content: Vec<TableCell>,
}

impl TableRow {
    pub fn new(content: Vec<TableCell>) -> Self {
        TableRow { content }
    }
}

impl Serialize for TableRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TableRow", 2)?;
        state.serialize_field("type", "tableRow")?;
        state.serialize_field("content", &self.content)?;
        state.end()
    }
}

/// A header or body cell. Cell content is a sequence of paragraphs; the
/// engine wraps each cell's inline span in exactly one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TableCell {
    #[serde(rename = "tableHeader")]
    Header { content: Vec<Block> },
    #[serde(rename = "tableCell")]
    Cell { content: Vec<Block> },
}

impl TableCell {
    pub fn header(content: Vec<Block>) -> Self {
        TableCell::Header { content }
    }

    pub fn cell(content: Vec<Block>) -> Self {
        TableCell::Cell { content }
    }

    pub fn content(&self) -> &[Block] {
        match self {
            TableCell::Header { content } | TableCell::Cell { content } => content,
        }
    }
}
