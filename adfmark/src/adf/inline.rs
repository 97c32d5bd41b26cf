//! Inline content nodes: text runs, hard breaks, and the leaf nodes hosts
//! attach after conversion (inline cards, mentions, emoji).
//!
//! The invariant that matters here is non-fragmentation: two adjacent
//! [`Text`] runs in valid output never carry identical mark lists. The
//! conversion engine merges runs as it appends them; code that builds inline
//! sequences by hand is expected to do the same.

use serde::Serialize;

use super::marks::Mark;

/// One inline node.
///
/// The Markdown conversion only produces `Text` and `HardBreak`. The other
/// variants are part of the emitted schema so that documents enriched after
/// conversion (smart links, user mentions) stay representable and serialize
/// to valid ADF.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inline {
    Text(Text),
    HardBreak,
    InlineCard(InlineCard),
    Mention(Mention),
    Emoji(Emoji),
}

impl Inline {
    /// Plain text run without marks.
    pub fn text(value: impl Into<String>) -> Self {
        Inline::Text(Text::new(value))
    }

    /// Text run with an explicit mark list.
    pub fn styled_text(value: impl Into<String>, marks: Vec<Mark>) -> Self {
        Inline::Text(Text::with_marks(value, marks))
    }

    /// Smart-link card pointing at a URL.
    pub fn inline_card(url: impl Into<String>) -> Self {
        Inline::InlineCard(InlineCard {
            attrs: InlineCardAttrs { url: url.into() },
        })
    }

    /// User mention. `text` is the display fallback (usually `@name`).
    pub fn mention(id: impl Into<String>, text: Option<String>) -> Self {
        Inline::Mention(Mention {
            attrs: MentionAttrs {
                id: id.into(),
                text,
            },
        })
    }

    /// Emoji by short name (`:smile:` style).
    pub fn emoji(short_name: impl Into<String>, text: Option<String>) -> Self {
        Inline::Emoji(Emoji {
            attrs: EmojiAttrs {
                short_name: short_name.into(),
                text,
            },
        })
    }
}

/// A run of text with its marks. Serializes as
/// `{"type": "text", "text": "...", "marks": [...]}`, omitting `marks` when
/// empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Text {
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Text {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    pub fn with_marks(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        Text {
            text: text.into(),
            marks,
        }
    }

    /// True when this run carries a mark of the same type as `mark`.
    pub fn has_mark(&self, mark: &Mark) -> bool {
        self.marks.iter().any(|m| m.same_type(mark))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineCard {
    pub attrs: InlineCardAttrs,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineCardAttrs {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mention {
    pub attrs: MentionAttrs,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MentionAttrs {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Emoji {
    pub attrs: EmojiAttrs,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmojiAttrs {
    pub short_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}
