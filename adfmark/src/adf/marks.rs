//! Formatting marks attached to text runs.
//!
//! A mark decorates a [`Text`](super::Text) run without changing the document
//! structure. Marks with attributes (links, text color) carry them in an
//! `attrs` object, matching the ADF wire format. A run carries each mark
//! *type* at most once; the conversion engine enforces this when it tags runs.

use serde::Serialize;

/// A single formatting mark.
///
/// Serializes to the ADF mark shape: `{"type": "strong"}` for plain marks,
/// `{"type": "link", "attrs": {...}}` for attributed ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mark {
    Strong,
    Em,
    Code,
    Strike,
    Underline,
    Link { attrs: LinkAttrs },
    TextColor { attrs: TextColorAttrs },
}

impl Mark {
    /// Link mark. The title is dropped when empty so the wire format never
    /// carries a `"title": ""` entry.
    pub fn link(href: impl Into<String>, title: Option<String>) -> Self {
        Mark::Link {
            attrs: LinkAttrs {
                href: href.into(),
                title: title.filter(|t| !t.is_empty()),
            },
        }
    }

    pub fn text_color(color: impl Into<String>) -> Self {
        Mark::TextColor {
            attrs: TextColorAttrs {
                color: color.into(),
            },
        }
    }

    /// True when `other` is the same mark type, ignoring attribute values.
    /// Two links with different targets still match.
    pub fn same_type(&self, other: &Mark) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Attributes of a [`Mark::Link`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkAttrs {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Attributes of a [`Mark::TextColor`]. The color is a CSS hex string such
/// as `#ff5630`; the engine never emits this mark but hosts may attach it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextColorAttrs {
    pub color: String,
}
