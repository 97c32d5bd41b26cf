//! Presets, caller options, and the resolved conversion policy.
//!
//! Callers pick a [`Preset`] matching the surface they are writing to and
//! optionally override individual knobs through [`ConvertOptions`]. Before a
//! conversion starts the two are merged into a [`ConversionPolicy`], a fully
//! populated record the engine consults without ever looking back at the
//! preset table. The table itself is constant data; nothing mutates it at
//! runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The rendering context the output document is destined for. Atlassian
/// surfaces accept different subsets of the document schema, so the preset
/// picks which downgrades apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// No surface-specific restrictions beyond the schema itself.
    Default,
    /// Issue comments: no headings, no block quotes, tables render
    /// unreliably.
    Comment,
    /// Task descriptions: no headings.
    Task,
    /// Story/issue descriptions: headings are available on opt-in.
    Story,
}

impl Preset {
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::Comment => "comment",
            Preset::Task => "task",
            Preset::Story => "story",
        }
    }

    /// Whether this surface can render real heading nodes at all. The caller
    /// still has to opt in via `use_headings`.
    pub fn supports_headings(&self) -> bool {
        matches!(self, Preset::Default | Preset::Story)
    }
}

impl Default for Preset {
    fn default() -> Self {
        Preset::Default
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Preset::Default),
            "comment" => Ok(Preset::Comment),
            "task" => Ok(Preset::Task),
            "story" => Ok(Preset::Story),
            other => Err(format!(
                "unknown preset '{other}' (expected default, comment, task, or story)"
            )),
        }
    }
}

/// Caller-supplied overrides. Every field is optional; unset fields fall
/// back to the preset's defaults during [`ConvertOptions::resolve`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConvertOptions {
    pub preset: Preset,
    /// Emit real heading nodes where the preset supports them.
    pub use_headings: Option<bool>,
    /// Headings deeper than this level downgrade to bold paragraphs.
    pub max_heading_level: Option<u8>,
    /// Turn soft line breaks into hard breaks instead of spaces.
    pub preserve_line_breaks: Option<bool>,
    /// Abort on constructs that would otherwise downgrade with a warning.
    pub strict_mode: Option<bool>,
    /// Language tag applied to fenced code without an info string.
    pub default_code_language: Option<String>,
    /// Record warnings for constructs that render unreliably in the active
    /// context.
    pub warn_on_risky_nodes: Option<bool>,
}

impl ConvertOptions {
    pub fn for_preset(preset: Preset) -> Self {
        ConvertOptions {
            preset,
            ..ConvertOptions::default()
        }
    }

    /// Merge these overrides over the preset's defaults into one fully
    /// resolved policy record.
    pub fn resolve(&self) -> ConversionPolicy {
        let base = ConversionPolicy::preset_defaults(self.preset);
        ConversionPolicy {
            preset: self.preset,
            use_headings: self.use_headings.unwrap_or(base.use_headings),
            max_heading_level: self
                .max_heading_level
                .unwrap_or(base.max_heading_level)
                .clamp(1, 6),
            preserve_line_breaks: self
                .preserve_line_breaks
                .unwrap_or(base.preserve_line_breaks),
            strict_mode: self.strict_mode.unwrap_or(base.strict_mode),
            default_code_language: self
                .default_code_language
                .clone()
                .unwrap_or(base.default_code_language),
            warn_on_risky_nodes: self.warn_on_risky_nodes.unwrap_or(base.warn_on_risky_nodes),
        }
    }
}

/// The fully resolved policy the engine runs under. Produced once per
/// conversion by [`ConvertOptions::resolve`]; never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionPolicy {
    pub preset: Preset,
    pub use_headings: bool,
    pub max_heading_level: u8,
    pub preserve_line_breaks: bool,
    pub strict_mode: bool,
    pub default_code_language: String,
    pub warn_on_risky_nodes: bool,
}

/// Outcome of checking one heading against the active policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingVerdict {
    Allowed,
    /// The preset never renders headings, or the caller did not opt in.
    NotPermitted,
    /// Headings are on, but this one is deeper than the configured maximum.
    TooDeep,
}

impl ConversionPolicy {
    fn preset_defaults(preset: Preset) -> ConversionPolicy {
        ConversionPolicy {
            preset,
            use_headings: false,
            max_heading_level: 6,
            preserve_line_breaks: false,
            strict_mode: false,
            default_code_language: "text".to_string(),
            warn_on_risky_nodes: preset == Preset::Comment,
        }
    }

    /// Decide whether a heading of `level` survives as a real heading node.
    /// The preset gate is checked before the level so the reported reason
    /// names the stronger restriction.
    pub fn heading_verdict(&self, level: u8) -> HeadingVerdict {
        if !self.preset.supports_headings() || !self.use_headings {
            HeadingVerdict::NotPermitted
        } else if level > self.max_heading_level {
            HeadingVerdict::TooDeep
        } else {
            HeadingVerdict::Allowed
        }
    }

    /// Block quotes cannot be represented in comments; their content is
    /// spliced into the parent instead.
    pub fn unwraps_block_quotes(&self) -> bool {
        self.preset == Preset::Comment
    }

    /// Tables are valid everywhere but render inconsistently in comments.
    pub fn warns_on_risky_tables(&self) -> bool {
        self.warn_on_risky_nodes && self.preset == Preset::Comment
    }
}
