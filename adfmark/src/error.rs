//! Warning and error types for conversion runs.

use std::fmt;

/// Classification shared by warnings and hard errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The input could not be parsed as intended. Reserved for issues
    /// reported by the Markdown parser itself; the converter does not raise
    /// this on its own.
    InvalidSyntax,
    /// The construct has no representation at all in the output schema, or
    /// the active context categorically forbids it.
    UnsupportedFeature,
    /// The construct is representable only in a degraded form and content
    /// or structure was given up to emit it.
    LossyConversion,
    /// The construct was emitted as-is but is known to render inconsistently
    /// in the active context.
    RiskyFeature,
}

impl WarningKind {
    /// Stable identifier used in rendered warnings and machine-readable
    /// output.
    pub fn label(&self) -> &'static str {
        match self {
            WarningKind::InvalidSyntax => "invalid-syntax",
            WarningKind::UnsupportedFeature => "unsupported-feature",
            WarningKind::LossyConversion => "lossy-conversion",
            WarningKind::RiskyFeature => "risky-feature",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One recoverable issue recorded while converting. Warnings accumulate in
/// document order in a log scoped to a single conversion call.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionWarning {
    pub kind: WarningKind,
    pub message: String,
    /// 1-based source line of the construct, when known.
    pub line: Option<usize>,
    /// The source text that triggered the warning, when it is short enough
    /// to be useful.
    pub original_text: Option<String>,
}

impl ConversionWarning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        ConversionWarning {
            kind,
            message: message.into(),
            line: None,
            original_text: None,
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_original(mut self, text: impl Into<String>) -> Self {
        self.original_text = Some(text.into());
        self
    }
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(line) = self.line {
            write!(f, " (line {line})")?;
        }
        Ok(())
    }
}

/// A hard conversion failure. Only raised in strict mode, for constructs
/// that cannot be represented at all; carries the same detail as a warning
/// so callers can report both uniformly.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertError {
    pub kind: WarningKind,
    pub message: String,
    pub line: Option<usize>,
    pub original_text: Option<String>,
}

impl ConvertError {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        ConvertError {
            kind,
            message: message.into(),
            line: None,
            original_text: None,
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_original(mut self, text: impl Into<String>) -> Self {
        self.original_text = Some(text.into());
        self
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(line) = self.line {
            write!(f, " (line {line})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConvertError {}
