//! CLI-specific inspection transforms
//!
//! This module defines the debugging views available through `adfmark inspect`.
//! Each transform renders one stage of the conversion pipeline as text.
//!
//! ## Pipeline stages
//!
//! 1. **Tokenization** - Markdown text → event stream
//!    - `events-json`: events with byte spans as JSON
//!    - `events-debug`: one debug line per event
//!
//! 2. **Conversion** - event stream → ADF document
//!    - `adf-json`: the converted document as JSON
//!    - `warnings`: the conversion warning log, one warning per line
//!
//! ## Extra Parameters
//!
//! Transforms accept parameters via `--extra-<name> [value]`:
//!
//! - `show-spans`: include byte ranges in `events-debug` output
//! - `pretty`: set to "false" for single-line `adf-json` output
//! - `preset`: run the conversion under a specific preset
//!   (`default`, `comment`, `task`, `story`)
//!
//! Example: `adfmark inspect notes.md adf-json --extra-preset comment`

use adfmark::{convert_with_warnings, token_stream, ConvertOptions, Preset};
use std::collections::HashMap;

/// All available inspection transforms.
pub const AVAILABLE_TRANSFORMS: &[&str] = &[
    "events-json",
    "events-debug",
    "adf-json",
    "warnings",
];

/// Execute a named transform on Markdown source with optional extra parameters.
///
/// `options` carries the conversion knobs resolved from configuration; the
/// `preset` extra parameter overrides the preset for a single run so the
/// different downgrade paths can be compared without editing config files.
///
/// Returns the rendered output (always newline-terminated when non-empty), or
/// an error message.
pub fn execute_transform(
    source: &str,
    transform_name: &str,
    options: &ConvertOptions,
    extra_params: &HashMap<String, String>,
) -> Result<String, String> {
    let mut options = options.clone();
    if let Some(raw) = extra_params.get("preset") {
        options.preset = raw.parse::<Preset>()?;
    }
    let show_spans = param_flag(extra_params, "show-spans", false);
    let pretty = param_flag(extra_params, "pretty", true);

    match transform_name {
        "events-json" => {
            let events = token_stream(source);
            let mut output = serde_json::to_string_pretty(&events_to_json(&events))
                .map_err(|e| format!("JSON serialization failed: {e}"))?;
            output.push('\n');
            Ok(output)
        }
        "events-debug" => {
            let events = token_stream(source);
            let mut output = String::new();
            for (event, range) in &events {
                if show_spans {
                    output.push_str(&format!("{}..{}  {event}\n", range.start, range.end));
                } else {
                    output.push_str(&format!("{event}\n"));
                }
            }
            Ok(output)
        }
        "adf-json" => {
            let conversion = convert_with_warnings(source, options)
                .map_err(|e| format!("Conversion failed: {e}"))?;
            let mut output = if pretty {
                conversion.document.to_json_pretty()
            } else {
                conversion.document.to_json()
            }
            .map_err(|e| format!("JSON serialization failed: {e}"))?;
            output.push('\n');
            Ok(output)
        }
        "warnings" => {
            let conversion = convert_with_warnings(source, options)
                .map_err(|e| format!("Conversion failed: {e}"))?;
            let mut output = String::new();
            for warning in &conversion.warnings {
                output.push_str(&format!("{warning}\n"));
            }
            Ok(output)
        }
        _ => Err(format!("Unknown transform: {transform_name}")),
    }
}

/// Convert spanned events to a JSON-serializable structure.
fn events_to_json(events: &[(String, std::ops::Range<usize>)]) -> serde_json::Value {
    use serde_json::json;

    json!(events
        .iter()
        .map(|(event, range)| {
            json!({
                "event": event,
                "start": range.start,
                "end": range.end,
            })
        })
        .collect::<Vec<_>>())
}

fn param_flag(params: &HashMap<String, String>, key: &str, default: bool) -> bool {
    match params.get(key).map(String::as_str) {
        Some("true") | Some("1") | Some("yes") => true,
        Some(_) => false,
        None => default,
    }
}
