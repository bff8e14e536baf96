//! Building an export session from command-line input
//!
//! Filters are written as `[and|or] <field> <operator> [value]`:
//!
//! ```text
//! --filter 'Q1 equals Open'
//! --filter 'or "Customer Name" contains ACME'
//! --filter 'and Hours not_exists'
//! ```
//!
//! Field ids containing spaces must be double-quoted. Values may be quoted too; the quotes are
//! removed.

use ftlgen_babel::{Connective, ExportSession, FilterCriterion, Operator};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

static FILTER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\s*(?:(?P<connective>(?i:and|or))\s+)?(?:"(?P<quoted>[^"]+)"|(?P<field>\S+))\s+(?P<operator>\w+)(?:\s+(?P<value>.*?))?\s*$"#,
    )
    .unwrap()
});

/// Parse one `--filter` expression.
pub fn parse_filter(text: &str) -> Result<FilterCriterion, String> {
    let captures = FILTER_REGEX.captures(text).ok_or_else(|| {
        format!(
            "Invalid filter '{}': expected '[and|or] <field> <operator> [value]'",
            text
        )
    })?;

    let field = captures
        .name("quoted")
        .or_else(|| captures.name("field"))
        .map(|m| m.as_str())
        .unwrap_or_default();

    let operator_name = &captures["operator"];
    let operator = Operator::ALL
        .into_iter()
        .find(|op| op.as_str().eq_ignore_ascii_case(operator_name))
        .ok_or_else(|| {
            let known: Vec<_> = Operator::ALL.iter().map(|op| op.as_str()).collect();
            format!(
                "Unknown operator '{}' (expected one of: {})",
                operator_name,
                known.join(", ")
            )
        })?;

    let value = captures
        .name("value")
        .map(|m| unquote(m.as_str()))
        .unwrap_or_default();

    let mut criterion = FilterCriterion::new(field, operator, value);
    if let Some(connective) = captures.name("connective") {
        criterion = criterion.with_connective(Connective::parse(connective.as_str()));
    }
    Ok(criterion)
}

/// Parse one `--map PATH=FIELD` binding.
pub fn parse_binding(text: &str) -> Result<(String, String), String> {
    match text.split_once('=') {
        Some((path, field)) if !path.trim().is_empty() && !field.trim().is_empty() => {
            Ok((path.trim().to_string(), field.trim().to_string()))
        }
        _ => Err(format!(
            "Invalid mapping '{}': expected PATH=FIELD",
            text
        )),
    }
}

/// A session read from disk.
#[derive(Debug)]
pub struct SavedSession {
    pub session: ExportSession,
    /// Whether the file names a `mode`; when it doesn't, the configured mode applies.
    pub has_mode: bool,
}

/// Read a saved session. `.yaml` / `.yml` files are YAML, anything else JSON.
pub fn load_session(path: &Path) -> Result<SavedSession, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read session file {}: {}", path.display(), e))?;
    let invalid = |e: String| format!("Invalid session file {}: {}", path.display(), e);

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let raw: serde_json::Value = if is_yaml {
        serde_yaml::from_str(&text).map_err(|e| invalid(e.to_string()))?
    } else {
        serde_json::from_str(&text).map_err(|e| invalid(e.to_string()))?
    };

    let has_mode = raw.get("mode").is_some_and(|mode| !mode.is_null());
    let session: ExportSession = serde_json::from_value(raw).map_err(|e| invalid(e.to_string()))?;
    Ok(SavedSession { session, has_mode })
}

fn unquote(value: &str) -> String {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
        .to_string()
}
