//! Value phrasings recovered from a single attribute description.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Default-value phrasings, tried in order; the first hit wins.
static DEFAULT_VALUE_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"[Dd]efaults?\s+to\s+[`'"]?([^`'".,\s]+)[`'"]?"#,
        r#"[Dd]efault:\s*[`'"]?([^`'".,\s]+)[`'"]?"#,
        r#"[Dd]efault\s+is\s+[`'"]?([^`'".,\s]+)[`'"]?"#,
        r#"[Dd]efault\s+value\s+is\s+[`'"]?([^`'".,\s]+)[`'"]?"#,
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("default value regex should compile"))
    .collect()
});

/// Enumerated-value phrasings in priority order. Only the first matching
/// phrasing contributes values.
static POSSIBLE_VALUES_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"[Vv]alid\s+values?\s+(?:are|is|include)[\s:]+(.+?)(?:[.!]|\n|$)",
        r"[Pp]ossible\s+values?[\s:]+(.+?)(?:[.!]|\n|$)",
        r"[Mm]ust\s+be\s+one\s+of[\s:]+(.+?)(?:[.!]|\n|$)",
        r"[Mm]ay\s+be\s+one\s+of[\s:]+(.+?)(?:[.!]|\n|$)",
        r"[Cc]an\s+be\s+one\s+of[\s:]+(.+?)(?:[.!]|\n|$)",
        r"[Oo]ne\s+of[\s:]+(.+?)(?:[.!]|\n|$)",
        r"[Aa]ccepts?[\s:]+(.+?)(?:[.!]|\n|$)",
        r"[Aa]llowed\s+values?[\s:]+(.+?)(?:[.!]|\n|$)",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("possible values regex should compile"))
    .collect()
});

static BACKQUOTED_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").expect("backquote regex should compile"));

static LEADING_CONJUNCTION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:and|or)\s+").expect("conjunction regex should compile"));

static REQUIRED_MARKER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\(required\)").expect("required marker regex should compile"));

static OPTIONAL_MARKER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\(optional\)").expect("optional marker regex should compile"));

/// Recovers a default value from phrasings such as "Defaults to `gp3`".
///
/// `true`/`false` become booleans, all-digit tokens become integers, and
/// `null`/`nil`/`none` mean "no default".
pub fn extract_default_value(text: &str) -> Option<Value> {
    let token = DEFAULT_VALUE_REGEXES
        .iter()
        .find_map(|regex| regex.captures(text))
        .and_then(|captures| captures.get(1))?
        .as_str();
    coerce_literal(token)
}

fn coerce_literal(token: &str) -> Option<Value> {
    match token.to_lowercase().as_str() {
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        "null" | "nil" | "none" => None,
        _ if token.chars().all(|c| c.is_ascii_digit()) => match token.parse::<u64>() {
            Ok(number) => Some(Value::from(number)),
            Err(_) => Some(Value::String(token.to_string())),
        },
        _ => Some(Value::String(token.to_string())),
    }
}

/// Recovers enumerated values from phrasings such as
/// "Valid values are `a`, `b`, and `c`".
///
/// Back-quoted tokens are preferred; otherwise the matched tail is split on
/// commas. Duplicates are dropped, first occurrence kept.
pub fn extract_possible_values(text: &str) -> Vec<String> {
    let Some(tail) = POSSIBLE_VALUES_REGEXES
        .iter()
        .find_map(|regex| regex.captures(text))
        .and_then(|captures| captures.get(1))
    else {
        return Vec::new();
    };
    let tail = tail.as_str();

    let mut values: Vec<String> = BACKQUOTED_REGEX
        .captures_iter(tail)
        .map(|captures| captures[1].to_string())
        .collect();

    if values.is_empty() {
        values = tail.split(',').map(|value| value.trim().to_string()).collect();
        if let Some(last) = values.last_mut() {
            *last = LEADING_CONJUNCTION_REGEX.replace(last, "").trim().to_string();
        }
        values.retain(|value| !value.is_empty());
    }

    let mut unique: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !unique.contains(&value) {
            unique.push(value);
        }
    }
    unique
}

/// Literal `(Required)` / `(Optional)` markers in a description.
pub fn extract_requirement_markers(text: &str) -> (bool, bool) {
    (REQUIRED_MARKER_REGEX.is_match(text), OPTIONAL_MARKER_REGEX.is_match(text))
}
