//! Bullet grammar shared by every extractor.
//!
//! An entry looks like ``* `name` - description`` where the separator may be a
//! hyphen, en dash, or em dash. The description runs until the next line that
//! starts a new entry (`\n*` followed by a back-quoted name) or until a blank
//! line, whichever comes first. Indented sub-bullets therefore stay part of
//! their parent's description.

use once_cell::sync::Lazy;
use regex::Regex;

static BULLET_HEAD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\s*`([^`]+)`\s*[-–—]\s*").expect("bullet head regex should compile"));

static BULLET_END_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\*\s*`|\n\n").expect("bullet end regex should compile"));

/// One parsed bullet, borrowing from the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BulletEntry<'a> {
    pub name: &'a str,
    pub description: &'a str,
}

/// Scans `text` for bullet entries in document order.
pub(crate) fn bullet_entries(text: &str) -> Vec<BulletEntry<'_>> {
    let mut entries = Vec::new();
    let mut cursor = 0;

    while let Some(head) = BULLET_HEAD_REGEX.captures_at(text, cursor) {
        let (Some(whole), Some(name)) = (head.get(0), head.get(1)) else {
            break;
        };
        let body_start = whole.end();
        // A description holds at least one character.
        let Some(first) = text[body_start..].chars().next() else {
            break;
        };
        let scan_from = body_start + first.len_utf8();
        let body_end = BULLET_END_REGEX
            .find_at(text, scan_from)
            .map_or(text.len(), |terminator| terminator.start());

        entries.push(BulletEntry {
            name: name.as_str().trim(),
            description: text[body_start..body_end].trim(),
        });
        cursor = body_end;
    }

    entries
}
