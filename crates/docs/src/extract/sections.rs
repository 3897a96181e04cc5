//! Section slicing: reference headings, heading anchors, block-supports
//! paragraphs and front matter.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static ARGUMENT_REFERENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)##\s*Arguments?\s*Reference\s*\n").expect("argument reference regex should compile")
});

static ATTRIBUTES_REFERENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)##\s*Attributes?\s*Reference\s*\n").expect("attributes reference regex should compile")
});

static HEADING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})[ \t]+(.+?)\s*$").expect("heading regex should compile"));

static ANCHOR_STRIP_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s-]").expect("anchor strip regex should compile"));

static ANCHOR_COLLAPSE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-\s]+").expect("anchor collapse regex should compile"));

static BLOCK_SUPPORTS_END_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\n(?:The|Each)\s+`[^`]+`\s+block\s+supports|\n##")
        .expect("block supports terminator regex should compile")
});

static FENCE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]{0,3}(```|~~~)").expect("code fence regex should compile"));

/// Heading levels whose text produces a link target.
const ANCHOR_LEVELS: std::ops::RangeInclusive<usize> = 3..=4;

/// Body of the "Argument(s) Reference" section, if present.
pub fn argument_reference_section(doc: &str) -> Option<&str> {
    reference_section(doc, &ARGUMENT_REFERENCE_REGEX)
}

/// Body of the "Attribute(s) Reference" section, if present.
pub fn attributes_reference_section(doc: &str) -> Option<&str> {
    reference_section(doc, &ATTRIBUTES_REFERENCE_REGEX)
}

// The body runs from the heading line to the next `##` (of any depth)
// outside a code fence.
fn reference_section<'a>(doc: &'a str, heading: &Regex) -> Option<&'a str> {
    let fences = fenced_ranges(doc);
    let start = heading
        .find_iter(doc)
        .find(|found| !in_fence(&fences, found.start()))?
        .end();
    let end = doc[start..]
        .match_indices("\n##")
        .map(|(offset, _)| start + offset)
        .find(|&offset| !in_fence(&fences, offset + 1))
        .unwrap_or(doc.len());
    Some(&doc[start..end])
}

/// Byte ranges of fenced code blocks, fence lines included. An unclosed
/// fence runs to the end of `text`.
fn fenced_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut open: Option<(usize, &str)> = None;
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if let Some(fence) = FENCE_REGEX.captures(line).and_then(|captures| captures.get(1)) {
            match open {
                Some((start, marker)) if marker == fence.as_str() => {
                    ranges.push(start..offset + line.len());
                    open = None;
                }
                Some(_) => {}
                None => open = Some((offset, fence.as_str())),
            }
        }
        offset += line.len();
    }
    if let Some((start, _)) = open {
        ranges.push(start..text.len());
    }
    ranges
}

fn in_fence(fences: &[Range<usize>], offset: usize) -> bool {
    fences.iter().any(|fence| fence.contains(&offset))
}

/// Link target generated for a heading: lowercase, punctuation removed,
/// whitespace and hyphen runs collapsed to one hyphen.
pub fn generate_anchor(heading: &str) -> String {
    let lowered = heading.trim().to_lowercase();
    let stripped = ANCHOR_STRIP_REGEX.replace_all(&lowered, "");
    ANCHOR_COLLAPSE_REGEX.replace_all(&stripped, "-").into_owned()
}

/// Returns the lines under the level-3/4 heading whose anchor equals
/// `anchor` (a leading `#` is ignored), up to the next heading of the same
/// or a shallower level. An unknown anchor yields an empty string.
pub fn extract_section_by_anchor(doc: &str, anchor: &str) -> String {
    let target = anchor.trim_start_matches('#');
    let fences = fenced_ranges(doc);
    let mut offset = 0;
    let lines: Vec<(&str, bool)> = doc
        .split('\n')
        .map(|line| {
            let fenced = in_fence(&fences, offset);
            offset += line.len() + 1;
            (line, fenced)
        })
        .collect();

    let Some((start, level)) = lines.iter().enumerate().find_map(|(index, &line)| {
        let (level, text) = heading(line)?;
        (ANCHOR_LEVELS.contains(&level) && generate_anchor(text) == target).then_some((index + 1, level))
    }) else {
        debug!(anchor = %anchor, "no heading matches anchor");
        return String::new();
    };

    let section: Vec<&str> = lines[start..]
        .iter()
        .take_while(|&&line| heading(line).is_none_or(|(next_level, _)| next_level > level))
        .map(|&(line, _)| line)
        .collect();
    section.join("\n")
}

// Headings inside a code fence are shell or HCL comments.
fn heading<'a>((line, fenced): (&'a str, bool)) -> Option<(usize, &'a str)> {
    if fenced {
        return None;
    }
    let captures = HEADING_REGEX.captures(line)?;
    let level = captures.get(1)?.as_str().len();
    Some((level, captures.get(2)?.as_str()))
}

/// Paragraph introduced by "The/Each `block` block supports ...:" inside
/// `section`, up to the next such sentence or heading. Matches inside code
/// fences are ignored.
pub fn block_supports_paragraph<'a>(section: &'a str, block_name: &str) -> Option<&'a str> {
    let pattern = format!(r"(?is)(?:The|Each)\s+`{}`\s+block\s+supports.*?:\s*\n", regex::escape(block_name));
    let intro = match Regex::new(&pattern) {
        Ok(regex) => regex,
        Err(error) => {
            debug!(block = %block_name, error = %error, "block supports pattern rejected");
            return None;
        }
    };
    let fences = fenced_ranges(section);
    let start = intro.find_iter(section).find(|found| !in_fence(&fences, found.start()))?.end();

    let mut from = start;
    let end = loop {
        match BLOCK_SUPPORTS_END_REGEX.find_at(section, from) {
            Some(terminator) if in_fence(&fences, terminator.start() + 1) => from = terminator.end(),
            Some(terminator) => break terminator.start(),
            None => break section.len(),
        }
    };
    Some(&section[start..end])
}

/// `description` value of a leading `---` front matter block.
pub fn front_matter_description(doc: &str) -> Option<String> {
    let body = doc.trim_start_matches('\u{feff}').strip_prefix("---")?;
    let body = body.strip_prefix("\r\n").or_else(|| body.strip_prefix('\n'))?;
    let end = body
        .match_indices("\n---")
        .map(|(offset, _)| offset)
        .next()
        .or_else(|| body.starts_with("---").then_some(0))?;
    let front_matter = &body[..end];

    match serde_yaml::from_str::<serde_yaml::Value>(front_matter) {
        Ok(value) => value
            .get("description")
            .and_then(serde_yaml::Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string),
        Err(error) => {
            debug!(error = %error, "front matter is not valid YAML");
            None
        }
    }
}
