//! Localized description text.
//!
//! Descriptions arrive either as a plain string (provider schema JSON) or as a
//! language map (a previously generated artifact). Both shapes are normalized
//! into [`LocalizedText`] at the boundary so the rest of the tree only ever
//! sees one representation.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Language tag of the primary (source) language.
pub const EN_US: &str = "en_us";

/// Language tag of the maintained translation.
pub const JA_JP: &str = "ja_jp";

/// A description with one string per language tag.
///
/// `en_us` and `ja_jp` always exist (possibly empty). Any additional tags a
/// maintainer added to an artifact are kept in `other`, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocalizedText {
    /// English text, regenerated from the schema and documentation.
    pub en_us: String,
    /// Japanese text, maintained by hand or by an external translation pass.
    pub ja_jp: String,
    /// Additional language tags carried through untouched.
    #[serde(flatten)]
    pub other: IndexMap<String, String>,
}

impl LocalizedText {
    /// Builds a description holding only English text.
    pub fn english(text: impl Into<String>) -> Self {
        Self {
            en_us: text.into(),
            ..Self::default()
        }
    }

    /// Normalizes a raw JSON description (string, language map, or null).
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(text) => Self::english(text.clone()),
            Value::Object(map) => Self::from_pairs(map.iter().map(|(tag, text)| {
                let text = match text {
                    Value::String(text) => text.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (tag.clone(), text)
            })),
            _ => Self::default(),
        }
    }

    fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut localized = Self::default();
        for (tag, text) in pairs {
            localized.set(&tag, text);
        }
        localized
    }

    /// Returns the text for a language tag, if that tag is known.
    pub fn get(&self, language: &str) -> Option<&str> {
        match language {
            EN_US => Some(self.en_us.as_str()),
            JA_JP => Some(self.ja_jp.as_str()),
            other => self.other.get(other).map(String::as_str),
        }
    }

    /// Replaces the text for a language tag.
    pub fn set(&mut self, language: &str, text: impl Into<String>) {
        let text = text.into();
        match language {
            EN_US => self.en_us = text,
            JA_JP => self.ja_jp = text,
            other => {
                self.other.insert(other.to_string(), text);
            }
        }
    }

    /// Iterates `(tag, text)` pairs, canonical tags first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let canonical: [(&str, &str); 2] = [(EN_US, self.en_us.as_str()), (JA_JP, self.ja_jp.as_str())];
        canonical
            .into_iter()
            .chain(self.other.iter().map(|(tag, text)| (tag.as_str(), text.as_str())))
    }

    /// True when every language tag is empty.
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, text)| text.is_empty())
    }
}

impl From<&str> for LocalizedText {
    fn from(text: &str) -> Self {
        Self::english(text)
    }
}

impl From<String> for LocalizedText {
    fn from(text: String) -> Self {
        Self::english(text)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLocalizedText {
    Plain(String),
    Map(IndexMap<String, Option<String>>),
}

impl<'de> Deserialize<'de> for LocalizedText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let localized = match Option::<RawLocalizedText>::deserialize(deserializer)? {
            None => Self::default(),
            Some(RawLocalizedText::Plain(text)) => Self::english(text),
            Some(RawLocalizedText::Map(map)) => {
                Self::from_pairs(map.into_iter().map(|(tag, text)| (tag, text.unwrap_or_default())))
            }
        };
        Ok(localized)
    }
}
