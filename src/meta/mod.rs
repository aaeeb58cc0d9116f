//! Subject metadata resolution.
//!
//! Raw subject labels in the index are free-form ("Physics", "HKDSE Physics",
//! "Chinese History (Elective)"). [`resolve`] maps them onto a fixed table of
//! canonical subjects, each with bilingual display names, a category and an
//! icon. Matching is an ordered rule list evaluated in table order; the first
//! rule that fires wins.

mod table;

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::Language;
use table::SUBJECT_TABLE;

/// Catalog category a subject is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Core,
    Science,
    Commerce,
    Arts,
    Technology,
    Others,
}

impl Category {
    /// Categories present in grouped output, in display order.
    pub const GROUPED: [Category; 5] = [
        Category::Core,
        Category::Science,
        Category::Commerce,
        Category::Arts,
        Category::Others,
    ];

    /// Returns the localized category label.
    #[must_use]
    pub fn label(self, language: Language) -> &'static str {
        match (language, self) {
            (Language::Zh, Self::Core) => "必修",
            (Language::Zh, Self::Science) => "理科",
            (Language::Zh, Self::Commerce) => "商科",
            (Language::Zh, Self::Arts) => "文科",
            (Language::Zh, Self::Technology) => "科技",
            (Language::Zh, Self::Others) => "其他",
            (Language::En, other) => other.as_str(),
        }
    }

    /// Returns the stable English identifier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Core => "Core",
            Self::Science => "Science",
            Self::Commerce => "Commerce",
            Self::Arts => "Arts",
            Self::Technology => "Technology",
            Self::Others => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display descriptor for a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectMeta {
    pub zh: Cow<'static, str>,
    pub en: Cow<'static, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_key: Option<&'static str>,
    pub category: Category,
    pub icon: &'static str,
}

impl SubjectMeta {
    /// Descriptor for a subject with no table entry.
    #[must_use]
    pub fn fallback(raw_name: &str) -> Self {
        Self {
            zh: Cow::Owned(raw_name.to_string()),
            en: Cow::Owned(raw_name.to_string()),
            display_key: None,
            category: Category::Others,
            icon: "folder",
        }
    }

    /// Returns the display name for the given interface language.
    #[must_use]
    pub fn name(&self, language: Language) -> &str {
        match language {
            Language::Zh => &self.zh,
            Language::En => &self.en,
        }
    }
}

/// Resolves a raw subject label to its descriptor.
///
/// Rules, in order:
/// 1. exact table key;
/// 2. first table key contained in `raw_name` that covers at least 60% of
///    its length or appears as a space-delimited word;
/// 3. a fallback descriptor in [`Category::Others`].
#[must_use]
pub fn resolve(raw_name: &str) -> SubjectMeta {
    if let Some((_, meta)) = SUBJECT_TABLE.iter().find(|(key, _)| *key == raw_name) {
        return meta.clone();
    }

    SUBJECT_TABLE
        .iter()
        .find(|(key, _)| is_confident_match(raw_name, key))
        .map_or_else(|| SubjectMeta::fallback(raw_name), |(_, meta)| meta.clone())
}

/// Returns the canonical table key a raw label sorts under.
///
/// Unlike [`resolve`], any contained key qualifies; this is the key used to
/// position a subject inside its category's manual order list.
#[must_use]
pub fn canonical_name(raw_name: &str) -> Option<&'static str> {
    SUBJECT_TABLE
        .iter()
        .map(|(key, _)| *key)
        .find(|key| raw_name == *key || raw_name.contains(key))
}

/// Iterates the canonical table in match-priority order.
pub fn meta_table() -> impl Iterator<Item = (&'static str, &'static SubjectMeta)> {
    SUBJECT_TABLE.iter().map(|(key, meta)| (*key, meta))
}

fn is_confident_match(raw_name: &str, key: &str) -> bool {
    if raw_name == key {
        return true;
    }
    if !raw_name.contains(key) {
        return false;
    }
    // key length >= 60% of the raw label, in characters
    let key_len = key.chars().count();
    let name_len = raw_name.chars().count();
    key_len * 5 >= name_len * 3
        || raw_name.contains(&format!("{key} "))
        || raw_name.contains(&format!(" {key}"))
}
