//! Subject, exam and file records as they appear in the paper index.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Examination system a paper belongs to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ExamKind {
    /// Hong Kong Diploma of Secondary Education.
    #[default]
    Dse,
    /// Hong Kong Certificate of Education Examination.
    Ce,
    /// Hong Kong Advanced Level Examination.
    Al,
}

impl ExamKind {
    /// All supported exam kinds in display order.
    pub const ALL: [ExamKind; 3] = [ExamKind::Dse, ExamKind::Ce, ExamKind::Al];

    /// Returns the lowercase code used in index keys and paper paths.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Dse => "dse",
            Self::Ce => "ce",
            Self::Al => "al",
        }
    }

    /// Returns the short public name of the examination.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Dse => "HKDSE",
            Self::Ce => "HKCEE",
            Self::Al => "HKALE",
        }
    }
}

impl fmt::Display for ExamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when an exam kind or language label is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {what} '{value}' (expected one of: {expected})")]
pub struct ParseLabelError {
    what: &'static str,
    value: String,
    expected: &'static str,
}

impl FromStr for ExamKind {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dse" | "hkdse" => Ok(Self::Dse),
            "ce" | "hkcee" => Ok(Self::Ce),
            "al" | "hkale" | "hkal" => Ok(Self::Al),
            _ => Err(ParseLabelError {
                what: "exam kind",
                value: s.to_string(),
                expected: "dse, ce, al",
            }),
        }
    }
}

/// Interface language, which also selects the paper language directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Traditional Chinese; papers live under `chi/`.
    #[default]
    Zh,
    /// English; papers live under `eng/`.
    En,
}

impl Language {
    /// Both languages in display order.
    pub const ALL: [Language; 2] = [Language::Zh, Language::En];

    /// Returns the paper language code (`chi` or `eng`).
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Zh => "chi",
            Self::En => "eng",
        }
    }

    /// Returns the interface language tag (`zh` or `en`).
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Zh => "zh",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zh" | "chi" => Ok(Self::Zh),
            "en" | "eng" => Ok(Self::En),
            _ => Err(ParseLabelError {
                what: "language",
                value: s.to_string(),
                expected: "zh, en, chi, eng",
            }),
        }
    }
}

/// Role of a file within a year's paper set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Paper,
    Marking,
    Report,
    Audio,
    #[serde(other)]
    Other,
}

/// A single downloadable file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    /// Site-relative location of the file.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub path: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FileKind>,
    /// Year label; older indexes write it as a bare number.
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<String>,
    /// Human-readable type, e.g. "Paper 1A" or "Marking Scheme".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_num: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl FileRecord {
    /// Creates a record with only a name and path.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: None,
            year: None,
            type_name: None,
            paper_num: None,
            size: None,
            sha256: None,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: FileKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }
}

/// Files available for one language of one year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageFiles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub files: Vec<FileRecord>,
}

/// One year of an exam, keyed by language code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearEntry {
    /// Label shown for the year; empty (or `null` on the wire) means "use the year key".
    #[serde(default, deserialize_with = "null_as_empty")]
    pub display: String,
    #[serde(default)]
    pub languages: BTreeMap<String, LanguageFiles>,
}

/// All years recorded for one exam kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub years: BTreeMap<String, YearEntry>,
}

/// Structured exam data keyed by exam code (`dse`, `ce`, `al`).
pub type ExamTree = BTreeMap<String, ExamSection>;

/// Inclusive range of numeric years recorded for an exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSpan {
    pub min: i32,
    pub max: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

/// The two index shapes a subject's files may arrive in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectContent {
    /// `exams` tree: exam → year → language → files.
    Structured(ExamTree),
    /// Flat `files` list; exam and language are inferred from each path.
    Flat(Vec<FileRecord>),
    /// Neither shape present.
    Empty,
}

/// A subject from the index document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SubjectWire", into = "SubjectWire")]
pub struct SubjectRecord {
    pub key: String,
    /// Raw subject label, resolved to a descriptor by [`crate::meta::resolve`].
    pub name: String,
    pub content: SubjectContent,
    pub years_summary: BTreeMap<String, YearSpan>,
}

impl SubjectRecord {
    /// Creates a subject with the given content and no year summary.
    #[must_use]
    pub fn new(key: impl Into<String>, name: impl Into<String>, content: SubjectContent) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            content,
            years_summary: BTreeMap::new(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct SubjectWire {
    #[serde(default, deserialize_with = "null_as_empty")]
    key: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exams: Option<ExamTree>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    files: Option<Vec<FileRecord>>,
    #[serde(
        default,
        alias = "yearsSummary",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    years_summary: BTreeMap<String, YearSpan>,
}

impl From<SubjectWire> for SubjectRecord {
    fn from(wire: SubjectWire) -> Self {
        // `exams` wins when a document carries both shapes.
        let content = match (wire.exams, wire.files) {
            (Some(exams), _) => SubjectContent::Structured(exams),
            (None, Some(files)) => SubjectContent::Flat(files),
            (None, None) => SubjectContent::Empty,
        };
        Self {
            key: wire.key,
            name: wire.name,
            content,
            years_summary: wire.years_summary,
        }
    }
}

impl From<SubjectRecord> for SubjectWire {
    fn from(record: SubjectRecord) -> Self {
        let (exams, files) = match record.content {
            SubjectContent::Structured(exams) => (Some(exams), None),
            SubjectContent::Flat(files) => (None, Some(files)),
            SubjectContent::Empty => (None, None),
        };
        Self {
            key: record.key,
            name: record.name,
            exams,
            files,
            years_summary: record.years_summary,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        Text(String),
        Integer(i64),
    }

    Ok(
        Option::<Label>::deserialize(deserializer)?.map(|label| match label {
            Label::Text(text) => text,
            Label::Integer(number) => number.to_string(),
        }),
    )
}
