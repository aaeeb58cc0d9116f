//! Availability checks and display labels derived from subject data.

use crate::catalog::{ExamKind, Language, SubjectContent, SubjectRecord};

/// Year range shown when a subject has no DSE or CE summary.
pub const DEFAULT_YEAR_RANGE: &str = "1980-2025";

// first match wins; mock-paper patterns precede the generic paper numbers
const SHORT_NAME_SHORTCUTS: [(&str, &str); 9] = [
    ("mock ms1", "ans1"),
    ("mock ms2", "ans2"),
    ("mock ms", "ans"),
    ("mock p1", "p1"),
    ("mock p2", "p2"),
    ("mock p3", "p3"),
    ("paper 1", "p1"),
    ("paper 2", "p2"),
    ("paper 3", "p3"),
];

/// Exam kinds for which the subject has at least one file.
///
/// Falls back to every exam kind when nothing qualifies, so a selection is
/// always possible.
#[must_use]
pub fn available_exams(subject: &SubjectRecord) -> Vec<ExamKind> {
    let available: Vec<ExamKind> = match &subject.content {
        SubjectContent::Structured(exams) => ExamKind::ALL
            .into_iter()
            .filter(|exam| {
                exams.get(exam.code()).is_some_and(|section| {
                    section.years.values().any(|year| {
                        year.languages
                            .values()
                            .any(|language| !language.files.is_empty())
                    })
                })
            })
            .collect(),
        SubjectContent::Flat(files) => ExamKind::ALL
            .into_iter()
            .filter(|exam| {
                let segment = format!("/{}/", exam.code());
                files
                    .iter()
                    .any(|file| file.path.to_lowercase().contains(&segment))
            })
            .collect(),
        SubjectContent::Empty => Vec::new(),
    };

    if available.is_empty() {
        ExamKind::ALL.to_vec()
    } else {
        available
    }
}

/// Languages with files for the given exam kind, defaulting to both.
///
/// Structured subjects only count years that carry the language explicitly;
/// flat subjects only check the language segment of each path.
#[must_use]
pub fn available_languages(subject: &SubjectRecord, exam: ExamKind) -> Vec<Language> {
    let available: Vec<Language> = match &subject.content {
        SubjectContent::Structured(exams) => match exams.get(exam.code()) {
            Some(section) => Language::ALL
                .into_iter()
                .filter(|language| {
                    section.years.values().any(|year| {
                        year.languages
                            .get(language.code())
                            .is_some_and(|entry| !entry.files.is_empty())
                    })
                })
                .collect(),
            None => Vec::new(),
        },
        SubjectContent::Flat(files) => Language::ALL
            .into_iter()
            .filter(|language| {
                let segment = format!("/{}/", language.code());
                files
                    .iter()
                    .any(|file| file.path.to_lowercase().contains(&segment))
            })
            .collect(),
        SubjectContent::Empty => Vec::new(),
    };

    if available.is_empty() {
        Language::ALL.to_vec()
    } else {
        available
    }
}

/// Returns the `min-max` year range from the DSE summary, else CE.
#[must_use]
pub fn year_range(subject: &SubjectRecord) -> String {
    [ExamKind::Dse, ExamKind::Ce]
        .into_iter()
        .find_map(|exam| subject.years_summary.get(exam.code()))
        .map_or_else(
            || DEFAULT_YEAR_RANGE.to_string(),
            |span| format!("{}-{}", span.min, span.max),
        )
}

/// Short label for a file, e.g. `p1`, `ans`, `ans2`.
#[must_use]
pub fn short_file_name(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let lowered = name.to_lowercase();

    if let Some((_, short)) = SHORT_NAME_SHORTCUTS
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
    {
        return (*short).to_string();
    }

    let last = name.rsplit('_').next().unwrap_or(name);
    let stem_len = last.len().saturating_sub(4);
    if last.len() >= 4
        && last.is_char_boundary(stem_len)
        && last[stem_len..].eq_ignore_ascii_case(".pdf")
    {
        last[..stem_len].to_string()
    } else {
        last.to_string()
    }
}

/// Compact year label: `SP` for sample papers, `PP` for practice papers.
#[must_use]
pub fn format_year_label(year: &str) -> String {
    let lowered = year.to_lowercase();
    if lowered.contains("sample") {
        "SP".to_string()
    } else if lowered.contains("practice") {
        "PP".to_string()
    } else {
        year.to_string()
    }
}

/// Returns a root-relative path for a file, or `/#` when it has none.
#[must_use]
pub fn resolve_file_path(path: &str) -> String {
    if path.is_empty() {
        "/#".to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
