//! Year and file projection for a subject/exam/language selection.
//!
//! [`project`] turns either index shape into the same display list: one
//! [`ProjectedYear`] per year label, years ordered newest first with
//! specimen/practice papers last, files ordered by paper part.

mod labels;
mod order;

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::catalog::{ExamKind, ExamTree, FileRecord, Language, SubjectContent, SubjectRecord};

pub use labels::{
    DEFAULT_YEAR_RANGE, available_exams, available_languages, format_year_label,
    resolve_file_path, short_file_name, year_range,
};
pub use order::{UNRANKED_WEIGHT, compare_files, compare_years, file_weight, is_special_year};

/// Year label used for flat-list files that carry no year.
pub const UNKNOWN_YEAR: &str = "Unknown";

/// One year's files, ready for display or bundling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedYear {
    pub year: String,
    pub files: Vec<FileRecord>,
}

/// Computes the ordered year list for a subject, exam kind and language.
#[must_use]
#[instrument(level = "debug", skip(subject), fields(subject = %subject.key))]
pub fn project(subject: &SubjectRecord, exam: ExamKind, language: Language) -> Vec<ProjectedYear> {
    let years = match &subject.content {
        SubjectContent::Structured(exams) => collect_structured(exams, exam, language),
        SubjectContent::Flat(files) => collect_flat(files, exam, language),
        SubjectContent::Empty => BTreeMap::new(),
    };

    let mut projected: Vec<ProjectedYear> = years
        .into_iter()
        .map(|(year, mut files)| {
            files.sort_by(compare_files);
            ProjectedYear { year, files }
        })
        .collect();
    projected.sort_by(|a, b| compare_years(&a.year, &b.year));

    debug!(years = projected.len(), "projected subject years");
    projected
}

fn collect_structured(
    exams: &ExamTree,
    exam: ExamKind,
    language: Language,
) -> BTreeMap<String, Vec<FileRecord>> {
    let mut years: BTreeMap<String, Vec<FileRecord>> = BTreeMap::new();
    let Some(section) = exams.get(exam.code()) else {
        return years;
    };

    for (year_key, entry) in &section.years {
        let selected = entry.languages.get(language.code()).or_else(|| {
            // a year scanned in only one language is shown for both
            if entry.languages.len() == 1 {
                entry.languages.values().next()
            } else {
                None
            }
        });
        let Some(selected) = selected else {
            continue;
        };

        let label = if entry.display.is_empty() {
            year_key.clone()
        } else {
            entry.display.clone()
        };
        let bucket = years.entry(label.clone()).or_default();
        bucket.extend(
            selected
                .files
                .iter()
                .map(|file| file.clone().with_year(label.clone())),
        );
    }
    years
}

fn collect_flat(
    files: &[FileRecord],
    exam: ExamKind,
    language: Language,
) -> BTreeMap<String, Vec<FileRecord>> {
    let exam_segment = format!("/{}/", exam.code());
    let language_segment = format!("/{}/", language.code());

    let mut years: BTreeMap<String, Vec<FileRecord>> = BTreeMap::new();
    for file in files {
        let path = file.path.to_lowercase();
        if !path.contains(&exam_segment) || !path.contains(&language_segment) {
            continue;
        }
        let year = file
            .year
            .clone()
            .unwrap_or_else(|| UNKNOWN_YEAR.to_string());
        years.entry(year).or_default().push(file.clone());
    }
    years
}
