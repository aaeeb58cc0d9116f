//! `years` command: shows one subject's years and files.

use anyhow::Result;
use pastpapers_core::projection::{
    available_exams, available_languages, format_year_label, resolve_file_path, short_file_name,
};
use pastpapers_core::{AppState, ExamKind, Language, ProjectedYear, resolve};
use serde::Serialize;

use super::load_catalog;
use crate::app::config_runtime::RuntimeSettings;
use crate::app::subject_lookup::find_subject;
use crate::cli::YearsArgs;

#[derive(Debug, Serialize)]
struct YearsReport {
    subject: String,
    name: String,
    exam: ExamKind,
    language: Language,
    available_exams: Vec<ExamKind>,
    available_languages: Vec<Language>,
    years: Vec<YearListing>,
}

#[derive(Debug, Serialize)]
struct YearListing {
    year: String,
    label: String,
    files: Vec<FileListing>,
}

#[derive(Debug, Serialize)]
struct FileListing {
    name: String,
    short_name: String,
    path: String,
}

impl From<ProjectedYear> for YearListing {
    fn from(year: ProjectedYear) -> Self {
        Self {
            label: format_year_label(&year.year),
            files: year
                .files
                .into_iter()
                .map(|file| FileListing {
                    short_name: short_file_name(&file.name),
                    path: resolve_file_path(&file.path),
                    name: file.name,
                })
                .collect(),
            year: year.year,
        }
    }
}

pub(crate) async fn run_years_command(args: &YearsArgs, settings: &RuntimeSettings) -> Result<()> {
    let mut state = load_catalog(settings).await?;
    let key = find_subject(state.subjects(), &args.subject)?.key.clone();
    let report = build_report(&mut state, &key, args.exam, args.language);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} [{}] {} / {}",
        report.name,
        report.subject,
        report.exam.display_name(),
        report.language
    );
    println!(
        "exams: {}  languages: {}",
        join_labels(&report.available_exams),
        join_labels(&report.available_languages)
    );

    if report.years.is_empty() {
        println!("No papers for this exam and language.");
        return Ok(());
    }

    for year in &report.years {
        println!();
        println!("{}", year.label);
        for file in &year.files {
            println!("  {:<6} {}", file.short_name, file.path);
        }
    }
    Ok(())
}

fn build_report(
    state: &mut AppState,
    key: &str,
    exam: ExamKind,
    language: Language,
) -> YearsReport {
    state.select_subject(key);
    state.switch_exam(exam);
    state.switch_language(language);

    let (name, exams, languages) = state.current_subject().map_or_else(
        || (key.to_string(), Vec::new(), Vec::new()),
        |subject| {
            (
                resolve(&subject.name).name(language).to_string(),
                available_exams(subject),
                available_languages(subject, exam),
            )
        },
    );

    YearsReport {
        subject: key.to_string(),
        name,
        exam,
        language,
        available_exams: exams,
        available_languages: languages,
        years: state.sorted_years().into_iter().map(YearListing::from).collect(),
    }
}

fn join_labels<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
