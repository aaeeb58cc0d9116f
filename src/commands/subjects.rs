//! `subjects` command: lists the catalog grouped by category.

use anyhow::Result;
use pastpapers_core::projection::{available_exams, year_range};
use pastpapers_core::{AppState, Language, SubjectRecord, resolve};
use serde::Serialize;

use super::load_catalog;
use crate::app::config_runtime::RuntimeSettings;
use crate::cli::SubjectsArgs;

#[derive(Debug, Serialize)]
struct CategoryListing {
    category: &'static str,
    label: &'static str,
    subjects: Vec<SubjectListing>,
}

#[derive(Debug, Serialize)]
struct SubjectListing {
    key: String,
    name: String,
    name_zh: String,
    name_en: String,
    year_range: String,
    exams: Vec<String>,
}

impl SubjectListing {
    fn new(subject: &SubjectRecord, language: Language) -> Self {
        let meta = resolve(&subject.name);
        Self {
            key: subject.key.clone(),
            name: meta.name(language).to_string(),
            name_zh: meta.zh.to_string(),
            name_en: meta.en.to_string(),
            year_range: year_range(subject),
            exams: available_exams(subject)
                .into_iter()
                .map(|exam| exam.code().to_string())
                .collect(),
        }
    }
}

pub(crate) async fn run_subjects_command(
    args: &SubjectsArgs,
    settings: &RuntimeSettings,
) -> Result<()> {
    let state = load_catalog(settings).await?;
    let listings = build_listings(&state, args.language);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }

    if listings.is_empty() {
        println!("No subjects found.");
        return Ok(());
    }

    let key_width = listings
        .iter()
        .flat_map(|listing| &listing.subjects)
        .map(|subject| subject.key.chars().count())
        .max()
        .unwrap_or(0);
    for (index, listing) in listings.iter().enumerate() {
        if index > 0 {
            println!();
        }
        println!("{}", listing.label);
        for subject in &listing.subjects {
            println!(
                "  {:<key_width$}  {}  ({})",
                subject.key, subject.name, subject.year_range
            );
        }
    }
    Ok(())
}

/// Non-empty categories in display order.
fn build_listings(state: &AppState, language: Language) -> Vec<CategoryListing> {
    state
        .grouped()
        .iter()
        .filter(|(_, members)| !members.is_empty())
        .map(|(category, members)| CategoryListing {
            category: category.as_str(),
            label: category.label(language),
            subjects: members
                .iter()
                .map(|subject| SubjectListing::new(subject, language))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pastpapers_core::SubjectContent;

    fn state() -> AppState {
        AppState::with_subjects(vec![
            SubjectRecord::new("phy", "Physics", SubjectContent::Empty),
            SubjectRecord::new("chi", "Chinese Language", SubjectContent::Empty),
            SubjectRecord::new("music", "Music", SubjectContent::Empty),
        ])
    }

    #[test]
    fn test_build_listings_skips_empty_categories() {
        let listings = build_listings(&state(), Language::En);
        let categories: Vec<&str> = listings.iter().map(|listing| listing.category).collect();
        assert_eq!(categories, vec!["Core", "Science", "Others"]);
    }

    #[test]
    fn test_build_listings_uses_requested_language() {
        let listings = build_listings(&state(), Language::Zh);
        let science = listings
            .iter()
            .find(|listing| listing.category == "Science")
            .unwrap();
        assert_eq!(science.label, "理科");
        assert_eq!(science.subjects[0].name, "物理");
        assert_eq!(science.subjects[0].name_en, "Physics");
    }

    #[test]
    fn test_subject_listing_defaults_year_range() {
        let subject = SubjectRecord::new("phy", "Physics", SubjectContent::Empty);
        let listing = SubjectListing::new(&subject, Language::En);
        assert_eq!(listing.year_range, "1980-2025");
        assert_eq!(listing.exams, vec!["dse", "ce", "al"]);
    }
}
