//! Resolves a subject argument (key, raw name or display name) to an index record.
//!
//! Keys win over names. When nothing matches exactly, the error lists the
//! closest fuzzy candidates.

use anyhow::{Result, bail};
use pastpapers_core::{SubjectRecord, resolve};

/// Candidates at or above this similarity are offered as suggestions.
pub(crate) const SUGGESTION_THRESHOLD: f64 = 0.6;

const MAX_SUGGESTIONS: usize = 3;

pub(crate) fn find_subject<'a>(
    subjects: &'a [SubjectRecord],
    query: &str,
) -> Result<&'a SubjectRecord> {
    let query_norm = normalize_lookup_text(query);
    if query_norm.is_empty() {
        bail!("Subject name must not be empty");
    }

    if let Some(subject) = subjects
        .iter()
        .find(|subject| normalize_lookup_text(&subject.key) == query_norm)
    {
        return Ok(subject);
    }

    if let Some(subject) = subjects.iter().find(|subject| {
        lookup_names(subject)
            .iter()
            .any(|name| normalize_lookup_text(name) == query_norm)
    }) {
        return Ok(subject);
    }

    let suggestions = suggest_subjects(subjects, &query_norm);
    if suggestions.is_empty() {
        bail!("Unknown subject '{query}'. Run `pastpapers subjects` to list available subjects");
    }
    bail!(
        "Unknown subject '{query}'. Did you mean: {}?",
        suggestions.join(", ")
    );
}

/// Subject keys ranked by best similarity across key and names.
fn suggest_subjects(subjects: &[SubjectRecord], query_norm: &str) -> Vec<String> {
    let mut scored: Vec<(f64, &str)> = subjects
        .iter()
        .filter_map(|subject| {
            let best = std::iter::once(subject.key.clone())
                .chain(lookup_names(subject))
                .map(|candidate| {
                    strsim::normalized_levenshtein(query_norm, &normalize_lookup_text(&candidate))
                })
                .fold(0.0_f64, f64::max);
            (best >= SUGGESTION_THRESHOLD).then_some((best, subject.key.as_str()))
        })
        .collect();

    scored.sort_by(|left, right| {
        right
            .0
            .partial_cmp(&left.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| left.1.cmp(right.1))
    });
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, key)| key.to_string())
        .collect()
}

fn lookup_names(subject: &SubjectRecord) -> Vec<String> {
    let meta = resolve(&subject.name);
    vec![subject.name.clone(), meta.zh.into_owned(), meta.en.into_owned()]
}

fn normalize_lookup_text(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
