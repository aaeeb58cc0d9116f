//! Application state: the loaded catalog plus the user's current selection.
//!
//! All mutation goes through `&mut self`. Fallible actions never propagate
//! past this boundary; load failures land in [`AppState::error`] and archive
//! failures in [`AppState::alert`].

use tracing::{debug, warn};

use crate::archive::{ArchiveBuilder, ArchiveError, ArchiveOutcome};
use crate::catalog::{ExamKind, Language, SubjectRecord};
use crate::grouping::{self, GroupedSubjects};
use crate::projection::{self, ProjectedYear};
use crate::source::{IndexSource, LoadError};

/// Message shown when archive support is missing.
pub const ARCHIVE_UNAVAILABLE_ALERT: &str =
    "Archive support is unavailable; cannot bundle downloads";

/// Message shown when building or saving an archive fails.
pub const ARCHIVE_FAILED_ALERT: &str = "Bundling the download failed, please try again later";

/// An archive build started by [`AppState::begin_download`].
#[derive(Debug, Clone)]
#[must_use = "hand the result of `run` to `AppState::finish_download`"]
pub struct PendingDownload {
    subject_key: Option<String>,
    year: ProjectedYear,
}

impl PendingDownload {
    #[must_use]
    pub fn year(&self) -> &str {
        &self.year.year
    }

    /// Runs the build. Does not touch the state.
    ///
    /// # Errors
    ///
    /// Returns the builder's [`ArchiveError`] for whole-operation failures.
    pub async fn run(&self, builder: &ArchiveBuilder) -> Result<ArchiveOutcome, ArchiveError> {
        builder
            .build_archive(self.subject_key.as_deref(), &self.year)
            .await
    }
}

/// Catalog and selection state.
#[derive(Debug)]
pub struct AppState {
    subjects: Vec<SubjectRecord>,
    current_subject: Option<String>,
    exam: ExamKind,
    language: Language,
    loading: bool,
    error: Option<String>,
    alert: Option<String>,
    downloading_year: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates an empty state with the default exam (DSE) and language (zh).
    #[must_use]
    pub fn new() -> Self {
        Self {
            subjects: Vec::new(),
            current_subject: None,
            exam: ExamKind::default(),
            language: Language::default(),
            loading: false,
            error: None,
            alert: None,
            downloading_year: None,
        }
    }

    /// Creates a state already holding `subjects`.
    #[must_use]
    pub fn with_subjects(subjects: Vec<SubjectRecord>) -> Self {
        Self {
            subjects,
            ..Self::new()
        }
    }

    /// Loads the subject list from `source`.
    ///
    /// The list is replaced only on success. On failure the previous list is
    /// kept and [`AppState::error`] describes what went wrong.
    pub async fn load_data(&mut self, source: &dyn IndexSource) {
        self.loading = true;
        self.error = None;

        match source.load().await {
            Ok(subjects) => {
                debug!(count = subjects.len(), "subject list replaced");
                self.subjects = subjects;
            }
            Err(error) => {
                warn!(error = %error, "index load failed");
                self.error = Some(load_error_message(&error));
            }
        }

        self.loading = false;
    }

    /// Selects a subject by key, resetting exam and language to defaults.
    ///
    /// Returns `false` and leaves the state untouched for an unknown key.
    pub fn select_subject(&mut self, key: &str) -> bool {
        if !self.subjects.iter().any(|subject| subject.key == key) {
            return false;
        }
        self.current_subject = Some(key.to_string());
        self.exam = ExamKind::default();
        self.language = Language::default();
        true
    }

    /// Switches the exam kind. Returns whether anything changed.
    pub fn switch_exam(&mut self, exam: ExamKind) -> bool {
        let changed = self.exam != exam;
        self.exam = exam;
        changed
    }

    /// Switches the language. Returns whether anything changed.
    pub fn switch_language(&mut self, language: Language) -> bool {
        let changed = self.language != language;
        self.language = language;
        changed
    }

    /// Clears the subject selection.
    pub fn go_home(&mut self) {
        self.current_subject = None;
    }

    #[must_use]
    pub fn grouped(&self) -> GroupedSubjects<'_> {
        grouping::group(&self.subjects)
    }

    #[must_use]
    pub fn display_list(&self) -> Vec<&SubjectRecord> {
        grouping::display_list(&self.subjects)
    }

    /// Years and files of the selected subject for the current exam and
    /// language; empty when nothing is selected.
    #[must_use]
    pub fn sorted_years(&self) -> Vec<ProjectedYear> {
        self.current_subject()
            .map(|subject| projection::project(subject, self.exam, self.language))
            .unwrap_or_default()
    }

    /// Marks `year` as downloading and detaches the build from the state,
    /// so [`AppState::downloading_year`] is observable while it runs.
    ///
    /// Returns `None` when the same year is already in flight. A different
    /// year may start while another is running; the marker then tracks the
    /// latest one.
    pub fn begin_download(&mut self, year: &ProjectedYear) -> Option<PendingDownload> {
        if self.downloading_year.as_deref() == Some(year.year.as_str()) {
            debug!(year = %year.year, "download already in flight");
            return None;
        }
        self.downloading_year = Some(year.year.clone());
        Some(PendingDownload {
            subject_key: self.current_subject.clone(),
            year: year.clone(),
        })
    }

    /// Clears the downloading marker and records the build result.
    ///
    /// Whole-operation failures set [`AppState::alert`] and return `None`.
    pub fn finish_download(
        &mut self,
        pending: PendingDownload,
        result: Result<ArchiveOutcome, ArchiveError>,
    ) -> Option<ArchiveOutcome> {
        let PendingDownload { year, .. } = pending;
        self.downloading_year = None;
        match result {
            Ok(outcome) => Some(outcome),
            Err(error) => {
                warn!(error = %error, year = %year.year, "archive build failed");
                self.alert = Some(archive_alert(&error).to_string());
                None
            }
        }
    }

    /// Bundles one projected year through `builder`: begin, run, finish.
    pub async fn download_year(
        &mut self,
        builder: &ArchiveBuilder,
        year: &ProjectedYear,
    ) -> Option<ArchiveOutcome> {
        let pending = self.begin_download(year)?;
        let result = pending.run(builder).await;
        self.finish_download(pending, result)
    }

    #[must_use]
    pub fn subjects(&self) -> &[SubjectRecord] {
        &self.subjects
    }

    #[must_use]
    pub fn current_subject(&self) -> Option<&SubjectRecord> {
        let key = self.current_subject.as_deref()?;
        self.subjects.iter().find(|subject| subject.key == key)
    }

    #[must_use]
    pub fn exam(&self) -> ExamKind {
        self.exam
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Takes the pending alert, leaving none.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    #[must_use]
    pub fn downloading_year(&self) -> Option<&str> {
        self.downloading_year.as_deref()
    }
}

/// A file-protocol failure is already user-facing guidance; everything else
/// gets the fetch prefix.
fn load_error_message(error: &LoadError) -> String {
    match error {
        LoadError::ProtocolUnsupported { .. } => error.to_string(),
        other => format!("Failed to fetch index.json: {other}"),
    }
}

fn archive_alert(error: &ArchiveError) -> &'static str {
    match error {
        ArchiveError::CapabilityUnavailable { .. } => ARCHIVE_UNAVAILABLE_ALERT,
        ArchiveError::ArchiveFailure { .. } => ARCHIVE_FAILED_ALERT,
    }
}
