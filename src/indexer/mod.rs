//! Builds the index document from a paper tree on disk.
//!
//! The tree is laid out as `{root}/{subject}/{exam}/{lang}/{year}/{file}`.
//! Output is deterministic: subjects, exams and years are keyed maps, and
//! directory entries are visited in name order.

mod tables;

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::catalog::{
    ExamSection, ExamTree, FileRecord, LanguageFiles, SubjectContent, SubjectRecord, YearEntry,
    YearSpan,
};
use crate::meta::Category;

/// Errors from building or writing an index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The paper tree root does not exist or is not a directory.
    #[error("paper directory not found: {path}")]
    MissingRoot { path: PathBuf },

    /// A file or directory could not be read or written.
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A paper lies outside the configured site root.
    #[error("{path} is not inside site root {site_root}")]
    OutsideSiteRoot { path: PathBuf, site_root: PathBuf },

    #[error("failed to serialize index: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}

impl IndexError {
    fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Indexer settings.
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    /// Directory file paths are made relative to; defaults to the parent of
    /// the paper root.
    pub site_root: Option<PathBuf>,
}

/// A subject with indexer-computed extras.
#[derive(Debug, Clone, Serialize)]
pub struct IndexedSubject {
    #[serde(flatten)]
    pub record: SubjectRecord,
    pub name_zh: String,
    pub category: Category,
    pub file_count: u64,
    pub total_size: u64,
}

/// File totals across the whole tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub total_files: u64,
    pub total_size: u64,
    pub by_exam_type: BTreeMap<String, u64>,
    pub by_category: BTreeMap<String, u64>,
    pub by_subject: BTreeMap<String, u64>,
    pub by_year: BTreeMap<String, u64>,
}

/// Subject keys listed under one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryIndex {
    pub name: Category,
    pub name_zh: String,
    pub subjects: Vec<String>,
}

/// A known examination system and its nominal year range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamTypeInfo {
    pub key: String,
    pub name: String,
    pub full_name: String,
    pub year_range: (i32, i32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageInfo {
    pub key: String,
    pub name: String,
    pub name_zh: String,
}

/// The generated index document.
///
/// Serializes as `{ subjects, categories, exam_types, languages, stats }`.
#[derive(Debug, Clone, Serialize)]
pub struct IndexDocument {
    pub subjects: Vec<IndexedSubject>,
    /// Non-empty categories in display order.
    pub categories: Vec<CategoryIndex>,
    pub exam_types: Vec<ExamTypeInfo>,
    pub languages: Vec<LanguageInfo>,
    pub stats: IndexStats,
}

/// File name of the stats document written next to the index.
pub const STATS_FILE: &str = "stats.json";

/// Directory, next to the index, holding one `{key}.json` per subject.
pub const SUBJECTS_DIR: &str = "subjects";

impl IndexDocument {
    /// Serializes as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String, IndexError> {
        serde_json::to_string_pretty(self).map_err(|source| IndexError::Serialize { source })
    }

    /// Writes the document to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Io`] when the file cannot be written.
    pub fn write_to(&self, path: &Path) -> Result<(), IndexError> {
        write_json(path, self)
    }

    /// Writes the index to `index_path`, plus [`STATS_FILE`] and one
    /// `subjects/{key}.json` per subject in the same directory.
    ///
    /// Returns every path written, index first.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Io`] when any file cannot be written.
    pub fn write_site_data(&self, index_path: &Path) -> Result<Vec<PathBuf>, IndexError> {
        let data_dir = index_path.parent().unwrap_or_else(|| Path::new(""));
        let mut written = Vec::with_capacity(self.subjects.len() + 2);

        self.write_to(index_path)?;
        written.push(index_path.to_path_buf());

        let stats_path = data_dir.join(STATS_FILE);
        write_json(&stats_path, &self.stats)?;
        written.push(stats_path);

        let subjects_dir = data_dir.join(SUBJECTS_DIR);
        for subject in &self.subjects {
            let subject_path = subjects_dir.join(format!("{}.json", subject.record.key));
            write_json(&subject_path, subject)?;
            written.push(subject_path);
        }
        debug!(files = written.len(), dir = %data_dir.display(), "site data written");
        Ok(written)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), IndexError> {
    let json =
        serde_json::to_string_pretty(value).map_err(|source| IndexError::Serialize { source })?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| IndexError::io(parent, source))?;
    }
    fs::write(path, json).map_err(|source| IndexError::io(path, source))
}

/// Walks `root` and builds the index document.
///
/// # Errors
///
/// - [`IndexError::MissingRoot`] when `root` is not a directory
/// - [`IndexError::Io`] when a directory or file cannot be read
/// - [`IndexError::OutsideSiteRoot`] when a paper is not under the site root
#[instrument(skip(options), fields(root = %root.display()))]
pub fn build_index(root: &Path, options: &IndexOptions) -> Result<IndexDocument, IndexError> {
    if !root.is_dir() {
        return Err(IndexError::MissingRoot {
            path: root.to_path_buf(),
        });
    }
    let root = fs::canonicalize(root).map_err(|source| IndexError::io(root, source))?;
    let site_root = match &options.site_root {
        Some(site_root) => {
            fs::canonicalize(site_root).map_err(|source| IndexError::io(site_root, source))?
        }
        None => root.parent().unwrap_or(&root).to_path_buf(),
    };

    let mut walker = Walker {
        site_root,
        stats: IndexStats::default(),
    };
    let mut subjects = Vec::new();
    for (key, subject_path) in child_dirs(&root)? {
        let subject = walker.subject(&key, &subject_path)?;
        debug!(subject = %key, files = subject.file_count, "indexed subject");
        subjects.push(subject);
    }

    let categories = tables::categories()
        .filter_map(|(category, name_zh)| {
            let keys: Vec<String> = subjects
                .iter()
                .filter(|subject| subject.category == category)
                .map(|subject| subject.record.key.clone())
                .collect();
            (!keys.is_empty()).then(|| CategoryIndex {
                name: category,
                name_zh: name_zh.to_string(),
                subjects: keys,
            })
        })
        .collect();

    info!(
        subjects = subjects.len(),
        files = walker.stats.total_files,
        bytes = walker.stats.total_size,
        "Index built"
    );
    Ok(IndexDocument {
        subjects,
        categories,
        exam_types: tables::exam_types(),
        languages: tables::languages(),
        stats: walker.stats,
    })
}

struct Walker {
    site_root: PathBuf,
    stats: IndexStats,
}

impl Walker {
    fn subject(&mut self, key: &str, path: &Path) -> Result<IndexedSubject, IndexError> {
        let info = tables::subject_info(key);
        let mut exams = ExamTree::new();
        let mut file_count = 0_u64;
        let mut total_size = 0_u64;

        for (exam_dir, exam_path) in child_dirs(path)? {
            let exam = exam_dir.to_lowercase();
            let section = exams.entry(exam.clone()).or_insert_with(|| {
                let (name, full_name) = tables::exam_names(&exam);
                ExamSection {
                    name: Some(name),
                    full_name: Some(full_name),
                    years: BTreeMap::new(),
                }
            });

            for (lang_dir, lang_path) in child_dirs(&exam_path)? {
                let lang = lang_dir.to_lowercase();
                for (year, year_path) in child_dirs(&lang_path)? {
                    let entry = section
                        .years
                        .entry(year.clone())
                        .or_insert_with(|| YearEntry {
                            display: tables::year_display(&year, &exam),
                            languages: BTreeMap::new(),
                        });
                    let files = entry
                        .languages
                        .entry(lang.clone())
                        .or_insert_with(|| LanguageFiles {
                            name: Some(
                                tables::language_name(&lang)
                                    .map_or_else(|| lang_dir.clone(), str::to_string),
                            ),
                            files: Vec::new(),
                        });

                    for (filename, file_path) in child_files(&year_path)? {
                        let record = self.file(&filename, &file_path)?;
                        let size = record.size.unwrap_or(0);
                        files.files.push(record);

                        file_count += 1;
                        total_size += size;
                        self.count(key, &exam, &year, info.category, size);
                    }
                }
            }
        }

        let years_summary = summarize_years(&exams);
        let mut record = SubjectRecord::new(key, info.name, SubjectContent::Structured(exams));
        record.years_summary = years_summary;

        Ok(IndexedSubject {
            record,
            name_zh: info.name_zh,
            category: info.category,
            file_count,
            total_size,
        })
    }

    fn file(&self, filename: &str, path: &Path) -> Result<FileRecord, IndexError> {
        let metadata = fs::metadata(path).map_err(|source| IndexError::io(path, source))?;
        let relative = path
            .strip_prefix(&self.site_root)
            .map_err(|_| IndexError::OutsideSiteRoot {
                path: path.to_path_buf(),
                site_root: self.site_root.clone(),
            })?;
        let site_path = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let file_type = tables::file_type(filename);
        let mut record = FileRecord::new(filename, site_path).with_kind(file_type.kind);
        record.type_name = Some(file_type.type_name);
        record.paper_num = file_type.paper_num;
        record.size = Some(metadata.len());
        record.sha256 = Some(sha256_file(path)?);
        Ok(record)
    }

    fn count(&mut self, subject: &str, exam: &str, year: &str, category: Category, size: u64) {
        let stats = &mut self.stats;
        stats.total_files += 1;
        stats.total_size += size;
        *stats.by_exam_type.entry(exam.to_string()).or_default() += 1;
        *stats.by_category.entry(category.as_str().to_string()).or_default() += 1;
        *stats.by_subject.entry(subject.to_string()).or_default() += 1;
        if let Some(numeric) = tables::numeric_year(year) {
            *stats.by_year.entry(numeric.to_string()).or_default() += 1;
        }
    }
}

/// `{min, max, count}` over the numeric years of each exam.
fn summarize_years(exams: &ExamTree) -> BTreeMap<String, YearSpan> {
    let mut summary = BTreeMap::new();
    for (exam, section) in exams {
        let years: BTreeSet<i32> = section
            .years
            .keys()
            .filter_map(|year| tables::numeric_year(year))
            .collect();
        if let (Some(&min), Some(&max)) = (years.first(), years.last()) {
            summary.insert(
                exam.clone(),
                YearSpan {
                    min,
                    max,
                    count: u32::try_from(years.len()).ok(),
                },
            );
        }
    }
    summary
}

fn sha256_file(path: &Path) -> Result<String, IndexError> {
    let file = fs::File::open(path).map_err(|source| IndexError::io(path, source))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0_u8; 8192];
    loop {
        let read = reader
            .read(&mut buffer)
            .map_err(|source| IndexError::io(path, source))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Visible subdirectories of `dir`, sorted by name.
fn child_dirs(dir: &Path) -> Result<Vec<(String, PathBuf)>, IndexError> {
    sorted_children(dir, true)
}

/// Visible regular files of `dir`, sorted by name.
fn child_files(dir: &Path) -> Result<Vec<(String, PathBuf)>, IndexError> {
    sorted_children(dir, false)
}

fn sorted_children(dir: &Path, want_dirs: bool) -> Result<Vec<(String, PathBuf)>, IndexError> {
    let mut children = Vec::new();
    for entry in fs::read_dir(dir).map_err(|source| IndexError::io(dir, source))? {
        let entry = entry.map_err(|source| IndexError::io(dir, source))?;
        let path = entry.path();
        let Ok(name) = entry.file_name().into_string() else {
            warn!(path = %path.display(), "Skipping entry with non-UTF-8 name");
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        // Follows symlinks, so linked year directories are indexed too.
        let matches = if want_dirs { path.is_dir() } else { path.is_file() };
        if matches {
            children.push((name, path));
        }
    }
    children.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(children)
}
