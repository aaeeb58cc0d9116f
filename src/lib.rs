//! Past Papers Core Library
//!
//! This library provides the core functionality for the past papers catalog,
//! which turns an index of Hong Kong public examination papers (HKDSE, HKCEE,
//! HKALE) into a grouped, ordered, bilingual catalog and bundles a year's
//! papers into a single archive.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`catalog`] - Typed index records (subjects, exams, years, files)
//! - [`source`] - Loading the index document over HTTP or from disk
//! - [`meta`] - Subject metadata resolution (names, category, icon)
//! - [`grouping`] - Category grouping and manual subject ordering
//! - [`projection`] - Year/file projection for an exam and language
//! - [`archive`] - Bundling one year's files into a zip archive
//! - [`state`] - Application state tying the above together
//! - [`indexer`] - Generating the index document from a paper tree

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod archive;
pub mod catalog;
pub mod grouping;
pub mod http;
pub mod indexer;
pub mod meta;
pub mod projection;
pub mod source;
pub mod state;
mod user_agent;

// Re-export commonly used types
pub use archive::{
    ArchiveBuilder, ArchiveError, ArchiveOutcome, DirectorySink, HttpFileFetcher,
    LocalFileFetcher, ZipFormat,
};
pub use catalog::{ExamKind, FileRecord, Language, SubjectContent, SubjectRecord};
pub use grouping::{GroupedSubjects, group};
pub use http::{FetchError, HttpClient};
pub use indexer::{IndexDocument, IndexError, IndexOptions, build_index};
pub use meta::{Category, SubjectMeta, resolve};
pub use projection::{ProjectedYear, project};
pub use source::{IndexClient, IndexSource, LoadError, LocalIndex};
pub use state::{AppState, PendingDownload};
