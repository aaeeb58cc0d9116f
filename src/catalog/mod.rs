//! Typed catalog model for the paper index document.
//!
//! The index arrives as `{ "subjects": [...] }`. Each subject carries its files
//! in one of two shapes, represented here by [`SubjectContent`]:
//!
//! - a structured `exams` tree (exam → year → language → files), or
//! - a flat `files` list whose paths encode exam and language.

mod model;

pub use model::{
    ExamKind, ExamSection, ExamTree, FileKind, FileRecord, Language, LanguageFiles,
    ParseLabelError, SubjectContent, SubjectRecord, YearEntry, YearSpan,
};
