//! Fixed lookup tables for the paper tree layout.

use std::sync::LazyLock;

use regex::Regex;

use super::{ExamTypeInfo, LanguageInfo};
use crate::catalog::FileKind;
use crate::meta::Category;

/// Subject directory key → (English name, Chinese name, category).
const SUBJECT_KEYS: [(&str, &str, &str, Category); 17] = [
    ("chi", "Chinese", "中文", Category::Core),
    ("eng", "English", "英文", Category::Core),
    ("m0", "Mathematics", "數學", Category::Core),
    ("citizen", "Citizenship", "公民與社會發展", Category::Core),
    ("ls", "Liberal Studies", "通識教育", Category::Core),
    ("phy", "Physics", "物理", Category::Science),
    ("chem", "Chemistry", "化學", Category::Science),
    ("bio", "Biology", "生物", Category::Science),
    ("m1", "Mathematics M1", "數學延伸M1", Category::Science),
    ("m2", "Mathematics M2", "數學延伸M2", Category::Science),
    ("bafs", "BAFS", "企業會計財務", Category::Commerce),
    ("econ", "Economics", "經濟", Category::Commerce),
    ("chihist", "Chinese History", "中國歷史", Category::Arts),
    ("enghist", "History", "世界歷史", Category::Arts),
    ("geog", "Geography", "地理", Category::Arts),
    ("ict", "ICT", "資訊及通訊科技", Category::Technology),
    ("ths", "Tourism", "旅遊與款待", Category::Others),
];

/// Lowercased exam directory → (short name, full name, nominal year range).
const EXAM_KEYS: [(&str, &str, &str, (i32, i32)); 4] = [
    ("dse", "HKDSE", "香港中學文憑考試", (2012, 2025)),
    ("ce", "HKCEE", "香港中學會考", (1978, 2011)),
    ("al", "HKAL", "香港高級程度會考", (1980, 2013)),
    ("hyc", "HYC Mock", "學友社模擬試卷", (2015, 2025)),
];

/// Language directory → (English name, Chinese name).
const LANGUAGE_KEYS: [(&str, &str, &str); 2] = [
    ("eng", "English", "英文"),
    ("chi", "Chinese", "中文"),
];

/// Category order and Chinese labels used in the generated index.
const CATEGORY_NAMES: [(Category, &str); 6] = [
    (Category::Core, "核心科目"),
    (Category::Science, "理科"),
    (Category::Commerce, "商科"),
    (Category::Arts, "文科"),
    (Category::Technology, "科技"),
    (Category::Others, "其他"),
];

/// Lowercased file name → (kind, type name, paper number).
const FILE_TYPES: [(&str, FileKind, &str, Option<u32>); 10] = [
    ("p1.pdf", FileKind::Paper, "Paper 1", Some(1)),
    ("p1a.pdf", FileKind::Paper, "Paper 1A", Some(1)),
    ("p1b.pdf", FileKind::Paper, "Paper 1B", Some(1)),
    ("p2.pdf", FileKind::Paper, "Paper 2", Some(2)),
    ("p3.pdf", FileKind::Paper, "Paper 3", Some(3)),
    ("p4.pdf", FileKind::Paper, "Paper 4", Some(4)),
    ("p5.pdf", FileKind::Paper, "Paper 5", Some(5)),
    ("ans.pdf", FileKind::Marking, "Marking Scheme", None),
    ("per.pdf", FileKind::Report, "Exam Report", None),
    ("aud.mp3", FileKind::Audio, "Audio", None),
];

const SPECIAL_YEARS: [(&str, &str); 2] = [("pp", "Practice Paper"), ("sp", "Sample Paper")];

/// Year directory carrying an `al` suffix, e.g. `1994al`.
#[allow(clippy::expect_used)]
static AL_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.*)al$").expect("al suffix regex is valid"));

/// Type details for a file, looked up by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct FileType {
    pub kind: FileKind,
    pub type_name: String,
    pub paper_num: Option<u32>,
}

/// Descriptor for a subject directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct SubjectInfo {
    pub name: String,
    pub name_zh: String,
    pub category: Category,
}

pub(super) fn subject_info(key: &str) -> SubjectInfo {
    SUBJECT_KEYS
        .iter()
        .find(|(candidate, ..)| *candidate == key)
        .map_or_else(
            || SubjectInfo {
                name: key.to_string(),
                name_zh: key.to_string(),
                category: Category::Others,
            },
            |(_, name, name_zh, category)| SubjectInfo {
                name: (*name).to_string(),
                name_zh: (*name_zh).to_string(),
                category: *category,
            },
        )
}

/// Returns `(name, full_name)` for an exam directory.
pub(super) fn exam_names(exam: &str) -> (String, String) {
    EXAM_KEYS
        .iter()
        .find(|(code, ..)| *code == exam)
        .map_or_else(
            || (exam.to_uppercase(), exam.to_string()),
            |(_, name, full_name, _)| ((*name).to_string(), (*full_name).to_string()),
        )
}

/// Every known exam type in table order.
pub(super) fn exam_types() -> Vec<ExamTypeInfo> {
    EXAM_KEYS
        .iter()
        .map(|(key, name, full_name, year_range)| ExamTypeInfo {
            key: (*key).to_string(),
            name: (*name).to_string(),
            full_name: (*full_name).to_string(),
            year_range: *year_range,
        })
        .collect()
}

pub(super) fn language_name(code: &str) -> Option<&'static str> {
    LANGUAGE_KEYS
        .iter()
        .find(|(key, ..)| *key == code)
        .map(|(_, name, _)| *name)
}

pub(super) fn languages() -> Vec<LanguageInfo> {
    LANGUAGE_KEYS
        .iter()
        .map(|(key, name, name_zh)| LanguageInfo {
            key: (*key).to_string(),
            name: (*name).to_string(),
            name_zh: (*name_zh).to_string(),
        })
        .collect()
}

/// Categories in index order with their Chinese labels.
pub(super) fn categories() -> impl Iterator<Item = (Category, &'static str)> {
    CATEGORY_NAMES.iter().copied()
}

/// Type descriptor for a file name; unknown names are `other` and keep
/// the file name as their type name.
pub(super) fn file_type(filename: &str) -> FileType {
    let lowered = filename.to_lowercase();
    FILE_TYPES
        .iter()
        .find(|(name, ..)| *name == lowered)
        .map_or_else(
            || FileType {
                kind: FileKind::Other,
                type_name: filename.to_string(),
                paper_num: None,
            },
            |(_, kind, type_name, paper_num)| FileType {
                kind: *kind,
                type_name: (*type_name).to_string(),
                paper_num: *paper_num,
            },
        )
}

fn special_year(year: &str) -> Option<&'static str> {
    SPECIAL_YEARS
        .iter()
        .find(|(key, _)| *key == year)
        .map(|(_, display)| *display)
}

/// Display label for a year directory.
pub(super) fn year_display(year: &str, exam: &str) -> String {
    if let Some(display) = special_year(year) {
        return display.to_string();
    }
    if let Some(captures) = AL_SUFFIX.captures(year) {
        return format!("{} AL", &captures[1]);
    }
    if exam.eq_ignore_ascii_case("hyc") {
        return format!("{year} Mock");
    }
    year.to_string()
}

/// Numeric year for summaries; special years and unparseable names yield `None`.
pub(super) fn numeric_year(year: &str) -> Option<i32> {
    if special_year(year).is_some() {
        return None;
    }
    let digits = AL_SUFFIX
        .captures(year)
        .and_then(|captures| captures.get(1))
        .map_or(year, |prefix| prefix.as_str());
    digits.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_info_known_and_unknown() {
        let info = subject_info("m1");
        assert_eq!(info.name, "Mathematics M1");
        assert_eq!(info.category, Category::Science);

        let info = subject_info("latin");
        assert_eq!(info.name, "latin");
        assert_eq!(info.category, Category::Others);
    }

    #[test]
    fn test_exam_names() {
        assert_eq!(exam_names("dse").0, "HKDSE");
        assert_eq!(exam_names("xyz"), ("XYZ".to_string(), "xyz".to_string()));
    }

    #[test]
    fn test_file_type_table() {
        let p1a = file_type("P1A.pdf");
        assert_eq!(p1a.kind, FileKind::Paper);
        assert_eq!(p1a.type_name, "Paper 1A");
        assert_eq!(p1a.paper_num, Some(1));
        assert_eq!(file_type("p3.pdf").paper_num, Some(3));

        let ans = file_type("ans.pdf");
        assert_eq!(ans.kind, FileKind::Marking);
        assert_eq!(ans.type_name, "Marking Scheme");
        assert_eq!(ans.paper_num, None);
        assert_eq!(file_type("per.pdf").kind, FileKind::Report);
        assert_eq!(file_type("aud.mp3").kind, FileKind::Audio);

        let other = file_type("notes.txt");
        assert_eq!(other.kind, FileKind::Other);
        assert_eq!(other.type_name, "notes.txt");
    }

    #[test]
    fn test_exam_types_and_languages() {
        let exams = exam_types();
        assert_eq!(exams.len(), 4);
        assert_eq!(exams[0].key, "dse");
        assert_eq!(exams[0].year_range, (2012, 2025));
        assert_eq!(language_name("chi"), Some("Chinese"));
        assert_eq!(language_name("fre"), None);
        assert_eq!(languages()[0].name_zh, "英文");
    }

    #[test]
    fn test_year_display() {
        assert_eq!(year_display("sp", "dse"), "Sample Paper");
        assert_eq!(year_display("pp", "dse"), "Practice Paper");
        assert_eq!(year_display("1994al", "al"), "1994 AL");
        assert_eq!(year_display("1994AL", "al"), "1994 AL");
        assert_eq!(year_display("99al", "al"), "99 AL");
        assert_eq!(year_display("2022al", "hyc"), "2022 AL");
        assert_eq!(year_display("2022", "hyc"), "2022 Mock");
        assert_eq!(year_display("2020", "dse"), "2020");
    }

    #[test]
    fn test_numeric_year() {
        assert_eq!(numeric_year("2020"), Some(2020));
        assert_eq!(numeric_year("1994AL"), Some(1994));
        assert_eq!(numeric_year("99al"), Some(99));
        assert_eq!(numeric_year("20201"), Some(20201));
        assert_eq!(numeric_year("sp"), None);
        assert_eq!(numeric_year("pp"), None);
        assert_eq!(numeric_year("misc"), None);
    }
}
