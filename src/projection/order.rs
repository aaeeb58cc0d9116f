//! Ordering rules for projected years and the files within a year.

use std::cmp::Ordering;

use crate::catalog::{FileKind, FileRecord};

/// Weight given to files that match no rule of the paper-part table.
pub const UNRANKED_WEIGHT: u32 = 999;

const SPECIAL_YEAR_MARKERS: [&str; 4] = ["sp", "pp", "sample", "practice"];

const PAPER_PART_WEIGHTS: [(&str, u32); 7] = [
    ("p1a", 10),
    ("p1b", 20),
    ("p1", 30),
    ("p2", 40),
    ("p3", 50),
    ("p4", 60),
    ("p5", 70),
];

/// Returns true for specimen and practice year labels.
#[must_use]
pub fn is_special_year(label: &str) -> bool {
    let lowered = label.to_lowercase();
    SPECIAL_YEAR_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Orders year labels: regular years first, then specimen/practice years,
/// each group descending by string comparison.
#[must_use]
pub fn compare_years(a: &str, b: &str) -> Ordering {
    is_special_year(a)
        .cmp(&is_special_year(b))
        .then_with(|| b.cmp(a))
}

/// Returns the paper-part weight of a file.
///
/// Question paper parts come first, then marking schemes, then examiner
/// reports. Only the `ans` substring or an explicit marking type ranks a
/// file as a marking scheme; a name merely containing "marking" does not.
#[must_use]
pub fn file_weight(file: &FileRecord) -> u32 {
    let name = file.name.to_lowercase();
    if let Some((_, weight)) = PAPER_PART_WEIGHTS
        .iter()
        .find(|(part, _)| name.contains(part))
    {
        return *weight;
    }
    if name.contains("ans") || file.kind == Some(FileKind::Marking) {
        return 80;
    }
    if name.contains("per") || file.kind == Some(FileKind::Report) {
        return 90;
    }
    UNRANKED_WEIGHT
}

/// Orders files by weight, then by case-insensitive name.
#[must_use]
pub fn compare_files(a: &FileRecord, b: &FileRecord) -> Ordering {
    file_weight(a)
        .cmp(&file_weight(b))
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> FileRecord {
        FileRecord::new(name, format!("papers/x/dse/eng/2020/{name}"))
    }

    fn sorted_years(labels: &[&str]) -> Vec<String> {
        let mut years: Vec<String> = labels.iter().map(ToString::to_string).collect();
        years.sort_by(|a, b| compare_years(a, b));
        years
    }

    #[test]
    fn test_years_sort_descending_with_specials_last() {
        assert_eq!(
            sorted_years(&["2023", "2021", "SP", "2022", "Practice"]),
            vec!["2023", "2022", "2021", "SP", "Practice"]
        );
    }

    #[test]
    fn test_special_year_detection() {
        assert!(is_special_year("Sample Paper"));
        assert!(is_special_year("PP"));
        assert!(is_special_year("2012 Practice"));
        assert!(!is_special_year("1994 AL"));
        assert!(!is_special_year("Unknown"));
    }

    #[test]
    fn test_special_years_sort_among_themselves_descending() {
        assert_eq!(
            sorted_years(&["Practice Paper", "Sample Paper", "2012", "Unknown"]),
            vec!["Unknown", "2012", "Sample Paper", "Practice Paper"]
        );
    }

    #[test]
    fn test_file_weights_follow_part_table() {
        let names = [
            "p1a.pdf", "P1B.pdf", "p1.pdf", "p2.pdf", "p3.pdf", "p4.pdf", "p5.pdf", "ans.pdf",
            "per.pdf", "audio.ogg",
        ];
        let weights: Vec<u32> = names
            .iter()
            .map(|name| file_weight(&file(name)))
            .collect();
        assert_eq!(weights, vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 999]);
    }

    #[test]
    fn test_file_type_ranks_marking_and_report() {
        assert_eq!(file_weight(&file("scheme.pdf").with_kind(FileKind::Marking)), 80);
        assert_eq!(file_weight(&file("examiner.pdf").with_kind(FileKind::Report)), 90);
    }

    #[test]
    fn test_marking_named_file_without_ans_falls_through() {
        // Regression pin: "marking" in the name alone is not a marking scheme.
        assert_eq!(file_weight(&file("Marking_Scheme.pdf")), UNRANKED_WEIGHT);
    }

    #[test]
    fn test_mixed_files_sort_by_weight_then_name() {
        let mut files: Vec<FileRecord> = ["P2_marking.pdf", "P1a.pdf", "P1b.pdf", "Report.pdf"]
            .iter()
            .map(|name| file(name))
            .collect();
        files.sort_by(compare_files);
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["P1a.pdf", "P1b.pdf", "P2_marking.pdf", "Report.pdf"]);
        // P2_marking matches "p2" before any marking rule; Report has no "per".
        assert_eq!(file_weight(&files[2]), 40);
        assert_eq!(file_weight(&files[3]), UNRANKED_WEIGHT);
    }

    #[test]
    fn test_equal_weights_break_ties_case_insensitively() {
        let mut files = vec![file("b-extra.pdf"), file("A-extra.pdf"), file("c-extra.pdf")];
        files.sort_by(compare_files);
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["A-extra.pdf", "b-extra.pdf", "c-extra.pdf"]);
    }
}
