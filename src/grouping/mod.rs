//! Category grouping and manual ordering of subjects.

use std::collections::BTreeMap;

use tracing::instrument;

use crate::catalog::SubjectRecord;
use crate::meta::{self, Category};

/// Position assigned to subjects absent from their category's order list.
pub const UNLISTED_POSITION: usize = 999;

/// Returns the manual display order for a category, if it has one.
///
/// `Others` (and `Technology`, which never reaches grouped output) keep
/// insertion order.
#[must_use]
pub fn category_order(category: Category) -> Option<&'static [&'static str]> {
    match category {
        Category::Core => Some(&["Chinese", "English", "Mathematics", "Citizenship"]),
        Category::Science => Some(&[
            "Physics",
            "Chemistry",
            "Biology",
            "Mathematics M1",
            "Mathematics M2",
            "ICT",
        ]),
        Category::Commerce => Some(&["Economics", "BAFS"]),
        Category::Arts => Some(&[
            "History",
            "Chinese History",
            "Tourism",
            "Geography",
            "Liberal Studies",
        ]),
        Category::Technology | Category::Others => None,
    }
}

/// Subjects bucketed by category.
///
/// Always holds exactly the five [`Category::GROUPED`] categories, empty or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedSubjects<'a> {
    groups: BTreeMap<Category, Vec<&'a SubjectRecord>>,
}

impl<'a> GroupedSubjects<'a> {
    /// Returns the members of a category in display order.
    #[must_use]
    pub fn get(&self, category: Category) -> &[&'a SubjectRecord] {
        self.groups
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterates categories in display order with their members.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[&'a SubjectRecord])> + '_ {
        Category::GROUPED
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    /// Flattens the groups into a single display list.
    #[must_use]
    pub fn display_list(&self) -> Vec<&'a SubjectRecord> {
        self.iter()
            .flat_map(|(_, members)| members.iter().copied())
            .collect()
    }

    /// Total number of grouped subjects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Buckets subjects into categories and applies each category's manual order.
#[must_use]
#[instrument(level = "debug", skip(subjects), fields(count = subjects.len()))]
pub fn group(subjects: &[SubjectRecord]) -> GroupedSubjects<'_> {
    let mut groups: BTreeMap<Category, Vec<&SubjectRecord>> = Category::GROUPED
        .into_iter()
        .map(|category| (category, Vec::new()))
        .collect();

    for subject in subjects {
        let category = match meta::resolve(&subject.name).category {
            Category::Technology => Category::Others,
            other => other,
        };
        groups.entry(category).or_default().push(subject);
    }

    for (category, members) in &mut groups {
        if let Some(order) = category_order(*category) {
            // stable: unlisted members keep their relative order
            members.sort_by_key(|subject| order_position(order, &subject.name));
        }
    }

    GroupedSubjects { groups }
}

/// Convenience for [`group`] followed by [`GroupedSubjects::display_list`].
#[must_use]
pub fn display_list(subjects: &[SubjectRecord]) -> Vec<&SubjectRecord> {
    group(subjects).display_list()
}

fn order_position(order: &[&str], raw_name: &str) -> usize {
    meta::canonical_name(raw_name)
        .and_then(|name| order.iter().position(|candidate| *candidate == name))
        .unwrap_or(UNLISTED_POSITION)
}
