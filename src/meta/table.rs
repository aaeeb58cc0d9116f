//! Static subject descriptor table.

use std::borrow::Cow;

use super::{Category, SubjectMeta};

const fn entry(
    key: &'static str,
    zh: &'static str,
    en: &'static str,
    display_key: &'static str,
    category: Category,
    icon: &'static str,
) -> (&'static str, SubjectMeta) {
    (
        key,
        SubjectMeta {
            zh: Cow::Borrowed(zh),
            en: Cow::Borrowed(en),
            display_key: Some(display_key),
            category,
            icon,
        },
    )
}

/// Known canonical subject names and their descriptors.
///
/// Declaration order is the match priority for substring resolution:
/// "Chinese History" must precede "Chinese" and the M1/M2 entries must
/// precede "Mathematics".
pub(super) static SUBJECT_TABLE: [(&str, SubjectMeta); 17] = [
    entry(
        "Chinese History",
        "中國歷史",
        "Chinese History",
        "chi_hist",
        Category::Arts,
        "temple_buddhist",
    ),
    entry("Chinese", "中文", "Chinese", "chi", Category::Core, "history_edu"),
    entry("English", "英文", "English", "eng", Category::Core, "translate"),
    entry(
        "Mathematics M1",
        "微積分與統計 (M1)",
        "Maths (M1)",
        "m1",
        Category::Science,
        "pie_chart",
    ),
    entry(
        "Mathematics M2",
        "代數與微積分 (M2)",
        "Maths (M2)",
        "m2",
        Category::Science,
        "functions",
    ),
    entry("Mathematics", "數學", "Mathematics", "m0", Category::Core, "calculate"),
    entry("Citizenship", "公民與社會發展", "Citizenship", "cs", Category::Core, "public"),
    entry("Liberal Studies", "通識教育", "Liberal Studies", "ls", Category::Arts, "newspaper"),
    entry("Physics", "物理", "Physics", "phy", Category::Science, "electric_bolt"),
    entry("Chemistry", "化學", "Chemistry", "chem", Category::Science, "science"),
    entry("Biology", "生物", "Biology", "bio", Category::Science, "biotech"),
    entry("ICT", "資訊及通訊科技", "ICT", "ict", Category::Science, "computer"),
    entry("BAFS", "企業、會計與財務概論", "BAFS", "bafs", Category::Commerce, "business_center"),
    entry("Economics", "經濟", "Economics", "econ", Category::Commerce, "trending_up"),
    entry("History", "世界歷史", "History", "hist", Category::Arts, "public"),
    entry("Geography", "地理", "Geography", "geog", Category::Arts, "landscape"),
    entry("Tourism", "旅遊與款待", "Tourism", "tourism", Category::Arts, "flight_takeoff"),
];
