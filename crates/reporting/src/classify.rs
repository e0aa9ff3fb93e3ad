//! Ad-name classification — decodes the `page/field_type/employees`
//! naming convention into structured attributes.
//!
//! A name is `/`-delimited: the first segment is the page, the last the
//! responsible employees (joined with `+`), and the middle segment packs
//! the business field, the ad type and an optional grade marker, e.g.
//! `PageX/行銷_課程R-0712/Amy+Ben`.

use adreport_core::types::Grade;
use serde::{Deserialize, Serialize};

/// Ad type assigned when the middle segment carries no `_` separator.
pub const UNCLASSIFIED: &str = "未分類";

/// Grade markers tried as an ad-type suffix, longest first so `SSR`
/// wins over `SR` and `SR` over `R`.
const GRADE_MARKERS: [Grade; 6] = [
    Grade::Ssr,
    Grade::Sr,
    Grade::R,
    Grade::N,
    Grade::C,
    Grade::D,
];

/// Structured attributes decoded from one ad name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedName {
    pub page_name: String,
    pub field: String,
    pub ad_type: String,
    pub grade: Grade,
    pub employees: Vec<String>,
    /// Employees sorted lexicographically and rejoined with `+`. The
    /// grouping key is therefore identical no matter how the employee
    /// segment was ordered.
    pub employee_key: String,
}

/// Decode an ad name. Returns `None` when the name has fewer than three
/// `/`-segments; such ads are excluded from the employee breakdown but
/// still count toward totals and the account rollup.
pub fn decode_ad_name(name: &str) -> Option<ParsedName> {
    let parts: Vec<&str> = name.split('/').collect();
    if parts.len() < 3 {
        return None;
    }

    let page_name = parts[0].to_string();
    let middle = parts[1];

    let (field, raw_type) = match middle.split_once('_') {
        Some((field, rest)) => {
            // Only the chunk up to the next `_` carries type and grade.
            let type_and_grade = match rest.split_once('_') {
                Some((type_and_grade, _)) => type_and_grade,
                None => rest,
            };
            // Anything after the first `-` is a creative variant suffix.
            let ad_type = match type_and_grade.split_once('-') {
                Some((ad_type, _)) => ad_type,
                None => type_and_grade,
            };
            (field.to_string(), ad_type.to_string())
        }
        None => (middle.to_string(), UNCLASSIFIED.to_string()),
    };

    let (grade, ad_type) = resolve_grade(raw_type);

    let employees: Vec<String> = parts[parts.len() - 1]
        .split('+')
        .map(str::to_string)
        .collect();
    let mut sorted = employees.clone();
    sorted.sort();
    let employee_key = sorted.join("+");

    Some(ParsedName {
        page_name,
        field,
        ad_type,
        grade,
        employees,
        employee_key,
    })
}

/// An explicit marker suffix on the ad type always wins; without one the
/// grade falls back to the static per-type table.
fn resolve_grade(ad_type: String) -> (Grade, String) {
    for marker in GRADE_MARKERS {
        if let Some(stripped) = ad_type.strip_suffix(marker.as_str()) {
            return (marker, stripped.to_string());
        }
    }
    (default_grade(&ad_type), ad_type)
}

/// Default grade per ad type, for names without an explicit marker.
/// Unknown types fall back to `D`.
fn default_grade(ad_type: &str) -> Grade {
    match ad_type {
        "自來客" => Grade::Ssr,
        "職能講座" | "職能工作坊" | "培訓營" => Grade::Sr,
        "課程" | "求職" | "優惠" | "接案" | "諮詢" | "軟實力講座" | "軟實力工作坊" => {
            Grade::R
        }
        "懶人包" | "素材" | "實習" => Grade::N,
        "小遊戲" | "互動測驗" | "社群互動" => Grade::C,
        _ => Grade::D,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_decodes() {
        let parsed = decode_ad_name("PageX/行銷_課程R-0712/Amy+Ben").unwrap();
        assert_eq!(parsed.page_name, "PageX");
        assert_eq!(parsed.field, "行銷");
        assert_eq!(parsed.ad_type, "課程");
        assert_eq!(parsed.grade, Grade::R);
        assert_eq!(parsed.employees, vec!["Amy", "Ben"]);
        assert_eq!(parsed.employee_key, "Amy+Ben");
    }

    #[test]
    fn test_employee_key_is_order_independent() {
        let a = decode_ad_name("Page/行銷_課程/B+A").unwrap();
        let b = decode_ad_name("Page/行銷_課程/A+B").unwrap();
        assert_eq!(a.employee_key, "A+B");
        assert_eq!(a.employee_key, b.employee_key);
        // The raw employee list keeps its input order.
        assert_eq!(a.employees, vec!["B", "A"]);
    }

    #[test]
    fn test_single_employee() {
        let parsed = decode_ad_name("Page/行銷_課程/Amy").unwrap();
        assert_eq!(parsed.employees, vec!["Amy"]);
        assert_eq!(parsed.employee_key, "Amy");
    }

    #[test]
    fn test_marker_suffix_overrides_table() {
        // 課程 defaults to R via the table, but an explicit marker wins.
        let parsed = decode_ad_name("Page/行銷_課程N/Amy").unwrap();
        assert_eq!(parsed.grade, Grade::N);
        assert_eq!(parsed.ad_type, "課程");
    }

    #[test]
    fn test_marker_stripped_from_ad_type() {
        let parsed = decode_ad_name("PageX/Marketing_CourseR/A").unwrap();
        assert_eq!(parsed.grade, Grade::R);
        assert_eq!(parsed.ad_type, "Course");
    }

    #[test]
    fn test_ssr_marker_beats_shorter_markers() {
        let parsed = decode_ad_name("Page/行銷_活動SSR/Amy").unwrap();
        assert_eq!(parsed.grade, Grade::Ssr);
        assert_eq!(parsed.ad_type, "活動");
    }

    #[test]
    fn test_unknown_type_defaults_to_d() {
        let parsed = decode_ad_name("PageX/Marketing_Course-promo/A+B").unwrap();
        assert_eq!(parsed.field, "Marketing");
        assert_eq!(parsed.ad_type, "Course");
        assert_eq!(parsed.grade, Grade::D);
        assert_eq!(parsed.employee_key, "A+B");
    }

    #[test]
    fn test_table_grade_without_marker() {
        let parsed = decode_ad_name("Page/職涯_自來客/Amy").unwrap();
        assert_eq!(parsed.grade, Grade::Ssr);
        let parsed = decode_ad_name("Page/職涯_培訓營/Amy").unwrap();
        assert_eq!(parsed.grade, Grade::Sr);
    }

    #[test]
    fn test_extra_underscore_chunks_are_ignored() {
        let parsed = decode_ad_name("Page/行銷_課程R_0712/Amy").unwrap();
        assert_eq!(parsed.field, "行銷");
        assert_eq!(parsed.ad_type, "課程");
        assert_eq!(parsed.grade, Grade::R);
    }

    #[test]
    fn test_middle_without_underscore_is_unclassified() {
        let parsed = decode_ad_name("Page/行銷/Amy").unwrap();
        assert_eq!(parsed.field, "行銷");
        assert_eq!(parsed.ad_type, UNCLASSIFIED);
        assert_eq!(parsed.grade, Grade::D);
    }

    #[test]
    fn test_too_few_segments_fails() {
        assert!(decode_ad_name("OnlySeg").is_none());
        assert!(decode_ad_name("Page/行銷_課程").is_none());
        assert!(decode_ad_name("").is_none());
    }
}
