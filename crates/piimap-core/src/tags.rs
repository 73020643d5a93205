//! # Tag Inference
//!
//! Best-effort keyword heuristic that suggests labels for a category from
//! its type, subtype and name. Suggestions are non-authoritative: they are
//! never written back into records and never affect validation.

use std::collections::BTreeSet;

use crate::record::Category;

/// Name keywords that suggest location or tracking data.
const TRACKING_KEYWORDS: &[&str] = &["location", "ip", "tracking"];

/// Suggest tags for a category, sorted and de-duplicated.
pub fn infer_tags(category: &Category) -> Vec<String> {
    infer_tags_from(
        &category.kind,
        category.subtype.as_deref(),
        &category.name,
    )
}

/// Suggest tags from the raw fields of a category.
pub fn infer_tags_from(kind: &str, subtype: Option<&str>, name: &str) -> Vec<String> {
    let name = name.to_lowercase();
    let mut tags = BTreeSet::new();

    match kind {
        "direct_identifier" | "quasi_identifier" => {
            tags.insert("pii");
        }
        "special_category" => {
            tags.insert("sensitive");
        }
        _ => {}
    }
    if name.contains("health") || name.contains("medical") {
        tags.insert("phi");
    }
    if name.contains("biometric") || subtype == Some("biometric") {
        tags.insert("biometric");
    }
    if name.contains("child") {
        tags.insert("child");
    }
    if name.contains("criminal") {
        tags.insert("criminal");
    }
    if TRACKING_KEYWORDS.iter().any(|k| name.contains(k)) {
        tags.insert("tracking");
    }

    tags.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_types_are_pii() {
        assert_eq!(infer_tags_from("direct_identifier", None, "Full name"), vec!["pii"]);
        assert_eq!(infer_tags_from("quasi_identifier", None, "Postcode"), vec!["pii"]);
    }

    #[test]
    fn special_category_health_data() {
        assert_eq!(
            infer_tags_from("special_category", None, "Health Records"),
            vec!["phi", "sensitive"]
        );
    }

    #[test]
    fn biometric_from_subtype_or_name() {
        assert_eq!(
            infer_tags_from("special_category", Some("biometric"), "Fingerprints"),
            vec!["biometric", "sensitive"]
        );
        assert_eq!(
            infer_tags_from("other", None, "Biometric template"),
            vec!["biometric"]
        );
    }

    #[test]
    fn tracking_keywords_match_substrings() {
        assert_eq!(infer_tags_from("other", None, "IP address"), vec!["tracking"]);
        assert_eq!(infer_tags_from("other", None, "Geolocation"), vec!["tracking"]);
    }

    #[test]
    fn child_and_criminal() {
        assert_eq!(
            infer_tags_from("special_category", None, "Criminal records of children"),
            vec!["child", "criminal", "sensitive"]
        );
    }

    #[test]
    fn nothing_inferred_for_unknown_category() {
        assert!(infer_tags_from("other", None, "Preferences").is_empty());
    }

    #[test]
    fn infer_tags_reads_category_fields() {
        let category = Category {
            name: "Medical history".to_string(),
            kind: "special_category".to_string(),
            subtype: None,
            required_masking: true,
            tags: Vec::new(),
            citations: Vec::new(),
        };
        assert_eq!(infer_tags(&category), vec!["phi", "sensitive"]);
    }
}
