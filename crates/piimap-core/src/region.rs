//! # Region Resolution
//!
//! Maps a framework display name to a display region. The lookup is an
//! ordered list of keyword rules; the first rule whose keyword occurs in
//! the framework name (case-insensitive substring) wins. Ordering is
//! semantically load-bearing: a named national variant such as `UK GDPR`
//! must come before the generic `GDPR`, and `CCPA` before `CPA`.
//!
//! When no rule matches:
//!
//! - more than one record in the group → `"Various"`
//! - exactly one record → that record's country name
//! - no records → `"Global"`

/// Region for an unmatched framework with several records.
pub const VARIOUS_REGION: &str = "Various";

/// Region for an unmatched framework with no records.
pub const GLOBAL_REGION: &str = "Global";

/// One keyword → region rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionRule {
    pub keyword: &'static str,
    pub region: &'static str,
}

impl RegionRule {
    pub const fn new(keyword: &'static str, region: &'static str) -> Self {
        Self { keyword, region }
    }

    /// Case-insensitive substring match against a framework name.
    pub fn matches(&self, framework: &str) -> bool {
        framework
            .to_lowercase()
            .contains(&self.keyword.to_lowercase())
    }
}

/// Built-in rule table, most specific keywords first.
pub const REGION_RULES: &[RegionRule] = &[
    RegionRule::new("UK GDPR", "United Kingdom"),
    RegionRule::new("GDPR", "EU + EEA"),
    RegionRule::new("HIPAA", "USA"),
    RegionRule::new("CPRA", "United States"),
    RegionRule::new("CCPA", "United States"),
    RegionRule::new("VCDPA", "United States"),
    RegionRule::new("CPA", "United States"),
    RegionRule::new("CTDPA", "United States"),
    RegionRule::new("UCPA", "United States"),
    RegionRule::new("MCPA", "United States"),
    RegionRule::new("LGPD", "Brazil"),
    RegionRule::new("PIPL", "China"),
    RegionRule::new("APPI", "Japan"),
    RegionRule::new("PIPA", "South Korea"),
    RegionRule::new("POPI", "South Africa"),
    RegionRule::new("POPIA", "South Africa"),
    RegionRule::new("PDPA", "Southeast Asia"),
    RegionRule::new("PIPEDA", "Canada"),
    RegionRule::new("Privacy Act", "Australia/New Zealand"),
    RegionRule::new("DPDPB", "India"),
    RegionRule::new("NDPR", "Nigeria"),
    RegionRule::new("UAE DPL", "United Arab Emirates"),
    RegionRule::new("FADP", "Switzerland"),
    RegionRule::new("DPA", "Various"),
];

/// Resolve the region for `framework` using the built-in table.
///
/// `countries` are the display names of the records in the group, used
/// only for the fallback chain.
pub fn resolve_region<S: AsRef<str>>(framework: &str, countries: &[S]) -> String {
    resolve_region_with(REGION_RULES, framework, countries)
}

/// Resolve the region for `framework` against an explicit rule table.
pub fn resolve_region_with<S: AsRef<str>>(
    rules: &[RegionRule],
    framework: &str,
    countries: &[S],
) -> String {
    if let Some(rule) = rules.iter().find(|r| r.matches(framework)) {
        return rule.region.to_string();
    }

    match countries {
        [] => GLOBAL_REGION.to_string(),
        [only] => only.as_ref().to_string(),
        _ => VARIOUS_REGION.to_string(),
    }
}
