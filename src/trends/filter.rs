// src/trends/filter.rs
use crate::ingest::types::TrendItem;

/// Descriptions containing any of these (case-insensitive) are low-value.
pub const LOW_VALUE_PHRASES: &[&str] = &[
    "program syntax",
    "basic tutorial",
    "how to write a tech article",
    "basic explanation",
    "introductory guide",
];

pub fn is_low_value(description: Option<&str>) -> bool {
    let lower = description.unwrap_or_default().to_lowercase();
    LOW_VALUE_PHRASES.iter().any(|p| lower.contains(p))
}

/// Drop tutorial and basic-explanation content before ranking.
pub fn drop_low_value(items: Vec<TrendItem>) -> Vec<TrendItem> {
    items
        .into_iter()
        .filter(|it| !is_low_value(it.description.as_deref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denylist_matches_case_insensitively() {
        assert!(is_low_value(Some("A Basic Tutorial on Rust")));
        assert!(is_low_value(Some("the INTRODUCTORY GUIDE to k8s")));
        assert!(!is_low_value(Some("Kubernetes 2.0 ships")));
        assert!(!is_low_value(None));
    }
}
