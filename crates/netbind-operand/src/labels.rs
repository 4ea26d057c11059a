//! Canonical label utilities shared by all operand handlers.
//!
//! The engine owns exactly the labels produced by [`canonical_labels`].
//! Everything else on a managed object is somebody else's and survives
//! merges untouched.

use std::collections::BTreeMap;

/// Legacy application label carried alongside the recommended set
pub const APP_LABEL: &str = "app";
/// Standard label for the name of the application
pub const APP_NAME_LABEL: &str = "app.kubernetes.io/name";
/// Standard label for the component within the architecture
pub const APP_COMPONENT_LABEL: &str = "app.kubernetes.io/component";
/// Standard label for the higher-level application this one is part of
pub const APP_PART_OF_LABEL: &str = "app.kubernetes.io/part-of";
/// Standard label for the application version
pub const APP_VERSION_LABEL: &str = "app.kubernetes.io/version";
/// Standard label for the tool managing the resource
pub const APP_MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";

/// Value for `app.kubernetes.io/managed-by` on every managed object
pub const OPERATOR_NAME: &str = "netbind-operator";
/// Value for `app.kubernetes.io/part-of` on every managed object
pub const PART_OF: &str = "netbind";

/// Component of the application a managed resource belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppComponent {
    /// Network plumbing (CNI plugin, attachment definitions)
    Network,
}

impl AppComponent {
    /// Label value for this component.
    pub fn as_str(self) -> &'static str {
        match self {
            AppComponent::Network => "network",
        }
    }
}

/// Canonical managed label set for one application component.
pub fn canonical_labels(app_name: &str, component: AppComponent) -> BTreeMap<String, String> {
    BTreeMap::from([
        (APP_LABEL.to_string(), app_name.to_string()),
        (APP_NAME_LABEL.to_string(), app_name.to_string()),
        (APP_COMPONENT_LABEL.to_string(), component.as_str().to_string()),
        (APP_PART_OF_LABEL.to_string(), PART_OF.to_string()),
        (APP_MANAGED_BY_LABEL.to_string(), OPERATOR_NAME.to_string()),
        (
            APP_VERSION_LABEL.to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        ),
    ])
}

/// Union of the existing labels with the desired managed labels.
///
/// Labels the engine does not own are preserved; on managed keys the desired
/// value wins. Never shrinks the existing set.
pub fn merge_labels(
    desired: Option<&BTreeMap<String, String>>,
    existing: Option<&BTreeMap<String, String>>,
) -> BTreeMap<String, String> {
    let mut merged = existing.cloned().unwrap_or_default();
    if let Some(desired) = desired {
        for (key, value) in desired {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// True when every desired managed label is present on the existing object
/// with the same value. Extra labels on the existing object are ignored.
pub fn labels_match(
    desired: Option<&BTreeMap<String, String>>,
    existing: Option<&BTreeMap<String, String>>,
) -> bool {
    let Some(desired) = desired else { return true };
    desired
        .iter()
        .all(|(key, value)| existing.is_some_and(|labels| labels.get(key) == Some(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_canonical_labels_contents() {
        let set = canonical_labels("netbind", AppComponent::Network);
        assert_eq!(set.get(APP_LABEL).map(String::as_str), Some("netbind"));
        assert_eq!(set.get(APP_NAME_LABEL).map(String::as_str), Some("netbind"));
        assert_eq!(
            set.get(APP_COMPONENT_LABEL).map(String::as_str),
            Some("network")
        );
        assert_eq!(set.get(APP_PART_OF_LABEL).map(String::as_str), Some(PART_OF));
        assert_eq!(
            set.get(APP_MANAGED_BY_LABEL).map(String::as_str),
            Some(OPERATOR_NAME)
        );
        assert!(set.contains_key(APP_VERSION_LABEL));
    }

    #[test]
    fn test_merge_labels_preserves_unmanaged() {
        let desired = labels(&[("app", "netbind")]);
        let existing = labels(&[("team", "payments"), ("app", "stale")]);
        let merged = merge_labels(Some(&desired), Some(&existing));
        assert_eq!(merged.get("team").map(String::as_str), Some("payments"));
        assert_eq!(merged.get("app").map(String::as_str), Some("netbind"));
    }

    #[test]
    fn test_merge_labels_with_no_existing() {
        let desired = labels(&[("app", "netbind")]);
        let merged = merge_labels(Some(&desired), None);
        assert_eq!(merged, desired);
    }

    #[test]
    fn test_labels_match_ignores_extra_existing_labels() {
        let desired = labels(&[("app", "netbind")]);
        let existing = labels(&[("app", "netbind"), ("team", "payments")]);
        assert!(labels_match(Some(&desired), Some(&existing)));
    }

    #[test]
    fn test_labels_match_detects_missing_label() {
        let desired = labels(&[("app", "netbind"), ("tier", "node")]);
        let existing = labels(&[("app", "netbind")]);
        assert!(!labels_match(Some(&desired), Some(&existing)));
    }

    #[test]
    fn test_labels_match_detects_changed_value() {
        let desired = labels(&[("app", "netbind")]);
        let existing = labels(&[("app", "other")]);
        assert!(!labels_match(Some(&desired), Some(&existing)));
        assert!(!labels_match(Some(&desired), None));
    }
}
