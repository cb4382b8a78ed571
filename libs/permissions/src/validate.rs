//! Structural validation of untrusted permission documents
//!
//! Role documents come back from persistence (and from audit records) as
//! loosely typed JSON, so every load re-validates. Validation never
//! panics and never throws: structural problems collect into `errors`,
//! advisory findings into `warnings`, and the caller decides whether to
//! block persistence.

use serde_json::Value;

use crate::section::SectionKey;

/// Allowed values for the deprecated `viewScope` field
///
/// Pre-migration documents may still carry it; new code never writes it.
pub const VIEW_SCOPES: [&str; 3] = ["all", "own", "none"];

/// Validation outcome for a single section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Validation outcome for a whole permission document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeReport {
    /// True when no errors were found; warnings never block validity
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Validate the structure of one section value
///
/// A section must be an object with a boolean `enabled` field. A present
/// `features` field must be an object. Unknown extra fields are ignored.
pub fn validate_section_structure(name: &str, section: &Value) -> SectionReport {
    let mut errors = Vec::new();
    match section.as_object() {
        None => errors.push(format!("section '{name}' must be an object")),
        Some(object) => {
            match object.get("enabled") {
                None => errors.push(format!("section '{name}' is missing the 'enabled' field")),
                Some(value) if !value.is_boolean() => {
                    errors.push(format!("section '{name}' has a non-boolean 'enabled' field"))
                }
                Some(_) => {}
            }
            if let Some(features) = object.get("features") {
                if !features.is_object() {
                    errors.push(format!("section '{name}' has a non-object 'features' field"));
                }
            }
            // Deprecated; still accepted from pre-migration documents.
            if let Some(scope) = object.get("viewScope") {
                let valid = scope.as_str().is_some_and(|s| VIEW_SCOPES.contains(&s));
                if !valid {
                    errors.push(format!(
                        "section '{name}' has an invalid 'viewScope' value (expected one of: all, own, none)"
                    ));
                }
            }
        }
    }
    SectionReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Validate a whole permission document
///
/// Non-object input is a single hard error. Unknown section names are
/// warnings; known sections contribute their structural errors. A
/// document that enables nothing gets an advisory warning.
pub fn validate_permission_tree(input: &Value) -> TreeReport {
    let Some(object) = input.as_object() else {
        return TreeReport {
            is_valid: false,
            errors: vec!["permission tree must be an object".to_string()],
            warnings: Vec::new(),
        };
    };

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut any_enabled = false;
    for (name, raw) in object {
        if name.parse::<SectionKey>().is_err() {
            warnings.push(format!("unknown section '{name}' will be ignored"));
            continue;
        }
        errors.extend(validate_section_structure(name, raw).errors);
        if raw.get("enabled").and_then(Value::as_bool) == Some(true) {
            any_enabled = true;
        }
    }
    if !any_enabled {
        warnings.push("no sections are enabled; this role grants no access".to_string());
    }

    TreeReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_object_inputs_are_hard_errors() {
        for input in [json!(null), json!(42), json!("string"), json!([true])] {
            let report = validate_permission_tree(&input);
            assert!(!report.is_valid);
            assert_eq!(report.errors.len(), 1);
        }
    }

    #[test]
    fn test_empty_object_is_valid_with_no_access_warning() {
        let report = validate_permission_tree(&json!({}));
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.iter().any(|w| w.contains("no access")));
    }

    #[test]
    fn test_unknown_sections_warn_but_do_not_block() {
        let report = validate_permission_tree(&json!({
            "patients": {"enabled": true},
            "website_builder": {"enabled": true},
        }));
        assert!(report.is_valid);
        assert!(report.warnings.iter().any(|w| w.contains("website_builder")));
    }

    #[test]
    fn test_malformed_known_section_is_an_error() {
        let report = validate_permission_tree(&json!({
            "patients": true,
            "billing": {"enabled": "yes"},
            "reports": {"features": {}},
        }));
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 3);
    }

    #[test]
    fn test_deeply_malformed_input_never_panics() {
        let report = validate_permission_tree(&json!({
            "patients": {"enabled": {"enabled": {"enabled": []}}},
            "billing": [[[{"claims": null}]]],
            "settings": {"enabled": false, "features": "everything"},
        }));
        assert!(!report.is_valid);
        assert!(!report.errors.is_empty());
    }

    #[test]
    fn test_section_missing_enabled() {
        let report = validate_section_structure("patients", &json!({"features": {}}));
        assert!(!report.is_valid);
        assert!(report.errors[0].contains("missing the 'enabled' field"));
    }

    #[test]
    fn test_section_unknown_fields_are_ignored() {
        let report = validate_section_structure(
            "patients",
            &json!({"enabled": true, "color": "teal", "order": 3}),
        );
        assert!(report.is_valid);
    }

    #[test]
    fn test_deprecated_view_scope_values() {
        for scope in VIEW_SCOPES {
            let report =
                validate_section_structure("patients", &json!({"enabled": true, "viewScope": scope}));
            assert!(report.is_valid, "viewScope {scope} should be accepted");
        }
        let report = validate_section_structure(
            "patients",
            &json!({"enabled": true, "viewScope": "everyone"}),
        );
        assert!(!report.is_valid);
        assert!(report.errors[0].contains("viewScope"));
    }

    #[test]
    fn test_enabled_section_clears_no_access_warning() {
        let report = validate_permission_tree(&json!({"patients": {"enabled": true}}));
        assert!(report.is_valid);
        assert!(report.warnings.is_empty());
    }
}
