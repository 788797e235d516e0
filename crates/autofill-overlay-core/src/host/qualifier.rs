//! Minimal field qualifier: excludes inputs by `type`.

use autofill_overlay_protocols::{AutofillField, FieldQualifier};

const DEFAULT_EXCLUDED_TYPES: &[&str] = &[
    "hidden", "submit", "reset", "button", "image", "file", "checkbox", "radio",
];

#[derive(Debug, Clone)]
pub struct ExcludedTypesQualifier {
    excluded: Vec<String>,
}

impl Default for ExcludedTypesQualifier {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_TYPES.iter().map(|t| t.to_string()))
    }
}

impl ExcludedTypesQualifier {
    pub fn new(excluded: impl IntoIterator<Item = String>) -> Self {
        Self {
            excluded: excluded.into_iter().collect(),
        }
    }
}

impl FieldQualifier for ExcludedTypesQualifier {
    fn is_ignored(&self, field: &AutofillField) -> bool {
        field
            .field_type
            .as_deref()
            .is_some_and(|field_type| self.excluded.iter().any(|t| t == field_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excluded_types() {
        let qualifier = ExcludedTypesQualifier::default();
        let mut field = AutofillField::new("op-1");

        assert!(!qualifier.is_ignored(&field));

        field.field_type = Some("password".to_string());
        assert!(!qualifier.is_ignored(&field));

        field.field_type = Some("hidden".to_string());
        assert!(qualifier.is_ignored(&field));
    }
}
