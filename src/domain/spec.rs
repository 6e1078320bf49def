//! Expected field values for a product code.

use std::collections::HashMap;

/// Canonicalizes a field name: underscores become spaces, surrounding
/// whitespace is trimmed, and the result is uppercased.
///
/// Detector class labels and catalog column headers both pass through this,
/// so `"basic_model"`, `" Basic Model "` and `"BASIC MODEL"` all address the
/// same field.
pub fn canonical_field_name(raw: &str) -> String {
    raw.replace('_', " ").trim().to_uppercase()
}

/// The expected textual values for the fields of one product's label.
///
/// Sourced from the external specification catalog via
/// [`SpecCatalog`](crate::core::SpecCatalog); read-only for the duration of
/// an image's processing.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    product_code: String,
    expected: HashMap<String, String>,
}

impl FieldSpec {
    /// Builds a specification from (field name, expected value) pairs.
    ///
    /// Field names are canonicalized; later duplicates overwrite earlier
    /// ones.
    pub fn new<I, K, V>(product_code: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let expected = fields
            .into_iter()
            .map(|(k, v)| (canonical_field_name(k.as_ref()), v.into()))
            .filter(|(k, _)| !k.is_empty())
            .collect();
        Self {
            product_code: product_code.into(),
            expected,
        }
    }

    /// The product code this specification belongs to.
    pub fn product_code(&self) -> &str {
        &self.product_code
    }

    /// Whether the specification defines the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.expected.contains_key(&canonical_field_name(field))
    }

    /// The expected value for a field, if the specification defines one.
    pub fn expected_for(&self, field: &str) -> Option<&str> {
        self.expected
            .get(&canonical_field_name(field))
            .map(String::as_str)
    }

    /// Canonical names of all specified fields, in no particular order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.expected.keys().map(String::as_str)
    }

    /// Number of specified fields.
    pub fn len(&self) -> usize {
        self.expected.len()
    }

    /// Whether the specification is empty.
    pub fn is_empty(&self) -> bool {
        self.expected.is_empty()
    }
}
