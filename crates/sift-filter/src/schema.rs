//! Filterable-field schema.
//!
//! A [`FilterSchema`] is the allow-list of metadata field names a store
//! permits filtering on, each tagged with a kind that drives
//! dialect-specific literal formatting (dates in particular). Absence of
//! a referenced field is a hard error at render time, never a silent
//! no-op, to keep caller-supplied identifiers out of generated query
//! strings.

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, FilterResult};

/// Storage kind of a filterable metadata field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    Int64,
    Decimal,
    Bool,
    Date,
}

/// A single allow-listed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    pub kind: FieldKind,
}

impl SchemaField {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn int64(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Int64)
    }

    pub fn decimal(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Decimal)
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Bool)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }
}

/// Allow-list of filterable fields for one store.
///
/// Lookup is case-sensitive: `ConfigValue` and `configvalue` are distinct
/// fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSchema {
    fields: Vec<SchemaField>,
}

impl FilterSchema {
    /// Create an empty schema (permits nothing).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: impl IntoIterator<Item = SchemaField>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    pub fn with_field(mut self, field: SchemaField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// All allow-listed fields, in insertion order.
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Look up a field by exact name.
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The field's kind, or a [`FilterError::DisallowedIdentifier`] naming
    /// the offending identifier.
    pub fn require(&self, name: &str) -> FilterResult<FieldKind> {
        self.field(name)
            .map(|f| f.kind)
            .ok_or_else(|| FilterError::DisallowedIdentifier(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_known_field() {
        let schema = FilterSchema::from_fields([SchemaField::text("country")]);
        assert_eq!(schema.require("country").unwrap(), FieldKind::Text);
    }

    #[test]
    fn test_require_unknown_field_names_identifier() {
        let schema = FilterSchema::from_fields([SchemaField::text("country")]);
        let err = schema.require("city").unwrap_err();
        assert!(err.to_string().contains("city"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let schema = FilterSchema::from_fields([
            SchemaField::text("ConfigValue"),
            SchemaField::text("configvalue"),
        ]);
        assert!(schema.field("ConfigValue").is_some());
        assert!(schema.field("configvalue").is_some());
        assert!(schema.field("CONFIGVALUE").is_none());
    }
}
