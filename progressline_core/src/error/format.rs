//! Template rendering error types

use thiserror::Error;

/// Errors raised while substituting fields into a template
///
/// Every variant carries the offending template, and the field-carrying
/// variants also carry a dump of the field map that was supplied.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Template references a field the map does not define
    #[error("Missing field '{field}' while formatting {template:?} (fields: {fields})")]
    MissingField {
        template: String,
        field: String,
        fields: String,
    },

    /// Field value cannot be rendered with the requested specifier
    #[error(
        "Cannot format {found} field '{field}' with specifier '{spec}' in {template:?} (fields: {fields})"
    )]
    TypeMismatch {
        template: String,
        field: String,
        spec: char,
        found: &'static str,
        fields: String,
    },

    /// Template text is malformed
    #[error("Invalid template {template:?} at byte {position}: {reason}")]
    Syntax {
        template: String,
        position: usize,
        reason: String,
    },
}

impl FormatError {
    /// Create a missing field error
    pub fn missing_field(template: &str, field: &str, fields: String) -> Self {
        Self::MissingField {
            template: template.to_string(),
            field: field.to_string(),
            fields,
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(
        template: &str,
        field: &str,
        spec: char,
        found: &'static str,
        fields: String,
    ) -> Self {
        Self::TypeMismatch {
            template: template.to_string(),
            field: field.to_string(),
            spec,
            found,
            fields,
        }
    }

    /// Create a template syntax error
    pub fn syntax(template: &str, position: usize, reason: &str) -> Self {
        Self::Syntax {
            template: template.to_string(),
            position,
            reason: reason.to_string(),
        }
    }

    /// The template that failed to render
    pub fn template(&self) -> &str {
        match self {
            Self::MissingField { template, .. }
            | Self::TypeMismatch { template, .. }
            | Self::Syntax { template, .. } => template,
        }
    }
}
