//! Error handling for dawproject
//!
//! Every decode or encode failure is surfaced as a distinct variant. Nothing
//! falls back to a default value.

use thiserror::Error;

/// Result type alias for dawproject operations
pub type Result<T> = std::result::Result<T, DawError>;

/// Main error type for dawproject operations
#[derive(Error, Debug)]
pub enum DawError {
    // Structural Errors
    #[error("<{element}> is missing required field '{field}'")]
    MissingRequiredField { element: String, field: String },

    #[error("Unknown {role} variant <{tag}>")]
    UnknownVariant { role: String, tag: String },

    #[error("Expected <{expected}> but found <{found}>")]
    UnexpectedElement { expected: String, found: String },

    // Value Errors
    #[error("Malformed value '{value}' for '{field}': {reason}")]
    MalformedValue {
        field: String,
        value: String,
        reason: String,
    },

    // Identity Errors
    #[error("Duplicate identity token '{id}'")]
    DuplicateIdentity { id: String },

    #[error("Dangling reference '{id}' in field '{field}'")]
    DanglingReference { id: String, field: String },

    #[error("Reference '{id}' in field '{field}' names a {found}, expected a {expected}")]
    ReferenceKindMismatch {
        id: String,
        field: String,
        expected: String,
        found: String,
    },

    // Text Errors
    #[error("XML error: {reason}")]
    Xml { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DawError {
    pub(crate) fn missing(element: &str, field: &str) -> Self {
        DawError::MissingRequiredField {
            element: element.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn malformed(field: &str, value: &str, reason: impl ToString) -> Self {
        DawError::MalformedValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn xml(reason: impl ToString) -> Self {
        DawError::Xml {
            reason: reason.to_string(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            DawError::MissingRequiredField { .. } => "MISSING_REQUIRED_FIELD",
            DawError::UnknownVariant { .. } => "UNKNOWN_VARIANT",
            DawError::UnexpectedElement { .. } => "UNEXPECTED_ELEMENT",
            DawError::MalformedValue { .. } => "MALFORMED_VALUE",
            DawError::DuplicateIdentity { .. } => "DUPLICATE_IDENTITY",
            DawError::DanglingReference { .. } => "DANGLING_REFERENCE",
            DawError::ReferenceKindMismatch { .. } => "REFERENCE_KIND_MISMATCH",
            DawError::Xml { .. } => "XML_ERROR",
            DawError::Io(_) => "IO_ERROR",
            DawError::Json(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error can be fixed by editing the input document
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DawError::MissingRequiredField { .. }
                | DawError::UnknownVariant { .. }
                | DawError::MalformedValue { .. }
                | DawError::DanglingReference { .. }
                | DawError::DuplicateIdentity { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            DawError::MissingRequiredField { .. } => vec![
                "Add the missing attribute or child element",
                "Check the document was exported by a complete writer",
            ],
            DawError::UnknownVariant { .. } => vec![
                "The document may come from a newer format version",
                "Retry with lenient decoding to skip unknown elements",
            ],
            DawError::MalformedValue { .. } => vec![
                "Numbers use '.' as decimal separator, 'inf' and '-inf' for infinities",
                "Booleans are 'true' or 'false'",
            ],
            DawError::DuplicateIdentity { .. } => vec![
                "Every id attribute must be unique within one document",
            ],
            DawError::DanglingReference { .. } | DawError::ReferenceKindMismatch { .. } => vec![
                "Check the referenced element exists in the same document",
                "References must point at an entity of the expected kind",
            ],
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DawError::missing("Compressor", "deviceName");
        assert_eq!(err.error_code(), "MISSING_REQUIRED_FIELD");
        assert_eq!(
            err.to_string(),
            "<Compressor> is missing required field 'deviceName'"
        );
    }

    #[test]
    fn test_recovery_suggestions() {
        let err = DawError::DanglingReference {
            id: "id9".to_string(),
            field: "destination".to_string(),
        };
        assert!(!err.recovery_suggestions().is_empty());
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_xml_errors_not_recoverable() {
        let err = DawError::xml("unexpected end of input");
        assert_eq!(err.error_code(), "XML_ERROR");
        assert!(!err.is_recoverable());
    }
}
