//! Error types for reference resolution, conversion and parsing

use thiserror::Error;

/// Errors raised while resolving a reference against a document.
///
/// Not finding an entity is never an error; it is reported through
/// [`ResolutionState::Failed`](crate::ResolutionState::Failed).
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The persisted unique id cannot denote an entity of this kind
    #[error("Malformed unique id {unique_id:?} for {kind}")]
    MalformedUniqueId {
        /// Entity kind the reference points at
        kind: &'static str,
        /// The offending unique id
        unique_id: String,
    },

    /// The document returned a value it does not itself keep alive
    #[error("Document did not retain the {kind} resolved for {id}")]
    DetachedValue {
        /// Entity kind the reference points at
        kind: &'static str,
        /// The id that was looked up
        id: String,
    },

    /// Failure raised by the document layer itself
    #[error(transparent)]
    Document(#[from] anyhow::Error),
}

/// Errors raised by the cast-from / cast-to protocol.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The source is well formed but denotes another kind of entity
    #[error("Kind mismatch: expected {expected}, got {found}")]
    KindMismatch {
        /// Kind the conversion needed
        expected: &'static str,
        /// Description of what was supplied
        found: String,
    },

    /// The source cannot be interpreted at all
    #[error("Malformed {expected}: {reason}")]
    Malformed {
        /// Kind the conversion needed
        expected: &'static str,
        /// Why the source was rejected
        reason: String,
    },

    /// An id-only source needs an active document to be checked against
    #[error("No active document to convert {expected} against")]
    NoActiveDocument {
        /// Kind the conversion needed
        expected: &'static str,
    },

    /// Failure raised by the document layer itself
    #[error(transparent)]
    Document(anyhow::Error),
}

impl From<ResolveError> for ConversionError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::MalformedUniqueId { kind, unique_id } => ConversionError::Malformed {
                expected: kind,
                reason: format!("unique id {unique_id:?} is not well formed"),
            },
            ResolveError::DetachedValue { kind, id } => ConversionError::Document(
                anyhow::anyhow!("document did not retain the {kind} resolved for {id}"),
            ),
            ResolveError::Document(err) => ConversionError::Document(err),
        }
    }
}

/// Errors raised when parsing display text back into a reference id.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The text is not a member of the kind's closed name enumeration
    #[error("Unknown {kind} name: {text:?}")]
    UnknownName {
        /// Entity kind being parsed
        kind: &'static str,
        /// The rejected text
        text: String,
    },

    /// This kind has no textual construction path
    #[error("{kind} references cannot be parsed from text")]
    NotParsable {
        /// Entity kind being parsed
        kind: &'static str,
    },
}

/// Result type alias for resolution operations
pub type Result<T> = std::result::Result<T, ResolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_unique_id_maps_to_malformed_conversion() {
        let err = ResolveError::MalformedUniqueId {
            kind: "category",
            unique_id: "a b".to_string(),
        };
        let converted = ConversionError::from(err);
        assert!(matches!(
            converted,
            ConversionError::Malformed {
                expected: "category",
                ..
            }
        ));
    }

    #[test]
    fn test_document_error_passes_through_unchanged() {
        let err = ResolveError::from(anyhow::anyhow!("document is corrupted"));
        assert_eq!(err.to_string(), "document is corrupted");

        let converted = ConversionError::from(err);
        assert_eq!(converted.to_string(), "document is corrupted");
    }

    #[test]
    fn test_detached_value_is_a_document_failure() {
        let err = ResolveError::DetachedValue {
            kind: "category",
            id: "1200".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Document did not retain the category resolved for 1200"
        );
        assert!(matches!(
            ConversionError::from(err),
            ConversionError::Document(_)
        ));
    }

    #[test]
    fn test_kind_mismatch_message() {
        let err = ConversionError::KindMismatch {
            expected: "category",
            found: "element id 42".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Kind mismatch: expected category, got element id 42"
        );
    }
}
