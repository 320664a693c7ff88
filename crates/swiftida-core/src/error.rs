//! Error types for swiftida.

use crate::EntityId;
use thiserror::Error;

/// Result type for signature edits.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort a single signature edit.
///
/// None of these are fatal to the session: the persisted type is left
/// untouched and further edits may be attempted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The entity has no declared type string.
    #[error("entity {0} has no declared type")]
    NoDeclaredType(EntityId),

    /// The type string does not match the signature grammar.
    #[error("malformed signature at position {pos}: {message} in `{signature}`")]
    MalformedSignature {
        signature: String,
        pos: usize,
        message: String,
    },

    /// A calling convention that cannot be rewritten was found.
    #[error("unsupported calling convention {convention} in `{signature}`")]
    UnsupportedConvention {
        signature: String,
        convention: String,
    },

    /// More arguments than the convention has argument registers.
    #[error("{count} arguments but only {available} argument registers in `{signature}`")]
    TooManyArguments {
        signature: String,
        count: usize,
        available: usize,
    },

    /// A multi-register return asked for an unusable register count.
    #[error("cannot return {requested} words in registers (supported: 2..={available})")]
    RegisterCountExceeded { requested: usize, available: usize },

    /// The type store rejected the rewritten type.
    #[error("failed to set type of {entity} to `{signature}`")]
    TypeCommitFailed { entity: EntityId, signature: String },

    /// No command is registered under this identifier.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

impl Error {
    /// Short warning suitable for a popup; the details belong in the log.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::NoDeclaredType(_) => "The selected item is not a function definition!",
            Error::UnsupportedConvention { .. } => {
                "__swiftcall not supported, remove it first"
            }
            _ => "There was an error, check logs",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_signature_display() {
        let err = Error::MalformedSignature {
            signature: "int f(".to_string(),
            pos: 6,
            message: "expected ')'".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("position 6"));
        assert!(msg.contains("expected ')'"));
        assert!(msg.contains("int f("));
    }

    #[test]
    fn test_commit_failed_display() {
        let err = Error::TypeCommitFailed {
            entity: EntityId(0x1000),
            signature: "void __usercall func()".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("0x1000"));
        assert!(msg.contains("void __usercall func()"));
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            Error::NoDeclaredType(EntityId(1)).user_message(),
            "The selected item is not a function definition!"
        );
        let swiftcall = Error::UnsupportedConvention {
            signature: "int __swiftcall f()".to_string(),
            convention: "__swiftcall".to_string(),
        };
        assert!(swiftcall.user_message().contains("remove it first"));
        let count = Error::RegisterCountExceeded {
            requested: 5,
            available: 4,
        };
        assert_eq!(count.user_message(), "There was an error, check logs");
    }
}
