//! Common error infrastructure for skill-core.
//!
//! Domain errors (`CastError`, `GroupError`, `AllocationError`) live next to the
//! operations that produce them. This module provides the shared severity
//! classification so the runtime can decide how loudly to log a rejection.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each gate has its own error type with specific variants
//! - **No side effects**: Returning an error never mutates simulation state
//! - **Severity Classification**: Errors are categorized for logging and recovery

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: Temporary conditions that may succeed on a later frame
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected state inconsistencies that require investigation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - polling again on a later frame may succeed.
    ///
    /// Examples: cooldown still running, not enough mana, already casting
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: slot not bound, group index out of range
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: caster created without stat references
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all skill-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
