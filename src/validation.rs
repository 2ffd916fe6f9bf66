//! Validation Support
//!
//! Search filters are checked before any statement is built. A filter set
//! either passes every check or produces a [`ValidationErrors`] collection
//! listing each failing field, so the caller can report all of them at once.
//!
//! # Example
//!
//! ```rust,ignore
//! use relatedcontactingroup::validation::{ValidationErrors, validators};
//!
//! let mut errors = ValidationErrors::new();
//! errors.check(validators::require_ids(
//!     "group_id",
//!     &input.group_id,
//!     "Select at least one group",
//! ));
//! errors.result()?;
//! ```

use serde::Serialize;
use std::fmt;

/// Validation error with field name and message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// The form field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Record the error of a failed check, if any.
    pub fn check(&mut self, outcome: Result<(), ValidationError>) {
        if let Err(error) = outcome {
            self.add(error);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Whether a given field has at least one error
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }

    /// Convert to Result
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one error was recorded.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Helper validators for search filter fields
pub mod validators {
    use super::ValidationError;
    use std::collections::BTreeSet;

    /// A required multi-select must keep at least one id after empty
    /// entries have been dropped.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for `field` when `ids` is empty.
    pub fn require_ids(
        field: &str,
        ids: &BTreeSet<i64>,
        message: &str,
    ) -> Result<(), ValidationError> {
        if ids.is_empty() {
            return Err(ValidationError::new(field, message));
        }
        Ok(())
    }
}
