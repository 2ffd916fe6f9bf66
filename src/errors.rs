//! # Error Handling for the contact search
//!
//! Every failure of the search surfaces as a [`SearchError`]:
//! - Returns an appropriate HTTP status code when served through the router
//! - Sends sanitized, user-friendly error messages
//! - Logs database failures through `tracing` without exposing them
//!
//! A query plan is either fully built or not built at all. Validation and
//! malformed-identifier errors are raised before any SQL exists.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use relatedcontactingroup::SearchError;
//!
//! async fn handler() -> Result<Json<Vec<ContactRow>>, SearchError> {
//!     let input = FilterInput::from_form_values(&values, &settings)?;
//!     let rows = search.rows(&input, page, &sort, false).await?;
//!     Ok(Json(rows))
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

use crate::validation::ValidationErrors;

#[derive(Debug)]
pub enum SearchError {
    /// 422 Unprocessable Entity - required filters missing or empty
    ValidationFailed {
        errors: ValidationErrors,
    },

    /// 400 Bad Request - an identifier or option is not well formed
    MalformedReference {
        /// Form field holding the bad value (e.g. `group_id`)
        field: String,
        /// The offending value, as received
        value: String,
    },

    /// 400 Bad Request - the request itself could not be read
    BadRequest {
        message: String,
    },

    /// 500 Internal Server Error - Database error (details logged, not exposed)
    Database {
        message: String,
        internal: DbErr,
    },
}

impl SearchError {
    #[must_use]
    pub fn validation_failed(errors: ValidationErrors) -> Self {
        Self::ValidationFailed { errors }
    }

    /// Create a 400 error for an identifier that must not reach the query
    ///
    /// # Example
    /// ```rust,ignore
    /// return Err(SearchError::malformed("group_id", "1; DROP TABLE"));
    /// ```
    #[must_use]
    pub fn malformed(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::MalformedReference {
            field: field.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a 500 error from a database error
    ///
    /// The database error details are logged but NOT sent to the user.
    #[must_use]
    pub fn database(err: DbErr) -> Self {
        Self::Database {
            message: "A database error occurred".to_string(),
            internal: err,
        }
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MalformedReference { .. } | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the user-facing error message (sanitized)
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ValidationFailed { errors } => match errors.errors() {
                [single] => single.message.clone(),
                many => format!(
                    "Validation failed: {}",
                    many.iter()
                        .map(|error| error.message.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            },
            Self::MalformedReference { field, value } => {
                format!("Invalid value '{}' for {field}", truncate(value))
            }
            Self::BadRequest { message } | Self::Database { message, .. } => message.clone(),
        }
    }

    /// Log internal error details (not sent to user)
    fn log_internal(&self) {
        match self {
            Self::Database { internal, .. } => {
                tracing::error!(error = ?internal, "Database error during contact search");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "Contact search rejected"
                );
            }
        }
    }
}

/// Echoed values are cut short so a hostile payload is not reflected whole.
fn truncate(value: &str) -> String {
    const MAX_ECHO: usize = 64;
    if value.chars().count() <= MAX_ECHO {
        value.to_string()
    } else {
        let head: String = value.chars().take(MAX_ECHO).collect();
        format!("{head}...")
    }
}

/// Error response sent to users (sanitized)
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let response = match &self {
            Self::ValidationFailed { errors } => ErrorResponse {
                error: "Validation failed".to_string(),
                details: Some(errors.errors().iter().map(ToString::to_string).collect()),
            },
            _ => ErrorResponse {
                error: self.user_message(),
                details: None,
            },
        };

        (status, Json(response)).into_response()
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ValidationFailed { errors } => Some(errors),
            Self::Database { internal, .. } => Some(internal),
            _ => None,
        }
    }
}

impl From<DbErr> for SearchError {
    fn from(err: DbErr) -> Self {
        Self::database(err)
    }
}

impl From<ValidationErrors> for SearchError {
    fn from(errors: ValidationErrors) -> Self {
        Self::validation_failed(errors)
    }
}
