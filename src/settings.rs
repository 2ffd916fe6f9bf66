//! Runtime settings for the contact search.
//!
//! Settings deserialize from JSON with every field optional, so a host can
//! override only what it needs:
//!
//! ```json
//! { "empty_related_group": "match_none", "default_page_size": 50 }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::SearchError;

pub const DEFAULT_PAGE_SIZE: u64 = 25;
pub const MAX_PAGE_SIZE: u64 = 500;

/// What to do when no related group survives parsing.
///
/// An empty related-group set turns the relationship subquery into an empty
/// set: "including" then matches no one and "excluding" matches every
/// contact in the selected groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyRelatedGroupPolicy {
    /// Fail validation on `related_group_id`
    #[default]
    Reject,
    /// Build the empty-set subquery and log a warning
    MatchNone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub empty_related_group: EmptyRelatedGroupPolicy,
    /// Ignore relationships whose `is_active` flag is off
    pub active_relationships_only: bool,
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            empty_related_group: EmptyRelatedGroupPolicy::default(),
            active_relationships_only: false,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl SearchSettings {
    /// Parse settings from a JSON document, filling gaps with defaults.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::BadRequest` when the document is not valid
    /// settings JSON.
    pub fn from_json(json: &str) -> Result<Self, SearchError> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| SearchError::bad_request(format!("Invalid search settings: {e}")))?;
        Ok(settings.normalized())
    }

    /// Page sizes are kept within `1..=max_page_size`.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.max_page_size = self.max_page_size.max(1);
        self.default_page_size = self.default_page_size.clamp(1, self.max_page_size);
        self
    }
}
