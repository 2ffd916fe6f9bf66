//! Typed search filters and their parsing from raw form values.
//!
//! The host hands over a map of named form values, most of them strings.
//! [`FilterInput::from_form_values`] turns that map into typed filters and
//! rejects anything that is not a well-formed identifier or option, so no
//! caller-supplied text ever reaches a query.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::errors::SearchError;
use crate::settings::{EmptyRelatedGroupPolicy, SearchSettings};
use crate::validation::{ValidationErrors, validators};

pub type ContactId = i64;
pub type GroupId = i64;
pub type RelationshipTypeId = i64;

pub const GROUP_ID: &str = "group_id";
pub const RELATED_GROUP_ID: &str = "related_group_id";
pub const RELATIONSHIP_TYPE_ID: &str = "relationship_type_id";
pub const INCLUDING_EXCLUDING: &str = "including_excluding";
pub const PRIVACY_TOGGLE: &str = "privacy_toggle";
pub const PRIVACY_OPTIONS: &str = "privacy_options";
pub const IS_DECEASED: &str = "is_deceased";
/// Prefix of the checkbox keys marking contacts selected in a result list.
pub const SELECTED_CONTACT_PREFIX: &str = "mark_x_";

/// Whether contacts related to the related group are kept or dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Membership {
    #[default]
    In,
    NotIn,
}

impl Membership {
    /// Value used by the search form for this option.
    #[must_use]
    pub const fn form_value(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::NotIn => "not in",
        }
    }

    fn parse(value: &Value) -> Result<Self, SearchError> {
        match value.as_str().map(str::trim) {
            Some("" | "in") => Ok(Self::In),
            Some("not in" | "not_in") => Ok(Self::NotIn),
            _ => Err(malformed(INCLUDING_EXCLUDING, value)),
        }
    }
}

/// How selected privacy flags are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivacyToggle {
    /// Drop contacts that have any selected flag set
    #[default]
    Exclude,
    /// Keep only contacts that have every selected flag set
    Include,
}

impl PrivacyToggle {
    #[must_use]
    pub const fn form_value(self) -> u8 {
        match self {
            Self::Exclude => 1,
            Self::Include => 2,
        }
    }

    fn parse(value: &Value) -> Result<Self, SearchError> {
        let parsed = match value {
            Value::Null => Some(Self::Exclude),
            Value::Number(n) => match n.as_u64() {
                Some(1) => Some(Self::Exclude),
                Some(2) => Some(Self::Include),
                _ => None,
            },
            Value::String(s) => match s.trim() {
                "" | "1" | "exclude" => Some(Self::Exclude),
                "2" | "include" => Some(Self::Include),
                _ => None,
            },
            _ => None,
        };
        parsed.ok_or_else(|| malformed(PRIVACY_TOGGLE, value))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deceased {
    Yes,
    No,
    #[default]
    Any,
}

impl Deceased {
    /// Yes/no radio values are `1` and `0`; anything else means no filter.
    fn parse(value: &Value) -> Self {
        match value {
            Value::Bool(true) => Self::Yes,
            Value::Bool(false) => Self::No,
            Value::Number(n) => match n.as_i64() {
                Some(1) => Self::Yes,
                Some(0) => Self::No,
                _ => Self::Any,
            },
            Value::String(s) => match s.trim() {
                "1" | "yes" => Self::Yes,
                "0" | "no" => Self::No,
                _ => Self::Any,
            },
            _ => Self::Any,
        }
    }

    /// `Some(true)` for deceased only, `Some(false)` for living only.
    #[must_use]
    pub const fn as_flag(self) -> Option<bool> {
        match self {
            Self::Yes => Some(true),
            Self::No => Some(false),
            Self::Any => None,
        }
    }
}

/// Boolean privacy columns of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivacyFlag {
    DoNotPhone,
    DoNotEmail,
    DoNotMail,
    DoNotSms,
    DoNotTrade,
    IsOptOut,
}

impl PrivacyFlag {
    pub const ALL: [Self; 6] = [
        Self::DoNotPhone,
        Self::DoNotEmail,
        Self::DoNotMail,
        Self::DoNotSms,
        Self::DoNotTrade,
        Self::IsOptOut,
    ];

    /// Contact column holding the flag.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::DoNotPhone => "do_not_phone",
            Self::DoNotEmail => "do_not_email",
            Self::DoNotMail => "do_not_mail",
            Self::DoNotSms => "do_not_sms",
            Self::DoNotTrade => "do_not_trade",
            Self::IsOptOut => "is_opt_out",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DoNotPhone => "Do not phone",
            Self::DoNotEmail => "Do not email",
            Self::DoNotMail => "Do not mail",
            Self::DoNotSms => "Do not sms",
            Self::DoNotTrade => "Do not trade",
            Self::IsOptOut => "No bulk emails (User Opt Out)",
        }
    }

    #[must_use]
    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.column() == name)
    }
}

/// Validated filters of one search request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterInput {
    pub group_id: BTreeSet<GroupId>,
    pub related_group_id: BTreeSet<GroupId>,
    /// Empty means any relationship type
    pub relationship_type_id: BTreeSet<RelationshipTypeId>,
    pub including_excluding: Membership,
    pub privacy_toggle: PrivacyToggle,
    pub privacy_options: BTreeSet<PrivacyFlag>,
    pub is_deceased: Deceased,
    /// Contacts ticked in a result list; only applied on request
    pub selected_contact_ids: BTreeSet<ContactId>,
}

impl FilterInput {
    /// Parse and validate the host's raw form values.
    ///
    /// # Errors
    ///
    /// - `SearchError::MalformedReference` when an id, option or flag is not
    ///   well formed
    /// - `SearchError::ValidationFailed` when required filters are empty
    pub fn from_form_values(
        values: &Map<String, Value>,
        settings: &SearchSettings,
    ) -> Result<Self, SearchError> {
        let input = Self {
            group_id: parse_id_list(GROUP_ID, values.get(GROUP_ID))?,
            related_group_id: parse_id_list(RELATED_GROUP_ID, values.get(RELATED_GROUP_ID))?,
            relationship_type_id: parse_id_list(
                RELATIONSHIP_TYPE_ID,
                values.get(RELATIONSHIP_TYPE_ID),
            )?,
            including_excluding: values
                .get(INCLUDING_EXCLUDING)
                .filter(|value| !value.is_null())
                .map(Membership::parse)
                .transpose()?
                .unwrap_or_default(),
            privacy_toggle: values
                .get(PRIVACY_TOGGLE)
                .map(PrivacyToggle::parse)
                .transpose()?
                .unwrap_or_default(),
            privacy_options: parse_privacy_options(values.get(PRIVACY_OPTIONS))?,
            is_deceased: values
                .get(IS_DECEASED)
                .map(Deceased::parse)
                .unwrap_or_default(),
            selected_contact_ids: parse_selected_contacts(values)?,
        };

        input.validate(settings)?;
        if input.related_group_id.is_empty() {
            tracing::warn!(
                membership = input.including_excluding.form_value(),
                "No related group selected; relationship subquery is empty"
            );
        }
        Ok(input)
    }

    /// Check the filters required to build a well-formed predicate.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::ValidationFailed` listing every failing field.
    pub fn validate(&self, settings: &SearchSettings) -> Result<(), SearchError> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::require_ids(
            GROUP_ID,
            &self.group_id,
            "Select at least one group",
        ));
        if settings.empty_related_group == EmptyRelatedGroupPolicy::Reject {
            errors.check(validators::require_ids(
                RELATED_GROUP_ID,
                &self.related_group_id,
                "Select at least one related group",
            ));
        }
        for (field, ids) in [
            (GROUP_ID, &self.group_id),
            (RELATED_GROUP_ID, &self.related_group_id),
            (RELATIONSHIP_TYPE_ID, &self.relationship_type_id),
        ] {
            if let Some(bad) = ids.iter().find(|id| **id <= 0) {
                return Err(SearchError::malformed(field, bad.to_string()));
            }
        }
        errors.result().map_err(SearchError::from)
    }
}

fn malformed(field: &str, value: &Value) -> SearchError {
    let shown = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    SearchError::malformed(field, shown)
}

/// Multi-selects arrive as arrays, single selects as scalars.
fn list_items(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
    }
}

/// Empty entries (`""`, `"0"`, `0`, `null`, `false`) are dropped.
fn parse_id(field: &str, item: &Value) -> Result<Option<i64>, SearchError> {
    match item {
        Value::Null | Value::Bool(false) => Ok(None),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(None),
            Some(id) if id > 0 => Ok(Some(id)),
            _ => Err(malformed(field, item)),
        },
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed == "0" {
                return Ok(None);
            }
            if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed(field, item));
            }
            trimmed
                .parse::<i64>()
                .map(Some)
                .map_err(|_| malformed(field, item))
        }
        _ => Err(malformed(field, item)),
    }
}

fn parse_id_list(field: &str, value: Option<&Value>) -> Result<BTreeSet<i64>, SearchError> {
    let mut ids = BTreeSet::new();
    for item in list_items(value) {
        if let Some(id) = parse_id(field, item)? {
            ids.insert(id);
        }
    }
    Ok(ids)
}

fn parse_privacy_options(value: Option<&Value>) -> Result<BTreeSet<PrivacyFlag>, SearchError> {
    let mut flags = BTreeSet::new();
    for item in list_items(value) {
        match item {
            Value::String(s) if s.trim().is_empty() => {}
            Value::String(s) => {
                let flag = PrivacyFlag::from_column(s.trim())
                    .ok_or_else(|| malformed(PRIVACY_OPTIONS, item))?;
                flags.insert(flag);
            }
            _ => return Err(malformed(PRIVACY_OPTIONS, item)),
        }
    }
    Ok(flags)
}

/// A ticked checkbox carries a truthy value.
fn is_ticked(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(ticked) => *ticked,
        Value::Number(n) => n.as_f64().is_some_and(|n| n.abs() > 0.0),
        Value::String(s) => !matches!(s.trim(), "" | "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Checkbox keys look like `mark_x_123`; unticked boxes are not submitted.
fn parse_selected_contacts(values: &Map<String, Value>) -> Result<BTreeSet<ContactId>, SearchError> {
    let mut ids = BTreeSet::new();
    for (key, value) in values {
        let Some(suffix) = key.strip_prefix(SELECTED_CONTACT_PREFIX) else {
            continue;
        };
        if !is_ticked(value) {
            continue;
        }
        let id = parse_id(key, &Value::String(suffix.to_string()))?
            .ok_or_else(|| SearchError::malformed(key.as_str(), suffix))?;
        ids.insert(id);
    }
    Ok(ids)
}
