//! Search form descriptor and the managed registration record.
//!
//! The host renders the form from [`SearchForm`] and lists results using
//! [`SearchForm::columns`]. Field names match the keys read by
//! [`FilterInput::from_form_values`](crate::input::FilterInput::from_form_values).

use serde::Serialize;
use std::collections::BTreeMap;

use crate::errors::SearchError;
use crate::input::{
    GROUP_ID, INCLUDING_EXCLUDING, IS_DECEASED, Membership, PRIVACY_OPTIONS, PRIVACY_TOGGLE,
    PrivacyToggle, RELATED_GROUP_ID, RELATIONSHIP_TYPE_ID,
};
use crate::lookups::{LookupOption, LookupProvider};
use crate::schema::OutputColumn;

pub const TITLE: &str = "Search (in/ex)cluding related contacts within a group";

/// Managed record that registers the search with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub name: &'static str,
    pub entity: &'static str,
    pub params: RegistrationParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistrationParams {
    pub version: u8,
    pub label: &'static str,
    pub description: &'static str,
    pub class_name: &'static str,
}

const CLASS_NAME: &str = "CRM_Relatedcontactingroup_Form_Search_ContactInGroup";

pub const REGISTRATION: Registration = Registration {
    name: CLASS_NAME,
    entity: "CustomSearch",
    params: RegistrationParams {
        version: 3,
        label: TITLE,
        description: TITLE,
        class_name: CLASS_NAME,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    Select,
    Radio,
    YesNo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

impl From<LookupOption> for FieldOption {
    fn from(option: LookupOption) -> Self {
        Self::new(option.id.to_string(), option.label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub widget: Widget,
    pub required: bool,
    pub multiple: bool,
    /// Text shown when nothing is selected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    pub options: Vec<FieldOption>,
}

impl FormField {
    fn select(name: &'static str, label: &'static str, options: Vec<FieldOption>) -> Self {
        Self {
            name,
            label,
            widget: Widget::Select,
            required: false,
            multiple: false,
            placeholder: None,
            options,
        }
    }

    fn multiple(mut self, placeholder: &'static str) -> Self {
        self.multiple = true;
        self.placeholder = Some(placeholder);
        self
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayColumn {
    pub header: &'static str,
    pub alias: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchForm {
    pub title: &'static str,
    pub fields: Vec<FormField>,
    pub defaults: BTreeMap<&'static str, &'static str>,
    pub columns: Vec<DisplayColumn>,
}

impl SearchForm {
    /// Build the form with options read from `lookups`.
    ///
    /// # Errors
    ///
    /// Propagates lookup failures.
    pub async fn describe(lookups: &dyn LookupProvider) -> Result<Self, SearchError> {
        let groups: Vec<FieldOption> = lookups
            .groups()
            .await?
            .into_iter()
            .map(FieldOption::from)
            .collect();
        let relationship_types = lookups
            .relationship_types()
            .await?
            .into_iter()
            .map(FieldOption::from)
            .collect();
        let privacy_options = lookups
            .privacy_options()
            .await?
            .into_iter()
            .map(|option| FieldOption::new(option.value, option.label))
            .collect();

        let fields = vec![
            FormField::select(GROUP_ID, "Group", groups.clone())
                .multiple("- select -")
                .required(),
            FormField {
                widget: Widget::YesNo,
                ..FormField::select(
                    IS_DECEASED,
                    "Is deceased?",
                    vec![FieldOption::new("1", "Yes"), FieldOption::new("0", "No")],
                )
            },
            FormField::select(PRIVACY_OPTIONS, "Privacy", privacy_options).multiple("- select -"),
            FormField {
                widget: Widget::Radio,
                ..FormField::select(
                    PRIVACY_TOGGLE,
                    "Privacy Options",
                    vec![
                        FieldOption::new(PrivacyToggle::Exclude.form_value().to_string(), "Exclude"),
                        FieldOption::new(
                            PrivacyToggle::Include.form_value().to_string(),
                            "Include by Privacy Option(s)",
                        ),
                    ],
                )
            },
            FormField::select(RELATED_GROUP_ID, "Related group", groups)
                .multiple("- select -")
                .required(),
            FormField::select(RELATIONSHIP_TYPE_ID, "Relationship type", relationship_types)
                .multiple("- Any relationship -"),
            FormField::select(
                INCLUDING_EXCLUDING,
                "Include/exclude",
                vec![
                    FieldOption::new(Membership::In.form_value(), "Including related contacts"),
                    FieldOption::new(Membership::NotIn.form_value(), "Excluding related contacts"),
                ],
            )
            .required(),
        ];

        Ok(Self {
            title: TITLE,
            fields,
            defaults: Self::defaults(),
            columns: Self::columns(),
        })
    }

    #[must_use]
    pub fn defaults() -> BTreeMap<&'static str, &'static str> {
        BTreeMap::from([
            (INCLUDING_EXCLUDING, Membership::NotIn.form_value()),
            (IS_DECEASED, "0"),
        ])
    }

    /// Result list headers and the row alias each one shows.
    #[must_use]
    pub fn columns() -> Vec<DisplayColumn> {
        [
            ("Contact Id", OutputColumn::ContactId),
            ("Name", OutputColumn::SortName),
            ("Street", OutputColumn::StreetAddress),
            ("Postal code", OutputColumn::PostalCode),
            ("City", OutputColumn::City),
        ]
        .into_iter()
        .map(|(header, column)| DisplayColumn {
            header,
            alias: column.alias(),
        })
        .collect()
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.name == name)
    }
}
