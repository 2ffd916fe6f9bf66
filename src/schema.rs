//! Table, alias and column names of the host contact database.

use sea_orm::sea_query::Alias;

pub const CONTACT_TABLE: &str = "civicrm_contact";
pub const ADDRESS_TABLE: &str = "civicrm_address";
pub const GROUP_TABLE: &str = "civicrm_group";
pub const GROUP_CONTACT_TABLE: &str = "civicrm_group_contact";
pub const RELATIONSHIP_TABLE: &str = "civicrm_relationship";
pub const RELATIONSHIP_TYPE_TABLE: &str = "civicrm_relationship_type";

/// Alias of the contact row being listed.
pub const CONTACT_A: &str = "contact_a";
/// Alias of the candidate contact inside the relationship subquery.
pub const PRIMARY_CONTACT: &str = "primary_contact";
/// Alias of the contact at the other end of the relationship.
pub const RELATED_CONTACT: &str = "related_contact";
pub const REL: &str = "rel";
pub const RELATED_GROUP_CONTACT: &str = "related_group_contact";

/// Group membership status meaning "currently a member".
pub const STATUS_ADDED: &str = "Added";

#[must_use]
pub fn name(identifier: &str) -> Alias {
    Alias::new(identifier)
}

/// Qualified column reference, e.g. `column(CONTACT_A, "id")`.
#[must_use]
pub fn column(table: &str, column: &str) -> (Alias, Alias) {
    (Alias::new(table), Alias::new(column))
}

/// Columns exposed to result renderers, in display order.
///
/// The aliases are a compatibility surface: downstream renderers look rows
/// up by these exact names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputColumn {
    ContactId,
    ContactType,
    SortName,
    StreetAddress,
    PostalCode,
    City,
}

impl OutputColumn {
    pub const ALL: [Self; 6] = [
        Self::ContactId,
        Self::ContactType,
        Self::SortName,
        Self::StreetAddress,
        Self::PostalCode,
        Self::City,
    ];

    #[must_use]
    pub const fn alias(self) -> &'static str {
        match self {
            Self::ContactId => "contact_id",
            Self::ContactType => "contact_type",
            Self::SortName => "sort_name",
            Self::StreetAddress => "street_address",
            Self::PostalCode => "postal_code",
            Self::City => "city",
        }
    }

    /// Table alias and column the value is read from.
    #[must_use]
    pub const fn source(self) -> (&'static str, &'static str) {
        match self {
            Self::ContactId => (CONTACT_A, "id"),
            Self::ContactType => (CONTACT_A, "contact_type"),
            Self::SortName => (CONTACT_A, "sort_name"),
            Self::StreetAddress => (ADDRESS_TABLE, "street_address"),
            Self::PostalCode => (ADDRESS_TABLE, "postal_code"),
            Self::City => (ADDRESS_TABLE, "city"),
        }
    }

    #[must_use]
    pub fn from_alias(alias: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.alias() == alias)
    }
}
