//! Option lists offered by the search form.
//!
//! Groups and relationship types come from the host database; privacy
//! options are a fixed list. Providers are injected so the form can be
//! described without a database (see the test doubles in `tests/`).

use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, FromQueryResult,
    sea_query::{Expr, Order, Query},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::SearchError;
use crate::input::PrivacyFlag;
use crate::schema::{GROUP_TABLE, RELATIONSHIP_TYPE_TABLE, name};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, FromQueryResult)]
pub struct LookupOption {
    pub id: i64,
    pub label: String,
}

impl LookupOption {
    #[must_use]
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PrivacyOption {
    /// Form value, the contact column name (e.g. `do_not_email`)
    pub value: String,
    pub label: String,
}

impl From<PrivacyFlag> for PrivacyOption {
    fn from(flag: PrivacyFlag) -> Self {
        Self {
            value: flag.column().to_string(),
            label: flag.label().to_string(),
        }
    }
}

#[async_trait]
pub trait LookupProvider: Send + Sync {
    /// Groups a contact can be searched in, already in display order.
    async fn groups(&self) -> Result<Vec<LookupOption>, SearchError>;

    /// Relationship types labelled from the A side.
    async fn relationship_types(&self) -> Result<Vec<LookupOption>, SearchError>;

    async fn privacy_options(&self) -> Result<Vec<PrivacyOption>, SearchError> {
        Ok(PrivacyFlag::ALL.into_iter().map(PrivacyOption::from).collect())
    }
}

/// Reads lookups from the `civicrm_group` and `civicrm_relationship_type`
/// tables.
#[derive(Debug, Clone)]
pub struct DatabaseLookups {
    db: DatabaseConnection,
}

impl DatabaseLookups {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LookupProvider for DatabaseLookups {
    async fn groups(&self) -> Result<Vec<LookupOption>, SearchError> {
        let select = Query::select()
            .column(name("id"))
            .expr_as(Expr::col(name("title")), name("label"))
            .from(name(GROUP_TABLE))
            .and_where(Expr::col(name("is_active")).eq(1))
            .order_by(name("title"), Order::Asc)
            .to_owned();
        let statement = self.db.get_database_backend().build(&select);
        Ok(LookupOption::find_by_statement(statement).all(&self.db).await?)
    }

    async fn relationship_types(&self) -> Result<Vec<LookupOption>, SearchError> {
        let select = Query::select()
            .column(name("id"))
            .expr_as(Expr::col(name("label_a_b")), name("label"))
            .from(name(RELATIONSHIP_TYPE_TABLE))
            .order_by(name("id"), Order::Asc)
            .to_owned();
        let statement = self.db.get_database_backend().build(&select);
        Ok(LookupOption::find_by_statement(statement).all(&self.db).await?)
    }
}
