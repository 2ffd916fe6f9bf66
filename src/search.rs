use sea_orm::{ConnectionTrait, DatabaseConnection, FromQueryResult};

use crate::errors::SearchError;
use crate::filtering::{Page, SortSpec};
use crate::input::{ContactId, FilterInput};
use crate::models::{ContactIdRow, ContactRow, CountRow};
use crate::query::FilterQueryBuilder;
use crate::settings::SearchSettings;

/// Runs contact searches against a host database.
#[derive(Debug, Clone)]
pub struct ContactSearch {
    db: DatabaseConnection,
    settings: SearchSettings,
}

impl ContactSearch {
    #[must_use]
    pub fn new(db: DatabaseConnection, settings: SearchSettings) -> Self {
        Self {
            db,
            settings: settings.normalized(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// # Errors
    ///
    /// Returns a validation error when `input` cannot produce a well-formed
    /// predicate.
    pub fn builder<'a>(&'a self, input: &'a FilterInput) -> Result<FilterQueryBuilder<'a>, SearchError> {
        FilterQueryBuilder::new(input, &self.settings)
    }

    /// One page of matching contacts.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, or `SearchError::Database`
    /// when the query fails.
    pub async fn rows(
        &self,
        input: &FilterInput,
        page: Page,
        sort: &SortSpec,
        include_contact_ids: bool,
    ) -> Result<Vec<ContactRow>, SearchError> {
        let plan = self.builder(input)?.build_list(page, sort, include_contact_ids);
        let statement = plan.statement(self.db.get_database_backend());
        let rows = ContactRow::find_by_statement(statement).all(&self.db).await?;
        tracing::debug!(count = rows.len(), "Contact search returned rows");
        Ok(rows)
    }

    /// Number of distinct matching contacts.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, or `SearchError::Database`
    /// when the query fails.
    pub async fn count(
        &self,
        input: &FilterInput,
        include_contact_ids: bool,
    ) -> Result<u64, SearchError> {
        let plan = self.builder(input)?.build_count(include_contact_ids);
        let statement = plan.statement(self.db.get_database_backend());
        let total = CountRow::find_by_statement(statement)
            .one(&self.db)
            .await?
            .map_or(0, |row| row.total);
        Ok(u64::try_from(total).unwrap_or(0))
    }

    /// Ids of matching contacts in result order.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, or `SearchError::Database`
    /// when the query fails.
    pub async fn contact_ids(
        &self,
        input: &FilterInput,
        page: Page,
        sort: &SortSpec,
        include_contact_ids: bool,
    ) -> Result<Vec<ContactId>, SearchError> {
        let plan = self
            .builder(input)?
            .build_contact_ids(page, sort, include_contact_ids);
        let statement = plan.statement(self.db.get_database_backend());
        let rows = ContactIdRow::find_by_statement(statement).all(&self.db).await?;
        Ok(rows.into_iter().map(|row| row.contact_id).collect())
    }
}
