use sea_orm::sea_query::{
    MysqlQueryBuilder, PostgresQueryBuilder, SelectStatement, SqliteQueryBuilder,
};
use sea_orm::{DatabaseBackend, Statement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    List,
    Count,
    ContactIds,
}

impl PlanKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Count => "count",
            Self::ContactIds => "contact_ids",
        }
    }
}

/// A built SELECT, ready to be rendered for a backend.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    kind: PlanKind,
    select: SelectStatement,
}

impl QueryPlan {
    #[must_use]
    pub(crate) fn new(kind: PlanKind, select: SelectStatement) -> Self {
        Self { kind, select }
    }

    #[must_use]
    pub fn kind(&self) -> PlanKind {
        self.kind
    }

    #[must_use]
    pub fn select(&self) -> &SelectStatement {
        &self.select
    }

    /// Parameterized statement for execution; values travel separately from
    /// the SQL text.
    #[must_use]
    pub fn statement(&self, backend: DatabaseBackend) -> Statement {
        let statement = backend.build(&self.select);
        tracing::debug!(kind = self.kind.as_str(), sql = %statement.sql, "Built search query");
        statement
    }

    /// SQL with values inlined, for logs and inspection only.
    #[must_use]
    pub fn to_sql(&self, backend: DatabaseBackend) -> String {
        match backend {
            DatabaseBackend::MySql => self.select.to_string(MysqlQueryBuilder),
            DatabaseBackend::Postgres => self.select.to_string(PostgresQueryBuilder),
            DatabaseBackend::Sqlite => self.select.to_string(SqliteQueryBuilder),
        }
    }
}
