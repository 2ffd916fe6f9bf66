use sea_orm::sea_query::{Alias, Expr, Func, JoinType, Order, Query, SelectStatement};

use crate::errors::SearchError;
use crate::filtering::{Page, SortSpec};
use crate::input::FilterInput;
use crate::schema::{
    ADDRESS_TABLE, CONTACT_A, CONTACT_TABLE, GROUP_CONTACT_TABLE, OutputColumn, STATUS_ADDED,
    column, name,
};
use crate::settings::SearchSettings;

use super::plan::{PlanKind, QueryPlan};
use super::predicate::{Clause, Predicate, RelatedTo};

/// Builds the list, count and id statements of one search request.
///
/// Construction validates the input, so every plan produced by a builder is
/// well formed. The builder holds no state beyond its borrowed inputs and
/// produces a fresh plan on every call.
#[derive(Debug, Clone, Copy)]
pub struct FilterQueryBuilder<'a> {
    input: &'a FilterInput,
    settings: &'a SearchSettings,
}

impl<'a> FilterQueryBuilder<'a> {
    /// # Errors
    ///
    /// Returns `SearchError::ValidationFailed` or
    /// `SearchError::MalformedReference` when `input` cannot produce a
    /// well-formed predicate under `settings`.
    pub fn new(input: &'a FilterInput, settings: &'a SearchSettings) -> Result<Self, SearchError> {
        input.validate(settings)?;
        if input.related_group_id.is_empty() {
            tracing::debug!(
                membership = input.including_excluding.form_value(),
                "Building search with an empty relationship subquery"
            );
        }
        Ok(Self { input, settings })
    }

    /// Output columns of the list query, in display order.
    #[must_use]
    pub fn build_select() -> &'static [OutputColumn] {
        &OutputColumn::ALL
    }

    /// Contact table with its primary address and active group memberships.
    ///
    /// Both joins are LEFT joins: a contact without an address or a group
    /// row is still present before the WHERE clause is applied.
    pub fn build_from(query: &mut SelectStatement) {
        query
            .from_as(name(CONTACT_TABLE), name(CONTACT_A))
            .join(
                JoinType::LeftJoin,
                name(ADDRESS_TABLE),
                Expr::col(column(ADDRESS_TABLE, "is_primary"))
                    .eq(1)
                    .and(Expr::col(column(ADDRESS_TABLE, "contact_id")).equals(column(CONTACT_A, "id"))),
            )
            .join(
                JoinType::LeftJoin,
                name(GROUP_CONTACT_TABLE),
                Expr::col(column(GROUP_CONTACT_TABLE, "contact_id"))
                    .equals(column(CONTACT_A, "id"))
                    .and(Expr::col(column(GROUP_CONTACT_TABLE, "status")).eq(STATUS_ADDED)),
            );
    }

    /// The search predicate, one clause per filter.
    #[must_use]
    pub fn build_where(&self, include_contact_ids: bool) -> Predicate {
        let input = self.input;
        let mut predicate = Predicate::new();

        predicate.push(Clause::NotDeleted);
        predicate.push(Clause::InGroups(input.group_id.clone()));
        predicate.push(Clause::Related(RelatedTo {
            membership: input.including_excluding,
            related_groups: input.related_group_id.clone(),
            relationship_types: input.relationship_type_id.clone(),
            active_relationships_only: self.settings.active_relationships_only,
        }));

        for flag in &input.privacy_options {
            predicate.push(Clause::Privacy {
                flag: *flag,
                toggle: input.privacy_toggle,
            });
        }

        if let Some(deceased) = input.is_deceased.as_flag() {
            predicate.push(Clause::Deceased(deceased));
        }

        if include_contact_ids && !input.selected_contact_ids.is_empty() {
            predicate.push(Clause::SelectedContacts(input.selected_contact_ids.clone()));
        }

        predicate
    }

    /// One page of result rows.
    #[must_use]
    pub fn build_list(&self, page: Page, sort: &SortSpec, include_contact_ids: bool) -> QueryPlan {
        let mut query = Query::select();
        query.distinct();
        for output in Self::build_select() {
            query.expr_as(Expr::col(source_column(*output)), name(output.alias()));
        }
        self.finish(&mut query, include_contact_ids);
        apply_sort_and_page(&mut query, sort, page);
        QueryPlan::new(PlanKind::List, query)
    }

    /// Number of distinct contacts matching the search.
    #[must_use]
    pub fn build_count(&self, include_contact_ids: bool) -> QueryPlan {
        let mut query = Query::select();
        query.expr_as(
            Func::count_distinct(Expr::col(column(CONTACT_A, "id"))),
            name("total"),
        );
        self.finish(&mut query, include_contact_ids);
        QueryPlan::new(PlanKind::Count, query)
    }

    /// Ids only, for bulk actions on the whole result set.
    #[must_use]
    pub fn build_contact_ids(
        &self,
        page: Page,
        sort: &SortSpec,
        include_contact_ids: bool,
    ) -> QueryPlan {
        let mut query = Query::select();
        query.distinct().expr_as(
            Expr::col(column(CONTACT_A, "id")),
            name(OutputColumn::ContactId.alias()),
        );
        if sort.column != OutputColumn::ContactId {
            // DISTINCT needs the sort key in the select list
            query.expr_as(Expr::col(source_column(sort.column)), name(sort.column.alias()));
        }
        self.finish(&mut query, include_contact_ids);
        apply_sort_and_page(&mut query, sort, page);
        QueryPlan::new(PlanKind::ContactIds, query)
    }

    fn finish(&self, query: &mut SelectStatement, include_contact_ids: bool) {
        Self::build_from(query);
        query.cond_where(self.build_where(include_contact_ids).to_condition());
    }
}

fn source_column(output: OutputColumn) -> (Alias, Alias) {
    let (table, col) = output.source();
    column(table, col)
}

fn apply_sort_and_page(query: &mut SelectStatement, sort: &SortSpec, page: Page) {
    query.order_by(name(sort.column.alias()), sort.direction.clone());
    if sort.column != OutputColumn::ContactId {
        // Stable pages when sort keys tie
        query.order_by(name(OutputColumn::ContactId.alias()), Order::Asc);
    }
    if page.is_paginated() {
        query.limit(page.limit).offset(page.offset);
    }
}
