//! WHERE predicate of the contact search as a conjunction of typed clauses.
//!
//! Each [`Clause`] is derived from one filter and renders to a sea-query
//! expression whose literals are bound parameters. The predicate is always
//! the AND of its clauses.

use sea_orm::{
    Condition,
    sea_query::{Expr, JoinType, Query, SelectStatement, SimpleExpr},
};
use std::collections::BTreeSet;

use crate::input::{ContactId, GroupId, Membership, PrivacyFlag, PrivacyToggle, RelationshipTypeId};
use crate::schema::{
    CONTACT_A, CONTACT_TABLE, GROUP_CONTACT_TABLE, PRIMARY_CONTACT, REL, RELATED_CONTACT,
    RELATED_GROUP_CONTACT, RELATIONSHIP_TABLE, STATUS_ADDED, column, name,
};

/// Relationship test: is the listed contact linked to an active member of
/// one of the related groups?
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedTo {
    pub membership: Membership,
    /// Empty renders a subquery that selects no one
    pub related_groups: BTreeSet<GroupId>,
    /// Empty means any relationship type
    pub relationship_types: BTreeSet<RelationshipTypeId>,
    pub active_relationships_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// `contact_a.is_deleted = 0`
    NotDeleted,
    /// `civicrm_group_contact.group_id IN (...)`
    InGroups(BTreeSet<GroupId>),
    /// `contact_a.id [NOT] IN (relationship subquery)`
    Related(RelatedTo),
    /// `contact_a.<flag> = 1` or `!= 1`
    Privacy {
        flag: PrivacyFlag,
        toggle: PrivacyToggle,
    },
    /// `contact_a.is_deceased = <flag>`
    Deceased(bool),
    /// `contact_a.id IN (...)`
    SelectedContacts(BTreeSet<ContactId>),
}

impl Clause {
    #[must_use]
    pub fn to_expr(&self) -> SimpleExpr {
        match self {
            Self::NotDeleted => Expr::col(column(CONTACT_A, "is_deleted")).eq(0),
            Self::InGroups(groups) => {
                Expr::col(column(GROUP_CONTACT_TABLE, "group_id")).is_in(groups.iter().copied())
            }
            Self::Related(related) => {
                let contact_id = Expr::col(column(CONTACT_A, "id"));
                let subquery = related.subquery();
                match related.membership {
                    Membership::In => contact_id.in_subquery(subquery),
                    Membership::NotIn => contact_id.not_in_subquery(subquery),
                }
            }
            Self::Privacy { flag, toggle } => {
                let flag_column = Expr::col(column(CONTACT_A, flag.column()));
                match toggle {
                    PrivacyToggle::Include => flag_column.eq(1),
                    PrivacyToggle::Exclude => flag_column.ne(1),
                }
            }
            Self::Deceased(deceased) => Expr::col(column(CONTACT_A, "is_deceased")).eq(*deceased),
            Self::SelectedContacts(ids) => {
                Expr::col(column(CONTACT_A, "id")).is_in(ids.iter().copied())
            }
        }
    }
}

impl RelatedTo {
    /// Contacts (non-deleted) linked, in either direction of the
    /// relationship, to an active member of a related group.
    #[must_use]
    pub fn subquery(&self) -> SelectStatement {
        let rel = |col: &str| Expr::col(column(REL, col));
        let primary_id = || column(PRIMARY_CONTACT, "id");
        let related_id = || column(RELATED_CONTACT, "id");

        let mut relationship_on = Condition::all().add(
            Condition::any()
                .add(rel("contact_id_a").equals(primary_id()))
                .add(rel("contact_id_b").equals(primary_id())),
        );
        if !self.relationship_types.is_empty() {
            relationship_on = relationship_on
                .add(rel("relationship_type_id").is_in(self.relationship_types.iter().copied()));
        }
        if self.active_relationships_only {
            relationship_on = relationship_on.add(rel("is_active").eq(1));
        }

        let related_on = Condition::any()
            .add(
                Condition::all()
                    .add(rel("contact_id_a").equals(primary_id()))
                    .add(rel("contact_id_b").equals(related_id())),
            )
            .add(
                Condition::all()
                    .add(rel("contact_id_b").equals(primary_id()))
                    .add(rel("contact_id_a").equals(related_id())),
            );

        let related_groups = if self.related_groups.is_empty() {
            Expr::val(1).eq(0)
        } else {
            Expr::col(column(RELATED_GROUP_CONTACT, "group_id"))
                .is_in(self.related_groups.iter().copied())
        };

        Query::select()
            .column(primary_id())
            .from_as(name(CONTACT_TABLE), name(PRIMARY_CONTACT))
            .join_as(
                JoinType::InnerJoin,
                name(RELATIONSHIP_TABLE),
                name(REL),
                relationship_on,
            )
            .join_as(
                JoinType::InnerJoin,
                name(CONTACT_TABLE),
                name(RELATED_CONTACT),
                related_on,
            )
            .join_as(
                JoinType::InnerJoin,
                name(GROUP_CONTACT_TABLE),
                name(RELATED_GROUP_CONTACT),
                Expr::col(column(RELATED_GROUP_CONTACT, "contact_id")).equals(related_id()),
            )
            .and_where(Expr::col(column(PRIMARY_CONTACT, "is_deleted")).eq(0))
            .and_where(Expr::col(column(RELATED_GROUP_CONTACT, "status")).eq(STATUS_ADDED))
            .and_where(related_groups)
            .to_owned()
    }
}

/// Conjunction of clauses; an empty predicate matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    #[must_use]
    pub fn contains(&self, clause: &Clause) -> bool {
        self.clauses.contains(clause)
    }

    #[must_use]
    pub fn to_condition(&self) -> Condition {
        self.clauses
            .iter()
            .fold(Condition::all(), |condition, clause| condition.add(clause.to_expr()))
    }
}
