//! # Search query construction
//!
//! The search is one SELECT over `civicrm_contact AS contact_a`, joined to
//! the primary address and to active group memberships, filtered by a
//! conjunction of clauses. The relationship clause tests `contact_a.id`
//! against a subquery of contacts related (in either direction) to active
//! members of the related groups.
//!
//! ```rust,ignore
//! let builder = FilterQueryBuilder::new(&input, &settings)?;
//! let plan = builder.build_list(page, &sort, false);
//! let statement = plan.statement(DatabaseBackend::MySql);
//! ```
//!
//! Every id, status and flag value is bound as a parameter.

pub mod builder;
pub mod plan;
pub mod predicate;

pub use builder::FilterQueryBuilder;
pub use plan::{PlanKind, QueryPlan};
pub use predicate::{Clause, Predicate, RelatedTo};
