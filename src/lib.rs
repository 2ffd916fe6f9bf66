//! # relatedcontactingroup
//!
//! Contact search that lists the contacts of one or more groups, keeping or
//! dropping those related to active members of another set of groups.
//!
//! The building blocks, bottom-up:
//! - [`input::FilterInput`] parses and validates raw form values
//! - [`query::FilterQueryBuilder`] turns the input into list, count and id
//!   statements with bound parameters
//! - [`search::ContactSearch`] executes them through Sea-ORM
//! - [`routes::router`] serves the form and results over Axum
//!
//! ```rust,ignore
//! let settings = SearchSettings::default();
//! let input = FilterInput::from_form_values(&values, &settings)?;
//! let builder = FilterQueryBuilder::new(&input, &settings)?;
//! let sql = builder.build_count(false).to_sql(DatabaseBackend::MySql);
//! ```

pub mod errors;
pub mod filtering;
pub mod form;
pub mod input;
pub mod lookups;
pub mod models;
pub mod query;
pub mod routes;
pub mod schema;
pub mod search;
pub mod settings;
pub mod validation;

pub use errors::SearchError;
pub use form::{REGISTRATION, SearchForm};
pub use input::FilterInput;
pub use lookups::{DatabaseLookups, LookupProvider};
pub use query::{FilterQueryBuilder, QueryPlan};
pub use routes::router;
pub use search::ContactSearch;
pub use settings::{EmptyRelatedGroupPolicy, SearchSettings};
