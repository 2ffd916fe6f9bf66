//! # Sorting & Pagination
//!
//! Translates request parameters into the ordering and row window of a
//! contact search. Filtering itself lives in [`crate::query`], because the
//! search filters are fixed form fields rather than free column filters.
//!
//! ## Query Parameter Examples
//!
//! ```rust,ignore
//! // React Admin style
//! GET /contacts?filter={...}&range=[0,24]&sort=["sort_name","ASC"]
//!
//! // Standard REST style
//! GET /contacts?filter={...}&page=2&per_page=25&sort_by=city&order=DESC
//! ```
//!
//! Sort columns are limited to the output aliases (`contact_id`,
//! `contact_type`, `sort_name`, `street_address`, `postal_code`, `city`);
//! anything else sorts by `sort_name`.

pub mod pagination;
pub mod sort;

pub use pagination::{Page, calculate_content_range, parse_pagination, parse_range};
pub use sort::{SortSpec, parse_sorting};
