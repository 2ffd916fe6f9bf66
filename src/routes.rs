//! HTTP surface of the contact search.
//!
//! ```rust,ignore
//! let search = ContactSearch::new(db.clone(), SearchSettings::default());
//! let app = Router::new().nest("/search", router(search, Arc::new(DatabaseLookups::new(db))));
//! ```

use axum::{
    Json, Router,
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::errors::SearchError;
use crate::filtering::{calculate_content_range, parse_pagination, parse_sorting};
use crate::form::SearchForm;
use crate::input::FilterInput;
use crate::lookups::{LookupOption, LookupProvider};
use crate::models::{ContactRow, CountResponse, FilterOptions};
use crate::search::ContactSearch;

pub const RESOURCE_NAME: &str = "contacts";

#[derive(Clone)]
pub struct SearchState {
    pub search: ContactSearch,
    pub lookups: Arc<dyn LookupProvider>,
}

#[derive(OpenApi)]
#[openapi(
    paths(get_form, list_contacts, count_contacts),
    components(schemas(ContactRow, CountResponse, LookupOption))
)]
pub struct SearchApi;

/// Routes for the search form, the contact list and the contact count.
#[must_use]
pub fn router(search: ContactSearch, lookups: Arc<dyn LookupProvider>) -> Router {
    Router::new()
        .route("/form", get(get_form))
        .route("/contacts", get(list_contacts))
        .route("/contacts/count", get(count_contacts))
        .with_state(SearchState { search, lookups })
}

/// Decode the `filter` parameter into validated search input.
///
/// A missing filter is an empty form, which fails validation on the
/// required groups.
fn filter_input(params: &FilterOptions, search: &ContactSearch) -> Result<FilterInput, SearchError> {
    let values = match params.filter.as_deref().map(str::trim) {
        None | Some("") => Map::new(),
        Some(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(values)) => values,
            Ok(_) => return Err(SearchError::bad_request("Filter must be a JSON object")),
            Err(e) => return Err(SearchError::bad_request(format!("Invalid filter JSON: {e}"))),
        },
    };
    FilterInput::from_form_values(&values, search.settings())
}

#[utoipa::path(
    get,
    path = "/form",
    responses(
        (status = axum::http::StatusCode::OK, description = "Search form fields, defaults and columns"),
        (status = axum::http::StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error")
    ),
    summary = "Describe the search form"
)]
/// # Errors
///
/// Returns `SearchError::Database` when a lookup query fails.
pub async fn get_form(State(state): State<SearchState>) -> Result<Json<SearchForm>, SearchError> {
    Ok(Json(SearchForm::describe(state.lookups.as_ref()).await?))
}

#[utoipa::path(
    get,
    path = "/contacts",
    params(FilterOptions),
    responses(
        (status = axum::http::StatusCode::OK, description = "One page of matching contacts", body = [ContactRow]),
        (status = axum::http::StatusCode::BAD_REQUEST, description = "Malformed filter"),
        (status = axum::http::StatusCode::UNPROCESSABLE_ENTITY, description = "Required filters missing"),
        (status = axum::http::StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error")
    ),
    summary = "Search contacts (in/ex)cluding related contacts within a group"
)]
/// # Errors
///
/// - `SearchError::BadRequest` or `SearchError::MalformedReference` for a
///   malformed `filter`
/// - `SearchError::ValidationFailed` when required groups are missing
/// - `SearchError::Database` when a query fails
pub async fn list_contacts(
    Query(params): Query<FilterOptions>,
    State(state): State<SearchState>,
) -> Result<(HeaderMap, Json<Vec<ContactRow>>), SearchError> {
    let search = &state.search;
    let input = filter_input(&params, search)?;
    let include_contact_ids = params.include_contact_ids.unwrap_or(false);
    let page = parse_pagination(&params, search.settings());
    let sort = parse_sorting(&params);

    let rows = search.rows(&input, page, &sort, include_contact_ids).await?;
    let total = search.count(&input, include_contact_ids).await?;
    let headers = calculate_content_range(page, total, RESOURCE_NAME);
    Ok((headers, Json(rows)))
}

#[utoipa::path(
    get,
    path = "/contacts/count",
    params(FilterOptions),
    responses(
        (status = axum::http::StatusCode::OK, description = "Number of matching contacts", body = CountResponse),
        (status = axum::http::StatusCode::BAD_REQUEST, description = "Malformed filter"),
        (status = axum::http::StatusCode::UNPROCESSABLE_ENTITY, description = "Required filters missing"),
        (status = axum::http::StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error")
    ),
    summary = "Count matching contacts"
)]
/// # Errors
///
/// Fails like [`list_contacts`].
pub async fn count_contacts(
    Query(params): Query<FilterOptions>,
    State(state): State<SearchState>,
) -> Result<Json<CountResponse>, SearchError> {
    let input = filter_input(&params, &state.search)?;
    let total = state
        .search
        .count(&input, params.include_contact_ids.unwrap_or(false))
        .await?;
    Ok(Json(CountResponse { total }))
}
