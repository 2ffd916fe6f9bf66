use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters of the contact search endpoints.
///
/// # Filtering
/// The `filter` parameter is a JSON object of search form values, for example:
/// ```json
/// {"group_id": ["10"], "related_group_id": ["20"], "including_excluding": "not in"}
/// ```
///
/// # Pagination
/// Two pagination formats are supported:
/// - **React Admin format:** Use the `range` parameter with JSON array format, for example: `[0,24]`
/// - **Standard REST format:** Use `page` and `per_page` parameters, for example: `page=1&per_page=25`
///
/// # Sorting
/// The `sort` parameter should be a JSON array with the column name and sort order, for example:
/// ```json
/// ["sort_name", "ASC"]
/// ```
#[derive(Debug, Deserialize, IntoParams, ToSchema, Default)]
#[into_params(parameter_in = Query)]
pub struct FilterOptions {
    /// JSON-encoded search form values.
    #[param(example = r#"{"group_id":["10"],"related_group_id":["20"],"including_excluding":"in"}"#)]
    pub filter: Option<String>,
    /// Range for pagination in the format "[start, end]".
    #[param(example = "[0,24]")]
    pub range: Option<String>,
    /// Page number for standard REST pagination (1-based).
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Number of items per page for standard REST pagination.
    #[param(example = 25)]
    pub per_page: Option<u64>,
    /// Sort order for the results in the format `["column", "order"]`.
    #[param(example = r#"["sort_name", "ASC"]"#)]
    pub sort: Option<String>,
    /// Sort column for standard REST format.
    #[param(example = "city")]
    pub sort_by: Option<String>,
    /// Sort order for standard REST format (ASC or DESC).
    #[param(example = "ASC")]
    pub order: Option<String>,
    /// Restrict results to the contacts ticked in the filter (`mark_x_<id>` keys).
    pub include_contact_ids: Option<bool>,
}

/// One row of the result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, FromQueryResult)]
pub struct ContactRow {
    pub contact_id: i64,
    pub contact_type: Option<String>,
    pub sort_name: Option<String>,
    pub street_address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromQueryResult)]
pub struct ContactIdRow {
    pub contact_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromQueryResult)]
pub struct CountRow {
    pub total: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CountResponse {
    pub total: u64,
}
