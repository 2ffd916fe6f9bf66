use sea_orm::sea_query::Order;

use crate::models::FilterOptions;
use crate::schema::OutputColumn;

// Shared default values
const DEFAULT_SORT_COLUMN: OutputColumn = OutputColumn::SortName;
const DEFAULT_SORT_ORDER: &str = "ASC";

/// Result ordering over one of the output columns.
#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub column: OutputColumn,
    pub direction: Order,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            column: DEFAULT_SORT_COLUMN,
            direction: Order::Asc,
        }
    }
}

impl SortSpec {
    #[must_use]
    pub fn new(column: OutputColumn, direction: Order) -> Self {
        Self { column, direction }
    }
}

/// Parse sort column and order from JSON array format
fn parse_json_sort(json: &str) -> (String, String) {
    let sort_vec: Vec<String> = serde_json::from_str(json).unwrap_or_default();
    (
        sort_vec
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_SORT_COLUMN.alias().to_string()),
        sort_vec
            .get(1)
            .cloned()
            .unwrap_or_else(|| DEFAULT_SORT_ORDER.to_string()),
    )
}

/// Convert sort order string to Order enum
fn parse_order(sort_order: &str) -> Order {
    if sort_order.trim().eq_ignore_ascii_case("DESC") {
        Order::Desc
    } else {
        Order::Asc
    }
}

/// Unknown or unsortable names fall back to the default column.
fn find_column(column_name: &str) -> OutputColumn {
    OutputColumn::from_alias(column_name.trim()).unwrap_or(DEFAULT_SORT_COLUMN)
}

/// Parse sorting from `FilterOptions`, supporting both React Admin and standard REST formats
#[must_use]
pub fn parse_sorting(params: &FilterOptions) -> SortSpec {
    let order_param = || {
        params
            .order
            .as_deref()
            .unwrap_or(DEFAULT_SORT_ORDER)
            .to_string()
    };

    let (sort_column, sort_order) = if let Some(sort_by) = &params.sort_by {
        // Standard REST format: sort_by=column&order=ASC/DESC
        (sort_by.clone(), order_param())
    } else if let Some(sort) = &params.sort {
        if sort.trim_start().starts_with('[') {
            // React Admin format: sort=["column", "ASC"]
            parse_json_sort(sort)
        } else {
            (sort.clone(), order_param())
        }
    } else {
        return SortSpec::default();
    };

    SortSpec::new(find_column(&sort_column), parse_order(&sort_order))
}
