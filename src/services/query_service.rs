use serde::Deserialize;

use crate::error::AppError;
use crate::models::{MonthIndex, TransactionPage};
use crate::repositories::{TransactionFilter, TransactionStore};

pub const DEFAULT_PAGE: u64 = 1;

/// Query string of the transaction listing (and of the combined endpoint).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    pub month: Option<String>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// Lists one page of the transactions matching the optional month and
/// search term.
///
/// A month that is given must be a valid month name. Blank `month` and
/// `search` values are ignored. `page` and `perPage` below 1 are read as 1.
pub async fn list_transactions(
    store: &dyn TransactionStore,
    query: &TransactionQuery,
    default_per_page: u64,
) -> Result<TransactionPage, AppError> {
    let mut filter = TransactionFilter {
        month: MonthIndex::optional(query.month.as_deref())?,
        ..TransactionFilter::default()
    };
    if let Some(search) = query.search.as_deref().filter(|search| !search.is_empty()) {
        filter = filter.with_search(search);
    }

    let page = query.page.unwrap_or(DEFAULT_PAGE).max(1);
    let per_page = query.per_page.unwrap_or(default_per_page).max(1);
    let skip = (page - 1).saturating_mul(per_page);

    let (items, total_items) =
        futures::try_join!(store.find(&filter, skip, per_page), store.count(&filter))?;

    Ok(TransactionPage {
        total_items,
        total_pages: total_items.div_ceil(per_page),
        current_page: page,
        items_per_page: per_page,
        items,
    })
}
