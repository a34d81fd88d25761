use log::info;

use super::aggregation_service;
use super::query_service::{list_transactions, TransactionQuery};
use crate::error::AppError;
use crate::models::CombinedData;
use crate::repositories::TransactionStore;

/// Fetches the transaction page, statistics and bar chart for one month
/// concurrently and merges them. Fails with the first error from any part.
pub async fn get_combined(
    store: &dyn TransactionStore,
    query: &TransactionQuery,
    default_per_page: u64,
) -> Result<CombinedData, AppError> {
    let month = match query.month.as_deref() {
        None | Some("") => return Err(AppError::MissingMonth),
        Some(month) => month,
    };
    info!("Fetching combined data with query: {:?}", query);

    let (transactions, statistics, barchart) = futures::try_join!(
        list_transactions(store, query, default_per_page),
        aggregation_service::statistics(store, Some(month)),
        aggregation_service::bar_chart(store, Some(month))
    )?;

    Ok(CombinedData {
        transactions,
        statistics,
        barchart,
    })
}
