//! Month level summaries for the dashboard charts.
use futures::future::try_join_all;

use crate::error::AppError;
use crate::models::{CategoryCount, MonthIndex, PriceRangeCount, Statistics, PRICE_BANDS};
use crate::repositories::{TransactionFilter, TransactionStore};

/// Totals for the given month.
///
/// `totalSaleAmount` and `totalSoldItems` cover every record in the month
/// whatever its `sold` flag; only `totalNotSoldItems` looks at the flag.
pub async fn statistics(
    store: &dyn TransactionStore,
    month: Option<&str>,
) -> Result<Statistics, AppError> {
    let month_filter = TransactionFilter::for_month(MonthIndex::required(month)?);
    let not_sold_filter = month_filter.clone().with_sold(false);

    let (total_sale_amount, total_sold_items, total_not_sold_items) = futures::try_join!(
        store.sum_price(&month_filter),
        store.count(&month_filter),
        store.count(&not_sold_filter)
    )?;

    Ok(Statistics {
        total_sale_amount,
        total_sold_items,
        total_not_sold_items,
    })
}

/// Record counts for each of the ten price bands, in band order.
pub async fn bar_chart(
    store: &dyn TransactionStore,
    month: Option<&str>,
) -> Result<Vec<PriceRangeCount>, AppError> {
    let month = MonthIndex::required(month)?;

    try_join_all(PRICE_BANDS.iter().map(|band| async move {
        let filter = TransactionFilter::for_month(month).with_price_band(*band);
        let count = store.count(&filter).await?;
        Ok::<_, AppError>(PriceRangeCount {
            range: band.label(),
            count,
        })
    }))
    .await
}

/// Record counts per category. Order is up to the store.
pub async fn pie_chart(
    store: &dyn TransactionStore,
    month: Option<&str>,
) -> Result<Vec<CategoryCount>, AppError> {
    let filter = TransactionFilter::for_month(MonthIndex::required(month)?);
    store.count_by_category(&filter).await
}
