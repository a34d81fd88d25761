mod dashboard;
mod datetime_utils;
mod month;
mod price_band;
mod product_transaction;

pub use dashboard::{CategoryCount, CombinedData, PriceRangeCount, Statistics, TransactionPage};
pub use month::MonthIndex;
pub use price_band::{PriceBand, PRICE_BANDS};
pub use product_transaction::{ProductDocument, ProductTransaction};
