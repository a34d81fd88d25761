use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use log::info;
use mongodb::bson::{doc, Bson, Document};
use mongodb::{Collection, Database};

use super::{TransactionFilter, TransactionStore};
use crate::error::AppError;
use crate::models::{CategoryCount, ProductDocument, ProductTransaction};

/// Keeps product transactions in one MongoDB collection and pushes every
/// filter and aggregation down to the server.
#[derive(Debug, Clone)]
pub struct MongoTransactionStore {
    collection: Collection<ProductDocument>,
}

impl MongoTransactionStore {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        info!("Using MongoDB collection {}", collection_name);
        Self {
            collection: db.collection(collection_name),
        }
    }
}

#[async_trait]
impl TransactionStore for MongoTransactionStore {
    async fn delete_all(&self) -> Result<u64, AppError> {
        let result = self
            .collection
            .delete_many(doc! {})
            .await
            .map_err(|e| AppError::StoreWrite(e.to_string()))?;
        Ok(result.deleted_count)
    }

    async fn insert_all(&self, records: Vec<ProductTransaction>) -> Result<u64, AppError> {
        // The server rejects an empty insertMany.
        if records.is_empty() {
            return Ok(0);
        }

        let documents: Vec<ProductDocument> = records.into_iter().map(Into::into).collect();
        let result = self
            .collection
            .insert_many(documents)
            .await
            .map_err(|e| AppError::StoreWrite(e.to_string()))?;
        Ok(result.inserted_ids.len() as u64)
    }

    async fn find(
        &self,
        filter: &TransactionFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<ProductTransaction>, AppError> {
        let cursor = self
            .collection
            .find(filter_document(filter))
            .sort(doc! { "_id": 1 })
            .skip(skip)
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .await?;
        let documents: Vec<ProductDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: &TransactionFilter) -> Result<u64, AppError> {
        Ok(self
            .collection
            .count_documents(filter_document(filter))
            .await?)
    }

    async fn sum_price(&self, filter: &TransactionFilter) -> Result<f64, AppError> {
        let mut cursor = self.collection.aggregate(sum_price_pipeline(filter)).await?;
        match cursor.next().await.transpose()? {
            Some(group) => Ok(group.get("totalAmount").map_or(0.0, bson_to_f64)),
            None => Ok(0.0),
        }
    }

    async fn count_by_category(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<CategoryCount>, AppError> {
        let groups: Vec<Document> = self
            .collection
            .aggregate(category_pipeline(filter))
            .await?
            .try_collect()
            .await?;

        Ok(groups
            .iter()
            .map(|group| CategoryCount {
                category: group.get_str("_id").unwrap_or_default().to_string(),
                count: group.get("count").map_or(0.0, bson_to_f64) as u64,
            })
            .collect())
    }
}

/// Translates a [TransactionFilter] into a MongoDB query document.
pub fn filter_document(filter: &TransactionFilter) -> Document {
    let mut conditions: Vec<Document> = Vec::new();

    if let Some(month) = filter.month {
        let month_number = month.number() as i32;
        conditions.push(doc! {
            "$expr": { "$eq": [{ "$month": "$dateOfSale" }, month_number] }
        });
    }

    if let Some(term) = &filter.search {
        let pattern = escape_regex(term);
        let price = TransactionFilter::search_price(term);
        conditions.push(doc! {
            "$or": [
                { "title": { "$regex": pattern.as_str(), "$options": "i" } },
                { "description": { "$regex": pattern.as_str(), "$options": "i" } },
                { "price": price }
            ]
        });
    }

    if let Some(sold) = filter.sold {
        conditions.push(doc! { "sold": sold });
    }

    if let Some(band) = filter.price_band {
        let mut range = Document::new();
        match band.exclusive_lower() {
            Some(lower) => range.insert("$gt", lower),
            None => range.insert("$gte", f64::from(band.min)),
        };
        if let Some(max) = band.max {
            range.insert("$lte", f64::from(max));
        }
        conditions.push(doc! { "price": range });
    }

    match conditions.len() {
        0 => doc! {},
        1 => conditions.remove(0),
        _ => doc! { "$and": conditions },
    }
}

pub fn sum_price_pipeline(filter: &TransactionFilter) -> Vec<Document> {
    vec![
        doc! { "$match": filter_document(filter) },
        doc! { "$group": { "_id": Bson::Null, "totalAmount": { "$sum": "$price" } } },
    ]
}

pub fn category_pipeline(filter: &TransactionFilter) -> Vec<Document> {
    vec![
        doc! { "$match": filter_document(filter) },
        doc! { "$group": { "_id": "$category", "count": { "$sum": 1 } } },
    ]
}

fn escape_regex(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if "\\.^$|?*+()[]{}".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn bson_to_f64(value: &Bson) -> f64 {
    match value {
        Bson::Double(v) => *v,
        Bson::Int32(v) => f64::from(*v),
        Bson::Int64(v) => *v as f64,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{doc, Bson};

    use super::{bson_to_f64, category_pipeline, escape_regex, filter_document, sum_price_pipeline};
    use crate::models::{MonthIndex, PRICE_BANDS};
    use crate::repositories::TransactionFilter;

    fn march() -> MonthIndex {
        MonthIndex::from_name("March").unwrap()
    }

    #[test]
    fn empty_filter_is_empty_document() {
        assert_eq!(filter_document(&TransactionFilter::default()), doc! {});
    }

    #[test]
    fn month_filter_uses_month_operator() {
        let document = filter_document(&TransactionFilter::for_month(march()));

        assert_eq!(
            document,
            doc! { "$expr": { "$eq": [{ "$month": "$dateOfSale" }, 3] } }
        );
    }

    #[test]
    fn search_filter_checks_text_and_price() {
        let document = filter_document(&TransactionFilter::default().with_search("150 shirts"));

        assert_eq!(
            document,
            doc! {
                "$or": [
                    { "title": { "$regex": "150 shirts", "$options": "i" } },
                    { "description": { "$regex": "150 shirts", "$options": "i" } },
                    { "price": 150.0 }
                ]
            }
        );
    }

    #[test]
    fn search_term_is_matched_literally() {
        assert_eq!(escape_regex("a+b (c)"), r"a\+b \(c\)");
        assert_eq!(escape_regex("plain"), "plain");
    }

    #[test]
    fn combined_conditions_are_anded() {
        let document = filter_document(&TransactionFilter::for_month(march()).with_sold(false));

        assert_eq!(
            document,
            doc! {
                "$and": [
                    { "$expr": { "$eq": [{ "$month": "$dateOfSale" }, 3] } },
                    { "sold": false }
                ]
            }
        );
    }

    #[test]
    fn price_band_bounds() {
        let first = filter_document(&TransactionFilter::default().with_price_band(PRICE_BANDS[0]));
        let second = filter_document(&TransactionFilter::default().with_price_band(PRICE_BANDS[1]));
        let last = filter_document(&TransactionFilter::default().with_price_band(PRICE_BANDS[9]));

        assert_eq!(first, doc! { "price": { "$gte": 0.0, "$lte": 100.0 } });
        assert_eq!(second, doc! { "price": { "$gt": 100.0, "$lte": 200.0 } });
        assert_eq!(last, doc! { "price": { "$gt": 900.0 } });
    }

    #[test]
    fn pipelines_match_then_group() {
        let filter = TransactionFilter::for_month(march());

        let sum = sum_price_pipeline(&filter);
        assert_eq!(sum[0], doc! { "$match": filter_document(&filter) });
        assert_eq!(
            sum[1],
            doc! { "$group": { "_id": Bson::Null, "totalAmount": { "$sum": "$price" } } }
        );

        let categories = category_pipeline(&filter);
        assert_eq!(
            categories[1],
            doc! { "$group": { "_id": "$category", "count": { "$sum": 1 } } }
        );
    }

    #[test]
    fn numeric_bson_values_convert() {
        assert_eq!(bson_to_f64(&Bson::Double(2.5)), 2.5);
        assert_eq!(bson_to_f64(&Bson::Int32(4)), 4.0);
        assert_eq!(bson_to_f64(&Bson::Int64(9)), 9.0);
        assert_eq!(bson_to_f64(&Bson::Null), 0.0);
    }
}
