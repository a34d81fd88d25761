use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use super::datetime_utils::{deserialize_datetime, serialize_datetime};

/// One product sale/offer, as read from the seed feed and served by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTransaction {
    #[serde(default, alias = "productId")]
    pub id: i64,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(deserialize_with = "deserialize_sold_flag")]
    pub sold: bool,
    pub date_of_sale: DateTime<Utc>,
}

/// The shape a [ProductTransaction] takes inside MongoDB.
///
/// Identical to the API shape except that `dateOfSale` is a BSON date rather
/// than an RFC 3339 string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    pub id: i64,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    pub sold: bool,
    #[serde(
        serialize_with = "serialize_datetime",
        deserialize_with = "deserialize_datetime"
    )]
    pub date_of_sale: DateTime<Utc>,
}

impl From<ProductTransaction> for ProductDocument {
    fn from(value: ProductTransaction) -> Self {
        Self {
            id: value.id,
            title: value.title,
            price: value.price,
            description: value.description,
            category: value.category,
            image: value.image,
            sold: value.sold,
            date_of_sale: value.date_of_sale,
        }
    }
}

impl From<ProductDocument> for ProductTransaction {
    fn from(value: ProductDocument) -> Self {
        Self {
            id: value.id,
            title: value.title,
            price: value.price,
            description: value.description,
            category: value.category,
            image: value.image,
            sold: value.sold,
            date_of_sale: value.date_of_sale,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SoldFlag {
    Flag(bool),
    Number(f64),
    Text(String),
}

/// Reads `sold` from a boolean, a number (zero is unsold, anything else is
/// sold) or one of the strings "true", "false", "1", "0".
pub fn deserialize_sold_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match SoldFlag::deserialize(deserializer)? {
        SoldFlag::Flag(sold) => Ok(sold),
        SoldFlag::Number(number) => Ok(number != 0.0),
        SoldFlag::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(de::Error::custom(format!(
                "cannot interpret {text:?} as a sold flag"
            ))),
        },
    }
}
