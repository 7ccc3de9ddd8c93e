//! Data shapes shared across the pipeline: the nested source records as they
//! arrive, and the flat row the pipeline produces.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A customer record from the nested source. Scalar fields are kept as raw
/// JSON values because the source makes no promises about their types.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCustomer {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub registration_date: Value,
    #[serde(default)]
    pub orders: Option<Vec<RawOrder>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOrder {
    #[serde(default)]
    pub order_id: Value,
    #[serde(default)]
    pub order_date: Value,
    #[serde(default)]
    pub order_total_value: Value,
    #[serde(default)]
    pub items: Option<Vec<RawItem>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub item_id: Value,
    #[serde(default)]
    pub product_name: Value,
    #[serde(default)]
    pub category: Value,
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub quantity: Value,
}

impl RawCustomer {
    pub fn orders(&self) -> &[RawOrder] {
        self.orders.as_deref().unwrap_or_default()
    }
}

impl RawOrder {
    pub fn items(&self) -> &[RawItem] {
        self.items.as_deref().unwrap_or_default()
    }
}

/// A raw category as found in the source: a numeric code, a free-text label,
/// or something else entirely.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryValue {
    Coded(i64),
    Labeled(String),
    Other,
}

impl From<&Value> for CategoryValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Number(n) => n.as_i64().map(CategoryValue::Coded).unwrap_or(CategoryValue::Other),
            Value::String(s) => CategoryValue::Labeled(s.clone()),
            // Booleans count as the integers 1 and 0, matching identifier cleaning
            Value::Bool(b) => CategoryValue::Coded(i64::from(*b)),
            _ => CategoryValue::Other,
        }
    }
}

/// One (customer, order, item) triple with all parent fields joined in.
///
/// Identifier and product name columns stay optional until the table is
/// finalized; after finalization they are always populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatRow {
    pub customer_id: Option<i64>,
    pub customer_name: String,
    pub registration_date: Option<NaiveDate>,
    pub is_vip: bool,
    pub order_id: Option<i64>,
    pub order_date: Option<NaiveDate>,
    pub product_id: Option<i64>,
    pub product_name: Option<String>,
    pub category: String,
    pub unit_price: f64,
    pub item_quantity: i64,
    pub total_item_price: f64,
    pub total_order_value_percentage: f64,
}

impl FlatRow {
    /// Sort key used for the deterministic table order
    pub fn sort_key(&self) -> (Option<i64>, Option<i64>, Option<i64>) {
        (self.customer_id, self.order_id, self.product_id)
    }
}
