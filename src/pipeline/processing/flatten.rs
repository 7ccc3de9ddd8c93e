use chrono::NaiveDate;
use metrics::counter;
use tracing::{debug, info, instrument};

use crate::domain::{CategoryValue, FlatRow, RawCustomer, RawItem, RawOrder};
use crate::pipeline::ingestion::VipIds;
use crate::pipeline::processing::normalize::{
    clean_id, clean_price, clean_quantity, clean_text, normalize_category, parse_date,
    resolve_order_total,
};

/// Why a candidate row was left out of the flat table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Product id missing, unparseable or zero
    MissingProductId,
    /// Positive quantity but the price cleaned to zero
    ZeroPriceWithQuantity,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::MissingProductId => "missing_product_id",
            DropReason::ZeroPriceWithQuantity => "zero_price_with_quantity",
        }
    }
}

/// Counts gathered while walking the nested records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenStats {
    pub customers: usize,
    pub orders: usize,
    pub items: usize,
    pub rows_emitted: usize,
    pub dropped_missing_product_id: usize,
    pub dropped_zero_price: usize,
}

impl FlattenStats {
    fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::MissingProductId => self.dropped_missing_product_id += 1,
            DropReason::ZeroPriceWithQuantity => self.dropped_zero_price += 1,
        }
    }

    pub fn rows_dropped(&self) -> usize {
        self.dropped_missing_product_id + self.dropped_zero_price
    }
}

/// Parent fields shared by every row of one customer
struct CustomerContext {
    customer_id: Option<i64>,
    customer_name: String,
    registration_date: Option<NaiveDate>,
    is_vip: bool,
}

struct OrderContext {
    order_id: Option<i64>,
    order_date: Option<NaiveDate>,
    order_total_value: f64,
}

/// Walks customer → order → item records and joins them into flat rows
pub struct RecordFlattener<'a> {
    vip_ids: &'a VipIds,
}

impl<'a> RecordFlattener<'a> {
    pub fn new(vip_ids: &'a VipIds) -> Self {
        Self { vip_ids }
    }

    /// Produce one row per surviving (customer, order, item) triple, in input order
    #[instrument(skip_all, fields(customers = customers.len()))]
    pub fn flatten(&self, customers: &[RawCustomer]) -> (Vec<FlatRow>, FlattenStats) {
        let mut rows = Vec::new();
        let mut stats = FlattenStats::default();

        for customer in customers {
            stats.customers += 1;
            let customer_ctx = self.customer_context(customer);

            for order in customer.orders() {
                stats.orders += 1;
                let order_ctx = order_context(order);

                for item in order.items() {
                    stats.items += 1;
                    match build_row(&customer_ctx, &order_ctx, item) {
                        Ok(row) => rows.push(row),
                        Err(reason) => {
                            debug!(
                                customer_id = ?customer_ctx.customer_id,
                                order_id = ?order_ctx.order_id,
                                item_id = %item.item_id,
                                "Dropping item: {}",
                                reason.as_str()
                            );
                            counter!("etl_rows_dropped_total", "reason" => reason.as_str()).increment(1);
                            stats.record_drop(reason);
                        }
                    }
                }
            }
        }

        stats.rows_emitted = rows.len();
        counter!("etl_rows_emitted_total").increment(rows.len() as u64);
        info!(
            "Flattened {} customers / {} orders / {} items into {} rows ({} dropped)",
            stats.customers,
            stats.orders,
            stats.items,
            stats.rows_emitted,
            stats.rows_dropped()
        );

        (rows, stats)
    }

    fn customer_context(&self, customer: &RawCustomer) -> CustomerContext {
        let customer_id = clean_id(&customer.id);
        CustomerContext {
            customer_id,
            customer_name: clean_text(&customer.name).unwrap_or_default(),
            registration_date: parse_date(&customer.registration_date),
            is_vip: self.vip_ids.contains(customer_id),
        }
    }
}

fn order_context(order: &RawOrder) -> OrderContext {
    OrderContext {
        order_id: clean_id(&order.order_id),
        order_date: parse_date(&order.order_date),
        order_total_value: resolve_order_total(&order.order_total_value),
    }
}

fn build_row(
    customer: &CustomerContext,
    order: &OrderContext,
    item: &RawItem,
) -> Result<FlatRow, DropReason> {
    let product_id = clean_id(&item.item_id);
    let unit_price = clean_price(&item.price);
    let item_quantity = clean_quantity(&item.quantity);
    let total_item_price = unit_price * item_quantity as f64;
    let total_order_value_percentage = if order.order_total_value > 0.0 {
        total_item_price / order.order_total_value
    } else {
        0.0
    };

    let product_id = match product_id {
        Some(id) if id != 0 => id,
        _ => return Err(DropReason::MissingProductId),
    };
    if item_quantity > 0 && unit_price == 0.0 {
        return Err(DropReason::ZeroPriceWithQuantity);
    }

    Ok(FlatRow {
        customer_id: customer.customer_id,
        customer_name: customer.customer_name.clone(),
        registration_date: customer.registration_date,
        is_vip: customer.is_vip,
        order_id: Some(order.order_id.unwrap_or(0)),
        order_date: order.order_date,
        product_id: Some(product_id),
        product_name: clean_text(&item.product_name),
        category: normalize_category(&CategoryValue::from(&item.category)).to_string(),
        unit_price,
        item_quantity,
        total_item_price,
        total_order_value_percentage,
    })
}
