use serde::{Deserialize, Serialize};
use std::fmt;

/// The semantic columns of the order-line extract.
///
/// The serialized form of each variant is the header name used in the CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    OrderId,
    CustomerId,
    CustomerState,
    ProductCategoryNameEnglish,
    Price,
    OrderPurchaseTimestamp,
    OrderApprovedAt,
    OrderDeliveredCarrierDate,
    OrderDeliveredCustomerDate,
    OrderEstimatedDeliveryDate,
    OrderMonth,
}

impl Column {
    pub const ALL: [Column; 11] = [
        Column::OrderId,
        Column::CustomerId,
        Column::CustomerState,
        Column::ProductCategoryNameEnglish,
        Column::Price,
        Column::OrderPurchaseTimestamp,
        Column::OrderApprovedAt,
        Column::OrderDeliveredCarrierDate,
        Column::OrderDeliveredCustomerDate,
        Column::OrderEstimatedDeliveryDate,
        Column::OrderMonth,
    ];

    /// The timestamp-valued columns. These are mandatory in any source.
    pub const DATE_COLUMNS: [Column; 5] = [
        Column::OrderPurchaseTimestamp,
        Column::OrderApprovedAt,
        Column::OrderDeliveredCarrierDate,
        Column::OrderDeliveredCustomerDate,
        Column::OrderEstimatedDeliveryDate,
    ];

    /// Returns the CSV header name of the column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::OrderId => "order_id",
            Column::CustomerId => "customer_id",
            Column::CustomerState => "customer_state",
            Column::ProductCategoryNameEnglish => "product_category_name_english",
            Column::Price => "price",
            Column::OrderPurchaseTimestamp => "order_purchase_timestamp",
            Column::OrderApprovedAt => "order_approved_at",
            Column::OrderDeliveredCarrierDate => "order_delivered_carrier_date",
            Column::OrderDeliveredCustomerDate => "order_delivered_customer_date",
            Column::OrderEstimatedDeliveryDate => "order_estimated_delivery_date",
            Column::OrderMonth => "order_month",
        }
    }

    /// Looks a column up by its header name.
    pub fn from_header(name: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
