use crate::enums::Column;
use crate::error::CoreError;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

/// One purchased item within an order.
///
/// Every field mirrors a cell of the source extract. Empty cells are `None`;
/// aggregations skip them the way a dataframe `count`/`sum` would.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderLine {
    /// 1-based line number in the source file.
    pub source_line: usize,
    pub order_id: Option<String>,
    pub customer_id: Option<String>,
    pub customer_state: Option<String>,
    pub product_category_name_english: Option<String>,
    pub price: Option<Decimal>,
    pub order_purchase_timestamp: Option<NaiveDateTime>,
    pub order_approved_at: Option<NaiveDateTime>,
    pub order_delivered_carrier_date: Option<NaiveDateTime>,
    pub order_delivered_customer_date: Option<NaiveDateTime>,
    pub order_estimated_delivery_date: Option<NaiveDateTime>,
    /// Precomputed calendar-month bucket, kept as its raw key (e.g. "2018-01").
    pub order_month: Option<String>,
}

impl OrderLine {
    /// Returns a mutable slot for one of the timestamp columns.
    ///
    /// Non-date columns yield `None`.
    pub fn timestamp_mut(&mut self, column: Column) -> Option<&mut Option<NaiveDateTime>> {
        match column {
            Column::OrderPurchaseTimestamp => Some(&mut self.order_purchase_timestamp),
            Column::OrderApprovedAt => Some(&mut self.order_approved_at),
            Column::OrderDeliveredCarrierDate => Some(&mut self.order_delivered_carrier_date),
            Column::OrderDeliveredCustomerDate => Some(&mut self.order_delivered_customer_date),
            Column::OrderEstimatedDeliveryDate => Some(&mut self.order_estimated_delivery_date),
            _ => None,
        }
    }

    /// The calendar day the order was handed to the carrier, if it was.
    pub fn delivered_carrier_on(&self) -> Option<NaiveDate> {
        self.order_delivered_carrier_date.map(|ts| ts.date())
    }
}

/// A closed interval of calendar days, `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive on both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// True if every day of `self` also lies in `other`.
    pub fn is_within(&self, other: &DateRange) -> bool {
        other.start <= self.start && self.end <= other.end
    }
}
