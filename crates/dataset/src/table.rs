use crate::error::SchemaError;
use core_types::{Column, DateRange, OrderLine};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// The set of semantic columns present in the source header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    columns: BTreeSet<Column>,
}

impl Schema {
    pub fn new(columns: impl IntoIterator<Item = Column>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
        }
    }

    /// A schema carrying every known column.
    pub fn complete() -> Self {
        Self::new(Column::ALL)
    }

    pub fn contains(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Fails with the first of `columns` that is absent.
    pub fn require(&self, columns: &[Column]) -> Result<(), SchemaError> {
        match columns.iter().find(|c| !self.contains(**c)) {
            Some(&column) => Err(SchemaError { column }),
            None => Ok(()),
        }
    }
}

/// The normalized, immutable order-line table.
///
/// Rows are ordered ascending by `order_delivered_carrier_date`, undelivered
/// rows last. A row's position in `rows()` is its positional index.
#[derive(Debug, Clone)]
pub struct Dataset {
    source: String,
    schema: Schema,
    rows: Vec<OrderLine>,
    bounds: Option<DateRange>,
}

impl Dataset {
    /// Builds a dataset from already-parsed rows, establishing the default order.
    pub fn new(source: impl Into<String>, schema: Schema, mut rows: Vec<OrderLine>) -> Self {
        // `sort_by` is stable: rows with equal (or missing) dates keep file order.
        rows.sort_by(|a, b| {
            compare_carrier_dates(
                a.order_delivered_carrier_date.as_ref(),
                b.order_delivered_carrier_date.as_ref(),
            )
        });
        let bounds = compute_bounds(&rows);

        Self {
            source: source.into(),
            schema,
            rows,
            bounds,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[OrderLine] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Earliest and latest carrier-delivery day, for a date-range selector.
    ///
    /// `None` when no row has been handed to a carrier.
    pub fn date_bounds(&self) -> Option<DateRange> {
        self.bounds
    }

    /// An unfiltered view over every row.
    pub fn all(&self) -> TableView<'_> {
        TableView {
            schema: &self.schema,
            rows: self.rows.iter().collect(),
        }
    }

    /// Rows whose carrier-delivery day lies in `range`, bounds included.
    ///
    /// Only the date portion of the timestamp is compared. Undelivered rows
    /// never match.
    pub fn filter(&self, range: &DateRange) -> TableView<'_> {
        let rows = self
            .rows
            .iter()
            .filter(|line| line.delivered_carrier_on().is_some_and(|day| range.contains(day)))
            .collect();

        TableView {
            schema: &self.schema,
            rows,
        }
    }
}

/// A borrowed subset of a `Dataset`'s rows, sharing its schema.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    schema: &'a Schema,
    rows: Vec<&'a OrderLine>,
}

impl<'a> TableView<'a> {
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a OrderLine> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn compare_carrier_dates<T: Ord>(a: Option<&T>, b: Option<&T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compute_bounds(rows: &[OrderLine]) -> Option<DateRange> {
    let mut days = rows.iter().filter_map(OrderLine::delivered_carrier_on);
    let first = days.next()?;
    let (min, max) = days.fold((first, first), |(min, max), day| (min.min(day), max.max(day)));
    DateRange::new(min, max).ok()
}
