use crate::error::AnalyticsError;
use core_types::Column;
use dataset::TableView;
use polars::prelude::*;
use rust_decimal::Decimal;

/// A columnar copy of the requested columns of a view.
///
/// Prices are stored as `Int64` units at one shared scale, so summing them in
/// the frame stays exact and `revenue()` turns a sum back into a `Decimal`.
pub(crate) struct OrderFrame {
    frame: DataFrame,
    price_scale: u32,
}

impl OrderFrame {
    /// Checks `columns` against the view's schema, then copies them out.
    pub(crate) fn build(view: &TableView<'_>, columns: &[Column]) -> Result<Self, AnalyticsError> {
        view.schema().require(columns)?;

        let price_scale = view
            .rows()
            .filter_map(|line| line.price)
            .map(|price| price.scale())
            .max()
            .unwrap_or(0);

        let mut series = Vec::with_capacity(columns.len());
        for &column in columns {
            series.push(column_series(view, column, price_scale)?);
        }

        Ok(Self {
            frame: DataFrame::new(series)?,
            price_scale,
        })
    }

    pub(crate) fn lazy(&self) -> LazyFrame {
        self.frame.clone().lazy()
    }

    pub(crate) fn revenue(&self, units: Option<i64>) -> Decimal {
        Decimal::new(units.unwrap_or(0), self.price_scale)
    }
}

fn column_series(
    view: &TableView<'_>,
    column: Column,
    price_scale: u32,
) -> Result<Series, AnalyticsError> {
    let name = column.as_str();
    let series = match column {
        Column::OrderId => text(name, view.rows().map(|l| l.order_id.as_deref())),
        Column::CustomerId => text(name, view.rows().map(|l| l.customer_id.as_deref())),
        Column::CustomerState => text(name, view.rows().map(|l| l.customer_state.as_deref())),
        Column::ProductCategoryNameEnglish => text(
            name,
            view.rows().map(|l| l.product_category_name_english.as_deref()),
        ),
        Column::OrderMonth => text(name, view.rows().map(|l| l.order_month.as_deref())),
        Column::Price => {
            let units = view
                .rows()
                .map(|l| l.price.map(|p| price_units(p, price_scale)).transpose())
                .collect::<Result<Vec<Option<i64>>, _>>()?;
            Series::new(name, units)
        }
        other => {
            return Err(AnalyticsError::Frame(format!(
                "column `{other}` is not aggregated"
            )));
        }
    };
    Ok(series)
}

fn text<'a>(name: &str, values: impl Iterator<Item = Option<&'a str>>) -> Series {
    Series::new(name, values.collect::<Vec<_>>())
}

/// `price` as an integer count of `10^-scale` units.
fn price_units(price: Decimal, scale: u32) -> Result<i64, AnalyticsError> {
    let mut scaled = price;
    scaled.rescale(scale);
    i64::try_from(scaled.mantissa())
        .map_err(|_| AnalyticsError::Frame(format!("price {price} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::OrderLine;
    use dataset::{Dataset, Schema};
    use rust_decimal_macros::dec;

    #[test]
    fn prices_share_the_widest_scale() {
        let dataset = Dataset::new(
            "test",
            Schema::complete(),
            vec![
                OrderLine {
                    price: Some(dec!(10)),
                    ..OrderLine::default()
                },
                OrderLine {
                    price: Some(dec!(0.125)),
                    ..OrderLine::default()
                },
                OrderLine::default(),
            ],
        );
        let frame = OrderFrame::build(&dataset.all(), &[Column::Price]).unwrap();
        assert_eq!(frame.price_scale, 3);

        let units: Vec<Option<i64>> = frame
            .frame
            .column("price")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(units, vec![Some(10_000), Some(125), None]);
        assert_eq!(frame.revenue(Some(10_125)), dec!(10.125));
    }

    #[test]
    fn missing_column_fails_before_building() {
        let dataset = Dataset::new("test", Schema::new([Column::OrderId]), Vec::new());
        let err = OrderFrame::build(&dataset.all(), &[Column::OrderId, Column::Price])
            .err()
            .unwrap();
        assert!(matches!(err, AnalyticsError::Schema(e) if e.column == Column::Price));
    }
}
