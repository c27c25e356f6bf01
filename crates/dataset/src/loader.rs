use crate::error::DataLoadError;
use crate::table::{Dataset, Schema};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use core_types::{Column, OrderLine};
use csv::StringRecord;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

/// Layouts accepted for timestamp cells, tried in order.
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Loads and normalizes the order-line extract at `path`.
///
/// The file is read exactly once. Every timestamp column is parsed, and rows
/// are put in ascending carrier-delivery order.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset, DataLoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    load_from_reader(BufReader::new(file), &path.display().to_string())
}

/// Same as `load_dataset`, reading CSV text from any source.
///
/// `source` only labels the dataset in logs and API responses.
pub fn load_from_reader<R: Read>(reader: R, source: &str) -> Result<Dataset, DataLoadError> {
    let started = Instant::now();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header_map = build_header_map(reader.headers()?);
    for column in Column::DATE_COLUMNS {
        if !header_map.contains_key(&column) {
            return Err(DataLoadError::MissingColumn(column));
        }
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);
        rows.push(parse_record(&record, &header_map, line)?);
    }

    let schema = Schema::new(header_map.keys().copied());
    let dataset = Dataset::new(source, schema, rows);

    tracing::info!(
        source,
        rows = dataset.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Dataset loaded."
    );
    match dataset.date_bounds() {
        Some(bounds) => tracing::debug!(
            start = %bounds.start(),
            end = %bounds.end(),
            "Carrier delivery dates span."
        ),
        None => tracing::warn!(source, "No row has a carrier delivery date."),
    }

    Ok(dataset)
}

/// Maps each known column to its position in the header.
///
/// Unknown headers are ignored; a leading BOM is tolerated.
fn build_header_map(headers: &StringRecord) -> HashMap<Column, usize> {
    headers
        .iter()
        .enumerate()
        .filter_map(|(idx, name)| {
            let name = name.trim().trim_start_matches('\u{feff}');
            Column::from_header(name).map(|column| (column, idx))
        })
        .collect()
}

fn parse_record(
    record: &StringRecord,
    header_map: &HashMap<Column, usize>,
    line: usize,
) -> Result<OrderLine, DataLoadError> {
    let cell = |column: Column| -> Option<&str> {
        header_map
            .get(&column)
            .and_then(|&idx| record.get(idx))
            .filter(|value| !value.is_empty())
    };
    let text = |column: Column| cell(column).map(str::to_string);

    let price = match cell(Column::Price) {
        Some(value) => Some(parse_price(value, line)?),
        None => None,
    };
    if let Some(month) = cell(Column::OrderMonth) {
        check_month(month, line)?;
    }

    let mut order_line = OrderLine {
        source_line: line,
        order_id: text(Column::OrderId),
        customer_id: text(Column::CustomerId),
        customer_state: text(Column::CustomerState),
        product_category_name_english: text(Column::ProductCategoryNameEnglish),
        price,
        order_month: text(Column::OrderMonth),
        ..OrderLine::default()
    };

    for column in Column::DATE_COLUMNS {
        let parsed = match cell(column) {
            Some(value) => Some(parse_timestamp(value).ok_or_else(|| {
                DataLoadError::InvalidTimestamp {
                    column,
                    line,
                    value: value.to_string(),
                }
            })?),
            None => None,
        };
        if let Some(slot) = order_line.timestamp_mut(column) {
            *slot = parsed;
        }
    }

    Ok(order_line)
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, DATE_FORMAT)
                .ok()
                .map(|day| day.and_time(NaiveTime::MIN))
        })
}

fn parse_price(value: &str, line: usize) -> Result<Decimal, DataLoadError> {
    let invalid = || DataLoadError::InvalidPrice {
        line,
        value: value.to_string(),
    };
    let price = Decimal::from_str(value).map_err(|_| invalid())?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(invalid());
    }
    Ok(price)
}

/// Months are grouped and ordered as text, which is chronological only for
/// zero-padded `YYYY-MM`.
fn check_month(value: &str, line: usize) -> Result<(), DataLoadError> {
    let well_formed = value.len() == 7
        && value.as_bytes()[4] == b'-'
        && NaiveDate::parse_from_str(&format!("{value}-01"), DATE_FORMAT).is_ok();
    if well_formed {
        Ok(())
    } else {
        Err(DataLoadError::InvalidMonth {
            line,
            value: value.to_string(),
        })
    }
}
