//! Date conversion applied between header synthesis and index promotion.

use polars::prelude::{DataFrame, DataType, TimeUnit};

use framebridge_model::{ParseDates, ParserError, ReadOptions, Result};

/// Align date columns with the result contract.
///
/// Whole-frame date inference already happened inside the backend read; what
/// remains is dtype alignment. Date-only columns come back as `Date` and
/// timestamp columns may land on coarser time units, while the generic API
/// reports parsed dates as nanosecond datetimes, so both are rebased here.
/// Without date parsing this is the identity.
pub fn apply_date_conversions(mut frame: DataFrame, options: &ReadOptions) -> Result<DataFrame> {
    if !matches!(options.parse_dates, Some(ParseDates::Enabled(true))) {
        return Ok(frame);
    }
    let targets: Vec<(String, DataType)> = frame
        .get_columns()
        .iter()
        .filter_map(|column| match column.dtype() {
            DataType::Date => Some((
                column.name().to_string(),
                DataType::Datetime(TimeUnit::Nanoseconds, None),
            )),
            DataType::Datetime(unit, zone) if *unit != TimeUnit::Nanoseconds => Some((
                column.name().to_string(),
                DataType::Datetime(TimeUnit::Nanoseconds, zone.clone()),
            )),
            _ => None,
        })
        .collect();
    for (name, dtype) in targets {
        let upgraded = frame
            .column(&name)
            .and_then(|column| column.as_materialized_series().cast(&dtype))
            .map_err(|err| ParserError::InvalidValue(err.to_string()))?;
        frame
            .replace(&name, upgraded)
            .map_err(|err| ParserError::InvalidValue(err.to_string()))?;
    }
    Ok(frame)
}
