//! Result normalization: backend output to the generic API's result contract.
//!
//! Runs in a fixed order: header synthesis, date conversion, index
//! materialization, residual dtype coercion. Dtype entries consumed while
//! promoting index levels and entries left for the residual pass are kept as
//! two disjoint sets, so neither phase can double-apply a cast.

use polars::prelude::{DataFrame, DataType};

use framebridge_model::{
    ColumnId, DtypeSpec, FrameIndex, ParserError, ReadOptions, Result, ResultFrame,
};

use crate::dates::apply_date_conversions;
use crate::dtypes::resolve_dtype;

/// Normalize a raw backend frame into the final tabular result.
pub fn finalize_frame(frame: DataFrame, options: &ReadOptions) -> Result<ResultFrame> {
    let (mut frame, explicitly_named) = synthesize_header(frame, options)?;

    frame = apply_date_conversions(frame, options)?;

    // Positional identifiers, for both index entries and dtype keys, resolve
    // against the label sequence as it stands here, before any index level
    // is dropped from the body.
    let labels_at_entry: Vec<String> = frame
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();

    let mut consumed: Vec<ColumnId> = Vec::new();
    let mut index = None;
    if let Some(index_cols) = &options.index_col {
        let mut level_labels = Vec::with_capacity(index_cols.len());
        for id in index_cols {
            let label = resolve_index_label(id, &labels_at_entry)?;
            if let Some(dtype) = &options.dtype {
                // Per-level dtype: the original identifier first, falling
                // back to the resolved label.
                let label_id = ColumnId::Name(label.clone());
                let hit = dtype
                    .get(id)
                    .map(|spec| (id.clone(), spec))
                    .or_else(|| dtype.get(&label_id).map(|spec| (label_id.clone(), spec)));
                if let Some((key, spec)) = hit {
                    let target = resolve_dtype(spec)?;
                    cast_column(&mut frame, &label, &target)?;
                    consumed.push(key);
                }
            }
            level_labels.push(label);
        }

        let mut levels = Vec::with_capacity(level_labels.len());
        for label in &level_labels {
            let level = frame
                .drop_in_place(label)
                .map_err(|_| ParserError::InvalidIndex(label.clone()))?;
            levels.push(level);
        }
        // Synthesized labels never become index names; the index stays
        // anonymous unless the caller named every column.
        let names = if options.is_headerless() && !explicitly_named {
            vec![None; levels.len()]
        } else {
            level_labels.into_iter().map(Some).collect()
        };
        index = Some(FrameIndex { levels, names });
    }

    apply_residual_dtypes(&mut frame, options, &consumed, &labels_at_entry)?;

    Ok(match index {
        Some(index) => ResultFrame::with_index(frame, index),
        None => ResultFrame::new(frame),
    })
}

/// Replace backend column labels in headerless mode.
///
/// Returns the frame plus whether the caller explicitly named every column;
/// padded or synthesized labels leave the frame "not explicitly named",
/// which later clears index level names.
fn synthesize_header(mut frame: DataFrame, options: &ReadOptions) -> Result<(DataFrame, bool)> {
    if !options.is_headerless() {
        return Ok((frame, true));
    }
    let num_cols = frame.width();
    let mut labels: Vec<String> = match &options.names {
        Some(names) => names.clone(),
        None => (0..num_cols).map(|pos| pos.to_string()).collect(),
    };
    let explicitly_named = options
        .names
        .as_ref()
        .is_some_and(|names| names.len() == num_cols);
    if labels.len() < num_cols {
        let mut padded: Vec<String> = (0..num_cols - labels.len())
            .map(|pos| pos.to_string())
            .collect();
        padded.append(&mut labels);
        labels = padded;
    }
    frame
        .set_column_names(labels.iter().map(String::as_str))
        .map_err(|err| ParserError::InvalidValue(err.to_string()))?;
    Ok((frame, explicitly_named))
}

fn resolve_index_label(id: &ColumnId, labels: &[String]) -> Result<String> {
    match id {
        // Positions win over a column literally labeled with that integer.
        ColumnId::Position(pos) => labels
            .get(*pos)
            .cloned()
            .ok_or_else(|| ParserError::InvalidIndex(id.to_string())),
        ColumnId::Name(name) => {
            if labels.iter().any(|label| label == name) {
                Ok(name.clone())
            } else {
                Err(ParserError::InvalidIndex(name.clone()))
            }
        }
    }
}

fn apply_residual_dtypes(
    frame: &mut DataFrame,
    options: &ReadOptions,
    consumed: &[ColumnId],
    labels_at_entry: &[String],
) -> Result<()> {
    let Some(dtype) = &options.dtype else {
        return Ok(());
    };
    match dtype {
        DtypeSpec::Single(spec) => {
            let target = resolve_dtype(spec)?;
            let labels: Vec<String> = frame
                .get_column_names()
                .into_iter()
                .map(|name| name.to_string())
                .collect();
            for label in labels {
                cast_column(frame, &label, &target)?;
            }
        }
        DtypeSpec::PerColumn(entries) => {
            for (key, spec) in entries {
                if consumed.contains(key) {
                    continue;
                }
                let label = match key {
                    ColumnId::Name(name) => name.clone(),
                    ColumnId::Position(pos) => match labels_at_entry.get(*pos) {
                        Some(label) => label.clone(),
                        None => continue,
                    },
                };
                // Entries whose column is gone (promoted to the index or
                // never projected) are dropped, not errors.
                if frame.get_column_index(&label).is_none() {
                    continue;
                }
                let target = resolve_dtype(spec)?;
                cast_column(frame, &label, &target)?;
            }
        }
    }
    Ok(())
}

/// Strict in-place cast; a failed cast surfaces as a value error carrying
/// the backend's message.
fn cast_column(frame: &mut DataFrame, label: &str, dtype: &DataType) -> Result<()> {
    let cast = frame
        .column(label)
        .and_then(|column| column.as_materialized_series().strict_cast(dtype))
        .map_err(|err| ParserError::InvalidValue(err.to_string()))?;
    frame
        .replace(label, cast)
        .map_err(|err| ParserError::InvalidValue(err.to_string()))?;
    Ok(())
}
