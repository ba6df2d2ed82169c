//! The backend engine call: a translated options record against a resolved
//! source path, returning the raw frame. All tokenizing, buffering, and
//! schema inference happens inside polars; this layer never looks at bytes.

use std::path::Path;
use std::sync::Arc;

use polars::prelude::{
    CsvEncoding, CsvParseOptions, CsvReadOptions, DataFrame, PlSmallStr, PolarsResult, SerReader,
};

use crate::translate::{BackendCsvOptions, ColumnProjection, TextEncoding};

/// Run the backend read. `row_limit` is forwarded untranslated.
pub fn read_csv(
    path: &Path,
    options: &BackendCsvOptions,
    row_limit: Option<usize>,
) -> PolarsResult<DataFrame> {
    let mut read = CsvReadOptions::default()
        .with_has_header(options.has_header)
        .with_skip_rows(options.skip_rows)
        .with_n_rows(row_limit)
        .with_raise_if_empty(options.raise_if_empty)
        .with_ignore_errors(options.ignore_errors)
        .with_parse_options(build_parse_options(options));
    if let Some(low_memory) = options.low_memory {
        read = read.with_low_memory(low_memory);
    }
    match &options.columns {
        Some(ColumnProjection::Names(names)) => {
            let names: Arc<[PlSmallStr]> = names.iter().map(|name| PlSmallStr::from_str(name)).collect();
            read = read.with_columns(Some(names));
        }
        Some(ColumnProjection::Positions(positions)) => {
            read = read.with_projection(Some(Arc::new(positions.clone())));
        }
        None => {}
    }

    let mut frame = read
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    if let Some(new_columns) = &options.new_columns {
        rename_from_left(&mut frame, new_columns)?;
    }
    Ok(frame)
}

fn build_parse_options(options: &BackendCsvOptions) -> CsvParseOptions {
    let mut parse = CsvParseOptions::default()
        .with_try_parse_dates(options.try_parse_dates)
        .with_decimal_comma(options.decimal_comma)
        .with_comment_prefix(options.comment_prefix.as_deref());
    if let Some(separator) = options.separator {
        parse = parse.with_separator(separator);
    }
    if let Some(quote) = options.quote_char {
        parse = parse.with_quote_char(Some(quote));
    }
    if let Some(eol) = options.eol_char {
        parse = parse.with_eol_char(eol);
    }
    if let Some(encoding) = options.encoding {
        parse = parse.with_encoding(match encoding {
            TextEncoding::Utf8 => CsvEncoding::Utf8,
            TextEncoding::Utf8Lossy => CsvEncoding::LossyUtf8,
        });
    }
    parse
}

/// Apply replacement column names, left to right, to however many columns
/// the frame actually has.
fn rename_from_left(frame: &mut DataFrame, new_columns: &[String]) -> PolarsResult<()> {
    let current = frame.get_column_names_owned();
    for (old, new) in current.iter().zip(new_columns) {
        frame.rename(old.as_str(), new.as_str().into())?;
    }
    Ok(())
}
