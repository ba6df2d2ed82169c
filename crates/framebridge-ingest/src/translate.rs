//! Option translation: generic read options to backend engine options.
//!
//! Each rule is an independent evaluation over the immutable input into a
//! freshly built [`BackendCsvOptions`]. The header/skiprows interaction is
//! one combined rule: a header row other than the first is folded into the
//! leading skip count, and the backend skip count is always the sum of the
//! explicit skip and that fold. Anything the backend cannot faithfully honor
//! is rejected with [`ParserError::UnsupportedOption`]; no partial record is
//! ever returned.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use framebridge_model::{
    BadLinePolicy, ColumnId, ColumnSelector, Header, ParseDates, ParserError, ReadOptions, Result,
    SkipRows,
};

/// Text encodings the backend understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    Utf8,
    /// UTF-8 with invalid bytes replaced instead of rejected.
    Utf8Lossy,
}

/// Column projection for the backend: names or positions, never mixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnProjection {
    Names(Vec<String>),
    Positions(Vec<usize>),
}

/// The backend engine options record produced by translation.
///
/// Defaults mirror the backend reader defaults, so an empty `ReadOptions`
/// translates to a record the backend treats as "no overrides".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendCsvOptions {
    pub has_header: bool,
    /// Leading rows to skip: explicit skiprows plus any header-row fold.
    pub skip_rows: usize,
    pub separator: Option<u8>,
    /// Replacement column names, applied left to right after the parse.
    pub new_columns: Option<Vec<String>>,
    pub quote_char: Option<u8>,
    pub comment_prefix: Option<String>,
    pub storage_options: Option<BTreeMap<String, String>>,
    pub encoding: Option<TextEncoding>,
    pub low_memory: Option<bool>,
    pub columns: Option<ColumnProjection>,
    pub eol_char: Option<u8>,
    pub decimal_comma: bool,
    pub try_parse_dates: bool,
    pub raise_if_empty: bool,
    pub ignore_errors: bool,
}

impl Default for BackendCsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            skip_rows: 0,
            separator: None,
            new_columns: None,
            quote_char: None,
            comment_prefix: None,
            storage_options: None,
            encoding: None,
            low_memory: None,
            columns: None,
            eol_char: None,
            decimal_comma: false,
            try_parse_dates: false,
            raise_if_empty: true,
            ignore_errors: false,
        }
    }
}

/// Translate generic read options into backend engine options.
pub fn translate_options(options: &ReadOptions) -> Result<BackendCsvOptions> {
    let mut backend = BackendCsvOptions::default();

    // Direct renames, applied only when the option is set.
    let separator = options
        .delimiter
        .map(|sep| ("delimiter", sep))
        .or(options.sep.map(|sep| ("sep", sep)));
    if let Some((option, sep)) = separator {
        backend.separator = Some(ascii_byte(option, sep)?);
    }
    if let Some(names) = &options.names {
        backend.new_columns = Some(names.clone());
    }
    if let Some(quote) = options.quotechar {
        backend.quote_char = Some(ascii_byte("quotechar", quote)?);
    }
    if let Some(comment) = &options.comment {
        backend.comment_prefix = Some(comment.clone());
    }
    if let Some(storage_options) = &options.storage_options {
        backend.storage_options = Some(storage_options.clone());
    }
    if let Some(encoding) = &options.encoding {
        backend.encoding = Some(resolve_encoding(encoding)?);
    }
    if let Some(low_memory) = options.low_memory {
        backend.low_memory = Some(low_memory);
    }

    // Header and skiprows, as one combined rule. Requesting header row N is
    // skipping N rows and reading the next row as the header, so the fold is
    // added to the explicit skip count before the backend sees either.
    let mut header_fold = 0usize;
    match &options.header {
        Header::Infer => backend.has_header = true,
        Header::None => backend.has_header = false,
        Header::Row(row) => {
            backend.has_header = true;
            header_fold = *row;
        }
        Header::Rows(rows) => match rows.as_slice() {
            [row] => {
                backend.has_header = true;
                header_fold = *row;
            }
            _ => {
                return Err(ParserError::UnsupportedOption(format!(
                    "header {rows:?}: the backend cannot read multiple header rows"
                )));
            }
        },
    }
    let explicit_skip = match &options.skiprows {
        None => 0,
        Some(SkipRows::Count(count)) => *count,
        Some(SkipRows::Rows(rows)) => match rows.as_slice() {
            [] => 0,
            [row] => *row,
            _ => {
                return Err(ParserError::UnsupportedOption(format!(
                    "skiprows {rows:?}: the backend can only skip a leading block of rows"
                )));
            }
        },
        Some(SkipRows::Predicate(_)) => {
            return Err(ParserError::UnsupportedOption(
                "callable skiprows cannot be evaluated by the backend".to_string(),
            ));
        }
    };
    backend.skip_rows = explicit_skip + header_fold;

    if let Some(selector) = &options.usecols {
        backend.columns = Some(match selector {
            ColumnSelector::Columns(ids) => project_columns(ids)?,
            ColumnSelector::Predicate(_) => {
                return Err(ParserError::UnsupportedOption(
                    "callable usecols cannot be evaluated by the backend".to_string(),
                ));
            }
        });
    }

    if let Some(lineterminator) = options.lineterminator {
        backend.eol_char = Some(ascii_byte("lineterminator", lineterminator)?);
    }

    if let Some(decimal) = options.decimal {
        backend.decimal_comma = match decimal {
            '.' => false,
            ',' => true,
            other => {
                return Err(ParserError::UnsupportedOption(format!(
                    "only '.' or ',' are supported as decimal separator, got '{other}'"
                )));
            }
        };
    }

    match &options.parse_dates {
        None => {}
        Some(ParseDates::Enabled(enabled)) => backend.try_parse_dates = *enabled,
        Some(ParseDates::Columns(_)) => {
            return Err(ParserError::UnsupportedOption(
                "per-column parse_dates is not supported; the backend parses dates for all \
                 columns or none"
                    .to_string(),
            ));
        }
    }

    match options.on_bad_lines {
        BadLinePolicy::Error => {
            backend.raise_if_empty = true;
            backend.ignore_errors = false;
        }
        BadLinePolicy::Warn | BadLinePolicy::Skip => {
            backend.raise_if_empty = false;
            backend.ignore_errors = true;
        }
    }

    tracing::debug!(?backend, "translated read options for the backend engine");
    Ok(backend)
}

fn ascii_byte(option: &str, value: char) -> Result<u8> {
    if value.is_ascii() {
        Ok(value as u8)
    } else {
        Err(ParserError::UnsupportedOption(format!(
            "{option} must be a single ASCII character, got '{value}'"
        )))
    }
}

fn resolve_encoding(encoding: &str) -> Result<TextEncoding> {
    match encoding.to_ascii_lowercase().as_str() {
        "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
        "utf-8-lossy" | "utf8-lossy" => Ok(TextEncoding::Utf8Lossy),
        other => Err(ParserError::UnsupportedOption(format!(
            "encoding '{other}' is not supported by the backend"
        ))),
    }
}

fn project_columns(ids: &[ColumnId]) -> Result<ColumnProjection> {
    let mut names = Vec::new();
    let mut positions = Vec::new();
    for id in ids {
        match id {
            ColumnId::Name(name) => names.push(name.clone()),
            ColumnId::Position(pos) => positions.push(*pos),
        }
    }
    match (names.is_empty(), positions.is_empty()) {
        (false, true) => Ok(ColumnProjection::Names(names)),
        (true, false) => Ok(ColumnProjection::Positions(positions)),
        // An empty selection projects nothing rather than erroring.
        (true, true) => Ok(ColumnProjection::Names(names)),
        (false, false) => Err(ParserError::UnsupportedOption(
            "usecols mixing positions and names cannot be projected by the backend".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn defaults_translate_to_backend_defaults() {
        let backend = translate_options(&ReadOptions::new()).unwrap();
        assert_eq!(backend, BackendCsvOptions::default());
        assert!(backend.has_header);
        assert_eq!(backend.skip_rows, 0);
        assert!(backend.raise_if_empty);
        assert!(!backend.ignore_errors);
    }

    #[test]
    fn direct_renames() {
        let options = ReadOptions::new()
            .with_sep(';')
            .with_quotechar('\'')
            .with_comment("#")
            .with_names(vec!["a".to_string(), "b".to_string()])
            .with_encoding("utf-8")
            .with_low_memory(true)
            .with_lineterminator('\n');
        let backend = translate_options(&options).unwrap();
        assert_eq!(backend.separator, Some(b';'));
        assert_eq!(backend.quote_char, Some(b'\''));
        assert_eq!(backend.comment_prefix.as_deref(), Some("#"));
        assert_eq!(
            backend.new_columns,
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(backend.encoding, Some(TextEncoding::Utf8));
        assert_eq!(backend.low_memory, Some(true));
        assert_eq!(backend.eol_char, Some(b'\n'));
    }

    #[test]
    fn delimiter_takes_precedence_over_sep() {
        let options = ReadOptions::new().with_sep(',').with_delimiter('\t');
        let backend = translate_options(&options).unwrap();
        assert_eq!(backend.separator, Some(b'\t'));
    }

    #[test]
    fn non_ascii_separator_rejected() {
        let err = translate_options(&ReadOptions::new().with_sep('§')).unwrap_err();
        match err {
            ParserError::UnsupportedOption(message) => assert!(message.contains("sep")),
            other => panic!("expected UnsupportedOption, got {other:?}"),
        }
    }

    #[test]
    fn non_ascii_delimiter_error_names_delimiter() {
        let err = translate_options(&ReadOptions::new().with_delimiter('§')).unwrap_err();
        match err {
            ParserError::UnsupportedOption(message) => assert!(message.contains("delimiter")),
            other => panic!("expected UnsupportedOption, got {other:?}"),
        }
    }

    #[test]
    fn header_infer_and_zero_do_not_fold() {
        for header in [Header::Infer, Header::Row(0), Header::Rows(vec![0])] {
            let backend = translate_options(&ReadOptions::new().with_header(header)).unwrap();
            assert!(backend.has_header);
            assert_eq!(backend.skip_rows, 0);
        }
    }

    #[test]
    fn header_none_disables_header() {
        let backend = translate_options(&ReadOptions::new().with_header(Header::None)).unwrap();
        assert!(!backend.has_header);
    }

    #[test]
    fn header_row_folds_into_skip_rows() {
        let backend = translate_options(&ReadOptions::new().with_header(Header::Row(3))).unwrap();
        assert!(backend.has_header);
        assert_eq!(backend.skip_rows, 3);
    }

    #[test]
    fn single_element_header_list_translates_like_the_integer() {
        let as_int = translate_options(&ReadOptions::new().with_header(Header::Row(2))).unwrap();
        let as_list =
            translate_options(&ReadOptions::new().with_header(Header::Rows(vec![2]))).unwrap();
        assert_eq!(as_int, as_list);
    }

    #[test]
    fn multi_row_header_rejected() {
        let err = translate_options(&ReadOptions::new().with_header(Header::Rows(vec![0, 1])))
            .unwrap_err();
        assert!(matches!(err, ParserError::UnsupportedOption(_)));
    }

    #[test]
    fn skip_rows_is_explicit_plus_header_fold() {
        let options = ReadOptions::new()
            .with_header(Header::Row(2))
            .with_skiprows(SkipRows::Count(3));
        let backend = translate_options(&options).unwrap();
        assert_eq!(backend.skip_rows, 5);
    }

    #[test]
    fn skiprows_list_forms() {
        let empty = ReadOptions::new().with_skiprows(SkipRows::Rows(vec![]));
        assert_eq!(translate_options(&empty).unwrap().skip_rows, 0);

        let single = ReadOptions::new().with_skiprows(SkipRows::Rows(vec![4]));
        assert_eq!(translate_options(&single).unwrap().skip_rows, 4);

        let multi = ReadOptions::new().with_skiprows(SkipRows::Rows(vec![1, 2]));
        assert!(matches!(
            translate_options(&multi).unwrap_err(),
            ParserError::UnsupportedOption(_)
        ));
    }

    #[test]
    fn callable_skiprows_rejected() {
        let options = ReadOptions::new().with_skiprows(SkipRows::Predicate(Arc::new(|row| {
            row % 2 == 0
        })));
        assert!(matches!(
            translate_options(&options).unwrap_err(),
            ParserError::UnsupportedOption(_)
        ));
    }

    #[test]
    fn usecols_projections() {
        let named = ReadOptions::new().with_usecols(ColumnSelector::Columns(vec![
            ColumnId::from("b"),
            ColumnId::from("a"),
        ]));
        assert_eq!(
            translate_options(&named).unwrap().columns,
            Some(ColumnProjection::Names(vec![
                "b".to_string(),
                "a".to_string()
            ]))
        );

        let positional = ReadOptions::new()
            .with_usecols(ColumnSelector::Columns(vec![0.into(), 2.into()]));
        assert_eq!(
            translate_options(&positional).unwrap().columns,
            Some(ColumnProjection::Positions(vec![0, 2]))
        );

        let mixed = ReadOptions::new()
            .with_usecols(ColumnSelector::Columns(vec![0.into(), "a".into()]));
        assert!(matches!(
            translate_options(&mixed).unwrap_err(),
            ParserError::UnsupportedOption(_)
        ));
    }

    #[test]
    fn callable_usecols_rejected_regardless_of_other_options() {
        let options = ReadOptions::new()
            .with_sep(';')
            .with_header(Header::Row(1))
            .with_usecols(ColumnSelector::Predicate(Arc::new(|name: &str| {
                name.starts_with('x')
            })));
        assert!(matches!(
            translate_options(&options).unwrap_err(),
            ParserError::UnsupportedOption(_)
        ));
    }

    #[test]
    fn decimal_separator_mapping() {
        let dot = translate_options(&ReadOptions::new().with_decimal('.')).unwrap();
        assert!(!dot.decimal_comma);

        let comma = translate_options(&ReadOptions::new().with_decimal(',')).unwrap();
        assert!(comma.decimal_comma);

        let err = translate_options(&ReadOptions::new().with_decimal(';')).unwrap_err();
        match err {
            ParserError::UnsupportedOption(message) => assert!(message.contains(';')),
            other => panic!("expected UnsupportedOption, got {other:?}"),
        }
    }

    #[test]
    fn parse_dates_boolean_maps_through() {
        let on = ReadOptions::new().with_parse_dates(ParseDates::Enabled(true));
        assert!(translate_options(&on).unwrap().try_parse_dates);

        let off = ReadOptions::new().with_parse_dates(ParseDates::Enabled(false));
        assert!(!translate_options(&off).unwrap().try_parse_dates);

        let per_column =
            ReadOptions::new().with_parse_dates(ParseDates::Columns(vec!["when".into()]));
        assert!(matches!(
            translate_options(&per_column).unwrap_err(),
            ParserError::UnsupportedOption(_)
        ));
    }

    #[test]
    fn bad_line_policies() {
        let error = translate_options(&ReadOptions::new()).unwrap();
        assert!(error.raise_if_empty);
        assert!(!error.ignore_errors);

        for policy in [BadLinePolicy::Warn, BadLinePolicy::Skip] {
            let backend =
                translate_options(&ReadOptions::new().with_on_bad_lines(policy)).unwrap();
            assert!(!backend.raise_if_empty);
            assert!(backend.ignore_errors);
        }
    }

    #[test]
    fn unknown_encoding_rejected() {
        let err = translate_options(&ReadOptions::new().with_encoding("latin-1")).unwrap_err();
        assert!(matches!(err, ParserError::UnsupportedOption(_)));
    }

    #[test]
    fn backend_options_serialize() {
        let options = ReadOptions::new()
            .with_sep('\t')
            .with_header(Header::Row(1))
            .with_decimal(',');
        let backend = translate_options(&options).unwrap();
        let json = serde_json::to_string(&backend).expect("serialize backend options");
        let round: BackendCsvOptions =
            serde_json::from_str(&json).expect("deserialize backend options");
        assert_eq!(round, backend);
    }
}
