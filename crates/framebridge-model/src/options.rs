//! Read options accepted by the generic CSV API surface.
//!
//! `ReadOptions` is the typed form of the caller-facing parser arguments. It
//! is immutable input to the option translator: translation builds a fresh
//! backend record and never touches the caller's copy.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A column referenced either by position or by label.
///
/// Integer identifiers are always treated as positions, even when a column
/// happens to be labeled with that same integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnId {
    Position(usize),
    Name(String),
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnId::Position(pos) => write!(f, "{pos}"),
            ColumnId::Name(name) => write!(f, "{name}"),
        }
    }
}

impl From<usize> for ColumnId {
    fn from(pos: usize) -> Self {
        ColumnId::Position(pos)
    }
}

impl From<&str> for ColumnId {
    fn from(name: &str) -> Self {
        ColumnId::Name(name.to_string())
    }
}

/// Which row(s) of the file carry column names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Header {
    /// Infer the header from the first row (the caller-facing default).
    #[default]
    Infer,
    /// Headerless file; column labels are synthesized or taken from `names`.
    None,
    /// Treat row `n` as the header, skipping everything before it.
    Row(usize),
    /// Explicit list of header rows. Only single-element lists are
    /// expressible by the backend; longer lists are rejected at translation.
    Rows(Vec<usize>),
}

/// Rows to skip before parsing.
#[derive(Clone)]
pub enum SkipRows {
    /// Skip the first `n` rows.
    Count(usize),
    /// Row list form. Empty means skip nothing, a single element is folded
    /// into a leading skip count, anything longer is rejected.
    Rows(Vec<usize>),
    /// Per-row predicate. The backend cannot evaluate these; rejected.
    Predicate(Arc<dyn Fn(usize) -> bool + Send + Sync>),
}

impl fmt::Debug for SkipRows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipRows::Count(n) => f.debug_tuple("Count").field(n).finish(),
            SkipRows::Rows(rows) => f.debug_tuple("Rows").field(rows).finish(),
            SkipRows::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Column selection (`usecols`).
#[derive(Clone)]
pub enum ColumnSelector {
    /// Ordered projection by position or label.
    Columns(Vec<ColumnId>),
    /// Per-label predicate. The backend cannot evaluate these; rejected.
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl fmt::Debug for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSelector::Columns(cols) => f.debug_tuple("Columns").field(cols).finish(),
            ColumnSelector::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Requested dtypes, either one specifier for every column or a per-column
/// mapping keyed by position or label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DtypeSpec {
    Single(String),
    PerColumn(Vec<(ColumnId, String)>),
}

impl DtypeSpec {
    /// Look up a per-column specifier by identifier. `Single` specs carry no
    /// per-column entries.
    pub fn get(&self, id: &ColumnId) -> Option<&str> {
        match self {
            DtypeSpec::Single(_) => None,
            DtypeSpec::PerColumn(entries) => entries
                .iter()
                .find(|(key, _)| key == id)
                .map(|(_, spec)| spec.as_str()),
        }
    }
}

/// Date parsing request. Only the whole-frame boolean form is supported by
/// the backend; the per-column form exists to be rejected with a clear error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseDates {
    Enabled(bool),
    Columns(Vec<ColumnId>),
}

/// Policy for malformed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BadLinePolicy {
    /// Raise on bad lines (the default).
    #[default]
    Error,
    /// Warn and keep going.
    Warn,
    /// Silently skip bad lines.
    Skip,
}

/// The generic options record for one read request.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    pub header: Header,
    pub names: Option<Vec<String>>,
    /// Columns to promote into the result index, in order. `None` means no
    /// index is materialized.
    pub index_col: Option<Vec<ColumnId>>,
    pub dtype: Option<DtypeSpec>,
    pub parse_dates: Option<ParseDates>,
    pub usecols: Option<ColumnSelector>,
    pub skiprows: Option<SkipRows>,
    pub sep: Option<char>,
    /// Alias of `sep`; takes precedence when both are set.
    pub delimiter: Option<char>,
    pub quotechar: Option<char>,
    pub comment: Option<String>,
    pub storage_options: Option<BTreeMap<String, String>>,
    pub encoding: Option<String>,
    pub low_memory: Option<bool>,
    pub lineterminator: Option<char>,
    pub decimal: Option<char>,
    pub on_bad_lines: BadLinePolicy,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, header: Header) -> Self {
        self.header = header;
        self
    }

    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.names = Some(names);
        self
    }

    pub fn with_index_col(mut self, index_col: Vec<ColumnId>) -> Self {
        self.index_col = Some(index_col);
        self
    }

    pub fn with_dtype(mut self, dtype: DtypeSpec) -> Self {
        self.dtype = Some(dtype);
        self
    }

    pub fn with_parse_dates(mut self, parse_dates: ParseDates) -> Self {
        self.parse_dates = Some(parse_dates);
        self
    }

    pub fn with_usecols(mut self, usecols: ColumnSelector) -> Self {
        self.usecols = Some(usecols);
        self
    }

    pub fn with_skiprows(mut self, skiprows: SkipRows) -> Self {
        self.skiprows = Some(skiprows);
        self
    }

    pub fn with_sep(mut self, sep: char) -> Self {
        self.sep = Some(sep);
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_quotechar(mut self, quotechar: char) -> Self {
        self.quotechar = Some(quotechar);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_storage_options(mut self, storage_options: BTreeMap<String, String>) -> Self {
        self.storage_options = Some(storage_options);
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn with_low_memory(mut self, low_memory: bool) -> Self {
        self.low_memory = Some(low_memory);
        self
    }

    pub fn with_lineterminator(mut self, lineterminator: char) -> Self {
        self.lineterminator = Some(lineterminator);
        self
    }

    pub fn with_decimal(mut self, decimal: char) -> Self {
        self.decimal = Some(decimal);
        self
    }

    pub fn with_on_bad_lines(mut self, policy: BadLinePolicy) -> Self {
        self.on_bad_lines = policy;
        self
    }

    /// True when the caller asked for headerless parsing.
    pub fn is_headerless(&self) -> bool {
        matches!(self.header, Header::None)
    }
}
