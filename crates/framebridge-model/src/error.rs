use thiserror::Error;

/// Errors surfaced by the CSV engine bridge.
///
/// Translation and normalization failures keep their own variants; only the
/// backend read is caught and re-wrapped, so callers see one error surface.
#[derive(Debug, Error)]
pub enum ParserError {
    /// The caller asked for an option the backend engine cannot honor.
    #[error("unsupported option: {0}")]
    UnsupportedOption(String),
    /// An `index_col` entry did not resolve to an existing column.
    #[error("index {0} invalid")]
    InvalidIndex(String),
    /// A bad value request, e.g. a dtype cast that cannot be applied.
    #[error("{0}")]
    InvalidValue(String),
    /// Any failure raised by the backend engine during the actual read.
    #[error("CSV backend error: {message}")]
    Backend {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ParserError {
    /// Wrap a backend engine failure, keeping its message and cause.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend {
            message: err.to_string(),
            source: Box::new(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParserError>;
