//! The caller-facing read entry point.

use std::path::{Path, PathBuf};

use framebridge_model::{ParserError, ReadOptions, Result, ResultFrame};

use crate::backend;
use crate::finalize::finalize_frame;
use crate::translate::translate_options;

/// CSV reader that delegates parsing to the polars engine while returning a
/// result indistinguishable from the generic API's native parser output.
///
/// Holds a resolved source path and the caller's options; each [`read`]
/// call is an independent translate, backend read, normalize pipeline with
/// no state carried across calls.
///
/// [`read`]: PolarsCsvReader::read
pub struct PolarsCsvReader {
    src: PathBuf,
    options: ReadOptions,
}

impl PolarsCsvReader {
    pub fn new(src: impl Into<PathBuf>, options: ReadOptions) -> Self {
        Self {
            src: src.into(),
            options,
        }
    }

    pub fn source(&self) -> &Path {
        &self.src
    }

    /// Read the source, optionally limited to the first `nrows` rows.
    ///
    /// Only failures from the backend read itself are wrapped into
    /// [`ParserError::Backend`]; translation and normalization errors are
    /// already caller-facing and propagate as raised.
    pub fn read(&self, nrows: Option<usize>) -> Result<ResultFrame> {
        let backend_options = translate_options(&self.options)?;
        tracing::debug!(
            src = %self.src.display(),
            ?nrows,
            "reading CSV through the polars backend"
        );
        let frame = backend::read_csv(&self.src, &backend_options, nrows)
            .map_err(ParserError::backend)?;
        finalize_frame(frame, &self.options)
    }
}
