pub mod error;
pub mod frame;
pub mod options;

pub use error::{ParserError, Result};
pub use frame::{FrameIndex, ResultFrame};
pub use options::{
    BadLinePolicy, ColumnId, ColumnSelector, DtypeSpec, Header, ParseDates, ReadOptions, SkipRows,
};
