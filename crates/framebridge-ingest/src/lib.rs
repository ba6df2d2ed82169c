pub mod backend;
pub mod dates;
pub mod dtypes;
pub mod finalize;
pub mod reader;
pub mod translate;

pub use dates::apply_date_conversions;
pub use dtypes::resolve_dtype;
pub use finalize::finalize_frame;
pub use reader::PolarsCsvReader;
pub use translate::{BackendCsvOptions, ColumnProjection, TextEncoding, translate_options};
