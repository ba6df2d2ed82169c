//! Resolution of generic dtype specifier strings to backend dtypes.

use polars::prelude::{DataType, TimeUnit};

use framebridge_model::{ParserError, Result};

/// Resolve a dtype specifier string to a concrete backend dtype.
///
/// Specifiers are matched case-insensitively. Unknown specifiers surface as
/// a value error, the same kind callers see for failed casts.
pub fn resolve_dtype(spec: &str) -> Result<DataType> {
    let dtype = match spec.trim().to_ascii_lowercase().as_str() {
        "int8" => DataType::Int8,
        "int16" => DataType::Int16,
        "int32" => DataType::Int32,
        "int64" | "int" => DataType::Int64,
        "uint8" => DataType::UInt8,
        "uint16" => DataType::UInt16,
        "uint32" => DataType::UInt32,
        "uint64" => DataType::UInt64,
        "float32" => DataType::Float32,
        "float64" | "float" => DataType::Float64,
        "str" | "string" | "object" | "utf8" => DataType::String,
        "bool" | "boolean" => DataType::Boolean,
        "datetime64[ns]" | "datetime" => DataType::Datetime(TimeUnit::Nanoseconds, None),
        "datetime64[us]" => DataType::Datetime(TimeUnit::Microseconds, None),
        "datetime64[ms]" => DataType::Datetime(TimeUnit::Milliseconds, None),
        "date" => DataType::Date,
        other => {
            return Err(ParserError::InvalidValue(format!(
                "data type '{other}' is not understood"
            )));
        }
    };
    Ok(dtype)
}
