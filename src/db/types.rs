//! Rendering of driver values as text cells.
//!
//! Type conversion uses a two-phase approach:
//! 1. `TypeCategory` classifies the column's type name into a logical category
//! 2. Category-specific decoders extract the value and render it
//!
//! Rendering is fixed: NULL becomes `NULL`, booleans `true`/`false`, numbers
//! their decimal form, NUMERIC its exact server text, JSON compact JSON text,
//! binary data UTF-8 text when valid or base64 otherwise. Anything else,
//! including UUIDs and `timestamptz` with the session's offset, is shown as
//! the server's own text for the value.

use sqlx::postgres::{PgRow, PgTypeInfo, PgValueRef};
use sqlx::{Column, Decode, Row, Type, TypeInfo, ValueRef};
use tracing::debug;

/// Text used for SQL NULL.
pub const NULL_TEXT: &str = "NULL";

// =============================================================================
// Type Classification
// =============================================================================

/// Logical category for database column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Integer,
    Float,
    Decimal,
    Boolean,
    Json,
    Binary,
    Date,
    Time,
    Timestamp,
    Text,
}

/// Classify a PostgreSQL/openGauss type name into a logical category.
pub fn categorize_type(type_name: &str) -> TypeCategory {
    match type_name.to_lowercase().as_str() {
        "int2" | "int4" | "int8" | "smallint" | "integer" | "bigint" | "serial"
        | "bigserial" => TypeCategory::Integer,
        "float4" | "float8" | "real" | "double precision" => TypeCategory::Float,
        "numeric" | "decimal" => TypeCategory::Decimal,
        "bool" | "boolean" => TypeCategory::Boolean,
        "json" | "jsonb" => TypeCategory::Json,
        "bytea" => TypeCategory::Binary,
        "date" => TypeCategory::Date,
        "time" => TypeCategory::Time,
        "timestamp" => TypeCategory::Timestamp,
        // varchar, text, name, uuid, timestamptz, interval, money, arrays, ...
        _ => TypeCategory::Text,
    }
}

// =============================================================================
// Decimal Type Support
// =============================================================================

/// Raw NUMERIC value as the server's exact text.
#[derive(Debug)]
pub struct RawDecimal(pub String);

impl Type<sqlx::Postgres> for RawDecimal {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        let name = ty.name().to_lowercase();
        name.contains("numeric") || name.contains("decimal")
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for RawDecimal {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as Decode<sqlx::Postgres>>::decode(value)?;
        Ok(RawDecimal(s.to_string()))
    }
}

// =============================================================================
// Binary Encoding
// =============================================================================

/// Render binary data: UTF-8 text when valid, base64 otherwise.
pub fn binary_to_text(bytes: &[u8]) -> String {
    use base64::{Engine as _, engine::general_purpose::STANDARD};

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => STANDARD.encode(bytes),
    }
}

// =============================================================================
// Row to Text Trait
// =============================================================================

/// Conversion of a database row into column names and text cells.
pub trait RowToText {
    fn column_names(&self) -> Vec<String>;
    fn to_text_cells(&self) -> Vec<String>;
}

impl RowToText for PgRow {
    fn column_names(&self) -> Vec<String> {
        self.columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect()
    }

    fn to_text_cells(&self) -> Vec<String> {
        self.columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let type_name = col.type_info().name();
                decode_cell(self, idx, type_name, categorize_type(type_name))
            })
            .collect()
    }
}

// =============================================================================
// Decoders
// =============================================================================

fn decode_cell(row: &PgRow, idx: usize, type_name: &str, category: TypeCategory) -> String {
    match row.try_get_raw(idx) {
        Ok(raw) if raw.is_null() => return NULL_TEXT.to_string(),
        Ok(_) => {}
        Err(e) => {
            debug!(column = idx, error = %e, "Failed to read raw column value");
            return NULL_TEXT.to_string();
        }
    }

    let decoded = match category {
        TypeCategory::Integer => decode_integer(row, idx),
        TypeCategory::Float => decode_float(row, idx),
        TypeCategory::Decimal => row.try_get::<RawDecimal, _>(idx).ok().map(|v| v.0),
        TypeCategory::Boolean => row.try_get::<bool, _>(idx).ok().map(|v| v.to_string()),
        TypeCategory::Json => row
            .try_get::<serde_json::Value, _>(idx)
            .ok()
            .map(|v| v.to_string()),
        TypeCategory::Binary => row
            .try_get::<Vec<u8>, _>(idx)
            .ok()
            .map(|v| binary_to_text(&v)),
        TypeCategory::Date => row
            .try_get::<chrono::NaiveDate, _>(idx)
            .ok()
            .map(|v| v.to_string()),
        TypeCategory::Time => row
            .try_get::<chrono::NaiveTime, _>(idx)
            .ok()
            .map(|v| v.to_string()),
        TypeCategory::Timestamp => row
            .try_get::<chrono::NaiveDateTime, _>(idx)
            .ok()
            .map(|v| v.to_string()),
        TypeCategory::Text => None,
    };

    decoded
        .or_else(|| decode_text(row, idx))
        .unwrap_or_else(|| {
            debug!(column = idx, type_name, "Column value could not be rendered");
            format!("<{}>", type_name.to_lowercase())
        })
}

fn decode_integer(row: &PgRow, idx: usize) -> Option<String> {
    if let Ok(v) = row.try_get::<i16, _>(idx) {
        return Some(v.to_string());
    }
    if let Ok(v) = row.try_get::<i32, _>(idx) {
        return Some(v.to_string());
    }
    row.try_get::<i64, _>(idx).ok().map(|v| v.to_string())
}

fn decode_float(row: &PgRow, idx: usize) -> Option<String> {
    if let Ok(v) = row.try_get::<f64, _>(idx) {
        return Some(v.to_string());
    }
    row.try_get::<f32, _>(idx).ok().map(|v| v.to_string())
}

/// Server text for the value: typed String decode first, then the raw text.
fn decode_text(row: &PgRow, idx: usize) -> Option<String> {
    if let Ok(v) = row.try_get::<String, _>(idx) {
        return Some(v);
    }
    let raw = row.try_get_raw(idx).ok()?;
    <&str as Decode<sqlx::Postgres>>::decode(raw)
        .ok()
        .map(str::to_string)
}
