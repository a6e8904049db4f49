//! Lenient readers used when rebuilding records from stored field maps.
//!
//! Every reader returns the field's default when the field is missing or
//! holds a value of the wrong kind.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::ports::{FieldMap, FieldValue};

pub(crate) fn text(fields: &FieldMap, key: &str) -> String {
    optional_text(fields, key).unwrap_or_default()
}

/// Non-empty string field.
pub(crate) fn optional_text(fields: &FieldMap, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(FieldValue::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

pub(crate) fn counter(fields: &FieldMap, key: &str) -> u32 {
    optional_counter(fields, key).unwrap_or_default()
}

/// Non-negative integer field, saturating at `u32::MAX`.
pub(crate) fn optional_counter(fields: &FieldMap, key: &str) -> Option<u32> {
    fields
        .get(key)
        .and_then(FieldValue::as_i64)
        .map(|value| u32::try_from(value.max(0)).unwrap_or(u32::MAX))
}

pub(crate) fn number(fields: &FieldMap, key: &str) -> Option<f64> {
    fields.get(key).and_then(FieldValue::as_f64)
}

pub(crate) fn timestamp(fields: &FieldMap, key: &str) -> Option<DateTime<Utc>> {
    fields.get(key).and_then(FieldValue::as_timestamp)
}

/// Calendar date stored either as `YYYY-MM-DD` text or as a timestamp.
pub(crate) fn date(fields: &FieldMap, key: &str) -> Option<NaiveDate> {
    let value = fields.get(key)?;
    value
        .as_str()
        .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
        .or_else(|| value.as_timestamp().map(|stamp| stamp.date_naive()))
}

pub(crate) fn string_list(fields: &FieldMap, key: &str) -> Vec<String> {
    fields
        .get(key)
        .map(FieldValue::string_list)
        .unwrap_or_default()
}

/// Insert `value` under `key` only when it is present and non-empty.
pub(crate) fn put_text(fields: &mut FieldMap, key: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|value| !value.is_empty()) {
        fields.insert(key.to_owned(), value.into());
    }
}
