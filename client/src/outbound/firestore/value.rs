//! Conversion between [`FieldValue`] and Firestore's typed JSON values.
//!
//! Firestore wraps every value in a single-key object naming its kind, for
//! example `{"integerValue": "42"}`. Integers travel as decimal strings.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::domain::ports::{Document, DocumentId, FieldMap, FieldValue};

/// Encode one value.
pub(super) fn encode_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => json!({ "nullValue": null }),
        FieldValue::Bool(flag) => json!({ "booleanValue": flag }),
        FieldValue::Integer(number) => json!({ "integerValue": number.to_string() }),
        FieldValue::Double(number) => json!({ "doubleValue": number }),
        FieldValue::Timestamp(at) => {
            json!({ "timestampValue": at.to_rfc3339_opts(SecondsFormat::Micros, true) })
        }
        FieldValue::String(text) => json!({ "stringValue": text }),
        FieldValue::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        FieldValue::Map(fields) => json!({ "mapValue": { "fields": encode_fields(fields) } }),
    }
}

/// Encode a field map as the `fields` object of a document body.
pub(super) fn encode_fields(fields: &FieldMap) -> Value {
    let encoded: Map<String, Value> = fields
        .iter()
        .map(|(name, value)| (name.clone(), encode_value(value)))
        .collect();
    Value::Object(encoded)
}

/// Decode one typed value.
pub(super) fn decode_value(raw: &Value) -> Result<FieldValue, String> {
    let Some(object) = raw.as_object() else {
        return Err(format!("expected a typed value object, found {raw}"));
    };
    let Some((kind, inner)) = object.iter().next() else {
        return Err("typed value object is empty".to_owned());
    };
    match kind.as_str() {
        "nullValue" => Ok(FieldValue::Null),
        "booleanValue" => inner
            .as_bool()
            .map(FieldValue::Bool)
            .ok_or_else(|| format!("booleanValue is not a boolean: {inner}")),
        "integerValue" => decode_integer(inner),
        "doubleValue" => inner
            .as_f64()
            .map(FieldValue::Double)
            .ok_or_else(|| format!("doubleValue is not a number: {inner}")),
        "timestampValue" => {
            let text = inner
                .as_str()
                .ok_or_else(|| format!("timestampValue is not a string: {inner}"))?;
            DateTime::parse_from_rfc3339(text)
                .map(|at| FieldValue::Timestamp(at.with_timezone(&Utc)))
                .map_err(|err| format!("timestampValue '{text}' is invalid: {err}"))
        }
        "stringValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|text| FieldValue::String(text.to_owned()))
            .ok_or_else(|| format!("{kind} is not a string: {inner}")),
        "arrayValue" => {
            let values = match inner.get("values") {
                Some(Value::Array(values)) => values.as_slice(),
                Some(other) => return Err(format!("arrayValue.values is not a list: {other}")),
                None => &[],
            };
            values
                .iter()
                .map(decode_value)
                .collect::<Result<Vec<_>, _>>()
                .map(FieldValue::Array)
        }
        "mapValue" => decode_fields(inner.get("fields")).map(FieldValue::Map),
        "geoPointValue" => decode_fields_untyped(inner).map(FieldValue::Map),
        other => Err(format!("unsupported value kind '{other}'")),
    }
}

fn decode_integer(inner: &Value) -> Result<FieldValue, String> {
    let parsed = match inner {
        Value::String(text) => text.parse::<i64>().ok(),
        Value::Number(number) => number.as_i64(),
        _ => None,
    };
    parsed
        .map(FieldValue::Integer)
        .ok_or_else(|| format!("integerValue is not an integer: {inner}"))
}

fn decode_fields_untyped(inner: &Value) -> Result<FieldMap, String> {
    let Some(object) = inner.as_object() else {
        return Err(format!("geoPointValue is not an object: {inner}"));
    };
    Ok(object
        .iter()
        .filter_map(|(name, value)| value.as_f64().map(|n| (name.clone(), FieldValue::Double(n))))
        .collect())
}

/// Decode the `fields` object of a document; absent fields decode empty.
pub(super) fn decode_fields(raw: Option<&Value>) -> Result<FieldMap, String> {
    let Some(raw) = raw else {
        return Ok(FieldMap::new());
    };
    let Some(object) = raw.as_object() else {
        return Err(format!("fields is not an object: {raw}"));
    };
    object
        .iter()
        .map(|(name, value)| {
            decode_value(value)
                .map(|decoded| (name.clone(), decoded))
                .map_err(|err| format!("field '{name}': {err}"))
        })
        .collect()
}

/// A document resource as returned by the REST API.
#[derive(Debug, Deserialize)]
pub(super) struct DocumentDto {
    name: String,
    #[serde(default)]
    fields: Option<Value>,
}

impl DocumentDto {
    /// Convert into a domain document; the id is the last name segment.
    pub(super) fn into_document(self) -> Result<Document, String> {
        let raw_id = self
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default();
        let id = DocumentId::new(raw_id)
            .map_err(|err| format!("document name '{}' has no id: {err}", self.name))?;
        let fields = decode_fields(self.fields.as_ref())?;
        Ok(Document::new(id, fields))
    }
}
