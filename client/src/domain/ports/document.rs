//! Store-neutral document model shared by every document store adapter.
//!
//! A document is a map of field names to [`FieldValue`]s addressed by a
//! store-generated [`DocumentId`] inside a named [`CollectionName`].

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, TimeZone, Utc};

/// Field map of a stored document, keyed by field name.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// Typed value held in a document field.
///
/// The variants mirror the value kinds a document store keeps natively.
/// Timestamps are a distinct kind so that ordering and range filters on
/// `createdAt` behave chronologically rather than lexically.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Explicit null.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Signed 64-bit integer.
    Integer(i64),
    /// IEEE double.
    Double(f64),
    /// UTC timestamp.
    Timestamp(DateTime<Utc>),
    /// UTF-8 string.
    String(String),
    /// Ordered list of values.
    Array(Vec<FieldValue>),
    /// Nested field map.
    Map(FieldMap),
}

impl FieldValue {
    /// Borrow the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Read a boolean payload.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Read an integer payload; doubles with no fractional part are accepted.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Double(value)
                if value.is_finite()
                    && value.trunc() == *value
                    && (i64::MIN as f64..=i64::MAX as f64).contains(value) =>
            {
                Some(*value as i64)
            }
            _ => None,
        }
    }

    /// Read any numeric payload as a double.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Double(value) => Some(*value),
            _ => None,
        }
    }

    /// Normalise the field into a UTC timestamp.
    ///
    /// Accepts native timestamps, RFC 3339 strings and epoch-millisecond
    /// integers, which are the shapes older clients wrote.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(value) => Some(*value),
            Self::String(value) => DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|parsed| parsed.with_timezone(&Utc)),
            Self::Integer(millis) => Utc.timestamp_millis_opt(*millis).single(),
            _ => None,
        }
    }

    /// Borrow the list payload.
    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            Self::Array(values) => Some(values.as_slice()),
            _ => None,
        }
    }

    /// Borrow the nested map payload.
    pub fn as_map(&self) -> Option<&FieldMap> {
        match self {
            Self::Map(fields) => Some(fields),
            _ => None,
        }
    }

    /// Collect the string members of a list, skipping anything else.
    pub fn string_list(&self) -> Vec<String> {
        self.as_array()
            .map(|values| {
                values
                    .iter()
                    .filter_map(Self::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Build a list value from anything convertible into field values.
    pub fn list<T: Into<Self>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }

    // Cross-kind ordering rank: null < bool < number < timestamp < string
    // < array < map.
    const fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Integer(_) | Self::Double(_) => 2,
            Self::Timestamp(_) => 3,
            Self::String(_) => 4,
            Self::Array(_) => 5,
            Self::Map(_) => 6,
        }
    }

    /// Total order used when sorting query results.
    ///
    /// Values of different kinds order by kind; numbers compare numerically
    /// across integer and double.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (Self::Array(a), Self::Array(b)) => a
                .iter()
                .zip(b.iter())
                .map(|(left, right)| left.total_cmp(right))
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            (Self::Map(a), Self::Map(b)) => a
                .iter()
                .zip(b.iter())
                .map(|((left_key, left), (right_key, right))| {
                    left_key.cmp(right_key).then_with(|| left.total_cmp(right))
                })
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            _ if self.rank() == 2 && other.rank() == 2 => {
                let left = self.as_f64().unwrap_or_default();
                let right = other.as_f64().unwrap_or_default();
                left.total_cmp(&right)
            }
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Comparison used by range filters; `None` when the kinds differ.
    pub fn partial_cmp_same_kind(&self, other: &Self) -> Option<Ordering> {
        (self.rank() == other.rank()).then(|| self.total_cmp(other))
    }

    /// Equality used by equality filters: numbers match across kinds.
    pub fn query_eq(&self, other: &Self) -> bool {
        self.partial_cmp_same_kind(other)
            .is_some_and(Ordering::is_eq)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<FieldMap> for FieldValue {
    fn from(value: FieldMap) -> Self {
        Self::Map(value)
    }
}

/// Validation errors for collection names and document ids.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentPathError {
    /// The segment was empty once trimmed.
    #[error("{kind} must not be empty")]
    Empty {
        /// Which segment was being validated.
        kind: &'static str,
    },
    /// The segment contained a path separator or surrounding whitespace.
    #[error("{kind} '{value}' must be a single path segment")]
    InvalidSegment {
        /// Which segment was being validated.
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
}

fn validate_segment(kind: &'static str, value: &str) -> Result<(), DocumentPathError> {
    if value.trim().is_empty() {
        return Err(DocumentPathError::Empty { kind });
    }
    if value.contains('/') || value.trim() != value {
        return Err(DocumentPathError::InvalidSegment {
            kind,
            value: value.to_owned(),
        });
    }
    Ok(())
}

/// Name of a top-level collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionName(Cow<'static, str>);

impl CollectionName {
    /// Account records.
    pub const USERS: Self = Self(Cow::Borrowed("users"));
    /// Job postings.
    pub const JOB_POSTINGS: Self = Self(Cow::Borrowed("jobPostings"));
    /// Legacy marketplace categories.
    pub const CATEGORIES: Self = Self(Cow::Borrowed("categories"));
    /// Legacy marketplace items.
    pub const ITEMS: Self = Self(Cow::Borrowed("items"));
    /// Scratch collection used by connectivity checks.
    pub const TEST: Self = Self(Cow::Borrowed("test"));

    /// Validate and construct a collection name.
    pub fn new(name: impl Into<String>) -> Result<Self, DocumentPathError> {
        let name = name.into();
        validate_segment("collection name", &name)?;
        Ok(Self(Cow::Owned(name)))
    }

    /// Borrow the raw name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CollectionName {
    type Err = DocumentPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Store-generated document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    /// Validate and construct a document id.
    pub fn new(id: impl Into<String>) -> Result<Self, DocumentPathError> {
        let id = id.into();
        validate_segment("document id", &id)?;
        Ok(Self(id))
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DocumentId> for String {
    fn from(value: DocumentId) -> Self {
        value.0
    }
}

/// A stored document: id plus fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Identifier within its collection.
    pub id: DocumentId,
    /// Field values.
    pub fields: FieldMap,
}

impl Document {
    /// Construct a document.
    pub fn new(id: DocumentId, fields: FieldMap) -> Self {
        Self { id, fields }
    }

    /// Borrow a field value.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }
}
