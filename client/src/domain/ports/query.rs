//! Collection query description shared by document store adapters.
//!
//! A [`DocumentQuery`] carries ANDed filters, an optional single-field sort,
//! a positive limit and a `start_after` cursor. Results are always ordered by
//! the sort field first and the document id second, so a cursor taken from
//! the last document of one page resumes exactly after it.
//!
//! Repositories build queries through [`TypedQuery`], which only accepts
//! field names from a [`DocumentField`] enum.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use super::document::{Document, DocumentId, FieldValue};

/// Comparison applied by a [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOp {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `array-contains`: the field is a list holding the value.
    ArrayContains,
    /// `in`: the value is a list holding the field.
    In,
}

impl FilterOp {
    /// Operator token as written in query options.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::ArrayContains => "array-contains",
            Self::In => "in",
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when an operator token is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported filter operator '{0}'")]
pub struct UnknownFilterOp(pub String);

impl FromStr for FilterOp {
    type Err = UnknownFilterOp;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(Self::Equal),
            "!=" => Ok(Self::NotEqual),
            "<" => Ok(Self::LessThan),
            "<=" => Ok(Self::LessThanOrEqual),
            ">" => Ok(Self::GreaterThan),
            ">=" => Ok(Self::GreaterThanOrEqual),
            "array-contains" => Ok(Self::ArrayContains),
            "in" => Ok(Self::In),
            other => Err(UnknownFilterOp(other.to_owned())),
        }
    }
}

/// One `{field, operator, value}` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Field path the condition reads.
    pub field: String,
    /// Comparison operator.
    pub op: FilterOp,
    /// Right-hand operand.
    pub value: FieldValue,
}

impl Filter {
    /// Whether a document satisfies this condition.
    ///
    /// Missing fields never match, including for `!=`.
    pub fn matches(&self, document: &Document) -> bool {
        let Some(actual) = document.get(&self.field) else {
            return false;
        };
        let ordering = actual.partial_cmp_same_kind(&self.value);
        match self.op {
            FilterOp::Equal => actual.query_eq(&self.value),
            FilterOp::NotEqual => {
                !matches!(actual, FieldValue::Null) && !actual.query_eq(&self.value)
            }
            FilterOp::LessThan => ordering.is_some_and(std::cmp::Ordering::is_lt),
            FilterOp::LessThanOrEqual => ordering.is_some_and(std::cmp::Ordering::is_le),
            FilterOp::GreaterThan => ordering.is_some_and(std::cmp::Ordering::is_gt),
            FilterOp::GreaterThanOrEqual => ordering.is_some_and(std::cmp::Ordering::is_ge),
            FilterOp::ArrayContains => actual
                .as_array()
                .is_some_and(|items| items.iter().any(|item| item.query_eq(&self.value))),
            FilterOp::In => self
                .value
                .as_array()
                .is_some_and(|items| items.iter().any(|item| item.query_eq(actual))),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// Apply this direction to an ascending comparison.
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Single-field sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Field path to sort on.
    pub field: String,
    /// Sort direction.
    pub direction: SortDirection,
}

/// Resume point taken from a previously returned document.
///
/// Holds the value of the sort field (if the query is sorted) and the
/// document id used as a tie-break.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentCursor {
    /// Sort-field value of the resume document.
    pub order_value: Option<FieldValue>,
    /// Id of the resume document.
    pub document_id: DocumentId,
}

impl DocumentCursor {
    /// Capture a cursor from a document for the given sort.
    pub fn after(document: &Document, order_by: Option<&OrderBy>) -> Self {
        Self {
            order_value: order_by.map(|order| {
                document
                    .get(&order.field)
                    .cloned()
                    .unwrap_or(FieldValue::Null)
            }),
            document_id: document.id.clone(),
        }
    }
}

/// Filters, sort, limit and cursor for a collection read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentQuery {
    /// ANDed conditions.
    pub filters: Vec<Filter>,
    /// Optional sort; results always tie-break on document id.
    pub order_by: Option<OrderBy>,
    /// Maximum result count; must be positive when present.
    pub limit: Option<usize>,
    /// Resume strictly after this position.
    pub start_after: Option<DocumentCursor>,
}

impl DocumentQuery {
    /// Unfiltered, unsorted query over the whole collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition.
    #[must_use]
    pub fn filter(mut self, field: impl Into<String>, op: FilterOp, value: impl Into<FieldValue>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            op,
            value: value.into(),
        });
        self
    }

    /// Sort by one field.
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    /// Cap the result count.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Resume after a cursor.
    #[must_use]
    pub fn start_after(mut self, cursor: DocumentCursor) -> Self {
        self.start_after = Some(cursor);
        self
    }

    /// Cursor that resumes after `document` under this query's sort.
    pub fn cursor_after(&self, document: &Document) -> DocumentCursor {
        DocumentCursor::after(document, self.order_by.as_ref())
    }

    /// Check structural constraints before the query reaches a store.
    pub fn check(&self) -> Result<(), QueryError> {
        if self.limit == Some(0) {
            return Err(QueryError::ZeroLimit);
        }
        if let Some(filter) = self.filters.iter().find(|filter| filter.field.trim().is_empty()) {
            return Err(QueryError::BlankField {
                op: filter.op.as_str(),
            });
        }
        if let Some(filter) = self
            .filters
            .iter()
            .find(|filter| filter.op == FilterOp::In && filter.value.as_array().is_none())
        {
            return Err(QueryError::InOperandNotList {
                field: filter.field.clone(),
            });
        }
        match (&self.order_by, &self.start_after) {
            (Some(_), Some(cursor)) if cursor.order_value.is_none() => {
                Err(QueryError::CursorMismatch)
            }
            (None, Some(cursor)) if cursor.order_value.is_some() => Err(QueryError::CursorMismatch),
            _ => Ok(()),
        }
    }
}

/// Structural problems detected by [`DocumentQuery::check`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// `limit` was zero.
    #[error("limit must be a positive integer")]
    ZeroLimit,
    /// A filter named no field.
    #[error("filter with operator '{op}' names no field")]
    BlankField {
        /// Operator of the offending filter.
        op: &'static str,
    },
    /// An `in` filter operand was not a list.
    #[error("'in' filter on '{field}' needs a list operand")]
    InOperandNotList {
        /// Field of the offending filter.
        field: String,
    },
    /// The cursor was captured under a different sort.
    #[error("start_after cursor does not match the query sort")]
    CursorMismatch,
}

/// Field enumeration of one collection.
pub trait DocumentField: Copy {
    /// Stored field name.
    fn name(self) -> &'static str;
}

/// Query builder restricted to the fields of one collection.
///
/// # Examples
/// ```
/// use hireboard::domain::ports::{FilterOp, SortDirection, TypedQuery, UserField};
///
/// let query = TypedQuery::<UserField>::new()
///     .filter(UserField::Email, FilterOp::Equal, "ana@hire.test")
///     .order_by(UserField::CreatedAt, SortDirection::Descending)
///     .limit(1)
///     .build();
/// assert_eq!(query.filters[0].field, "email");
/// assert_eq!(query.limit, Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct TypedQuery<F> {
    inner: DocumentQuery,
    fields: PhantomData<F>,
}

impl<F: DocumentField> Default for TypedQuery<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: DocumentField> TypedQuery<F> {
    /// Empty query.
    pub fn new() -> Self {
        Self {
            inner: DocumentQuery::new(),
            fields: PhantomData,
        }
    }

    /// Add a condition on a known field.
    #[must_use]
    pub fn filter(self, field: F, op: FilterOp, value: impl Into<FieldValue>) -> Self {
        Self {
            inner: self.inner.filter(field.name(), op, value),
            fields: PhantomData,
        }
    }

    /// Sort by a known field.
    #[must_use]
    pub fn order_by(self, field: F, direction: SortDirection) -> Self {
        Self {
            inner: self.inner.order_by(field.name(), direction),
            fields: PhantomData,
        }
    }

    /// Cap the result count.
    #[must_use]
    pub fn limit(self, limit: usize) -> Self {
        Self {
            inner: self.inner.limit(limit),
            fields: PhantomData,
        }
    }

    /// Resume after a cursor.
    #[must_use]
    pub fn start_after(self, cursor: DocumentCursor) -> Self {
        Self {
            inner: self.inner.start_after(cursor),
            fields: PhantomData,
        }
    }

    /// Finish building.
    pub fn build(self) -> DocumentQuery {
        self.inner
    }
}

/// Stored fields of the `users` collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    /// `email`
    Email,
    /// `name`
    Name,
    /// `userType`
    UserType,
    /// `location`
    Location,
    /// `rating`
    Rating,
    /// `createdAt`
    CreatedAt,
    /// `updatedAt`
    UpdatedAt,
}

impl DocumentField for UserField {
    fn name(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Name => "name",
            Self::UserType => "userType",
            Self::Location => "location",
            Self::Rating => "rating",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }
}

/// Stored fields of the `jobPostings` collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobPostingField {
    /// `jobTitle`
    JobTitle,
    /// `companyName`
    CompanyName,
    /// `location`
    Location,
    /// `workSetup`
    WorkSetup,
    /// `employmentType`
    EmploymentType,
    /// `skills`
    Skills,
    /// `employerId`
    EmployerId,
    /// `postedDate`
    PostedDate,
    /// `createdAt`
    CreatedAt,
}

impl DocumentField for JobPostingField {
    fn name(self) -> &'static str {
        match self {
            Self::JobTitle => "jobTitle",
            Self::CompanyName => "companyName",
            Self::Location => "location",
            Self::WorkSetup => "workSetup",
            Self::EmploymentType => "employmentType",
            Self::Skills => "skills",
            Self::EmployerId => "employerId",
            Self::PostedDate => "postedDate",
            Self::CreatedAt => "createdAt",
        }
    }
}

/// Stored fields of the legacy `categories` and `items` collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogueField {
    /// `name`
    Name,
    /// `category`
    Category,
    /// `sellerId`
    SellerId,
    /// `status`
    Status,
    /// `createdAt`
    CreatedAt,
}

impl DocumentField for CatalogueField {
    fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Category => "category",
            Self::SellerId => "sellerId",
            Self::Status => "status",
            Self::CreatedAt => "createdAt",
        }
    }
}
