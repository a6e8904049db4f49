//! Builds `runQuery` request bodies from [`DocumentQuery`] values.

use serde_json::{Value, json};

use super::value::encode_value;
use crate::domain::ports::{
    CollectionName, DocumentCursor, DocumentQuery, Filter, FilterOp, SortDirection,
};

const DOCUMENT_NAME_FIELD: &str = "__name__";

fn operator(op: FilterOp) -> &'static str {
    match op {
        FilterOp::Equal => "EQUAL",
        FilterOp::NotEqual => "NOT_EQUAL",
        FilterOp::LessThan => "LESS_THAN",
        FilterOp::LessThanOrEqual => "LESS_THAN_OR_EQUAL",
        FilterOp::GreaterThan => "GREATER_THAN",
        FilterOp::GreaterThanOrEqual => "GREATER_THAN_OR_EQUAL",
        FilterOp::ArrayContains => "ARRAY_CONTAINS",
        FilterOp::In => "IN",
    }
}

fn direction(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Ascending => "ASCENDING",
        SortDirection::Descending => "DESCENDING",
    }
}

fn field_filter(filter: &Filter) -> Value {
    json!({
        "fieldFilter": {
            "field": { "fieldPath": filter.field },
            "op": operator(filter.op),
            "value": encode_value(&filter.value),
        }
    })
}

fn order_entry(field: &str, sort: SortDirection) -> Value {
    json!({ "field": { "fieldPath": field }, "direction": direction(sort) })
}

/// Full resource name of a document, as `referenceValue` cursors need.
fn reference(document_root: &str, collection: &CollectionName, cursor: &DocumentCursor) -> Value {
    json!({
        "referenceValue": format!("{document_root}/{collection}/{}", cursor.document_id)
    })
}

/// Build the `runQuery` body.
///
/// `document_root` is the `projects/{p}/databases/{d}/documents` prefix.
/// Results always tie-break on the document name in the sort direction so
/// cursors resume at a unique position.
pub(super) fn run_query_body(
    document_root: &str,
    collection: &CollectionName,
    query: &DocumentQuery,
) -> Value {
    let mut structured = json!({
        "from": [{ "collectionId": collection.as_str() }],
    });

    match query.filters.as_slice() {
        [] => {}
        [single] => structured["where"] = field_filter(single),
        many => {
            let filters: Vec<Value> = many.iter().map(field_filter).collect();
            structured["where"] = json!({
                "compositeFilter": { "op": "AND", "filters": filters }
            });
        }
    }

    let tie_break = query
        .order_by
        .as_ref()
        .map_or(SortDirection::Ascending, |order| order.direction);
    let mut order_by = Vec::with_capacity(2);
    if let Some(order) = &query.order_by {
        order_by.push(order_entry(&order.field, order.direction));
    }
    order_by.push(order_entry(DOCUMENT_NAME_FIELD, tie_break));
    structured["orderBy"] = Value::Array(order_by);

    if let Some(cursor) = &query.start_after {
        let mut values = Vec::with_capacity(2);
        if let Some(order_value) = &cursor.order_value {
            values.push(encode_value(order_value));
        }
        values.push(reference(document_root, collection, cursor));
        structured["startAt"] = json!({ "values": values, "before": false });
    }

    if let Some(limit) = query.limit {
        structured["limit"] = json!(limit);
    }

    json!({ "structuredQuery": structured })
}
