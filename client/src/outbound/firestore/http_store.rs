//! Reqwest-backed Firestore document store.
//!
//! This adapter owns transport details only: URL building, credentials,
//! HTTP error mapping and typed-value encoding. Timestamps and defaults are
//! applied by the document access layer before calls reach it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use zeroize::Zeroizing;

use super::query::run_query_body;
use super::value::{DocumentDto, encode_fields};
use crate::domain::ports::{
    CollectionName, Document, DocumentId, DocumentQuery, DocumentStore, DocumentStoreError,
    FieldMap,
};

/// Public Firestore endpoint.
pub const DEFAULT_FIRESTORE_ENDPOINT: &str = "https://firestore.googleapis.com";
/// Database id used when none is configured.
pub const DEFAULT_DATABASE_ID: &str = "(default)";
/// Request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection details for one Firestore database.
#[derive(Clone, PartialEq, Eq)]
pub struct FirestoreConfig {
    /// Scheme and host of the REST API, e.g. an emulator address.
    pub endpoint: Url,
    /// Cloud project id.
    pub project_id: String,
    /// Database id inside the project.
    pub database_id: String,
    /// Web API key sent as the `key` query parameter.
    pub api_key: String,
    /// Optional bearer token for authenticated rules.
    pub auth_token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl FirestoreConfig {
    /// `projects/{p}/databases/{d}/documents`, the prefix of every
    /// document name.
    pub fn document_root(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.project_id, self.database_id
        )
    }
}

impl std::fmt::Debug for FirestoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("project_id", &self.project_id)
            .field("database_id", &self.database_id)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Document store adapter speaking the Firestore REST v1 API.
pub struct FirestoreDocumentStore {
    client: Client,
    documents_url: Url,
    document_root: String,
    api_key: Zeroizing<String>,
    auth_token: Option<Zeroizing<String>>,
}

impl FirestoreDocumentStore {
    /// Build an adapter using a reqwest client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint cannot hold a path or the reqwest
    /// client cannot be constructed.
    pub fn new(config: FirestoreConfig) -> Result<Self, DocumentStoreError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| DocumentStoreError::connection(err.to_string()))?;
        let document_root = config.document_root();
        let mut documents_url = config.endpoint.clone();
        documents_url
            .path_segments_mut()
            .map_err(|()| {
                DocumentStoreError::connection(format!(
                    "endpoint '{}' cannot carry a path",
                    config.endpoint
                ))
            })?
            .pop_if_empty()
            .push("v1")
            .extend(document_root.split('/'));
        Ok(Self {
            client,
            documents_url,
            document_root,
            api_key: Zeroizing::new(config.api_key),
            auth_token: config.auth_token.map(Zeroizing::new),
        })
    }

    fn url(&self, collection: &CollectionName, id: Option<&DocumentId>) -> Url {
        let mut url = self.documents_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(collection.as_str());
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        url
    }

    fn run_query_url(&self) -> Url {
        let mut url = self.documents_url.clone();
        let path = format!("{}:runQuery", url.path());
        url.set_path(&path);
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .query(&[("key", self.api_key.as_str())])
            .header(reqwest::header::ACCEPT, "application/json");
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<(StatusCode, Vec<u8>), DocumentStoreError> {
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        Ok((status, body.to_vec()))
    }
}

#[async_trait]
impl DocumentStore for FirestoreDocumentStore {
    async fn insert(
        &self,
        collection: &CollectionName,
        fields: FieldMap,
    ) -> Result<DocumentId, DocumentStoreError> {
        let body = json!({ "fields": encode_fields(&fields) });
        let request = self
            .request(Method::POST, self.url(collection, None))
            .json(&body);
        let (status, body) = self.send(request).await?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        let document = parse_document(&body)?;
        debug!(%collection, id = %document.id, "inserted document");
        Ok(document.id)
    }

    async fn get(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
    ) -> Result<Option<Document>, DocumentStoreError> {
        let request = self.request(Method::GET, self.url(collection, Some(id)));
        let (status, body) = self.send(request).await?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        parse_document(&body).map(Some)
    }

    async fn merge(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
        fields: FieldMap,
    ) -> Result<(), DocumentStoreError> {
        let mut params: Vec<(&str, &str)> = fields
            .keys()
            .map(|name| ("updateMask.fieldPaths", name.as_str()))
            .collect();
        params.push(("currentDocument.exists", "true"));
        let body = json!({ "fields": encode_fields(&fields) });
        let request = self
            .request(Method::PATCH, self.url(collection, Some(id)))
            .query(&params)
            .json(&body);
        let (status, body) = self.send(request).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(DocumentStoreError::not_found(
                collection.as_str(),
                id.as_str(),
            ));
        }
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        debug!(%collection, %id, fields = fields.len(), "merged document");
        Ok(())
    }

    async fn remove(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
    ) -> Result<(), DocumentStoreError> {
        let request = self.request(Method::DELETE, self.url(collection, Some(id)));
        let (status, body) = self.send(request).await?;
        if status.is_success() || status == StatusCode::NOT_FOUND {
            debug!(%collection, %id, "removed document");
            return Ok(());
        }
        Err(map_status_error(status, &body))
    }

    async fn query(
        &self,
        collection: &CollectionName,
        query: &DocumentQuery,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        let body = run_query_body(&self.document_root, collection, query);
        let request = self
            .request(Method::POST, self.run_query_url())
            .json(&body);
        let (status, body) = self.send(request).await?;
        if status == StatusCode::BAD_REQUEST {
            return Err(DocumentStoreError::invalid_query(body_preview(&body)));
        }
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        let documents = parse_run_query(&body)?;
        debug!(%collection, count = documents.len(), "ran query");
        Ok(documents)
    }
}

/// One element of a `runQuery` response stream.
#[derive(Debug, Deserialize)]
struct RunQueryItem {
    #[serde(default)]
    document: Option<DocumentDto>,
}

fn parse_document(body: &[u8]) -> Result<Document, DocumentStoreError> {
    let dto: DocumentDto = serde_json::from_slice(body).map_err(|err| {
        DocumentStoreError::decode(format!("invalid document JSON payload: {err}"))
    })?;
    dto.into_document().map_err(DocumentStoreError::decode)
}

fn parse_run_query(body: &[u8]) -> Result<Vec<Document>, DocumentStoreError> {
    let items: Vec<RunQueryItem> = serde_json::from_slice(body).map_err(|err| {
        DocumentStoreError::decode(format!("invalid runQuery JSON payload: {err}"))
    })?;
    items
        .into_iter()
        .filter_map(|item| item.document)
        .map(|dto| dto.into_document().map_err(DocumentStoreError::decode))
        .collect()
}

fn map_transport_error(error: reqwest::Error) -> DocumentStoreError {
    if error.is_timeout() {
        DocumentStoreError::timeout(error.to_string())
    } else {
        DocumentStoreError::connection(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> DocumentStoreError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => DocumentStoreError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            DocumentStoreError::timeout(message)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            DocumentStoreError::permission_denied(message)
        }
        _ if status.is_client_error() => DocumentStoreError::rejected(message),
        _ => DocumentStoreError::connection(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network Firestore helpers.

    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::FieldValue;

    #[fixture]
    fn config() -> FirestoreConfig {
        FirestoreConfig {
            endpoint: Url::parse("http://localhost:8080").expect("url"),
            project_id: "hireboard-dev".to_owned(),
            database_id: DEFAULT_DATABASE_ID.to_owned(),
            api_key: "test-key".to_owned(),
            auth_token: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    #[rstest]
    fn builds_collection_and_document_urls(config: FirestoreConfig) {
        let store = FirestoreDocumentStore::new(config).expect("store");
        let id = DocumentId::new("u-1").expect("id");
        assert_eq!(
            store.url(&CollectionName::USERS, Some(&id)).as_str(),
            "http://localhost:8080/v1/projects/hireboard-dev/databases/(default)/documents/users/u-1"
        );
        assert_eq!(
            store.url(&CollectionName::JOB_POSTINGS, None).as_str(),
            "http://localhost:8080/v1/projects/hireboard-dev/databases/(default)/documents/jobPostings"
        );
        assert_eq!(
            store.run_query_url().as_str(),
            "http://localhost:8080/v1/projects/hireboard-dev/databases/(default)/documents:runQuery"
        );
    }

    #[rstest]
    fn debug_output_hides_credentials(mut config: FirestoreConfig) {
        config.auth_token = Some("bearer-secret".to_owned());
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("test-key"));
        assert!(!rendered.contains("bearer-secret"));
    }

    #[rstest]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, "RateLimited")]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "Timeout")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::unauthorised(StatusCode::UNAUTHORIZED, "PermissionDenied")]
    #[case::forbidden(StatusCode::FORBIDDEN, "PermissionDenied")]
    #[case::conflict(StatusCode::CONFLICT, "Rejected")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Connection")]
    fn maps_http_statuses_to_expected_errors(#[case] status: StatusCode, #[case] expected: &str) {
        let error = map_status_error(status, b"{\"error\":{\"status\":\"UNAVAILABLE\"}}");
        let matched = match expected {
            "RateLimited" => matches!(error, DocumentStoreError::RateLimited { .. }),
            "Timeout" => matches!(error, DocumentStoreError::Timeout { .. }),
            "PermissionDenied" => matches!(error, DocumentStoreError::PermissionDenied { .. }),
            "Rejected" => matches!(error, DocumentStoreError::Rejected { .. }),
            "Connection" => matches!(error, DocumentStoreError::Connection { .. }),
            _ => panic!("unsupported test expectation: {expected}"),
        };
        assert!(matched, "{status} should map to {expected}, got {error:?}");
    }

    #[test]
    fn long_bodies_are_truncated_in_messages() {
        let body = "x".repeat(400);
        let preview = body_preview(body.as_bytes());
        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn run_query_skips_items_without_documents() {
        let response = json!([
            { "readTime": "2024-03-01T08:30:00Z" },
            {
                "document": {
                    "name": "projects/p/databases/(default)/documents/users/u-2",
                    "fields": { "rating": { "doubleValue": 4.5 } }
                },
                "readTime": "2024-03-01T08:30:00Z"
            }
        ]);
        let documents = parse_run_query(response.to_string().as_bytes()).expect("decodes");
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id.as_str(), "u-2");
        assert_eq!(documents[0].get("rating"), Some(&FieldValue::Double(4.5)));
    }

    #[test]
    fn malformed_documents_are_decode_errors() {
        let err = parse_document(b"{\"fields\":{}}").expect_err("missing name");
        assert!(matches!(err, DocumentStoreError::Decode { .. }));
    }
}
