//! RemoteClient: network client for a running ArangoDB server
//!
//! Speaks the ArangoDB HTTP API with basic authentication.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use project_graph::{ArangoConfig, DatabaseUser, SYSTEM_DATABASE};

use crate::client::DocumentClient;
use crate::error::{SdkError, SdkResult};
use crate::models::{CollectionInfo, DocumentMeta, ServerVersion};

const DUPLICATE_NAME: u32 = 1207;
const DATA_SOURCE_NOT_FOUND: u32 = 1203;
const DATABASE_NOT_FOUND: u32 = 1228;
const UNIQUE_CONSTRAINT_VIOLATED: u32 = 1210;

const CURSOR_BATCH_SIZE: usize = 1000;
const COLLECTION_TYPE_DOCUMENT: u8 = 2;

/// Error envelope of the ArangoDB HTTP API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "errorNum", default)]
    error_num: u32,
    #[serde(rename = "errorMessage", default)]
    error_message: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    result: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct CursorResponse {
    #[serde(default)]
    result: Vec<Value>,
    #[serde(rename = "hasMore", default)]
    has_more: bool,
    id: Option<String>,
}

/// Network client that connects to a running ArangoDB server.
pub struct RemoteClient {
    http_base_url: String,
    http_client: Client,
    credentials: Option<(String, String)>,
}

impl RemoteClient {
    /// Create a new RemoteClient connecting to the given HTTP base URL.
    ///
    /// # Example
    /// ```no_run
    /// # use project_graph_sdk::RemoteClient;
    /// let client = RemoteClient::new("http://localhost:8529").with_credentials("root", "");
    /// ```
    pub fn new(http_base_url: &str) -> Self {
        Self {
            http_base_url: http_base_url.trim_end_matches('/').to_string(),
            http_client: Client::new(),
            credentials: None,
        }
    }

    /// Create a client from connection settings
    pub fn from_config(config: &ArangoConfig) -> Self {
        Self::new(&config.base_url()).with_credentials(&config.user, &config.password)
    }

    /// Authenticate every request with basic auth
    pub fn with_credentials(mut self, user: &str, password: &str) -> Self {
        self.credentials = Some((user.to_string(), password.to_string()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.http_base_url
    }

    fn db_url(&self, database: &str, path: &str) -> String {
        format!("{}/_db/{}/_api/{}", self.http_base_url, database, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some((user, password)) => request.basic_auth(user, Some(password)),
            None => request,
        }
    }

    /// Send a request and decode the JSON answer, mapping error envelopes
    async fn send(&self, request: RequestBuilder) -> SdkResult<Value> {
        let response = self.authorize(request).send().await.map_err(|e| {
            if e.is_connect() {
                SdkError::ConnectionError(format!("{} ({})", self.http_base_url, e))
            } else {
                SdkError::HttpError(e)
            }
        })?;

        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url());

        if status.is_success() {
            let body: Value = response.json().await?;
            return Ok(body);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error_message)
                .unwrap_or(text);
            let message = if message.is_empty() {
                status.to_string()
            } else {
                message
            };
            return Err(SdkError::Unauthorized(message));
        }

        let error: ErrorBody = response.json().await.unwrap_or(ErrorBody {
            error_num: 0,
            error_message: "Unknown error".to_string(),
        });
        Err(match error.error_num {
            DUPLICATE_NAME => SdkError::DuplicateName(error.error_message),
            DATA_SOURCE_NOT_FOUND => SdkError::CollectionNotFound(error.error_message),
            DATABASE_NOT_FOUND => SdkError::DatabaseNotFound(error.error_message),
            error_num => SdkError::ServerError {
                code: status.as_u16(),
                error_num,
                message: error.error_message,
            },
        })
    }
}

#[async_trait]
impl DocumentClient for RemoteClient {
    async fn version(&self) -> SdkResult<ServerVersion> {
        let url = format!("{}/_api/version", self.http_base_url);
        let body = self.send(self.http_client.get(&url)).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn list_databases(&self) -> SdkResult<Vec<String>> {
        let url = self.db_url(SYSTEM_DATABASE, "database");
        let body = self.send(self.http_client.get(&url)).await?;
        let list: ListResponse<String> = serde_json::from_value(body)?;
        Ok(list.result)
    }

    async fn create_database(&self, name: &str, users: &[DatabaseUser]) -> SdkResult<()> {
        let url = self.db_url(SYSTEM_DATABASE, "database");
        let body = json!({ "name": name, "users": users });
        self.send(self.http_client.post(&url).json(&body)).await?;
        Ok(())
    }

    async fn list_collections(&self, database: &str) -> SdkResult<Vec<CollectionInfo>> {
        let url = self.db_url(database, "collection?excludeSystem=true");
        let body = self.send(self.http_client.get(&url)).await?;
        let list: ListResponse<CollectionInfo> = serde_json::from_value(body)?;
        Ok(list.result.into_iter().filter(|c| !c.is_system).collect())
    }

    async fn collection_exists(&self, database: &str, name: &str) -> SdkResult<bool> {
        let url = self.db_url(database, &format!("collection/{}", name));
        match self.send(self.http_client.get(&url)).await {
            Ok(_) => Ok(true),
            Err(SdkError::CollectionNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn create_collection(&self, database: &str, name: &str) -> SdkResult<()> {
        let url = self.db_url(database, "collection");
        let body = json!({ "name": name, "type": COLLECTION_TYPE_DOCUMENT });
        self.send(self.http_client.post(&url).json(&body)).await?;
        Ok(())
    }

    async fn truncate_collection(&self, database: &str, name: &str) -> SdkResult<()> {
        let url = self.db_url(database, &format!("collection/{}/truncate", name));
        self.send(self.http_client.put(&url)).await?;
        Ok(())
    }

    async fn count_documents(&self, database: &str, name: &str) -> SdkResult<u64> {
        let url = self.db_url(database, &format!("collection/{}/count", name));
        let body = self.send(self.http_client.get(&url)).await?;
        let count: CountResponse = serde_json::from_value(body)?;
        Ok(count.count)
    }

    async fn insert_document(
        &self,
        database: &str,
        collection: &str,
        document: &Value,
    ) -> SdkResult<DocumentMeta> {
        let url = self.db_url(database, &format!("document/{}", collection));
        match self.send(self.http_client.post(&url).json(document)).await {
            Ok(body) => Ok(serde_json::from_value(body)?),
            Err(SdkError::ServerError { error_num: UNIQUE_CONSTRAINT_VIOLATED, .. }) => {
                Err(SdkError::DuplicateKey {
                    collection: collection.to_string(),
                    key: document
                        .get("_key")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn read_documents(
        &self,
        database: &str,
        collection: &str,
        limit: Option<usize>,
    ) -> SdkResult<Vec<Value>> {
        let body = match limit {
            Some(limit) => json!({
                "query": "FOR doc IN @@collection LIMIT @limit RETURN doc",
                "bindVars": { "@collection": collection, "limit": limit },
                "batchSize": CURSOR_BATCH_SIZE,
            }),
            None => json!({
                "query": "FOR doc IN @@collection RETURN doc",
                "bindVars": { "@collection": collection },
                "batchSize": CURSOR_BATCH_SIZE,
            }),
        };

        let url = self.db_url(database, "cursor");
        let first = self.send(self.http_client.post(&url).json(&body)).await?;
        let mut cursor: CursorResponse = serde_json::from_value(first)?;
        let mut documents = std::mem::take(&mut cursor.result);

        while cursor.has_more {
            let Some(id) = cursor.id.take() else {
                return Err(SdkError::ServerError {
                    code: 200,
                    error_num: 0,
                    message: "cursor reports more results but has no id".to_string(),
                });
            };
            let url = self.db_url(database, &format!("cursor/{}", id));
            let next = self.send(self.http_client.put(&url)).await?;
            cursor = serde_json::from_value(next)?;
            documents.append(&mut cursor.result);
        }

        Ok(documents)
    }
}
