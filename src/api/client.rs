use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use thiserror::Error;

use super::session::{MemorySessionStore, SessionStore};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Authentication required")]
    Unauthorized,
    #[error("Access denied")]
    Forbidden,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Server error: {0}")]
    Server(String),
    #[error("Invalid response: {0}")]
    Parse(String),
    /// The backend answered but reported `success: false`.
    #[error("{}", .0.as_deref().unwrap_or("Request was rejected"))]
    Rejected(Option<String>),
}

impl ApiError {
    /// Message the backend itself supplied, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected(message) => message.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    base_url: String,
    client: Client,
    sessions: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_sessions(base_url, Arc::new(MemorySessionStore::default()))
    }

    pub fn with_sessions(base_url: &str, sessions: Arc<dyn SessionStore>) -> Self {
        // On wasm, we can't use timeout
        #[cfg(target_arch = "wasm32")]
        let client = Client::new();

        #[cfg(not(target_arch = "wasm32"))]
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        ApiClient {
            inner: Arc::new(ApiClientInner {
                base_url: base_url.trim_end_matches('/').to_string(),
                client,
                sessions,
            }),
        }
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.inner.sessions
    }

    /// Token is read from the session store on every request so a logout in
    /// one place is seen by all callers.
    pub fn get_token(&self) -> Option<String> {
        self.inner.sessions.load().map(|session| session.token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    /// `path` with `id` appended as one percent-encoded segment.
    pub fn item_url(&self, path: &str, id: &str) -> Result<reqwest::Url, ApiError> {
        let mut url = reqwest::Url::parse(&self.url(path))
            .map_err(|e| ApiError::Network(format!("bad API URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Network("API URL cannot take a path".to_string()))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.get_token() {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.authorize(self.inner.client.get(self.url(path)));
        tracing::debug!(path, "GET");
        let response = request.send().await?;
        self.handle_response(response).await
    }

    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, ApiError> {
        let request = self.authorize(self.inner.client.get(self.url(path)).query(query));
        tracing::debug!(path, "GET with query");
        let response = request.send().await?;
        self.handle_response(response).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let request = self.authorize(self.inner.client.post(self.url(path)).json(body));
        tracing::debug!(path, "POST");
        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// PUT to one item under `path`, addressed by `id`.
    pub async fn put_item<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        id: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.item_url(path, id)?;
        let request = self.authorize(self.inner.client.put(url).json(body));
        tracing::debug!(path, id, "PUT");
        let response = request.send().await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();

        match status {
            StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED => {
                response.json::<T>().await.map_err(|e| ApiError::Parse(e.to_string()))
            }
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden),
            StatusCode::NOT_FOUND => {
                let text = response.text().await.unwrap_or_default();
                Err(ApiError::NotFound(text))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(ApiError::Server(format!("{}: {}", status, text)))
            }
        }
    }
}

// Global API client instance
static API_CLIENT: std::sync::OnceLock<ApiClient> = std::sync::OnceLock::new();

pub fn init_api_client(client: ApiClient) {
    let _ = API_CLIENT.set(client);
}

pub fn api_client() -> &'static ApiClient {
    API_CLIENT.get().expect("API client not initialized. Call init_api_client first.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_url_encodes_id() {
        let client = ApiClient::new("http://localhost:5000/api");
        let url = client.item_url("/leads/", "a b/c?d").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/leads/a%20b%2Fc%3Fd");

        let url = client.item_url("/leads", "65f0c2a1").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/leads/65f0c2a1");
    }
}
