use crate::models::requests::RefreshRequest;
use crate::models::responses::{Envelope, RefreshPayload};
use crate::services::tokens::{TokenStore, TokenStoreError};
use reqwest::multipart::Form;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Error code the backend attaches to a 401 when the access token expired
pub const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";

/// Errors that can occur when talking to the PawMatch backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, ...)
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a failure envelope or a non-2xx status
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
        details: Option<Value>,
    },

    #[error("Session expired. Please sign in again.")]
    AuthExpired,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Token storage error: {0}")]
    TokenStore(#[from] TokenStoreError),
}

impl ApiError {
    /// Whether the backend completed the request (even if it declared a failure)
    pub fn is_completed(&self) -> bool {
        matches!(self, ApiError::Api { .. } | ApiError::InvalidResponse(_))
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    fn from_envelope(status: StatusCode, envelope: Envelope<Value>, fallback: &str) -> Self {
        ApiError::Api {
            status: status.as_u16(),
            message: envelope.error.unwrap_or_else(|| fallback.to_string()),
            code: envelope.code,
            details: envelope.details,
        }
    }
}

/// Shared HTTP client for the PawMatch REST API
///
/// Handles:
/// - prefixing endpoints with `{base_url}/api`
/// - bearer authentication from the token store
/// - unwrapping the `{success, data|error}` envelope
/// - one transparent refresh-and-retry when the access token expired
pub struct ApiClient {
    base_url: String,
    client: Client,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api{}", self.base_url.trim_end_matches('/'), endpoint)
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(Method::GET, endpoint, None).await
    }

    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, endpoint, Some(to_body(body)?)).await
    }

    /// POST without a request body
    pub async fn post_empty<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(Method::POST, endpoint, None).await
    }

    pub async fn put<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PUT, endpoint, Some(to_body(body)?)).await
    }

    pub async fn patch<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PATCH, endpoint, Some(to_body(body)?)).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        self.request(Method::DELETE, endpoint, body.cloned()).await
    }

    /// Make an authenticated JSON request and unwrap the envelope
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let url = self.url(endpoint);

        tracing::debug!("{} {}", method, url);

        let mut response = self.send(method.clone(), &url, body.as_ref()).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let (status, envelope) = read_envelope(response).await?;

            if envelope.code.as_deref() != Some(TOKEN_EXPIRED) {
                return Err(ApiError::from_envelope(status, envelope, "Authentication failed"));
            }

            tracing::info!("Access token expired, refreshing before retrying {}", endpoint);
            self.refresh_or_sign_out().await?;
            response = self.send(method, &url, body.as_ref()).await?;
        }

        let (status, envelope) = read_envelope(response).await?;
        into_data(status, envelope, "Request failed")
    }

    /// Multipart upload; no token refresh is attempted
    pub async fn upload<T: DeserializeOwned>(&self, endpoint: &str, form: Form) -> Result<T, ApiError> {
        let url = self.url(endpoint);

        tracing::debug!("POST (multipart) {}", url);

        let mut builder = self.client.post(&url).multipart(form);
        if let Some(token) = self.tokens.access_token() {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let (status, envelope) = read_envelope(response).await?;
        into_data(status, envelope, "Upload failed")
    }

    async fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Response, ApiError> {
        let mut builder = self.client.request(method, url);
        if let Some(token) = self.tokens.access_token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        Ok(builder.send().await?)
    }

    async fn refresh_or_sign_out(&self) -> Result<String, ApiError> {
        match self.refresh_access_token().await {
            Ok(token) => Ok(token),
            Err(e) => {
                tracing::warn!("Token refresh failed, clearing session: {}", e);
                self.tokens.clear_tokens()?;
                Err(ApiError::AuthExpired)
            }
        }
    }

    /// Exchange the stored refresh token for a new access token
    async fn refresh_access_token(&self) -> Result<String, ApiError> {
        let refresh_token = self
            .tokens
            .refresh_token()
            .ok_or_else(|| ApiError::InvalidResponse("No refresh token available".into()))?;

        let response = self
            .client
            .post(self.url("/auth/refresh"))
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        let (status, envelope) = read_envelope(response).await?;
        let payload: RefreshPayload = into_data(status, envelope, "Token refresh failed")?;

        let token = payload
            .access_token
            .ok_or_else(|| ApiError::InvalidResponse("Token refresh returned no access token".into()))?;

        self.tokens.set_tokens(Some(&token), None)?;
        tracing::debug!("Access token refreshed");

        Ok(token)
    }
}

fn to_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|e| ApiError::InvalidResponse(format!("Failed to encode request body: {}", e)))
}

async fn read_envelope(response: Response) -> Result<(StatusCode, Envelope<Value>), ApiError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    match serde_json::from_slice::<Envelope<Value>>(&bytes) {
        Ok(envelope) => Ok((status, envelope)),
        Err(_) if !status.is_success() => Err(ApiError::Api {
            status: status.as_u16(),
            message: format!("Request failed with status {}", status),
            code: None,
            details: None,
        }),
        Err(e) => Err(ApiError::InvalidResponse(format!("Response is not an envelope: {}", e))),
    }
}

fn into_data<T: DeserializeOwned>(
    status: StatusCode,
    envelope: Envelope<Value>,
    fallback: &str,
) -> Result<T, ApiError> {
    if !status.is_success() || !envelope.success {
        return Err(ApiError::from_envelope(status, envelope, fallback));
    }

    let data = envelope.data.unwrap_or(Value::Null);
    serde_json::from_value(data)
        .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response data: {}", e)))
}
