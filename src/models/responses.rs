use serde::{Deserialize, Serialize};
use crate::models::domain::{Match, Swipe, User};

/// Envelope wrapping every backend response
///
/// ```json
/// { "success": true, "data": { ... } }
/// { "success": false, "error": "message", "code": "TOKEN_EXPIRED", "details": { ... } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

/// Payload of signup/signin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken", default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPayload {
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshPayload {
    #[serde(rename = "accessToken", default)]
    pub access_token: Option<String>,
}

/// Result of `POST /matching/swipe`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeResponse {
    pub swipe: Swipe,
    #[serde(rename = "match", default)]
    pub matched: Option<Match>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckMatchPayload {
    #[serde(rename = "match", default)]
    pub matched: Option<Match>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountPayload {
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadPayload {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadManyPayload {
    pub urls: Vec<String>,
}
