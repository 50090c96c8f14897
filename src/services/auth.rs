use crate::models::requests::{ResetPasswordRequest, SignInRequest, SignUpRequest};
use crate::models::responses::{AuthPayload, SessionPayload};
use crate::models::{Profile, Session, User};
use crate::services::api::{ApiClient, ApiError};
use serde::de::IgnoredAny;
use serde_json::Value;
use std::sync::Arc;

/// Result of signing up or in
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user: User,
    pub session: Session,
}

/// Auth and profile endpoints
pub struct AuthService {
    api: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Create an account; tokens are stored on success
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthResult, ApiError> {
        let payload: AuthPayload = self.api.post("/auth/signup", request).await?;
        self.store(payload)
    }

    pub async fn sign_in(&self, request: &SignInRequest) -> Result<AuthResult, ApiError> {
        let payload: AuthPayload = self.api.post("/auth/signin", request).await?;
        self.store(payload)
    }

    /// Sign out; local tokens are cleared even if the request fails
    pub async fn sign_out(&self) -> Result<(), ApiError> {
        let result = self.api.post_empty::<IgnoredAny>("/auth/signout").await;
        self.api.tokens().clear_tokens()?;
        result.map(|_| ())
    }

    /// Current session, or `None` when there is no usable token
    pub async fn get_session(&self) -> Option<Session> {
        let token = self.api.tokens().access_token()?;

        match self.api.get::<SessionPayload>("/auth/session").await {
            Ok(payload) => Some(Session {
                user: payload.user,
                // the request may have refreshed the token
                access_token: self.api.tokens().access_token().unwrap_or(token),
            }),
            Err(e) => {
                tracing::debug!("No session: {}", e);
                None
            }
        }
    }

    pub async fn get_user(&self) -> Option<User> {
        self.api.tokens().access_token()?;
        self.api.get("/auth/user").await.ok()
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<Profile, ApiError> {
        self.api.get(&format!("/profiles/{}", urlencoding::encode(user_id))).await
    }

    pub async fn update_profile(&self, user_id: &str, updates: &Value) -> Result<Profile, ApiError> {
        self.api.put(&format!("/profiles/{}", urlencoding::encode(user_id)), updates).await
    }

    pub async fn reset_password(&self, email: &str) -> Result<(), ApiError> {
        self.api
            .post::<_, IgnoredAny>("/auth/reset-password", &ResetPasswordRequest { email: email.to_string() })
            .await
            .map(|_| ())
    }

    fn store(&self, payload: AuthPayload) -> Result<AuthResult, ApiError> {
        self.api
            .tokens()
            .set_tokens(Some(&payload.access_token), payload.refresh_token.as_deref())?;

        Ok(AuthResult {
            session: Session {
                user: payload.user.clone(),
                access_token: payload.access_token,
            },
            user: payload.user,
        })
    }
}
