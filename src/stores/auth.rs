use crate::error::StoreError;
use crate::models::{validate_form, LoginForm, Profile, Session, SignupForm, User};
use crate::services::{AuthResult, AuthService};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Snapshot of the auth state
#[derive(Debug, Clone, Default)]
pub struct AuthSnapshot {
    pub user: Option<User>,
    pub profile: Option<Profile>,
    pub session: Option<Session>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Signed-in user, profile and session
pub struct AuthStore {
    auth: Arc<AuthService>,
    state: Mutex<AuthSnapshot>,
}

impl AuthStore {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self {
            auth,
            state: Mutex::new(AuthSnapshot {
                is_loading: true,
                ..Default::default()
            }),
        }
    }

    pub async fn snapshot(&self) -> AuthSnapshot {
        self.state.lock().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.lock().await.is_authenticated
    }

    pub async fn user(&self) -> Option<User> {
        self.state.lock().await.user.clone()
    }

    async fn start(&self) {
        let mut state = self.state.lock().await;
        state.is_loading = true;
        state.error = None;
    }

    async fn fail<T>(&self, err: impl Into<StoreError>) -> Result<T, StoreError> {
        let err = err.into();
        let mut state = self.state.lock().await;
        state.is_loading = false;
        state.error = Some(err.to_string());
        Err(err)
    }

    async fn signed_out(&self) {
        let mut state = self.state.lock().await;
        *state = AuthSnapshot::default();
    }

    /// Restore a session from stored tokens
    pub async fn initialize(&self) -> Result<bool, StoreError> {
        self.start().await;

        let Some(session) = self.auth.get_session().await else {
            self.signed_out().await;
            tracing::info!("No stored session");
            return Ok(false);
        };

        let profile = match self.auth.get_profile(&session.user.id).await {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!("Session restored but profile failed to load: {}", e);
                None
            }
        };

        tracing::info!("Restored session for user {}", session.user.id);
        let mut state = self.state.lock().await;
        *state = AuthSnapshot {
            user: Some(session.user.clone()),
            profile,
            session: Some(session),
            is_authenticated: true,
            is_loading: false,
            error: None,
        };
        Ok(true)
    }

    /// Create an account; the user still has to sign in afterwards
    pub async fn sign_up(&self, form: SignupForm) -> Result<AuthResult, StoreError> {
        validate_form(&form)?;
        self.start().await;

        match self.auth.sign_up(&form.into()).await {
            Ok(result) => {
                self.state.lock().await.is_loading = false;
                tracing::info!("Signed up user {}", result.user.id);
                Ok(result)
            }
            Err(e) => self.fail(e).await,
        }
    }

    pub async fn sign_in(&self, form: LoginForm) -> Result<AuthResult, StoreError> {
        validate_form(&form)?;
        self.start().await;

        let result = match self.auth.sign_in(&form.into()).await {
            Ok(result) => result,
            Err(e) => return self.fail(e).await,
        };

        let profile = match self.auth.get_profile(&result.user.id).await {
            Ok(profile) => profile,
            Err(e) => return self.fail(e).await,
        };

        tracing::info!("Signed in user {}", result.user.id);
        let mut state = self.state.lock().await;
        *state = AuthSnapshot {
            user: Some(result.user.clone()),
            profile: Some(profile),
            session: Some(result.session.clone()),
            is_authenticated: true,
            is_loading: false,
            error: None,
        };
        Ok(result)
    }

    /// Sign out; local state is cleared once the tokens are gone
    pub async fn sign_out(&self) -> Result<(), StoreError> {
        self.start().await;

        match self.auth.sign_out().await {
            Ok(()) => {
                self.signed_out().await;
                tracing::info!("Signed out");
                Ok(())
            }
            Err(e) => self.fail(e).await,
        }
    }

    pub async fn update_profile(&self, updates: &Value) -> Result<Profile, StoreError> {
        let user = self.user().await.ok_or(StoreError::NotAuthenticated)?;
        self.start().await;

        match self.auth.update_profile(&user.id, updates).await {
            Ok(profile) => {
                let mut state = self.state.lock().await;
                state.profile = Some(profile.clone());
                state.is_loading = false;
                Ok(profile)
            }
            Err(e) => self.fail(e).await,
        }
    }

    pub async fn reset_password(&self, email: &str) -> Result<(), StoreError> {
        Ok(self.auth.reset_password(email).await?)
    }

    pub async fn clear_error(&self) {
        self.state.lock().await.error = None;
    }
}
