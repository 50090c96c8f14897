use crate::models::ValidationError;
use crate::services::{ApiError, TokenStoreError};
use thiserror::Error;

/// Errors surfaced by the state stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    TokenStore(#[from] TokenStoreError),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("No active pet selected")]
    NoActivePet,

    #[error("Pet {0} is not the active pet")]
    NotActivePet(String),

    #[error("Pet not found: {0}")]
    PetNotFound(String),

    #[error("Pet {0} is not active")]
    PetInactive(String),

    #[error("Another swipe or refill is still in progress")]
    Busy,
}

impl StoreError {
    /// True for transport failures and backend error responses
    pub fn is_network(&self) -> bool {
        matches!(self, StoreError::Api(_))
    }

    pub fn api(&self) -> Option<&ApiError> {
        match self {
            StoreError::Api(e) => Some(e),
            _ => None,
        }
    }
}
