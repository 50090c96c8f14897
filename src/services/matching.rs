use crate::models::responses::{CheckMatchPayload, CountPayload};
use crate::models::{Candidate, Match, MatchDetails, SwipeRequest, SwipeResponse};
use crate::services::api::{ApiClient, ApiError};
use async_trait::async_trait;
use std::sync::Arc;

/// Remote matching operations used by the swipe flow
#[async_trait]
pub trait MatchingApi: Send + Sync {
    /// Opposite-gender, not-yet-swiped candidates for `pet_id`, in backend order
    async fn candidates(&self, pet_id: &str, limit: usize) -> Result<Vec<Candidate>, ApiError>;

    /// Record a swipe; the response carries the match if one was created
    async fn swipe(&self, request: &SwipeRequest) -> Result<SwipeResponse, ApiError>;

    async fn check_match(&self, pet_a: &str, pet_b: &str) -> Result<Option<Match>, ApiError>;

    /// All matches across the user's pets
    async fn matches(&self) -> Result<Vec<MatchDetails>, ApiError>;

    async fn match_count(&self) -> Result<u64, ApiError>;
}

/// REST implementation of [`MatchingApi`] (`/matching`)
pub struct MatchingService {
    api: Arc<ApiClient>,
}

impl MatchingService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl MatchingApi for MatchingService {
    async fn candidates(&self, pet_id: &str, limit: usize) -> Result<Vec<Candidate>, ApiError> {
        let endpoint = format!(
            "/matching/candidates/{}?limit={}",
            urlencoding::encode(pet_id),
            limit
        );
        let candidates: Vec<Candidate> = self.api.get(&endpoint).await?;
        tracing::debug!("Fetched {} candidates for pet {}", candidates.len(), pet_id);
        Ok(candidates)
    }

    async fn swipe(&self, request: &SwipeRequest) -> Result<SwipeResponse, ApiError> {
        self.api.post("/matching/swipe", request).await
    }

    async fn check_match(&self, pet_a: &str, pet_b: &str) -> Result<Option<Match>, ApiError> {
        let endpoint = format!(
            "/matching/check-match?dog1Id={}&dog2Id={}",
            urlencoding::encode(pet_a),
            urlencoding::encode(pet_b)
        );
        let payload: CheckMatchPayload = self.api.get(&endpoint).await?;
        Ok(payload.matched)
    }

    async fn matches(&self) -> Result<Vec<MatchDetails>, ApiError> {
        self.api.get("/matching/matches").await
    }

    async fn match_count(&self) -> Result<u64, ApiError> {
        let payload: CountPayload = self.api.get("/matching/matches/count").await?;
        Ok(payload.count)
    }
}
