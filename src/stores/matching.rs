use crate::core::{LoadOutcome, MatchingState, RefillPolicy, RefillRequest, SwipePhase};
use crate::error::StoreError;
use crate::models::{Candidate, Match, MatchDetails, Pet, SwipeAction, SwipeRequest};
use crate::services::MatchingApi;
use crate::stores::notifications::{NotificationKind, NotificationSink};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Swipe flow store: active pet, candidate queue, matches
///
/// Queue state sits behind one async mutex shared with the background
/// refill task. The lock is never held across a network call.
pub struct MatchingStore {
    api: Arc<dyn MatchingApi>,
    state: Arc<Mutex<MatchingState>>,
    sink: Arc<dyn NotificationSink>,
    policy: RefillPolicy,
    refill_task: Mutex<Option<JoinHandle<()>>>,
}

impl MatchingStore {
    pub fn new(api: Arc<dyn MatchingApi>, sink: Arc<dyn NotificationSink>, policy: RefillPolicy) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(MatchingState::new())),
            sink,
            policy,
            refill_task: Mutex::new(None),
        }
    }

    pub fn policy(&self) -> RefillPolicy {
        self.policy
    }

    // ----- Active pet -----

    /// Make `pet` the acting pet; the queue is emptied before anything else can load
    pub async fn select(&self, pet: Pet) -> Result<(), StoreError> {
        self.state.lock().await.select(pet)
    }

    pub async fn clear_selection(&self) {
        self.state.lock().await.clear_selection();
    }

    /// Propagate an edit of one of the user's pets
    pub async fn refresh_selected(&self, pet: &Pet) {
        self.state.lock().await.refresh_selected(pet);
    }

    /// Drop the selection if it points at `pet_id`
    pub async fn forget_pet(&self, pet_id: &str) {
        let mut state = self.state.lock().await;
        if state.active().is_selected(pet_id) {
            state.clear_selection();
        }
    }

    pub async fn active_pet(&self) -> Option<Pet> {
        self.state.lock().await.active().pet().cloned()
    }

    // ----- Candidate queue -----

    pub async fn candidates(&self) -> Vec<Candidate> {
        self.state.lock().await.queue().to_vec()
    }

    pub async fn head(&self) -> Option<Candidate> {
        self.state.lock().await.queue().head().cloned()
    }

    pub async fn queue_len(&self) -> usize {
        self.state.lock().await.queue().len()
    }

    pub async fn phase(&self) -> SwipePhase {
        self.state.lock().await.phase().clone()
    }

    pub async fn refill_pending(&self) -> bool {
        self.state.lock().await.refill().is_pending()
    }

    /// Replace the queue with up to `limit` fresh candidates for `pet_id`
    ///
    /// `pet_id` must be the active pet. On failure the queue is unchanged;
    /// a response that arrives after the selection changed is dropped.
    pub async fn load(&self, pet_id: &str, limit: usize) -> Result<LoadOutcome, StoreError> {
        let generation = self.state.lock().await.begin_load(pet_id)?;

        let fetched = match self.api.candidates(pet_id, limit).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!("Failed to load candidates for pet {}: {}", pet_id, e);
                return Err(e.into());
            }
        };

        let outcome = self
            .state
            .lock()
            .await
            .apply_candidates(pet_id, generation, fetched, limit);

        tracing::debug!("Candidate load for pet {}: {:?}", pet_id, outcome);
        Ok(outcome)
    }

    /// Load the default batch for the active pet
    pub async fn load_candidates(&self) -> Result<LoadOutcome, StoreError> {
        let pet_id = self.active_pet_id().await?;
        self.load(&pet_id, self.policy.default_limit).await
    }

    async fn active_pet_id(&self) -> Result<String, StoreError> {
        self.state
            .lock()
            .await
            .active()
            .id()
            .map(str::to_string)
            .ok_or(StoreError::NoActivePet)
    }

    // ----- Swipes -----

    /// Swipe as the active pet
    pub async fn swipe(&self, swiped_pet_id: &str, action: SwipeAction) -> Result<Option<Match>, StoreError> {
        let swiper = self.active_pet_id().await?;
        self.apply(&swiper, swiped_pet_id, action).await
    }

    /// Record a swipe and return the match it created, if any
    ///
    /// Once the backend has answered, `swiped_pet_id` leaves the queue
    /// whatever the answer was; a declared failure is still returned as an
    /// error afterwards. A transport failure leaves the queue untouched.
    /// After a successful swipe the refill policy may start a background
    /// load; further swipes are refused with [`StoreError::Busy`] until it
    /// finishes.
    pub async fn apply(
        &self,
        swiper_pet_id: &str,
        swiped_pet_id: &str,
        action: SwipeAction,
    ) -> Result<Option<Match>, StoreError> {
        let generation = self.state.lock().await.begin_swipe(swiper_pet_id, swiped_pet_id)?;

        tracing::debug!("Swipe {} -> {}: {}", swiper_pet_id, swiped_pet_id, action);

        let request = SwipeRequest {
            swiper_dog_id: swiper_pet_id.to_string(),
            swiped_dog_id: swiped_pet_id.to_string(),
            action,
        };
        let outcome = self.api.swipe(&request).await;

        let (matched, refill) = {
            let mut state = self.state.lock().await;
            let matched = state.resolve_swipe(generation, swiped_pet_id, &outcome);
            let refill = if outcome.is_ok() && state.generation() == generation {
                state.begin_refill(&self.policy)
            } else {
                None
            };
            (matched, refill)
        };

        if let Some((request, generation)) = refill {
            self.spawn_refill(request, generation).await;
        }

        match outcome {
            Ok(_) => {
                if let Some(m) = &matched {
                    tracing::info!("Match {} between {} and {}", m.id, m.dog1_id, m.dog2_id);
                }
                Ok(matched)
            }
            Err(e) => {
                tracing::warn!("Swipe {} -> {} failed: {}", swiper_pet_id, swiped_pet_id, e);
                Err(e.into())
            }
        }
    }

    async fn spawn_refill(&self, request: RefillRequest, generation: u64) {
        tracing::debug!("Queue at low-water mark, refilling for pet {}", request.pet_id);

        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let sink = Arc::clone(&self.sink);

        let handle = tokio::spawn(async move {
            let fetched = api.candidates(&request.pet_id, request.limit).await;
            let result = state.lock().await.finish_refill(&request, generation, fetched);

            match result {
                Ok(LoadOutcome::Loaded(count)) => {
                    tracing::debug!("Refilled queue for pet {} with {} candidates", request.pet_id, count);
                }
                Ok(LoadOutcome::Stale) => {
                    tracing::debug!("Refill for pet {} arrived after selection changed", request.pet_id);
                }
                Err(e) => {
                    tracing::warn!("Refill for pet {} failed: {}", request.pet_id, e);
                    sink.notify(
                        NotificationKind::Error,
                        format!("Could not load more candidates: {}", e),
                    );
                }
            }
        });

        *self.refill_task.lock().await = Some(handle);
    }

    /// Wait for a background refill, if one is running
    pub async fn settle(&self) {
        let handle = self.refill_task.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::error!("Refill task did not complete: {}", e);
            }
        }
    }

    // ----- Matches -----

    pub async fn check_match(&self, pet_a: &str, pet_b: &str) -> Result<Option<Match>, StoreError> {
        Ok(self.api.check_match(pet_a, pet_b).await?)
    }

    pub async fn fetch_matches(&self) -> Result<Vec<MatchDetails>, StoreError> {
        let matches = self.api.matches().await?;
        self.state.lock().await.set_matches(matches.clone());
        Ok(matches)
    }

    pub async fn fetch_match_count(&self) -> Result<u64, StoreError> {
        let count = self.api.match_count().await?;
        self.state.lock().await.set_match_count(count);
        Ok(count)
    }

    pub async fn matches(&self) -> Vec<MatchDetails> {
        self.state.lock().await.matches().to_vec()
    }

    pub async fn match_count(&self) -> u64 {
        self.state.lock().await.match_count()
    }

    /// Back to a signed-out state
    pub async fn reset(&self) {
        if let Some(handle) = self.refill_task.lock().await.take() {
            handle.abort();
        }
        self.state.lock().await.reset();
    }
}
