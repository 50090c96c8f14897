use crate::core::queue::CandidateQueue;
use crate::core::refill::{RefillPolicy, RefillRequest, RefillState};
use crate::core::selector::ActivePet;
use crate::core::swipe::{SwipeCompletion, SwipePhase};
use crate::core::detector::has_match;
use crate::error::StoreError;
use crate::models::{Candidate, Match, MatchDetails, Pet, SwipeResponse};
use crate::services::ApiError;

/// Result of applying a candidate batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Queue replaced with this many candidates
    Loaded(usize),
    /// Response arrived for a pet that is no longer active; discarded
    Stale,
}

/// Everything the swipe flow mutates
///
/// Pure state transitions with no I/O; the matching store drives the
/// network calls around them. `generation` increases every time the
/// selection changes so late responses can be recognised.
#[derive(Debug, Default)]
pub struct MatchingState {
    active: ActivePet,
    queue: CandidateQueue,
    phase: SwipePhase,
    refill: RefillState,
    generation: u64,
    matches: Vec<MatchDetails>,
    match_count: u64,
}

impl MatchingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &ActivePet {
        &self.active
    }

    pub fn queue(&self) -> &CandidateQueue {
        &self.queue
    }

    pub fn phase(&self) -> &SwipePhase {
        &self.phase
    }

    pub fn refill(&self) -> &RefillState {
        &self.refill
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn matches(&self) -> &[MatchDetails] {
        &self.matches
    }

    pub fn match_count(&self) -> u64 {
        self.match_count
    }

    /// `NoSelection | Selected → Selected(pet)`; always empties the queue
    pub fn select(&mut self, pet: Pet) -> Result<(), StoreError> {
        if !pet.is_active {
            return Err(StoreError::PetInactive(pet.id));
        }

        tracing::info!("Active pet set to {} ({})", pet.name, pet.id);
        self.invalidate();
        self.active = ActivePet::Selected(pet);
        Ok(())
    }

    /// Back to `NoSelection`
    pub fn clear_selection(&mut self) {
        if let Some(id) = self.active.id() {
            tracing::info!("Active pet {} cleared", id);
        }
        self.invalidate();
        self.active = ActivePet::NoSelection;
    }

    /// Replace the selected pet's data after an edit, keeping the queue
    ///
    /// A pet that was deactivated can no longer be the active pet.
    pub fn refresh_selected(&mut self, pet: &Pet) {
        if !self.active.is_selected(&pet.id) {
            return;
        }
        if pet.is_active {
            self.active = ActivePet::Selected(pet.clone());
        } else {
            self.clear_selection();
        }
    }

    pub fn reset(&mut self) {
        self.clear_selection();
        self.matches.clear();
        self.match_count = 0;
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        self.queue.clear();
        self.phase = SwipePhase::Idle;
        self.refill = RefillState::Idle;
    }

    /// Check a load may start for `pet_id`; returns the generation to apply against
    pub fn begin_load(&self, pet_id: &str) -> Result<u64, StoreError> {
        match self.active.id() {
            None => Err(StoreError::NoActivePet),
            Some(active) if active != pet_id => Err(StoreError::NotActivePet(pet_id.to_string())),
            Some(_) => Ok(self.generation),
        }
    }

    /// Apply fetched candidates unless the selection moved on meanwhile
    pub fn apply_candidates(
        &mut self,
        pet_id: &str,
        generation: u64,
        fetched: Vec<Candidate>,
        limit: usize,
    ) -> LoadOutcome {
        if generation != self.generation || !self.active.is_selected(pet_id) {
            tracing::debug!("Discarding stale candidates for pet {}", pet_id);
            return LoadOutcome::Stale;
        }
        LoadOutcome::Loaded(self.queue.replace(pet_id, fetched, limit))
    }

    /// `Idle | Resolved → Swiping`
    pub fn begin_swipe(&mut self, swiper_pet_id: &str, swiped_pet_id: &str) -> Result<u64, StoreError> {
        let active = self.active.id().ok_or(StoreError::NoActivePet)?;
        if active != swiper_pet_id {
            return Err(StoreError::NotActivePet(swiper_pet_id.to_string()));
        }
        if self.phase.is_in_flight() || self.refill.is_pending() {
            return Err(StoreError::Busy);
        }

        self.phase = SwipePhase::Swiping {
            swiped: swiped_pet_id.to_string(),
        };
        Ok(self.generation)
    }

    /// `Swiping → Resolved` (response received) or `Swiping → Idle` (no response)
    ///
    /// Any completed response removes the candidate, match or not.
    pub fn resolve_swipe(
        &mut self,
        generation: u64,
        swiped_pet_id: &str,
        outcome: &Result<SwipeResponse, ApiError>,
    ) -> Option<Match> {
        let matched = outcome.as_ref().ok().and_then(has_match).cloned();
        if matched.is_some() {
            self.match_count += 1;
        }

        if generation != self.generation {
            return matched;
        }

        if SwipeCompletion::of(outcome).removes_candidate() {
            self.queue.remove(swiped_pet_id);
            self.phase = SwipePhase::Resolved {
                swiped: swiped_pet_id.to_string(),
                matched: matched.as_ref().map(|m| m.id.clone()),
            };
        } else {
            self.phase = SwipePhase::Idle;
        }

        matched
    }

    /// Mark a refill pending if the policy asks for one
    pub fn begin_refill(&mut self, policy: &RefillPolicy) -> Option<(RefillRequest, u64)> {
        if self.refill.is_pending() {
            return None;
        }

        let request = policy.check(self.queue.len(), self.active.id())?;
        self.refill = RefillState::Pending {
            pet_id: request.pet_id.clone(),
            generation: self.generation,
        };
        Some((request, self.generation))
    }

    /// Complete a pending refill, successful or not
    ///
    /// The pending flag is cleared either way; a fetch error is handed back
    /// for reporting.
    pub fn finish_refill(
        &mut self,
        request: &RefillRequest,
        generation: u64,
        fetched: Result<Vec<Candidate>, ApiError>,
    ) -> Result<LoadOutcome, ApiError> {
        if self.refill == (RefillState::Pending { pet_id: request.pet_id.clone(), generation }) {
            self.refill = RefillState::Idle;
        }

        let candidates = fetched?;
        Ok(self.apply_candidates(&request.pet_id, generation, candidates, request.limit))
    }

    pub fn set_matches(&mut self, matches: Vec<MatchDetails>) {
        self.matches = matches;
    }

    pub fn set_match_count(&mut self, count: u64) {
        self.match_count = count;
    }
}
