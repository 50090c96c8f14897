use crate::models::{Candidate, PetId};
use std::collections::{HashSet, VecDeque};

/// Ordered candidates for one pet; the head is the next one to decide on
///
/// Order is exactly the backend response order. A snapshot never holds the
/// same candidate twice.
#[derive(Debug, Clone, Default)]
pub struct CandidateQueue {
    pet_id: Option<PetId>,
    candidates: VecDeque<Candidate>,
}

impl CandidateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pet the current contents were loaded for
    pub fn pet_id(&self) -> Option<&str> {
        self.pet_id.as_deref()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn head(&self) -> Option<&Candidate> {
        self.candidates.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn contains(&self, candidate_id: &str) -> bool {
        self.candidates.iter().any(|c| c.id == candidate_id)
    }

    pub fn to_vec(&self) -> Vec<Candidate> {
        self.candidates.iter().cloned().collect()
    }

    /// Swap in a fresh batch, dropping repeated ids (first occurrence wins)
    pub fn replace(&mut self, pet_id: &str, fetched: Vec<Candidate>, limit: usize) -> usize {
        let mut seen = HashSet::new();
        let candidates: VecDeque<Candidate> = fetched
            .into_iter()
            .filter(|c| seen.insert(c.id.clone()))
            .take(limit)
            .collect();

        self.pet_id = Some(pet_id.to_string());
        self.candidates = candidates;
        self.candidates.len()
    }

    pub fn remove_head(&mut self) -> Option<Candidate> {
        self.candidates.pop_front()
    }

    /// Drop a candidate by id; no-op when absent
    pub fn remove(&mut self, candidate_id: &str) -> Option<Candidate> {
        let index = self.candidates.iter().position(|c| c.id == candidate_id)?;
        self.candidates.remove(index)
    }

    pub fn clear(&mut self) {
        self.pet_id = None;
        self.candidates.clear();
    }
}
