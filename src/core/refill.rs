use crate::models::PetId;

/// Queue length at or below which a refill is requested
pub const DEFAULT_LOW_WATER_MARK: usize = 2;
/// Batch size for candidate loads
pub const DEFAULT_CANDIDATE_LIMIT: usize = 10;

/// When and how much to refill the candidate queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefillPolicy {
    pub low_water_mark: usize,
    pub default_limit: usize,
}

impl RefillPolicy {
    pub fn new(low_water_mark: usize, default_limit: usize) -> Self {
        Self {
            low_water_mark,
            default_limit,
        }
    }

    /// Decide on a refill after a successful swipe
    pub fn check(&self, queue_len: usize, active_pet: Option<&str>) -> Option<RefillRequest> {
        let pet_id = active_pet?;
        if queue_len <= self.low_water_mark {
            Some(RefillRequest {
                pet_id: pet_id.to_string(),
                limit: self.default_limit,
            })
        } else {
            None
        }
    }
}

impl Default for RefillPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_LOW_WATER_MARK, DEFAULT_CANDIDATE_LIMIT)
    }
}

/// A load the policy asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefillRequest {
    pub pet_id: PetId,
    pub limit: usize,
}

/// Whether a refill is outstanding
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RefillState {
    #[default]
    Idle,
    Pending {
        pet_id: PetId,
        generation: u64,
    },
}

impl RefillState {
    pub fn is_pending(&self) -> bool {
        matches!(self, RefillState::Pending { .. })
    }
}
