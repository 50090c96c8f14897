use crate::models::PetId;
use crate::models::SwipeResponse;
use crate::services::ApiError;

/// Lifecycle of the swipe currently being processed
///
/// `Idle → Swiping → Resolved`; a new swipe may start from `Idle` or
/// `Resolved`. A transport failure returns to `Idle` without touching the
/// queue.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SwipePhase {
    #[default]
    Idle,
    Swiping {
        swiped: PetId,
    },
    Resolved {
        swiped: PetId,
        matched: Option<String>,
    },
}

impl SwipePhase {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, SwipePhase::Swiping { .. })
    }
}

/// How a swipe call ended, as far as the queue is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeCompletion {
    /// A response came back (success, or a declared backend failure)
    Completed,
    /// No response: the request never reached a conclusion
    Unreached,
}

impl SwipeCompletion {
    pub fn of(outcome: &Result<SwipeResponse, ApiError>) -> Self {
        match outcome {
            Ok(_) => SwipeCompletion::Completed,
            Err(e) if e.is_completed() => SwipeCompletion::Completed,
            Err(_) => SwipeCompletion::Unreached,
        }
    }

    pub fn removes_candidate(self) -> bool {
        self == SwipeCompletion::Completed
    }
}
