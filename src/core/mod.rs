// Swipe / matching state machine
pub mod detector;
pub mod queue;
pub mod refill;
pub mod selector;
pub mod state;
pub mod swipe;

pub use detector::has_match;
pub use queue::CandidateQueue;
pub use refill::{RefillPolicy, RefillRequest, RefillState, DEFAULT_CANDIDATE_LIMIT, DEFAULT_LOW_WATER_MARK};
pub use selector::ActivePet;
pub use state::{LoadOutcome, MatchingState};
pub use swipe::{SwipeCompletion, SwipePhase};
