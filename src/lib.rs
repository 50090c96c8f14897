//! PawMatch client - pet matchmaking over the PawMatch REST API
//!
//! This library provides the client side of the PawMatch swipe flow.
//! It keeps a candidate queue per active pet, records swipes, detects
//! matches and refills the queue in the background.

pub mod app;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod services;
pub mod shell;
pub mod stores;

// Re-export commonly used types
pub use crate::app::App;
pub use crate::config::Settings;
pub use crate::core::{CandidateQueue, LoadOutcome, MatchingState, RefillPolicy, SwipePhase};
pub use crate::error::StoreError;
pub use crate::models::{Candidate, Match, MatchDetails, Pet, SwipeAction};
pub use crate::services::{ApiClient, ApiError, MatchingApi};
pub use crate::stores::{AuthStore, MatchingStore, Notifications, PetStore};
