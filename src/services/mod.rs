// Service exports
pub mod api;
pub mod auth;
pub mod matching;
pub mod pets;
pub mod photos;
pub mod tokens;

pub use api::{ApiClient, ApiError, TOKEN_EXPIRED};
pub use auth::{AuthResult, AuthService};
pub use matching::{MatchingApi, MatchingService};
pub use pets::PetService;
pub use photos::{PhotoService, PhotoUpload};
pub use tokens::{FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
