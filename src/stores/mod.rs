// State containers
pub mod auth;
pub mod matching;
pub mod notifications;
pub mod pets;

pub use auth::{AuthSnapshot, AuthStore};
pub use matching::MatchingStore;
pub use notifications::{Notification, NotificationKind, NotificationSink, Notifications, AUTO_DISMISS_DELAY};
pub use pets::PetStore;
