use crate::config::Settings;
use crate::core::RefillPolicy;
use crate::error::StoreError;
use crate::services::{
    ApiClient, AuthService, FileTokenStore, MatchingService, MemoryTokenStore, PetService,
    PhotoService, TokenStore,
};
use crate::stores::{AuthStore, MatchingStore, Notifications, PetStore};
use std::sync::Arc;
use tracing::info;

/// Wires settings, the API client, services and stores together
pub struct App {
    settings: Settings,
    api: Arc<ApiClient>,
    notifications: Arc<Notifications>,
    auth: AuthStore,
    pets: PetStore,
    matching: Arc<MatchingStore>,
}

impl App {
    /// Build the app with the token store named in the settings
    pub fn new(settings: Settings) -> Result<Self, StoreError> {
        let tokens: Arc<dyn TokenStore> = match &settings.auth.token_file {
            Some(path) => {
                info!("Using token file {}", path.display());
                Arc::new(FileTokenStore::open(path)?)
            }
            None => Arc::new(MemoryTokenStore::new()),
        };
        Self::with_token_store(settings, tokens)
    }

    pub fn with_token_store(settings: Settings, tokens: Arc<dyn TokenStore>) -> Result<Self, StoreError> {
        let api = Arc::new(ApiClient::new(
            settings.api.base_url.clone(),
            settings.api.timeout(),
            tokens,
        )?);

        let notifications = Arc::new(Notifications::new(settings.notifications.auto_dismiss()));
        let policy = RefillPolicy::new(settings.matching.low_water_mark, settings.matching.default_limit);

        let matching = Arc::new(MatchingStore::new(
            Arc::new(MatchingService::new(api.clone())),
            notifications.clone(),
            policy,
        ));
        let pets = PetStore::new(
            Arc::new(PetService::new(api.clone())),
            Arc::new(PhotoService::new(api.clone())),
            matching.clone(),
        );
        let auth = AuthStore::new(Arc::new(AuthService::new(api.clone())));

        info!("Client ready for {}", api.base_url());

        Ok(Self {
            settings,
            api,
            notifications,
            auth,
            pets,
            matching,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn pets(&self) -> &PetStore {
        &self.pets
    }

    pub fn matching(&self) -> &MatchingStore {
        &self.matching
    }

    /// Restore a stored session and, when signed in, the user's pets
    pub async fn initialize(&self) -> Result<bool, StoreError> {
        let signed_in = self.auth.initialize().await?;
        if signed_in {
            self.pets.fetch_my_pets().await?;
        }
        Ok(signed_in)
    }

    /// Sign out and drop every user-scoped state
    pub async fn sign_out(&self) -> Result<(), StoreError> {
        let result = self.auth.sign_out().await;
        self.matching.reset().await;
        self.pets.reset().await;
        self.notifications.clear_all();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_app_starts_signed_out() {
        let app = App::new(Settings::default()).unwrap();

        assert_eq!(app.api().base_url(), "http://localhost:3000");
        assert!(!app.auth().is_authenticated().await);
        assert!(app.pets().my_pets().await.is_empty());
        assert!(app.matching().active_pet().await.is_none());
        assert_eq!(app.matching().policy().low_water_mark, 2);
    }

    #[tokio::test]
    async fn test_token_file_is_used_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.auth.token_file = Some(dir.path().join("tokens.json"));

        let app = App::new(settings).unwrap();
        app.api().tokens().set_tokens(Some("a"), Some("r")).unwrap();

        let reopened = FileTokenStore::open(dir.path().join("tokens.json")).unwrap();
        assert_eq!(reopened.access_token().as_deref(), Some("a"));
    }
}
