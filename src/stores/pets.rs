use crate::error::StoreError;
use crate::models::{validate_form, validate_pet_photos, Pet, PetForm};
use crate::services::{PetService, PhotoService, PhotoUpload};
use crate::stores::matching::MatchingStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct PetState {
    my_pets: Vec<Pet>,
    is_loading: bool,
    error: Option<String>,
}

/// The signed-in user's pets
///
/// CRUD is never optimistic: the local list only changes after the backend
/// confirmed. Edits and deletions are forwarded to the matching store so the
/// active pet stays consistent.
pub struct PetStore {
    pets: Arc<PetService>,
    photos: Arc<PhotoService>,
    matching: Arc<MatchingStore>,
    state: Mutex<PetState>,
}

impl PetStore {
    pub fn new(pets: Arc<PetService>, photos: Arc<PhotoService>, matching: Arc<MatchingStore>) -> Self {
        Self {
            pets,
            photos,
            matching,
            state: Mutex::new(PetState::default()),
        }
    }

    pub async fn my_pets(&self) -> Vec<Pet> {
        self.state.lock().await.my_pets.clone()
    }

    pub async fn active_pets(&self) -> Vec<Pet> {
        self.state
            .lock()
            .await
            .my_pets
            .iter()
            .filter(|p| p.is_active)
            .cloned()
            .collect()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.is_loading
    }

    pub async fn error(&self) -> Option<String> {
        self.state.lock().await.error.clone()
    }

    pub async fn clear_error(&self) {
        self.state.lock().await.error = None;
    }

    async fn start(&self) {
        let mut state = self.state.lock().await;
        state.is_loading = true;
        state.error = None;
    }

    async fn fail<T>(&self, err: impl Into<StoreError>) -> Result<T, StoreError> {
        let err = err.into();
        let mut state = self.state.lock().await;
        state.is_loading = false;
        state.error = Some(err.to_string());
        Err(err)
    }

    /// Load the user's pets; picks the first active one if nothing is selected yet
    pub async fn fetch_my_pets(&self) -> Result<Vec<Pet>, StoreError> {
        self.start().await;

        let pets = match self.pets.my_pets().await {
            Ok(pets) => pets,
            Err(e) => return self.fail(e).await,
        };

        {
            let mut state = self.state.lock().await;
            state.my_pets = pets.clone();
            state.is_loading = false;
        }

        if self.matching.active_pet().await.is_none() {
            if let Some(first) = pets.iter().find(|p| p.is_active) {
                self.matching.select(first.clone()).await?;
            }
        }

        tracing::info!("Loaded {} pets", pets.len());
        Ok(pets)
    }

    pub async fn get_pet(&self, pet_id: &str) -> Result<Pet, StoreError> {
        self.start().await;
        match self.pets.get_pet(pet_id).await {
            Ok(pet) => {
                self.state.lock().await.is_loading = false;
                Ok(pet)
            }
            Err(e) => self.fail(e).await,
        }
    }

    /// Select one of the user's own active pets for swiping
    pub async fn select_active_pet(&self, pet_id: &str) -> Result<Pet, StoreError> {
        let pet = self
            .state
            .lock()
            .await
            .my_pets
            .iter()
            .find(|p| p.id == pet_id)
            .cloned()
            .ok_or_else(|| StoreError::PetNotFound(pet_id.to_string()))?;

        self.matching.select(pet.clone()).await?;
        Ok(pet)
    }

    /// Validate, upload photos, then create
    pub async fn create_pet(&self, form: PetForm, photos: Vec<PhotoUpload>) -> Result<Pet, StoreError> {
        validate_form(&form)?;
        validate_pet_photos(0, photos.iter().map(|p| (p.content_type.as_str(), p.bytes.len())))?;
        self.start().await;

        let photo_urls = match self.photos.upload_photos(photos).await {
            Ok(urls) => urls,
            Err(e) => return self.fail(e).await,
        };

        let request = form.into_create_request(photo_urls);
        let pet = match self.pets.create_pet(&request).await {
            Ok(pet) => pet,
            Err(e) => return self.fail(e).await,
        };

        {
            let mut state = self.state.lock().await;
            state.my_pets.insert(0, pet.clone());
            state.is_loading = false;
        }

        tracing::info!("Created pet {} ({})", pet.name, pet.id);
        Ok(pet)
    }

    /// Validate, delete removed photos, upload new ones, then update
    ///
    /// The stored photo list keeps the surviving photos in their order and
    /// appends the new uploads.
    pub async fn update_pet(
        &self,
        pet_id: &str,
        form: PetForm,
        new_photos: Vec<PhotoUpload>,
        removed_photo_urls: Vec<String>,
    ) -> Result<Pet, StoreError> {
        validate_form(&form)?;

        let existing = self
            .state
            .lock()
            .await
            .my_pets
            .iter()
            .find(|p| p.id == pet_id)
            .cloned()
            .ok_or_else(|| StoreError::PetNotFound(pet_id.to_string()))?;

        let kept = existing
            .photo_urls
            .iter()
            .filter(|url| !removed_photo_urls.contains(url))
            .count();
        validate_pet_photos(kept, new_photos.iter().map(|p| (p.content_type.as_str(), p.bytes.len())))?;

        self.start().await;

        if let Err(e) = self.photos.delete_photos(&removed_photo_urls).await {
            return self.fail(e).await;
        }

        let uploaded = match self.photos.upload_photos(new_photos).await {
            Ok(urls) => urls,
            Err(e) => return self.fail(e).await,
        };

        let photo_urls: Vec<String> = existing
            .photo_urls
            .into_iter()
            .filter(|url| !removed_photo_urls.contains(url))
            .chain(uploaded)
            .collect();

        let request = form.into_update_request(photo_urls);
        let pet = match self.pets.update_pet(pet_id, &request).await {
            Ok(pet) => pet,
            Err(e) => return self.fail(e).await,
        };

        self.replace_local(&pet).await;
        tracing::info!("Updated pet {}", pet.id);
        Ok(pet)
    }

    /// Delete a pet and all of its photos
    pub async fn delete_pet(&self, pet_id: &str) -> Result<(), StoreError> {
        self.start().await;

        let photo_urls = self
            .state
            .lock()
            .await
            .my_pets
            .iter()
            .find(|p| p.id == pet_id)
            .map(|p| p.photo_urls.clone())
            .unwrap_or_default();

        if let Err(e) = self.photos.delete_photos(&photo_urls).await {
            return self.fail(e).await;
        }
        if let Err(e) = self.pets.delete_pet(pet_id).await {
            return self.fail(e).await;
        }

        {
            let mut state = self.state.lock().await;
            state.my_pets.retain(|p| p.id != pet_id);
            state.is_loading = false;
        }
        self.matching.forget_pet(pet_id).await;

        tracing::info!("Deleted pet {}", pet_id);
        Ok(())
    }

    /// Show or hide a pet from matching
    pub async fn toggle_active(&self, pet_id: &str, is_active: bool) -> Result<Pet, StoreError> {
        let pet = match self.pets.toggle_active(pet_id, is_active).await {
            Ok(pet) => pet,
            Err(e) => {
                let err = StoreError::from(e);
                self.state.lock().await.error = Some(err.to_string());
                return Err(err);
            }
        };

        self.replace_local(&pet).await;
        Ok(pet)
    }

    async fn replace_local(&self, pet: &Pet) {
        {
            let mut state = self.state.lock().await;
            for existing in state.my_pets.iter_mut().filter(|p| p.id == pet.id) {
                *existing = pet.clone();
            }
            state.is_loading = false;
        }
        self.matching.refresh_selected(pet).await;
    }

    pub async fn reset(&self) {
        *self.state.lock().await = PetState::default();
    }
}
