use crate::models::requests::{CreatePetRequest, ToggleActiveRequest, UpdatePetRequest};
use crate::models::Pet;
use crate::services::api::{ApiClient, ApiError};
use serde::de::IgnoredAny;
use std::sync::Arc;

/// Pet CRUD endpoints (`/dogs`)
pub struct PetService {
    api: Arc<ApiClient>,
}

impl PetService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// All pets owned by the signed-in user
    pub async fn my_pets(&self) -> Result<Vec<Pet>, ApiError> {
        self.api.get("/dogs/my").await
    }

    pub async fn get_pet(&self, pet_id: &str) -> Result<Pet, ApiError> {
        self.api.get(&pet_path(pet_id)).await
    }

    pub async fn create_pet(&self, request: &CreatePetRequest) -> Result<Pet, ApiError> {
        self.api.post("/dogs", request).await
    }

    pub async fn update_pet(&self, pet_id: &str, request: &UpdatePetRequest) -> Result<Pet, ApiError> {
        self.api.put(&pet_path(pet_id), request).await
    }

    pub async fn delete_pet(&self, pet_id: &str) -> Result<(), ApiError> {
        self.api.delete::<IgnoredAny>(&pet_path(pet_id), None).await?;
        tracing::debug!("Deleted pet {}", pet_id);
        Ok(())
    }

    pub async fn toggle_active(&self, pet_id: &str, is_active: bool) -> Result<Pet, ApiError> {
        self.api
            .patch(
                &format!("{}/toggle-active", pet_path(pet_id)),
                &ToggleActiveRequest { is_active },
            )
            .await
    }
}

fn pet_path(pet_id: &str) -> String {
    format!("/dogs/{}", urlencoding::encode(pet_id))
}
