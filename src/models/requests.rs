use serde::{Deserialize, Serialize};
use crate::models::domain::{Gender, SwipeAction};

/// Body of `POST /auth/signup`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
}

/// Body of `POST /auth/signin`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
}

/// Body of `POST /dogs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePetRequest {
    pub name: String,
    pub breed: String,
    #[serde(rename = "ageYears")]
    pub age_years: u8,
    pub gender: Gender,
    pub bio: Option<String>,
    #[serde(rename = "photoUrls")]
    pub photo_urls: Vec<String>,
}

/// Body of `PUT /dogs/{id}`; only the fields that are set get sent
///
/// `bio: Some(None)` is sent as `null` and clears the stored bio.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePetRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(rename = "ageYears", skip_serializing_if = "Option::is_none")]
    pub age_years: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<Option<String>>,
    #[serde(rename = "photoUrls", skip_serializing_if = "Option::is_none")]
    pub photo_urls: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleActiveRequest {
    #[serde(rename = "isActive")]
    pub is_active: bool,
}

/// Body of `POST /matching/swipe`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeRequest {
    #[serde(rename = "swiperDogId")]
    pub swiper_dog_id: String,
    #[serde(rename = "swipedDogId")]
    pub swiped_dog_id: String,
    pub action: SwipeAction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePhotoRequest {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePhotosRequest {
    pub urls: Vec<String>,
}
