use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Backend identifier of a pet
pub type PetId = String;

/// Pet gender (binary on the backend)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Candidates are always drawn from the opposite gender
    pub fn opposite(self) -> Self {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(format!("Unknown gender: {}", other)),
        }
    }
}

/// A pet profile owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    #[serde(alias = "ownerId")]
    pub owner_id: String,
    pub name: String,
    pub breed: String,
    #[serde(alias = "ageYears")]
    pub age_years: u8,
    pub gender: Gender,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(alias = "photoUrls", default)]
    pub photo_urls: Vec<String>,
    #[serde(alias = "isActive", default = "default_true")]
    pub is_active: bool,
    #[serde(alias = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Pet {
    /// First photo is the one shown on cards
    pub fn main_photo(&self) -> Option<&str> {
        self.photo_urls.first().map(String::as_str)
    }
}

fn default_true() -> bool { true }

/// Another owner's pet offered for swiping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: PetId,
    #[serde(alias = "ownerId", default)]
    pub owner_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub breed: String,
    #[serde(alias = "ageYears", default)]
    pub age_years: u8,
    pub gender: Gender,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(alias = "photoUrls", default)]
    pub photo_urls: Vec<String>,
}

impl Candidate {
    pub fn main_photo(&self) -> Option<&str> {
        self.photo_urls.first().map(String::as_str)
    }
}

/// Decision recorded by a swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeAction {
    Like,
    Reject,
}

impl SwipeAction {
    pub fn as_str(self) -> &'static str {
        match self {
            SwipeAction::Like => "like",
            SwipeAction::Reject => "reject",
        }
    }
}

impl fmt::Display for SwipeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwipeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "like" => Ok(SwipeAction::Like),
            "reject" | "pass" => Ok(SwipeAction::Reject),
            other => Err(format!("Unknown swipe action: {}", other)),
        }
    }
}

/// Stored swipe record returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swipe {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(alias = "swiperDogId")]
    pub swiper_dog_id: PetId,
    #[serde(alias = "swipedDogId")]
    pub swiped_dog_id: PetId,
    pub action: SwipeAction,
    #[serde(alias = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Mutual like between two pets, created by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    #[serde(alias = "dog1", alias = "dog1Id")]
    pub dog1_id: PetId,
    #[serde(alias = "dog2", alias = "dog2Id")]
    pub dog2_id: PetId,
    #[serde(alias = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Match {
    pub fn involves(&self, pet_id: &str) -> bool {
        self.dog1_id == pet_id || self.dog2_id == pet_id
    }
}

/// Match listing entry with both pets embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetails {
    pub id: String,
    pub dog1: Candidate,
    pub dog2: Candidate,
    #[serde(alias = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl MatchDetails {
    /// Split into (mine, theirs) given the ids of the user's own pets
    pub fn sides(&self, my_pet_ids: &[PetId]) -> (&Candidate, &Candidate) {
        if my_pet_ids.contains(&self.dog1.id) {
            (&self.dog1, &self.dog2)
        } else {
            (&self.dog2, &self.dog1)
        }
    }
}

/// Authenticated account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Public profile row for a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(alias = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Signed-in session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub access_token: String,
}
