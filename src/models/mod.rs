// Model exports
pub mod domain;
pub mod forms;
pub mod requests;
pub mod responses;

pub use domain::{Candidate, Gender, Match, MatchDetails, Pet, PetId, Profile, Session, Swipe, SwipeAction, User};
pub use forms::{
    validate_form, validate_pet_photos, LoginForm, PetForm, SignupForm, ValidationError, MAX_PET_PHOTOS,
    MAX_PHOTO_BYTES,
};
pub use requests::{CreatePetRequest, SignInRequest, SignUpRequest, SwipeRequest, UpdatePetRequest};
pub use responses::{Envelope, SwipeResponse};
