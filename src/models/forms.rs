use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationError as FieldError, ValidationErrors};

use crate::models::domain::Gender;
use crate::models::requests::{CreatePetRequest, SignInRequest, SignUpRequest, UpdatePetRequest};

/// Client-side form validation failure
///
/// Field-scoped and never sent to the backend.
#[derive(Debug, Error)]
#[error("Validation failed: {0}")]
pub struct ValidationError(#[from] pub ValidationErrors);

impl ValidationError {
    /// `(field, message)` pairs, sorted by field name
    pub fn messages(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .0
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    (field.to_string(), message)
                })
            })
            .collect();
        out.sort();
        out
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.field_errors().keys().any(|k| *k == field)
    }
}

/// Validate a form, converting the error into [`ValidationError`]
pub fn validate_form<T: Validate>(form: &T) -> Result<(), ValidationError> {
    form.validate().map_err(ValidationError::from)
}

/// Most photos a pet can have
pub const MAX_PET_PHOTOS: usize = 5;
/// Largest accepted photo upload
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

fn photo_error(code: &'static str, message: &'static str) -> FieldError {
    let mut error = FieldError::new(code);
    error.message = Some(message.into());
    error
}

/// Check a pet's photo set before anything is uploaded
///
/// `kept` counts photos the pet already has and keeps; `uploads` yields
/// `(content_type, size_in_bytes)` for each new file. All errors land on
/// the `photos` field.
pub fn validate_pet_photos<'a, I>(kept: usize, uploads: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = (&'a str, usize)>,
{
    let mut errors = ValidationErrors::new();
    let mut total = kept;

    for (content_type, size) in uploads {
        total += 1;
        if !content_type.starts_with("image/") {
            errors.add("photos", photo_error("photo_type", "Only image files are allowed"));
        } else if size > MAX_PHOTO_BYTES {
            errors.add("photos", photo_error("photo_size", "Files must be smaller than 5MB"));
        }
    }

    if total == 0 {
        errors.add("photos", photo_error("photos_required", "Please add at least one photo"));
    } else if total > MAX_PET_PHOTOS {
        errors.add("photos", photo_error("photos_max", "Maximum 5 images allowed"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError(errors))
    }
}

/// Add / edit pet form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PetForm {
    #[validate(length(min = 1, max = 50, message = "Name is required and must be less than 50 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "Breed is required"))]
    pub breed: String,
    #[validate(range(max = 30, message = "Age must be 30 or less"))]
    pub age_years: u8,
    pub gender: Gender,
    #[validate(length(max = 500, message = "Bio must be less than 500 characters"))]
    pub bio: Option<String>,
}

impl PetForm {
    pub fn into_create_request(self, photo_urls: Vec<String>) -> CreatePetRequest {
        CreatePetRequest {
            name: self.name.trim().to_string(),
            breed: self.breed.trim().to_string(),
            age_years: self.age_years,
            gender: self.gender,
            bio: trimmed_bio(self.bio),
            photo_urls,
        }
    }

    pub fn into_update_request(self, photo_urls: Vec<String>) -> UpdatePetRequest {
        UpdatePetRequest {
            name: Some(self.name.trim().to_string()),
            breed: Some(self.breed.trim().to_string()),
            age_years: Some(self.age_years),
            gender: Some(self.gender),
            // always sent so that an emptied bio is cleared
            bio: Some(trimmed_bio(self.bio)),
            photo_urls: Some(photo_urls),
        }
    }
}

fn trimmed_bio(bio: Option<String>) -> Option<String> {
    bio.map(|b| b.trim().to_string()).filter(|b| !b.is_empty())
}

/// Account creation form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupForm {
    #[validate(length(min = 2, max = 50, message = "Name must be between 2 and 50 characters"))]
    pub display_name: String,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "validate_password_strength")
    )]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

impl From<SignupForm> for SignUpRequest {
    fn from(form: SignupForm) -> Self {
        Self {
            email: form.email.trim().to_string(),
            password: form.password,
            display_name: form.display_name.trim().to_string(),
        }
    }
}

/// Sign-in form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl From<LoginForm> for SignInRequest {
    fn from(form: LoginForm) -> Self {
        Self {
            email: form.email.trim().to_string(),
            password: form.password,
        }
    }
}

fn validate_password_strength(password: &str) -> Result<(), FieldError> {
    let lower = password.chars().any(|c| c.is_ascii_lowercase());
    let upper = password.chars().any(|c| c.is_ascii_uppercase());
    let digit = password.chars().any(|c| c.is_ascii_digit());

    if lower && upper && digit {
        Ok(())
    } else {
        let mut error = FieldError::new("password_strength");
        error.message = Some("Password must contain uppercase, lowercase, and number".into());
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet_form() -> PetForm {
        PetForm {
            name: "Rex".to_string(),
            breed: "Beagle".to_string(),
            age_years: 3,
            gender: Gender::Male,
            bio: None,
        }
    }

    fn signup_form() -> SignupForm {
        SignupForm {
            display_name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            password: "Secret123".to_string(),
            confirm_password: "Secret123".to_string(),
        }
    }

    #[test]
    fn test_valid_pet_form() {
        assert!(validate_form(&pet_form()).is_ok());
    }

    #[test]
    fn test_pet_form_rejects_empty_name_and_old_age() {
        let mut form = pet_form();
        form.name = String::new();
        form.age_years = 31;

        let err = validate_form(&form).unwrap_err();
        assert!(err.has_field("name"));
        assert!(err.has_field("age_years"));
        assert!(!err.has_field("breed"));
    }

    #[test]
    fn test_pet_form_rejects_long_bio() {
        let mut form = pet_form();
        form.bio = Some("a".repeat(501));

        let err = validate_form(&form).unwrap_err();
        assert_eq!(
            err.messages(),
            vec![("bio".to_string(), "Bio must be less than 500 characters".to_string())]
        );
    }

    #[test]
    fn test_signup_password_rules() {
        let mut form = signup_form();
        form.password = "alllowercase1".to_string();
        form.confirm_password = form.password.clone();
        assert!(validate_form(&form).unwrap_err().has_field("password"));

        let mut form = signup_form();
        form.confirm_password = "Different123".to_string();
        assert!(validate_form(&form).unwrap_err().has_field("confirm_password"));

        assert!(validate_form(&signup_form()).is_ok());
    }

    #[test]
    fn test_login_form() {
        let form = LoginForm {
            email: "not-an-email".to_string(),
            password: String::new(),
        };

        let err = validate_form(&form).unwrap_err();
        assert!(err.has_field("email"));
        assert!(err.has_field("password"));
    }

    #[test]
    fn test_create_request_drops_blank_bio() {
        let mut form = pet_form();
        form.bio = Some("  ".to_string());
        let request = form.into_create_request(vec!["a.jpg".to_string()]);
        assert!(request.bio.is_none());
        assert_eq!(request.photo_urls, vec!["a.jpg"]);
    }

    fn no_uploads() -> Vec<(&'static str, usize)> {
        Vec::new()
    }

    #[test]
    fn test_pet_photos_required() {
        let err = validate_pet_photos(0, no_uploads()).unwrap_err();
        assert_eq!(
            err.messages(),
            vec![("photos".to_string(), "Please add at least one photo".to_string())]
        );

        assert!(validate_pet_photos(1, no_uploads()).is_ok());
        assert!(validate_pet_photos(0, [("image/jpeg", 1024)]).is_ok());
    }

    #[test]
    fn test_pet_photos_limit_type_and_size() {
        assert!(validate_pet_photos(3, [("image/png", 10), ("image/png", 10)]).is_ok());
        assert!(validate_pet_photos(4, [("image/png", 10), ("image/png", 10)])
            .unwrap_err()
            .has_field("photos"));

        let err = validate_pet_photos(0, [("application/pdf", 10)]).unwrap_err();
        assert_eq!(err.messages()[0].1, "Only image files are allowed");

        let err = validate_pet_photos(0, [("image/jpeg", MAX_PHOTO_BYTES + 1)]).unwrap_err();
        assert_eq!(err.messages()[0].1, "Files must be smaller than 5MB");
        assert!(validate_pet_photos(0, [("image/jpeg", MAX_PHOTO_BYTES)]).is_ok());
    }

    #[test]
    fn test_update_request_clears_blank_bio_and_trims() {
        let mut form = pet_form();
        form.bio = Some("   ".to_string());
        assert_eq!(form.into_update_request(vec![]).bio, Some(None));

        let mut form = pet_form();
        form.bio = Some("  Loves naps ".to_string());
        assert_eq!(
            form.into_update_request(vec![]).bio,
            Some(Some("Loves naps".to_string()))
        );
    }
}
