use crate::models::requests::{DeletePhotoRequest, DeletePhotosRequest};
use crate::models::responses::{UploadManyPayload, UploadPayload};
use crate::services::api::{ApiClient, ApiError};
use reqwest::multipart::{Form, Part};
use serde::de::IgnoredAny;
use std::sync::Arc;

/// An image file to upload
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    fn into_part(self) -> Result<Part, ApiError> {
        Ok(Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.content_type)?)
    }
}

/// Photo storage endpoints; the backend forwards to the image host
pub struct PhotoService {
    api: Arc<ApiClient>,
}

impl PhotoService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Upload one photo and return its public URL
    pub async fn upload_photo(&self, photo: PhotoUpload) -> Result<String, ApiError> {
        let form = Form::new().part("photo", photo.into_part()?);
        let payload: UploadPayload = self.api.upload("/photos/upload", form).await?;
        Ok(payload.url)
    }

    /// Upload several photos; URLs come back in upload order
    pub async fn upload_photos(&self, photos: Vec<PhotoUpload>) -> Result<Vec<String>, ApiError> {
        if photos.is_empty() {
            return Ok(vec![]);
        }

        let count = photos.len();
        let mut form = Form::new();
        for photo in photos {
            form = form.part("photos", photo.into_part()?);
        }

        let payload: UploadManyPayload = self.api.upload("/photos/upload-multiple", form).await?;
        tracing::debug!("Uploaded {} photos", count);
        Ok(payload.urls)
    }

    /// Delete one photo; an empty URL is ignored
    pub async fn delete_photo(&self, url: &str) -> Result<(), ApiError> {
        if url.is_empty() {
            return Ok(());
        }

        let body = serde_json::to_value(DeletePhotoRequest { url: url.to_string() })
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        self.api.delete::<IgnoredAny>("/photos", Some(&body)).await?;
        Ok(())
    }

    /// Delete many photos; an empty list is ignored
    pub async fn delete_photos(&self, urls: &[String]) -> Result<(), ApiError> {
        if urls.is_empty() {
            return Ok(());
        }

        let body = serde_json::to_value(DeletePhotosRequest { urls: urls.to_vec() })
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        self.api.delete::<IgnoredAny>("/photos/bulk", Some(&body)).await?;
        Ok(())
    }
}
