use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, Result},
    media::{public_id_from_url, MediaStore, UploadFile, UploadedMedia},
    user::{
        user_dto::UpdateProfileForm,
        user_models::{User, UserProfile},
        user_repository::UserStore,
    },
};

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    media: Arc<dyn MediaStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, media: Arc<dyn MediaStore>) -> Self {
        Self { users, media }
    }

    async fn profile(&self, user: User) -> Result<UserProfile> {
        let courses = self.users.enrolled_courses(user.id).await?;
        Ok(UserProfile::with_courses(user, courses))
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<UserProfile> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile Not Found.".to_string()))?;

        self.profile(user).await
    }

    pub async fn check_auth(&self, user_id: Uuid) -> Result<UserProfile> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        self.profile(user).await
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        form: UpdateProfileForm,
    ) -> Result<UserProfile> {
        form.validate()?;
        if let Some(photo) = &form.profile_photo {
            let is_image = photo
                .content_type
                .as_deref()
                .is_some_and(|ct| ct.starts_with("image/"));
            if !is_image {
                return Err(AppError::Validation("Profile photo must be an image.".to_string()));
            }
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let name = form
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| user.name.clone());

        let uploaded = match form.profile_photo {
            Some(file) => Some(self.replace_photo(user.photo_url.as_deref(), file).await?),
            None => None,
        };
        let photo_url = uploaded
            .as_ref()
            .map(|media| media.url.as_str())
            .or(user.photo_url.as_deref());

        let updated = match self.users.update_profile(user_id, &name, photo_url).await {
            Ok(Some(updated)) => updated,
            Ok(None) => {
                self.release(uploaded.as_ref()).await;
                return Err(AppError::NotFound("User not found".to_string()));
            }
            Err(err) => {
                self.release(uploaded.as_ref()).await;
                return Err(err);
            }
        };

        tracing::info!(user_id = %user_id, photo_replaced = uploaded.is_some(), "profile updated");
        self.profile(updated).await
    }

    /// Releases the current photo, then uploads its replacement. A failed
    /// release is logged and does not stop the upload.
    async fn replace_photo(
        &self,
        current_url: Option<&str>,
        file: UploadFile,
    ) -> Result<UploadedMedia> {
        if let Some(url) = current_url {
            self.release_previous(url).await;
        }

        self.media.upload(file).await
    }

    /// Returns the storage id it tried to delete, if one could be derived.
    async fn release_previous<'a>(&self, url: &'a str) -> Option<&'a str> {
        let Some(public_id) = public_id_from_url(url) else {
            tracing::warn!(photo_url = url, "cannot derive storage id of previous profile photo");
            return None;
        };
        if let Err(err) = self.media.delete(public_id).await {
            tracing::warn!(public_id, error = %err, "failed to delete previous profile photo");
        }
        Some(public_id)
    }

    async fn release(&self, uploaded: Option<&UploadedMedia>) {
        let Some(media) = uploaded else { return };
        if let Err(err) = self.media.delete(&media.public_id).await {
            tracing::warn!(public_id = %media.public_id, error = %err, "orphaned profile photo");
        }
    }
}
