use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::media::UploadFile;

/// Parsed `multipart/form-data` body of a profile update.
#[derive(Debug, Default, Validate)]
pub struct UpdateProfileForm {
    #[validate(length(max = 255, message = "Name is too long."))]
    pub name: Option<String>,
    pub profile_photo: Option<UploadFile>,
}

/// OpenAPI description of the multipart body.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct UpdateProfileMultipart {
    pub name: Option<String>,
    #[schema(value_type = String, format = Binary)]
    pub profile_photo: Option<Vec<u8>>,
}
