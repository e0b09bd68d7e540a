use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::{MediaStore, UploadFile, UploadedMedia};
use crate::error::{AppError, Result};

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Digest used for request signatures. Must match the product environment's
/// setting; Cloudinary defaults to SHA-1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

#[derive(Debug, Error)]
#[error("unknown signature algorithm: {0} (expected sha1 or sha256)")]
pub struct UnknownSignatureAlgorithm(String);

impl std::str::FromStr for SignatureAlgorithm {
    type Err = UnknownSignatureAlgorithm;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha1" => Ok(SignatureAlgorithm::Sha1),
            "sha256" => Ok(SignatureAlgorithm::Sha256),
            _ => Err(UnknownSignatureAlgorithm(s.to_string())),
        }
    }
}

/// Cloudinary upload API client.
#[derive(Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    algorithm: SignatureAlgorithm,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

impl CloudinaryClient {
    pub fn new(
        cloud_name: String,
        api_key: String,
        api_secret: String,
        algorithm: SignatureAlgorithm,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            cloud_name,
            api_key,
            api_secret,
            algorithm,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/image/{}", API_BASE, self.cloud_name, action)
    }

    fn sign(&self, params: &[(&str, &str)]) -> String {
        sign_params(params, &self.api_secret, self.algorithm)
    }
}

/// `key=value` pairs sorted by key, joined with `&`, secret appended, hex
/// digest.
fn sign_params(params: &[(&str, &str)], secret: &str, algorithm: SignatureAlgorithm) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let payload = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    match algorithm {
        SignatureAlgorithm::Sha1 => hex_digest::<Sha1>(&payload, secret),
        SignatureAlgorithm::Sha256 => hex_digest::<Sha256>(&payload, secret),
    }
}

fn hex_digest<D: Digest>(payload: &str, secret: &str) -> String {
    let mut hasher = D::new();
    hasher.update(payload.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn media_error(context: &str, err: impl std::fmt::Display) -> AppError {
    AppError::Media(format!("{context}: {err}"))
}

#[async_trait]
impl MediaStore for CloudinaryClient {
    async fn upload(&self, file: UploadFile) -> Result<UploadedMedia> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[("timestamp", timestamp.as_str())]);

        let mut part = Part::bytes(file.bytes.to_vec()).file_name(file.file_name);
        if let Some(content_type) = file.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|e| media_error("invalid content type", e))?;
        }

        let form = Form::new()
            .part("file", part)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature);

        let response = self
            .http
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| media_error("upload request failed", e))?
            .error_for_status()
            .map_err(|e| media_error("upload rejected", e))?;

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| media_error("unreadable upload response", e))?;

        tracing::debug!(public_id = %body.public_id, "uploaded media");

        Ok(UploadedMedia {
            url: body.secure_url,
            public_id: body.public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<()> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[("public_id", public_id), ("timestamp", timestamp.as_str())]);

        let params = [
            ("public_id", public_id),
            ("api_key", self.api_key.as_str()),
            ("timestamp", timestamp.as_str()),
            ("signature", signature.as_str()),
        ];

        let response = self
            .http
            .post(self.endpoint("destroy"))
            .form(&params)
            .send()
            .await
            .map_err(|e| media_error("destroy request failed", e))?
            .error_for_status()
            .map_err(|e| media_error("destroy rejected", e))?;

        let body: DestroyResponse = response
            .json()
            .await
            .map_err(|e| media_error("unreadable destroy response", e))?;

        match body.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(AppError::Media(format!("destroy returned {other}"))),
        }
    }
}
