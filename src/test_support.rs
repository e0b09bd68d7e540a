//! In-memory collaborators for service and router tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::auth::AuthService;
use crate::error::{AppError, Result};
use crate::media::{MediaStore, SignatureAlgorithm, UploadFile, UploadedMedia};
use crate::state::{AppState, Config};
use crate::user::user_models::{Course, User, UserRole};
use crate::user::user_repository::UserStore;
use crate::user::UserService;

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
    enrollments: Mutex<HashMap<Uuid, Vec<Course>>>,
    fail_updates: AtomicBool,
}

impl InMemoryUserStore {
    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn insert(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        photo_url: Option<&str>,
    ) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role: UserRole::Student.as_str().to_string(),
            photo_url: photo_url.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }

    pub fn enroll(&self, user_id: Uuid, title: &str) -> Course {
        let course = Course {
            id: Uuid::new_v4(),
            course_title: title.to_string(),
            sub_title: None,
            category: Some("Programming".to_string()),
            course_thumbnail: None,
            is_published: true,
            creator_id: None,
            created_at: Utc::now(),
        };
        self.enrollments
            .lock()
            .unwrap()
            .entry(user_id)
            .or_default()
            .push(course.clone());
        course
    }

    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    pub fn get(&self, user_id: Uuid) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == user_id).cloned()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        Ok(self.get(user_id))
    }

    async fn create(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        if self.users.lock().unwrap().iter().any(|u| u.email == email) {
            return Err(AppError::Conflict("User already exists.".to_string()));
        }
        Ok(self.insert(name, email, password_hash, None))
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        name: &str,
        photo_url: Option<&str>,
    ) -> Result<Option<User>> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut users = self.users.lock().unwrap();
        Ok(users.iter_mut().find(|u| u.id == user_id).map(|user| {
            user.name = name.to_string();
            user.photo_url = photo_url.map(str::to_string);
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn enrolled_courses(&self, user_id: Uuid) -> Result<Vec<Course>> {
        Ok(self
            .enrollments
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaCall {
    Upload(String),
    Delete(String),
}

/// Records every call in order.
#[derive(Default)]
pub struct RecordingMediaStore {
    calls: Mutex<Vec<MediaCall>>,
    fail_deletes: AtomicBool,
    fail_uploads: AtomicBool,
}

impl RecordingMediaStore {
    pub fn calls(&self) -> Vec<MediaCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    pub fn fail_uploads(&self) {
        self.fail_uploads.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl MediaStore for RecordingMediaStore {
    async fn upload(&self, file: UploadFile) -> Result<UploadedMedia> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(MediaCall::Upload(file.file_name));
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(AppError::Media("upload rejected".to_string()));
        }
        let public_id = format!("photo{}", calls.len());
        Ok(UploadedMedia {
            url: format!("https://res.cloudinary.com/demo/image/upload/v1/{public_id}.jpg"),
            public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(MediaCall::Delete(public_id.to_string()));
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::Media("destroy rejected".to_string()));
        }
        Ok(())
    }
}

pub fn image(file_name: &str) -> UploadFile {
    UploadFile {
        file_name: file_name.to_string(),
        content_type: Some("image/png".to_string()),
        bytes: bytes::Bytes::from_static(b"\x89PNG\r\n\x1a\n"),
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/unused".to_string(),
        jwt_secret: "test-secret".to_string(),
        jwt_expiration_hours: 24,
        bcrypt_cost: 4,
        cookie_secure: false,
        max_upload_bytes: 1024 * 1024,
        cloudinary_cloud_name: "demo".to_string(),
        cloudinary_api_key: "key".to_string(),
        cloudinary_api_secret: "secret".to_string(),
        cloudinary_signature_algorithm: SignatureAlgorithm::Sha1,
        client_origin: None,
        host: "127.0.0.1".to_string(),
        port: 0,
    }
}

pub fn test_state(users: Arc<InMemoryUserStore>, media: Arc<RecordingMediaStore>) -> AppState {
    let config = Arc::new(test_config());
    AppState {
        auth_service: AuthService::new(users.clone(), config.session(), config.bcrypt_cost)
            .unwrap(),
        user_service: UserService::new(users, media),
        config,
    }
}
