//! Day-of-event media uploads.
//!
//! Files are keyed by the uploading guest's id so everything one guest
//! shares ends up together: `{guest_id}/{timestamp}-{name}-{token}.{ext}`.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use rocket::fs::TempFile;
use rocket::http::ContentType;
use rocket::tokio::fs;

use crate::error::StorageError;
use crate::models::GuestId;

pub struct PhotoOwner<'a> {
    pub guest_id: &'a GuestId,
    pub guest_name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
    pub key: String,
    pub size: u64,
}

#[rocket::async_trait]
pub trait PhotoStorage: Send + Sync {
    async fn upload(
        &self,
        owner: &PhotoOwner<'_>,
        file: &mut TempFile<'_>,
    ) -> Result<StoredPhoto, StorageError>;
}

pub type SharedPhotoStorage = Arc<dyn PhotoStorage>;

/// Writes uploads below a local directory.
pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[rocket::async_trait]
impl PhotoStorage for DiskStorage {
    async fn upload(
        &self,
        owner: &PhotoOwner<'_>,
        file: &mut TempFile<'_>,
    ) -> Result<StoredPhoto, StorageError> {
        let ext = media_extension(file.content_type())?;

        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(char::from)
            .collect();
        let file_name = format!(
            "{}-{}-{}.{}",
            Utc::now().format("%Y%m%dT%H%M%S"),
            slug(owner.guest_name),
            token.to_ascii_lowercase(),
            ext
        );

        let dir = self.root.join(owner.guest_id.as_str());
        fs::create_dir_all(&dir).await?;
        file.copy_to(dir.join(&file_name)).await?;

        let key = format!("{}/{}", owner.guest_id, file_name);

        Ok(StoredPhoto {
            key,
            size: file.len(),
        })
    }
}

fn media_extension(content_type: Option<&ContentType>) -> Result<String, StorageError> {
    let Some(ct) = content_type else {
        return Err(StorageError::UnsupportedMedia("unknown".into()));
    };

    if !(ct.top() == "image" || ct.top() == "video") {
        return Err(StorageError::UnsupportedMedia(ct.to_string()));
    }

    let sub = ct.sub().as_str().to_ascii_lowercase();
    let ext = match sub.as_str() {
        "jpeg" | "pjpeg" => "jpg".to_string(),
        "quicktime" => "mov".to_string(),
        "svg+xml" => return Err(StorageError::UnsupportedMedia(ct.to_string())),
        other => other
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect(),
    };

    if ext.is_empty() {
        return Err(StorageError::UnsupportedMedia(ct.to_string()));
    }
    Ok(ext)
}

fn slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }

    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "guest".to_string()
    } else {
        slug.to_string()
    }
}
