//! Object storage: bytes in, opaque URL out.

use crate::errors::{AppError, AppResult};
use crate::utils::path::extension;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: u64 = 8 * 1024 * 1024;

const IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/heic"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Selfie,
    FormPhoto,
    Material,
    Avatar,
}

impl Bucket {
    pub const ALL: [Bucket; 4] = [Bucket::Selfie, Bucket::FormPhoto, Bucket::Material, Bucket::Avatar];

    pub fn name(&self) -> &'static str {
        match self {
            Bucket::Selfie => "selfies",
            Bucket::FormPhoto => "form-photos",
            Bucket::Material => "materials",
            Bucket::Avatar => "avatars",
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Bucket::Selfie => "selfie",
            Bucket::FormPhoto => "form_photo",
            Bucket::Material => "material",
            Bucket::Avatar => "avatar",
        }
    }

    pub fn from_kind(s: &str) -> AppResult<Self> {
        Self::ALL.into_iter().find(|b| b.kind() == s).ok_or_else(|| {
            AppError::validation("Invalid upload type. Use: selfie, form_photo, material, avatar")
        })
    }

    fn accepts(&self, content_type: &str) -> bool {
        match self {
            Bucket::Material => content_type != "application/octet-stream",
            _ => IMAGE_TYPES.contains(&content_type),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredObject {
    pub url: String,
    pub path: String,
    pub bucket: String,
}

pub trait ObjectStorage {
    fn put(
        &self,
        bucket: Bucket,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> AppResult<StoredObject>;

    /// Remove a stored object; a missing object is not an error.
    fn delete(&self, bucket: Bucket, key: &str) -> AppResult<()>;
}

/// Content type from the (lower-cased) file extension.
pub fn content_type_for(ext: &str) -> &'static str {
    match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "pdf" => "application/pdf",
        "mp4" => "video/mp4",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

/// Local-directory storage rooted at `storage_dir`.
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ObjectStorage for FsStorage {
    fn put(
        &self,
        bucket: Bucket,
        key: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> AppResult<StoredObject> {
        let full = self.root.join(bucket.name()).join(key);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full, bytes)?;

        let abs = full.canonicalize().unwrap_or(full);
        Ok(StoredObject {
            url: format!("file://{}", abs.display()),
            path: key.to_string(),
            bucket: bucket.name().to_string(),
        })
    }

    fn delete(&self, bucket: Bucket, key: &str) -> AppResult<()> {
        match fs::remove_file(self.root.join(bucket.name()).join(key)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Object key `<org>/<user>/<uuid>.<ext>`.
fn object_key(org_id: i64, user_id: i64, ext: &str) -> String {
    format!("{}/{}/{}.{}", org_id, user_id, Uuid::new_v4(), ext)
}

/// Read `file` and store it for the given owner.
pub fn upload_file(
    storage: &dyn ObjectStorage,
    bucket: Bucket,
    file: &Path,
    org_id: i64,
    user_id: i64,
) -> AppResult<StoredObject> {
    if !file.is_file() {
        return Err(AppError::validation(format!("No file provided: {}", file.display())));
    }
    let ext = match extension(file).as_deref() {
        Some("jpeg") => "jpg".to_string(),
        Some(e) => e.to_string(),
        None => "bin".to_string(),
    };
    let content_type = content_type_for(&ext);
    if !bucket.accepts(content_type) {
        return Err(AppError::validation(format!(
            "File type '{}' is not allowed for {} uploads",
            ext,
            bucket.kind()
        )));
    }

    if fs::metadata(file)?.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::validation("File too large. Maximum size is 8 MB"));
    }

    let bytes = fs::read(file)?;
    let key = object_key(org_id, user_id, &ext);
    storage.put(bucket, &key, &bytes, content_type)
}
