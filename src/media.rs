//! Image uploads for actors and plays, stored under the configured media root.

use std::path::Path;

use anyhow::Context;
use axum::{body::Bytes, extract::Multipart};
use tokio::fs;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];
const IMAGE_FIELD: &str = "image";

/// Multipart body accepted by the upload-image endpoints.
#[derive(ToSchema)]
pub struct ImageForm {
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Pulls the `image` part out of a multipart body.
pub async fn image_from_multipart(mut multipart: Multipart) -> AppResult<ImageUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| AppError::invalid(IMAGE_FIELD, "missing file name"))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        return Ok(ImageUpload { file_name, bytes });
    }
    Err(AppError::invalid(IMAGE_FIELD, "no file was submitted"))
}

/// Writes the image to `<root>/uploads/<category>/<slug>-<uuid>.<ext>` and
/// returns the path relative to `root`.
pub async fn store_image(
    root: &Path,
    category: &str,
    name: &str,
    upload: &ImageUpload,
) -> AppResult<String> {
    let extension = image_extension(&upload.file_name)?;
    if upload.bytes.is_empty() {
        return Err(AppError::invalid(IMAGE_FIELD, "the submitted file is empty"));
    }

    let relative = format!(
        "uploads/{category}/{}-{}.{extension}",
        slugify(name),
        Uuid::new_v4()
    );
    let path = root.join(&relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(&path, &upload.bytes)
        .await
        .with_context(|| format!("writing {}", path.display()))?;

    tracing::debug!(path = %relative, bytes = upload.bytes.len(), "stored image");
    Ok(relative)
}

/// Removes a previously stored image. Missing files are not an error.
pub async fn remove_image(root: &Path, relative: &str) {
    match fs::remove_file(root.join(relative)).await {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => tracing::warn!(error = %err, path = relative, "failed to remove image"),
    }
}

fn image_extension(file_name: &str) -> AppResult<String> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| AppError::invalid(IMAGE_FIELD, "file has no extension"))?;
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::invalid(
            IMAGE_FIELD,
            format!("unsupported image type .{extension}"),
        ));
    }
    Ok(extension)
}

pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("image");
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Romeo & Juliet"), "romeo-juliet");
        assert_eq!(slugify("  Hamlet  "), "hamlet");
        assert_eq!(slugify("!!!"), "image");
    }

    #[test]
    fn accepts_common_image_extensions_case_insensitively() {
        assert_eq!(image_extension("poster.PNG").unwrap(), "png");
        assert_eq!(image_extension("a.b.jpeg").unwrap(), "jpeg");
    }

    #[test]
    fn rejects_other_files() {
        assert!(matches!(
            image_extension("notes.txt"),
            Err(AppError::InvalidField { field: "image", .. })
        ));
        assert!(image_extension("README").is_err());
    }

    #[tokio::test]
    async fn stores_and_removes_image_under_category() {
        let root = std::env::temp_dir().join(format!("media-test-{}", Uuid::new_v4()));
        let upload = ImageUpload {
            file_name: "portrait.jpg".into(),
            bytes: Bytes::from_static(b"\xff\xd8\xff"),
        };

        let relative = store_image(&root, "actors", "Ian McKellen", &upload)
            .await
            .expect("store image");
        assert!(relative.starts_with("uploads/actors/ian-mckellen-"));
        assert!(relative.ends_with(".jpg"));
        assert!(root.join(&relative).exists());

        remove_image(&root, &relative).await;
        assert!(!root.join(&relative).exists());
        let _ = std::fs::remove_dir_all(root);
    }
}
