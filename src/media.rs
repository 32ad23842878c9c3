use std::{
	io,
	path::{Path, PathBuf},
	sync::Arc,
};

use axum::body::Bytes;
use uuid::Uuid;

pub const URL_PREFIX: &str = "/media";

/// File extensions accepted for attached images.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UploadError {
	#[error("The submitted file is empty.")]
	Empty,
	#[error("Upload a valid image. The file you uploaded was either not an image or a corrupted image.")]
	NotAnImage,
}

/// A file received from a multipart form, held in memory until validated.
#[derive(Debug)]
pub struct Upload {
	pub file_name: String,
	pub content_type: Option<String>,
	pub bytes: Bytes,
}

impl Upload {
	/// Checks that the upload looks like an image and returns the
	/// normalized extension to store it under.
	pub fn validate(&self) -> Result<&'static str, UploadError> {
		if self.bytes.is_empty() {
			return Err(UploadError::Empty);
		}

		let extension = Path::new(&self.file_name)
			.extension()
			.and_then(|ext| ext.to_str())
			.map(str::to_ascii_lowercase)
			.and_then(|ext| IMAGE_EXTENSIONS.iter().find(|known| **known == ext).copied())
			.ok_or(UploadError::NotAnImage)?;

		let guessed = mime_guess::from_ext(extension).first_or_octet_stream();
		let declared_ok = self
			.content_type
			.as_deref()
			.map_or(true, |content_type| content_type.starts_with("image/"));

		if guessed.type_() != mime_guess::mime::IMAGE || !declared_ok {
			return Err(UploadError::NotAnImage);
		}

		Ok(extension)
	}
}

/// Stores uploaded files below a root directory.
///
/// Stored paths are relative to the root and use forward slashes, so
/// they can be joined onto [`URL_PREFIX`] directly.
#[derive(Debug, Clone)]
pub struct MediaStore {
	root: Arc<PathBuf>,
}

impl MediaStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self {
			root: Arc::new(root.into()),
		}
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Writes the upload under a fresh random name and returns its relative path.
	pub async fn save(&self, upload: &Upload, extension: &str) -> io::Result<String> {
		let relative = format!("tweets/{}.{extension}", Uuid::new_v4());
		let path = self.root.join(&relative);

		if let Some(parent) = path.parent() {
			tokio::fs::create_dir_all(parent).await?;
		}

		tokio::fs::write(&path, &upload.bytes).await?;

		tracing::debug!(path = %path.display(), size = upload.bytes.len(), "stored upload");

		Ok(relative)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn upload(file_name: &str, content_type: Option<&str>, bytes: &'static [u8]) -> Upload {
		Upload {
			file_name: file_name.into(),
			content_type: content_type.map(Into::into),
			bytes: Bytes::from_static(bytes),
		}
	}

	#[test]
	fn test_accepts_images() {
		assert_eq!(upload("cat.PNG", Some("image/png"), b"png").validate(), Ok("png"));
		assert_eq!(upload("cat.jpeg", None, b"jpg").validate(), Ok("jpeg"));
	}

	#[test]
	fn test_rejects_non_images() {
		assert_eq!(
			upload("notes.txt", Some("text/plain"), b"hello").validate(),
			Err(UploadError::NotAnImage)
		);
		assert_eq!(
			upload("cat.png", Some("application/pdf"), b"%PDF").validate(),
			Err(UploadError::NotAnImage)
		);
		assert_eq!(upload("cat", None, b"png").validate(), Err(UploadError::NotAnImage));
	}

	#[test]
	fn test_rejects_empty() {
		assert_eq!(upload("cat.png", Some("image/png"), b"").validate(), Err(UploadError::Empty));
	}

	#[tokio::test]
	async fn test_save_writes_below_root() {
		let root = std::env::temp_dir().join(format!("chirp-media-{}", Uuid::new_v4()));
		let store = MediaStore::new(&root);

		let upload = upload("cat.png", Some("image/png"), b"not really a png");
		let relative = store.save(&upload, "png").await.unwrap();

		assert!(relative.starts_with("tweets/"));
		assert!(relative.ends_with(".png"));

		let stored = tokio::fs::read(store.root().join(&relative)).await.unwrap();
		assert_eq!(stored, b"not really a png");

		tokio::fs::remove_dir_all(&root).await.unwrap();
	}
}
