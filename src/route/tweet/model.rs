use std::borrow::Cow;

use axum::extract::Multipart;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
	form::FormErrors,
	media::Upload,
	Database, Error,
};

/// The maximum number of characters in a post.
pub const MAX_CONTENT_LENGTH: usize = 280;

pub const CONTENT_REQUIRED: &str = "This field is required.";
pub const MEDIA_CONFLICT: &str =
	"Please either submit a file or check the clear checkbox, not both.";

fn validate_content(content: &str) -> Result<(), ValidationError> {
	let length = content.chars().count();

	let message = if length == 0 {
		Cow::Borrowed(CONTENT_REQUIRED)
	} else if length > MAX_CONTENT_LENGTH {
		Cow::Owned(format!(
			"Ensure this value has at most {MAX_CONTENT_LENGTH} characters (it has {length})."
		))
	} else {
		return Ok(());
	};

	let mut error = ValidationError::new("content");
	error.message = Some(message);

	Err(error)
}

/// A single post, created by a user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
	/// The unique identifier of the post.
	pub id: i64,
	/// The user that created the post.
	pub user_id: Uuid,
	/// The text of the post.
	pub content: String,
	/// The attached image, relative to the media root.
	pub media: Option<String>,
	/// The creation time of the post.
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A post joined with its author's username, for listing.
#[derive(Debug, sqlx::FromRow)]
pub struct PostWithAuthor {
	#[sqlx(flatten)]
	pub post: Post,
	pub username: String,
}

impl Post {
	/// Returns every post, newest first.
	///
	/// Posts created in the same instant keep insertion order (newest first)
	/// through the identity column.
	pub async fn list(database: &Database) -> Result<Vec<PostWithAuthor>, sqlx::Error> {
		sqlx::query_as::<_, PostWithAuthor>(
			r#"
				SELECT post.*, "user".username FROM post
				JOIN "user" ON "user".id = post.user_id
				ORDER BY post.created_at DESC, post.id DESC
			"#,
		)
		.fetch_all(database)
		.await
	}

	/// Fetches a post only if it is owned by `user_id`.
	///
	/// Ownership is part of the query, so a post that exists but belongs to
	/// someone else is indistinguishable from one that does not exist.
	pub async fn find_owned(
		database: &Database,
		id: i64,
		user_id: Uuid,
	) -> Result<Option<Self>, sqlx::Error> {
		sqlx::query_as::<_, Self>(
			r#"
				SELECT * FROM post
				WHERE id = $1 AND user_id = $2
			"#,
		)
		.bind(id)
		.bind(user_id)
		.fetch_optional(database)
		.await
	}

	pub async fn insert(
		database: &Database,
		user_id: Uuid,
		content: &str,
		media: Option<&str>,
	) -> Result<Self, sqlx::Error> {
		sqlx::query_as::<_, Self>(
			r#"
				INSERT INTO post (user_id, content, media)
				VALUES ($1, $2, $3)
				RETURNING *
			"#,
		)
		.bind(user_id)
		.bind(content)
		.bind(media)
		.fetch_one(database)
		.await
	}

	/// Updates a post owned by `user_id`, returning `None` if there is no such post.
	pub async fn update_owned(
		database: &Database,
		id: i64,
		user_id: Uuid,
		content: &str,
		media: Option<&str>,
	) -> Result<Option<Self>, sqlx::Error> {
		sqlx::query_as::<_, Self>(
			r#"
				UPDATE post
				SET content = $1, media = $2
				WHERE id = $3 AND user_id = $4
				RETURNING *
			"#,
		)
		.bind(content)
		.bind(media)
		.bind(id)
		.bind(user_id)
		.fetch_optional(database)
		.await
	}

	/// Deletes a post owned by `user_id`, returning whether a row was removed.
	pub async fn delete_owned(
		database: &Database,
		id: i64,
		user_id: Uuid,
	) -> Result<bool, sqlx::Error> {
		let result = sqlx::query(
			r#"
				DELETE FROM post
				WHERE id = $1 AND user_id = $2
			"#,
		)
		.bind(id)
		.bind(user_id)
		.execute(database)
		.await?;

		Ok(result.rows_affected() > 0)
	}
}

/// The fields submitted by the post form.
///
/// Anything else in the body, such as an owner field, is ignored.
#[derive(Debug, Default, Validate)]
pub struct PostInput {
	#[validate(custom(function = "validate_content"))]
	pub content: String,
	pub media: Option<Upload>,
	/// Whether the `media-clear` checkbox was ticked.
	pub clear_media: bool,
}

impl PostInput {
	/// Reads the form from a `multipart/form-data` body.
	///
	/// A file input left empty is sent as a part with no name and no bytes,
	/// and is treated as no upload.
	pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, Error> {
		let mut input = Self::default();

		while let Some(field) = multipart.next_field().await? {
			match field.name() {
				Some("content") => {
					input.content = field.text().await?.trim().to_owned();
				}
				Some("media") => {
					let file_name = field.file_name().unwrap_or_default().to_owned();
					let content_type = field.content_type().map(ToOwned::to_owned);
					let bytes = field.bytes().await?;

					if !file_name.is_empty() || !bytes.is_empty() {
						input.media = Some(Upload {
							file_name,
							content_type,
							bytes,
						});
					}
				}
				Some("media-clear") => {
					input.clear_media = true;
				}
				_ => {}
			}
		}

		Ok(input)
	}

	/// Validates every field, returning the extension to store the upload under.
	pub fn check(&self) -> Result<Option<&'static str>, FormErrors> {
		let mut errors = FormErrors::new();
		errors.extend(self.validate());

		let extension = match &self.media {
			Some(upload) => match upload.validate() {
				Ok(extension) => Some(extension),
				Err(error) => {
					tracing::warn!(file_name = %upload.file_name, %error, "rejected upload");
					errors.add("media", error.to_string());
					None
				}
			},
			None => None,
		};

		if self.media.is_some() && self.clear_media {
			errors.add("media", MEDIA_CONFLICT);
		}

		if errors.is_empty() {
			Ok(extension)
		} else {
			Err(errors)
		}
	}
}
