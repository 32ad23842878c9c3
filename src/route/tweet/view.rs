use askama::Template;

use crate::{form::FormErrors, media};

use super::model::{Post, PostWithAuthor};

/// A post as shown in the list and on the delete confirmation page.
pub struct PostView {
	pub id: i64,
	pub username: String,
	pub content: String,
	pub media_url: Option<String>,
	pub created_at: String,
	/// Whether the viewer owns the post and gets edit and delete links.
	pub is_own: bool,
}

impl PostView {
	pub fn new(post: Post, username: String, is_own: bool) -> Self {
		Self {
			id: post.id,
			username,
			media_url: post.media.as_deref().map(media_url),
			created_at: post.created_at.format("%b %-d, %Y, %H:%M").to_string(),
			content: post.content,
			is_own,
		}
	}

	pub fn listed(row: PostWithAuthor, viewer: Option<uuid::Uuid>) -> Self {
		let is_own = viewer == Some(row.post.user_id);

		Self::new(row.post, row.username, is_own)
	}
}

pub fn media_url(path: &str) -> String {
	format!("{}/{path}", media::URL_PREFIX)
}

#[derive(Template)]
#[template(path = "tweet_list.html")]
pub struct ListTemplate {
	pub current_user: Option<String>,
	pub posts: Vec<PostView>,
}

/// The create and edit form.
#[derive(Template)]
#[template(path = "tweet_form.html")]
pub struct FormTemplate {
	pub current_user: Option<String>,
	pub heading: &'static str,
	pub action: String,
	pub submit: &'static str,
	pub content: String,
	/// The currently attached image, only set when editing.
	pub media_url: Option<String>,
	pub errors: FormErrors,
}

impl FormTemplate {
	pub fn create(current_user: String) -> Self {
		Self {
			current_user: Some(current_user),
			heading: "New tweet",
			action: super::NEW_PATH.into(),
			submit: "Post",
			content: String::new(),
			media_url: None,
			errors: FormErrors::new(),
		}
	}

	pub fn edit(current_user: String, post: &Post) -> Self {
		Self {
			current_user: Some(current_user),
			heading: "Edit tweet",
			action: super::edit_path(post.id),
			submit: "Save",
			content: post.content.clone(),
			media_url: post.media.as_deref().map(media_url),
			errors: FormErrors::new(),
		}
	}

	/// Replaces the shown content with what was submitted, alongside its errors.
	pub fn with_errors(mut self, content: String, errors: FormErrors) -> Self {
		self.content = content;
		self.errors = errors;
		self
	}
}

#[derive(Template)]
#[template(path = "tweet_confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
	pub current_user: Option<String>,
	pub action: String,
	pub post: PostView,
}
