use std::borrow::Cow;

use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

fn validate_username(username: &str) -> Result<(), ValidationError> {
	if username.chars().any(|c| !c.is_alphanumeric()) {
		let mut error = ValidationError::new("username");
		error.message = Some(Cow::Borrowed(
			"Enter a valid username. This value may contain only letters and numbers.",
		));

		return Err(error);
	}

	Ok(())
}

/// A single user.
#[derive(Debug, sqlx::FromRow)]
pub struct User {
	/// The unique identifier of the user.
	pub id: Uuid,
	/// The user's email address.
	#[allow(dead_code)]
	pub email: String,
	/// The hashed password, see [`super::route::hash_password`].
	pub password: Vec<u8>,
	/// The username that is displayed to the public, and used to log in.
	pub username: String,
	/// The creation time of the user.
	#[allow(dead_code)]
	pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterInput {
	#[validate(
		length(min = 3, max = 16, message = "Usernames must be between 3 and 16 characters."),
		custom(function = "validate_username")
	)]
	pub username: String,
	#[validate(email(message = "Enter a valid email address."))]
	pub email: String,
	#[validate(length(min = 8, max = 128, message = "Passwords must be between 8 and 128 characters."))]
	pub password1: String,
	#[validate(must_match(other = "password1", message = "The two password fields didn't match."))]
	pub password2: String,
}

impl RegisterInput {
	/// Strips surrounding whitespace from the identity fields.
	///
	/// Passwords are kept verbatim.
	pub fn normalized(mut self) -> Self {
		self.username = self.username.trim().to_owned();
		self.email = self.email.trim().to_owned();
		self
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginInput {
	pub username: String,
	pub password: String,
	pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginQuery {
	pub next: Option<String>,
}
