use askama::Template;
use axum::{
	http::{HeaderValue, StatusCode},
	response::{Html, IntoResponse, Response},
};

use crate::Error;

pub const LOGIN_PATH: &str = "/login/";

/// Renders a template into a `200 OK` HTML response.
pub fn render<T: Template>(template: T) -> Result<Response, Error> {
	Ok(Html(template.render()?).into_response())
}

/// Renders a template with the given status.
///
/// Used by the error path itself, so a rendering failure here falls back
/// to a plain-text body instead of recursing.
pub fn render_with_status<T: Template>(template: T, status: StatusCode) -> Response {
	match template.render() {
		Ok(html) => (status, Html(html)).into_response(),
		Err(error) => {
			tracing::error!(%error, "failed to render error page");

			(StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
		}
	}
}

/// Builds the login URL that returns to `next` afterwards.
pub fn login_url(next: &str) -> String {
	let query = url::form_urlencoded::Serializer::new(String::new())
		.append_pair("next", next)
		.finish();

	format!("{LOGIN_PATH}?{query}")
}

/// Returns `next` if it is safe to redirect to after logging in.
///
/// Only local absolute paths are accepted. `//host` and `/\host` are
/// treated as external by browsers and rejected. Browsers drop tabs and
/// newlines while parsing, so any control character is rejected too, which
/// also keeps the value usable as a `Location` header.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
	let next = next?.trim();

	if next.chars().any(char::is_control) || HeaderValue::from_str(next).is_err() {
		return None;
	}

	(next.starts_with('/') && !next.starts_with("//") && !next.starts_with("/\\")).then_some(next)
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
	pub current_user: Option<String>,
	pub title: &'static str,
	pub message: String,
}

impl ErrorTemplate {
	pub fn not_found() -> Self {
		Self {
			current_user: None,
			title: "Not found",
			message: "The page you requested does not exist.".into(),
		}
	}

	pub fn bad_request(message: String) -> Self {
		Self {
			current_user: None,
			title: "Bad request",
			message,
		}
	}

	pub fn internal() -> Self {
		Self {
			current_user: None,
			title: "Server error",
			message: "Something went wrong on our end. Please try again later.".into(),
		}
	}
}
