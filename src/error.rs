use axum::{
	body::Body,
	extract::multipart::MultipartError,
	http::{Response, StatusCode},
	response::{IntoResponse, Redirect},
};

use crate::view::{self, ErrorTemplate};

/// Error type for the application.
///
/// The Display trait is not sent to the client, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The resource does not exist, or is not visible to the current user.
	#[error("not found")]
	NotFound,
	/// The route requires a session. `next` is the path to return to after logging in.
	#[error("authentication required for {next}")]
	Unauthenticated { next: String },
	#[error("multipart error: {0}")]
	Multipart(#[from] MultipartError),
	#[error("password hashing error: {0}")]
	Argon(#[from] argon2::Error),
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),
	#[error("template error: {0}")]
	Template(#[from] askama::Error),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

impl Error {
	pub fn status(&self) -> StatusCode {
		match self {
			Self::NotFound => StatusCode::NOT_FOUND,
			Self::Unauthenticated { .. } => StatusCode::SEE_OTHER,
			Self::Multipart(error) => error.status(),
			Self::Argon(..) | Self::Io(..) | Self::Template(..) | Self::Database(..) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response<Body> {
		let status = self.status();

		match self {
			Self::Unauthenticated { next } => Redirect::to(&view::login_url(&next)).into_response(),
			Self::NotFound => view::render_with_status(ErrorTemplate::not_found(), status),
			Self::Multipart(error) => {
				tracing::warn!(%error, "rejected multipart body");

				view::render_with_status(ErrorTemplate::bad_request(error.body_text()), status)
			}
			error => {
				tracing::error!(%error, "request failed");

				view::render_with_status(ErrorTemplate::internal(), status)
			}
		}
	}
}
