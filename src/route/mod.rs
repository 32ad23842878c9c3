use std::path::Path;

use axum::routing::get;
use tower_http::services::ServeDir;

use crate::{media, AppState};

pub mod auth;
pub mod home;
pub mod tweet;

/// All pages, plus the uploaded media served from `media_root`.
pub fn routes(media_root: &Path) -> axum::Router<AppState> {
	axum::Router::new()
		.route("/", get(home::index))
		.merge(auth::routes())
		.merge(tweet::routes())
		.nest_service(media::URL_PREFIX, ServeDir::new(media_root))
}
