use askama::Template;
use axum::response::Response;

use crate::{extract::MaybeSession, view, Error};

#[derive(Template)]
#[template(path = "index.html")]
pub struct HomeTemplate {
	pub current_user: Option<String>,
}

/// The landing page.
pub async fn index(session: MaybeSession) -> Result<Response, Error> {
	view::render(HomeTemplate {
		current_user: session.username(),
	})
}
