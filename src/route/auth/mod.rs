use axum::routing::get;

use crate::AppState;

pub mod model;
pub mod route;
pub mod view;

pub const LOGIN_FAILED: &str = "Please enter a correct username and password.";
pub const USERNAME_TAKEN: &str = "A user with that username already exists.";
pub const EMAIL_TAKEN: &str = "A user with that email address already exists.";

pub fn routes() -> axum::Router<AppState> {
	use route::*;

	axum::Router::new()
		.route("/register/", get(register_form).post(register))
		.route("/login/", get(login_form).post(login))
		.route("/logout/", get(logout).post(logout))
}
