use askama::Template;

use crate::form::FormErrors;

#[derive(Template, Default)]
#[template(path = "registration/register.html")]
pub struct RegisterTemplate {
	pub current_user: Option<String>,
	pub username: String,
	pub email: String,
	pub errors: FormErrors,
}

#[derive(Template, Default)]
#[template(path = "registration/login.html")]
pub struct LoginTemplate {
	pub current_user: Option<String>,
	pub username: String,
	pub next: String,
	pub errors: FormErrors,
}
