use argon2::Argon2;
use axum::{
	extract::{Query, State},
	http::{header, HeaderValue, StatusCode},
	response::{IntoResponse, Redirect, Response},
	Form,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
	extract::MaybeSession,
	form::FormErrors,
	route::tweet,
	session, view, AppState, Database, Error,
};

use super::{
	model,
	view::{LoginTemplate, RegisterTemplate},
	EMAIL_TAKEN, LOGIN_FAILED, USERNAME_TAKEN,
};

pub const KEY_LENGTH: usize = 32;

/// Hashes a password with Argon2, using the user's id as a salt.
/// Since this is only used for logging in and creating a new password,
/// the scope of this function can remain in here with no issues.
pub fn hash_password(
	hasher: &Argon2,
	password: &str,
	id: &Uuid,
) -> Result<[u8; KEY_LENGTH], argon2::Error> {
	let mut hash = [0; KEY_LENGTH];

	hasher.hash_password_into(password.as_bytes(), id.as_bytes(), &mut hash)?;
	Ok(hash)
}

/// Creates a session for the user and redirects with its cookie set.
///
/// A `to` that is not a valid header value redirects to the post list.
async fn start_session<'e, E>(executor: E, user_id: Uuid, to: &str) -> Result<Response, Error>
where
	E: sqlx::PgExecutor<'e>,
{
	let location = HeaderValue::from_str(to)
		.unwrap_or_else(|_| HeaderValue::from_static(tweet::LIST_PATH));

	let session_id =
		sqlx::query_scalar::<_, Uuid>("INSERT INTO session (user_id) VALUES ($1) RETURNING id")
			.bind(user_id)
			.fetch_one(executor)
			.await?;

	let cookie = session::create_cookie(session_id);

	Ok((
		StatusCode::SEE_OTHER,
		[(header::SET_COOKIE, cookie.to_string())],
		[(header::LOCATION, location)],
	)
		.into_response())
}

/// Shows an empty registration form.
pub async fn register_form(session: MaybeSession) -> Result<Response, Error> {
	view::render(RegisterTemplate {
		current_user: session.username(),
		..Default::default()
	})
}

/// Registers a new account and logs it in.
///
/// The user and its first session are created in one transaction, so a
/// taken username never leaves a half-registered account behind.
pub async fn register(
	State(state): State<AppState>,
	session: MaybeSession,
	Form(input): Form<model::RegisterInput>,
) -> Result<Response, Error> {
	let input = input.normalized();
	let mut errors = FormErrors::new();
	errors.extend(input.validate());

	let invalid = |errors: FormErrors| {
		view::render(RegisterTemplate {
			current_user: session.username(),
			username: input.username.clone(),
			email: input.email.clone(),
			errors,
		})
	};

	if !errors.is_empty() {
		return invalid(errors);
	}

	let user_id = Uuid::new_v4();
	let hashed = hash_password(&state.hasher, &input.password1, &user_id)?;

	let mut tx = state.database.begin().await?;

	let inserted = sqlx::query(
		r#"
			INSERT INTO "user" (id, email, username, password) VALUES ($1, $2, $3, $4)
		"#,
	)
	.bind(user_id)
	.bind(&input.email)
	.bind(&input.username)
	.bind(&hashed[..])
	.execute(&mut *tx)
	.await;

	if let Err(sqlx::Error::Database(ref error)) = inserted {
		match error.constraint() {
			Some("user_username_key") => errors.add("username", USERNAME_TAKEN),
			Some("user_email_key") => errors.add("email", EMAIL_TAKEN),
			_ => {}
		}

		if !errors.is_empty() {
			return invalid(errors);
		}
	}

	inserted?;

	let response = start_session(&mut *tx, user_id, tweet::LIST_PATH).await?;

	tx.commit().await?;

	tracing::info!(%user_id, username = %input.username, "registered user");

	Ok(response)
}

/// Shows an empty login form.
pub async fn login_form(
	session: MaybeSession,
	Query(query): Query<model::LoginQuery>,
) -> Result<Response, Error> {
	view::render(LoginTemplate {
		current_user: session.username(),
		next: query.next.unwrap_or_default(),
		..Default::default()
	})
}

/// Logs in to an account, then returns to `next` if it is a local path.
pub async fn login(
	State(state): State<AppState>,
	session: MaybeSession,
	Form(input): Form<model::LoginInput>,
) -> Result<Response, Error> {
	let username = input.username.trim();

	let user = sqlx::query_as::<_, model::User>(r#"SELECT * FROM "user" WHERE username = $1"#)
		.bind(username)
		.fetch_optional(&state.database)
		.await?;

	// Unknown usernames still pay for a hash, so response time does not
	// reveal which accounts exist.
	let authenticated = match &user {
		Some(user) => user.password == hash_password(&state.hasher, &input.password, &user.id)?,
		None => {
			hash_password(&state.hasher, &input.password, &Uuid::nil())?;
			false
		}
	};

	let user = match user {
		Some(user) if authenticated => user,
		_ => {
			let mut errors = FormErrors::new();
			errors.add_non_field(LOGIN_FAILED);

			return view::render(LoginTemplate {
				current_user: session.username(),
				username: username.to_owned(),
				next: input.next.unwrap_or_default(),
				errors,
			});
		}
	};

	let to = view::safe_next(input.next.as_deref()).unwrap_or(tweet::LIST_PATH);

	start_session(&state.database, user.id, to).await
}

/// Logs out, deleting the session if there is one.
pub async fn logout(
	State(database): State<Database>,
	MaybeSession(session): MaybeSession,
) -> Result<Response, Error> {
	if let Some(session) = session {
		sqlx::query("DELETE FROM session WHERE id = $1")
			.bind(session.id)
			.execute(&database)
			.await?;
	}

	// Clear the session cookie
	Ok((
		[(header::SET_COOKIE, session::clear_cookie().to_string())],
		Redirect::to("/"),
	)
		.into_response())
}
