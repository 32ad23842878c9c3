use axum::{
	extract::{FromRef, FromRequestParts},
	http::{header, request, HeaderMap},
};
use uuid::Uuid;

use crate::{error::Error, route::auth::model::User, session, Database};

/// Extracts the session and related user from the request.
///
/// This is the gate for routes that need a logged-in user: if there is no
/// session cookie, or it does not name a live session, the request is
/// rejected with [`Error::Unauthenticated`], which redirects to the login
/// page and back to the requested path afterwards.
///
/// ```rust
/// async fn route(session: Session) {
///   println!("{:?}", session.user);
/// }
/// ```
#[derive(Debug)]
pub struct Session {
	pub id: Uuid,
	pub user: User,
}

impl Session {
	/// Looks up the session named by the request's cookie, if any.
	pub async fn load(headers: &HeaderMap, database: &Database) -> Result<Option<Self>, Error> {
		let Some(session_id) = session_id(headers) else {
			return Ok(None);
		};

		let user = sqlx::query_as::<_, User>(
			r#"
				SELECT "user".* FROM "user"
				JOIN session ON session.user_id = "user".id
				WHERE session.id = $1
			"#,
		)
		.bind(session_id)
		.fetch_optional(database)
		.await?;

		Ok(user.map(|user| Self {
			id: session_id,
			user,
		}))
	}
}

/// Reads the session id from the `Cookie` headers.
///
/// A cookie that is not a valid UUID is treated as absent.
fn session_id(headers: &HeaderMap) -> Option<Uuid> {
	headers
		.get_all(header::COOKIE)
		.into_iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(cookie::Cookie::split_parse)
		.filter_map(Result::ok)
		.find(|cookie| cookie.name() == session::COOKIE_NAME)
		.and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	Database: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let database = Database::from_ref(state);

		Session::load(&parts.headers, &database)
			.await?
			.ok_or_else(|| Error::Unauthenticated {
				next: parts
					.uri
					.path_and_query()
					.map_or_else(|| parts.uri.path().to_owned(), ToString::to_string),
			})
	}
}

/// The session, if the request has one.
///
/// Used by pages that render differently for logged-in users but are open
/// to everyone. Database errors are still propagated.
#[derive(Debug)]
pub struct MaybeSession(pub Option<Session>);

impl MaybeSession {
	pub fn username(&self) -> Option<String> {
		self.0.as_ref().map(|session| session.user.username.clone())
	}
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for MaybeSession
where
	Database: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let database = Database::from_ref(state);

		Ok(Self(Session::load(&parts.headers, &database).await?))
	}
}
