mod session;

pub use session::{MaybeSession, Session};

use axum::{
	extract::FromRequestParts,
	http::request,
};
use serde::de;

use crate::error::Error;

/// Extractor that deserializes a path parameter.
///
/// Unlike [`axum::extract::Path`], a parameter that does not parse is
/// reported as [`Error::NotFound`], since no resource can live at that path.
///
/// ```rust
/// async fn route(Path(id): Path<i64>) {
///   // ...
/// }
/// ```
pub struct Path<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Path<T>
where
	T: de::DeserializeOwned + Send,
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let result = axum::extract::Path::<T>::from_request_parts(parts, state)
			.await
			.map_err(|_| Error::NotFound)?
			.0;

		Ok(Self(result))
	}
}
