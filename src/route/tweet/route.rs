use axum::{
	extract::{Multipart, State},
	response::{Redirect, Response, IntoResponse},
};

use crate::{
	extract::{MaybeSession, Path, Session},
	view, AppState, Database, Error,
};

use super::{
	model::{Post, PostInput},
	view::{ConfirmDeleteTemplate, FormTemplate, ListTemplate, PostView},
	LIST_PATH,
};

/// Returns every post, newest first.
pub async fn list_posts(
	State(database): State<Database>,
	MaybeSession(session): MaybeSession,
) -> Result<Response, Error> {
	let viewer = session.as_ref().map(|session| session.user.id);
	let posts = Post::list(&database)
		.await?
		.into_iter()
		.map(|row| PostView::listed(row, viewer))
		.collect();

	view::render(ListTemplate {
		current_user: session.map(|session| session.user.username),
		posts,
	})
}

/// Shows an empty post form.
pub async fn new_post_form(session: Session) -> Result<Response, Error> {
	view::render(FormTemplate::create(session.user.username))
}

/// Creates a new post owned by the session's user.
pub async fn create_post(
	State(state): State<AppState>,
	session: Session,
	multipart: Multipart,
) -> Result<Response, Error> {
	let input = PostInput::from_multipart(multipart).await?;

	let extension = match input.check() {
		Ok(extension) => extension,
		Err(errors) => {
			return view::render(
				FormTemplate::create(session.user.username).with_errors(input.content, errors),
			);
		}
	};

	let media = match (&input.media, extension) {
		(Some(upload), Some(extension)) => Some(state.media.save(upload, extension).await?),
		_ => None,
	};

	let post = Post::insert(
		&state.database,
		session.user.id,
		&input.content,
		media.as_deref(),
	)
	.await?;

	tracing::info!(post_id = post.id, user_id = %session.user.id, "created post");

	Ok(Redirect::to(LIST_PATH).into_response())
}

/// Shows the edit form, pre-filled with the post's current values.
pub async fn edit_post_form(
	State(database): State<Database>,
	session: Session,
	Path(post_id): Path<i64>,
) -> Result<Response, Error> {
	let post = Post::find_owned(&database, post_id, session.user.id)
		.await?
		.ok_or(Error::NotFound)?;

	view::render(FormTemplate::edit(session.user.username, &post))
}

/// Updates a post owned by the session's user.
///
/// A new upload replaces the attached image, the clear checkbox removes it,
/// and otherwise the current one is kept.
pub async fn update_post(
	State(state): State<AppState>,
	session: Session,
	Path(post_id): Path<i64>,
	multipart: Multipart,
) -> Result<Response, Error> {
	let post = Post::find_owned(&state.database, post_id, session.user.id)
		.await?
		.ok_or(Error::NotFound)?;

	let input = PostInput::from_multipart(multipart).await?;

	let extension = match input.check() {
		Ok(extension) => extension,
		Err(errors) => {
			return view::render(
				FormTemplate::edit(session.user.username, &post).with_errors(input.content, errors),
			);
		}
	};

	let media = match (&input.media, extension) {
		(Some(upload), Some(extension)) => Some(state.media.save(upload, extension).await?),
		_ if input.clear_media => None,
		_ => post.media,
	};

	Post::update_owned(
		&state.database,
		post.id,
		session.user.id,
		&input.content,
		media.as_deref(),
	)
	.await?
	.ok_or(Error::NotFound)?;

	tracing::info!(post_id = post.id, user_id = %session.user.id, "updated post");

	Ok(Redirect::to(LIST_PATH).into_response())
}

/// Asks for confirmation before deleting a post.
pub async fn delete_post_form(
	State(database): State<Database>,
	session: Session,
	Path(post_id): Path<i64>,
) -> Result<Response, Error> {
	let post = Post::find_owned(&database, post_id, session.user.id)
		.await?
		.ok_or(Error::NotFound)?;

	view::render(ConfirmDeleteTemplate {
		action: super::delete_path(post.id),
		post: PostView::new(post, session.user.username.clone(), true),
		current_user: Some(session.user.username),
	})
}

/// Deletes a post owned by the session's user.
pub async fn delete_post(
	State(database): State<Database>,
	session: Session,
	Path(post_id): Path<i64>,
) -> Result<Response, Error> {
	if !Post::delete_owned(&database, post_id, session.user.id).await? {
		return Err(Error::NotFound);
	}

	tracing::info!(post_id, user_id = %session.user.id, "deleted post");

	Ok(Redirect::to(LIST_PATH).into_response())
}
