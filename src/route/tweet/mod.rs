use axum::routing::get;

use crate::AppState;

pub mod model;
pub mod route;
pub mod view;

pub const LIST_PATH: &str = "/tweets/";
pub const NEW_PATH: &str = "/tweets/new/";

pub fn edit_path(id: i64) -> String {
	format!("/tweets/{id}/edit/")
}

pub fn delete_path(id: i64) -> String {
	format!("/tweets/{id}/delete/")
}

pub fn routes() -> axum::Router<AppState> {
	use route::*;

	axum::Router::new()
		.route(LIST_PATH, get(list_posts))
		.route(NEW_PATH, get(new_post_form).post(create_post))
		.route("/tweets/:id/edit/", get(edit_post_form).post(update_post))
		.route("/tweets/:id/delete/", get(delete_post_form).post(delete_post))
}

#[cfg(test)]
mod test {
	use crate::test::*;

	use super::model::CONTENT_REQUIRED;

	#[sqlx::test]
	async fn test_create_and_list(pool: Database) {
		let app = app(pool.clone());
		register(&app, "alice").await;

		let response = app
			.post("/tweets/new/")
			.multipart(MultipartForm::new().add_text("content", "hello"))
			.await;
		assert_redirect(&response, "/tweets/");

		let response = app.get("/tweets/").await;
		response.assert_status_ok();
		let body = response.text();
		assert!(body.contains("hello"));
		assert!(body.contains("alice"));
	}

	#[sqlx::test]
	async fn test_list_is_public_and_newest_first(pool: Database) {
		let alice = app(pool.clone());
		register(&alice, "alice").await;

		for content in ["first post", "second post", "third post"] {
			create_post(&alice, &pool, content).await;
		}

		let anonymous = app(pool.clone());
		let response = anonymous.get("/tweets/").await;
		response.assert_status_ok();

		let body = response.text();
		let first = body.find("first post").unwrap();
		let second = body.find("second post").unwrap();
		let third = body.find("third post").unwrap();

		assert!(third < second);
		assert!(second < first);
		// no edit links for anonymous viewers
		assert!(!body.contains("/edit/"));
	}

	#[sqlx::test]
	async fn test_create_requires_content(pool: Database) {
		let app = app(pool.clone());
		register(&app, "alice").await;

		let response = app
			.post("/tweets/new/")
			.multipart(MultipartForm::new().add_text("content", "   "))
			.await;

		response.assert_status_ok();
		assert!(response.text().contains(CONTENT_REQUIRED));
		assert_eq!(count_posts(&pool).await, 0);
	}

	#[sqlx::test]
	async fn test_create_ignores_submitted_owner(pool: Database) {
		let app = app(pool.clone());
		register(&app, "alice").await;

		let response = app
			.post("/tweets/new/")
			.multipart(
				MultipartForm::new()
					.add_text("content", "spoofed")
					.add_text("user_id", uuid::Uuid::new_v4().to_string())
					.add_text("user", "someone-else"),
			)
			.await;
		assert_redirect(&response, "/tweets/");

		let owner = sqlx::query_scalar::<_, String>(
			r#"SELECT "user".username FROM post JOIN "user" ON "user".id = post.user_id"#,
		)
		.fetch_one(&pool)
		.await
		.unwrap();

		assert_eq!(owner, "alice");
	}

	#[sqlx::test]
	async fn test_anonymous_is_redirected_to_login(pool: Database) {
		let app = app(pool.clone());

		let response = app.get("/tweets/new/").await;
		assert_redirect(&response, "/login/?next=%2Ftweets%2Fnew%2F");

		let response = app
			.post("/tweets/new/")
			.multipart(MultipartForm::new().add_text("content", "hello"))
			.await;
		assert_redirect(&response, "/login/?next=%2Ftweets%2Fnew%2F");

		let response = app.post("/tweets/1/delete/").await;
		assert_redirect(&response, "/login/?next=%2Ftweets%2F1%2Fdelete%2F");

		assert_eq!(count_posts(&pool).await, 0);
	}

	#[sqlx::test]
	async fn test_other_users_cannot_edit_or_delete(pool: Database) {
		let alice = app(pool.clone());
		register(&alice, "alice").await;
		let id = create_post(&alice, &pool, "hello").await;

		assert!(alice.get("/tweets/").await.text().contains("hello"));

		let bob = app(pool.clone());
		register(&bob, "bob").await;

		let edit = format!("/tweets/{id}/edit/");
		let delete = format!("/tweets/{id}/delete/");

		bob.get(&edit).await.assert_status_not_found();
		bob.get(&delete).await.assert_status_not_found();
		bob.post(&edit)
			.multipart(MultipartForm::new().add_text("content", "hijacked"))
			.await
			.assert_status_not_found();
		bob.post(&delete).await.assert_status_not_found();

		// a post that does not exist looks the same
		bob.get("/tweets/999999/edit/").await.assert_status_not_found();
		bob.get("/tweets/not-a-number/edit/").await.assert_status_not_found();

		let response = alice.get(&edit).await;
		response.assert_status_ok();
		assert!(response.text().contains("hello"));

		assert_eq!(post_content(&pool, id).await.as_deref(), Some("hello"));
	}

	#[sqlx::test]
	async fn test_edit(pool: Database) {
		let app = app(pool.clone());
		register(&app, "alice").await;
		let id = create_post(&app, &pool, "hello").await;

		let edit = format!("/tweets/{id}/edit/");

		let response = app
			.post(&edit)
			.multipart(MultipartForm::new().add_text("content", ""))
			.await;
		response.assert_status_ok();
		assert!(response.text().contains(CONTENT_REQUIRED));
		assert_eq!(post_content(&pool, id).await.as_deref(), Some("hello"));

		let response = app
			.post(&edit)
			.multipart(MultipartForm::new().add_text("content", "hello again"))
			.await;
		assert_redirect(&response, "/tweets/");
		assert_eq!(post_content(&pool, id).await.as_deref(), Some("hello again"));
	}

	#[sqlx::test]
	async fn test_get_is_idempotent(pool: Database) {
		let app = app(pool.clone());
		register(&app, "alice").await;
		let id = create_post(&app, &pool, "hello").await;

		app.get(&format!("/tweets/{id}/edit/")).await.assert_status_ok();
		app.get(&format!("/tweets/{id}/delete/")).await.assert_status_ok();

		assert_eq!(count_posts(&pool).await, 1);
		assert_eq!(post_content(&pool, id).await.as_deref(), Some("hello"));
	}

	#[sqlx::test]
	async fn test_delete(pool: Database) {
		let app = app(pool.clone());
		register(&app, "alice").await;
		let id = create_post(&app, &pool, "hello").await;

		let response = app.post(&format!("/tweets/{id}/delete/")).await;
		assert_redirect(&response, "/tweets/");
		assert_eq!(count_posts(&pool).await, 0);

		app.post(&format!("/tweets/{id}/delete/"))
			.await
			.assert_status_not_found();
	}

	#[sqlx::test]
	async fn test_media_upload_and_clear(pool: Database) {
		let app = app(pool.clone());
		register(&app, "alice").await;

		let response = app
			.post("/tweets/new/")
			.multipart(
				MultipartForm::new()
					.add_text("content", "look")
					.add_part("media", image_part()),
			)
			.await;
		assert_redirect(&response, "/tweets/");

		let (id, media) = sqlx::query_as::<_, (i64, Option<String>)>("SELECT id, media FROM post")
			.fetch_one(&pool)
			.await
			.unwrap();
		let media = media.unwrap();
		assert!(media.starts_with("tweets/") && media.ends_with(".png"));

		assert!(app
			.get("/tweets/")
			.await
			.text()
			.contains(&format!("/media/{media}")));

		// editing without a new file keeps the image
		app.post(&format!("/tweets/{id}/edit/"))
			.multipart(MultipartForm::new().add_text("content", "still looking"))
			.await;
		assert_eq!(post_media(&pool, id).await.as_deref(), Some(media.as_str()));

		app.post(&format!("/tweets/{id}/edit/"))
			.multipart(
				MultipartForm::new()
					.add_text("content", "not anymore")
					.add_text("media-clear", "on"),
			)
			.await;
		assert_eq!(post_media(&pool, id).await, None);
	}

	#[sqlx::test]
	async fn test_rejects_non_image_upload(pool: Database) {
		let app = app(pool.clone());
		register(&app, "alice").await;

		let response = app
			.post("/tweets/new/")
			.multipart(
				MultipartForm::new().add_text("content", "look").add_part(
					"media",
					Part::bytes(b"hello".as_slice())
						.file_name("notes.txt")
						.mime_type("text/plain"),
				),
			)
			.await;

		response.assert_status_ok();
		assert!(response.text().contains("Upload a valid image."));
		assert_eq!(count_posts(&pool).await, 0);
	}

	#[sqlx::test]
	async fn test_rejects_oversized_upload(pool: Database) {
		let app = app_with_limit(pool.clone(), 4 * 1024);
		register(&app, "alice").await;

		let response = app
			.post("/tweets/new/")
			.multipart(
				MultipartForm::new().add_text("content", "big").add_part(
					"media",
					Part::bytes(vec![0u8; 64 * 1024])
						.file_name("big.png")
						.mime_type("image/png"),
				),
			)
			.await;

		response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
		assert_eq!(count_posts(&pool).await, 0);

		// small uploads still go through under the same limit
		let response = app
			.post("/tweets/new/")
			.multipart(
				MultipartForm::new()
					.add_text("content", "small")
					.add_part("media", image_part()),
			)
			.await;
		assert_redirect(&response, "/tweets/");
		assert_eq!(count_posts(&pool).await, 1);
	}

	fn image_part() -> Part {
		Part::bytes(b"\x89PNG\r\n\x1a\n".as_slice())
			.file_name("cat.png")
			.mime_type("image/png")
	}

	async fn post_media(pool: &Database, id: i64) -> Option<String> {
		sqlx::query_scalar::<_, Option<String>>("SELECT media FROM post WHERE id = $1")
			.bind(id)
			.fetch_one(pool)
			.await
			.unwrap()
	}
}
