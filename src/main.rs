#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod form;
mod media;
mod route;
mod session;
mod trace;
mod view;

use argon2::Argon2;
use axum::{extract::DefaultBodyLimit, Router};
use tower::ServiceBuilder;

pub use error::Error;

use crate::{config::Config, media::MediaStore};

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access,
/// such as a database connection pool, a hash configuration (if it's expensive to create),
/// or the media store.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
	pub hasher: Argon2<'static>,
	pub media: MediaStore,
}

/// Builds the application router around the given state.
pub fn app(state: State, max_upload_bytes: usize) -> Router {
	route::routes(state.media.root())
		.fallback(|| async { Error::NotFound })
		.layer(
			ServiceBuilder::new()
				.layer(trace::http_layer())
				.layer(DefaultBodyLimit::max(max_upload_bytes)),
		)
		.with_state(state)
}

#[tokio::main]
async fn main() {
	dotenvy::dotenv().ok();

	let config = match Config::from_env() {
		Ok(config) => config,
		Err(error) => {
			eprintln!("invalid configuration: {error}");
			std::process::exit(1);
		}
	};

	trace::init_tracing_subscriber(config.log_level);

	let database = Database::connect(&config.database_url)
		.await
		.expect("failed to connect to database");

	sqlx::migrate!()
		.run(&database)
		.await
		.expect("failed to run migrations");

	let state = State {
		database,
		hasher: Argon2::default(),
		media: MediaStore::new(&config.media_root),
	};

	let listener = tokio::net::TcpListener::bind((config.host, config.port))
		.await
		.expect("failed to bind to port");

	tracing::info!(
		host = %config.host,
		port = config.port,
		media_root = %config.media_root.display(),
		"listening"
	);

	axum::serve(listener, app(state, config.max_upload_bytes))
		.await
		.expect("server error");
}
