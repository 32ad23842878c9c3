use axum::{body::Body, http::Request};
use tower_http::{
	classify::{ServerErrorsAsFailures, SharedClassifier},
	trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{level_filters::LevelFilter, Level, Span};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes the global tracing subscriber, printing events at or above `level`.
pub fn init_tracing_subscriber(level: Level) {
	tracing_subscriber::registry()
		.with(LevelFilter::from_level(level))
		.with(tracing_subscriber::fmt::layer().with_ansi(cfg!(debug_assertions)))
		.init();
}

/// Constructs a [`TraceLayer`] that opens one span per request.
///
/// Only the method and path are recorded, query strings may carry
/// redirect targets that do not belong in logs.
pub fn http_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, fn(&Request<Body>) -> Span>
{
	TraceLayer::new_for_http()
		.make_span_with(make_span as fn(&Request<Body>) -> Span)
		.on_response(DefaultOnResponse::new().level(Level::INFO))
}

fn make_span(request: &Request<Body>) -> Span {
	tracing::info_span!(
		"request",
		method = %request.method(),
		path = %request.uri().path(),
	)
}
