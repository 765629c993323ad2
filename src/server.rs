//! HTTP façade: `/health`, `POST /pfp`, and `GET /pfp/{username}` behind a CORS allow-list.

pub mod middleware;
pub mod response;
pub mod routes;

pub use response::*;

// std
use std::net::SocketAddr;
// crates.io
use axum::{
	Router,
	http::HeaderValue,
	routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{
	cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
	trace::TraceLayer,
};
// self
use crate::{
	_prelude::*,
	auth::ClientCredentials,
	config::Config,
	error::ConfigError,
	http::ReqwestHttpClient,
	lookup::UserLookup,
	token::{TokenCache, TokenFetcher, TwitchTokenFetcher},
};

/// Shared state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
	/// Lookup (and, through it, the token cache) shared by all requests.
	pub lookup: Arc<UserLookup<dyn TokenFetcher>>,
}
impl AppState {
	/// Wraps an existing lookup.
	pub fn new(lookup: Arc<UserLookup<dyn TokenFetcher>>) -> Self {
		Self { lookup }
	}

	/// Wires the production stack: one reqwest client, the Twitch fetcher, one token cache.
	pub fn from_config(config: &Config) -> Self {
		let http_client = ReqwestHttpClient::default();
		let fetcher: Arc<dyn TokenFetcher> =
			Arc::new(TwitchTokenFetcher::new(http_client.clone(), config.token_url.clone()));
		let credentials =
			ClientCredentials::new(config.client_id.clone(), config.client_secret.expose());
		let tokens = Arc::new(
			<TokenCache<dyn TokenFetcher>>::new(fetcher, credentials)
				.with_margin(config.token_margin),
		);
		let users_url = config.users_url.clone();
		let lookup = UserLookup::new(http_client, users_url, config.client_id.clone(), tokens);

		Self::new(Arc::new(lookup))
	}
}

/// Builds the façade router with CORS, request tracing, and 5xx logging applied.
pub fn router(state: AppState, config: &Config) -> Result<Router, ConfigError> {
	let cors = cors_layer(&config.allowed_origins)?;
	let router = Router::new()
		.route("/health", get(routes::health))
		.route("/pfp", post(routes::pfp_from_body))
		.route("/pfp/{username}", get(routes::pfp_from_path))
		.layer(axum::middleware::from_fn(middleware::log_server_errors))
		.layer(TraceLayer::new_for_http())
		.layer(cors)
		.with_state(state);

	Ok(router)
}

/// CORS policy: listed origins only, credentials allowed, methods and headers mirrored.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, ConfigError> {
	let origins = origins
		.iter()
		.map(|origin| {
			HeaderValue::from_str(origin)
				.map_err(|_| ConfigError::InvalidOrigin { origin: origin.clone() })
		})
		.collect::<Result<Vec<_>, _>>()?;

	Ok(CorsLayer::new()
		.allow_origin(AllowOrigin::list(origins))
		.allow_credentials(true)
		.allow_methods(AllowMethods::mirror_request())
		.allow_headers(AllowHeaders::mirror_request()))
}

/// Serves `router` on `listener` until `shutdown` resolves.
pub async fn serve<S>(listener: TcpListener, router: Router, shutdown: S) -> std::io::Result<()>
where
	S: 'static + Send + Future<Output = ()>,
{
	let addr = listener.local_addr()?;

	tracing::info!(%addr, "Profile picture proxy listening.");

	axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
		.with_graceful_shutdown(shutdown)
		.await
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
	match tokio::signal::ctrl_c().await {
		Ok(()) => tracing::info!("Shutdown signal received."),
		Err(e) => tracing::error!(error = %e, "Failed to listen for the shutdown signal."),
	}
}
