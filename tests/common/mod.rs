//! Shared fixtures for the integration suites.

#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use httpmock::{Mock, prelude::*};
use tokio::net::TcpListener;
// self
use twitch_pfp_proxy::{
	auth::ClientCredentials,
	config::Config,
	http::ReqwestHttpClient,
	lookup::UserLookup,
	server::{self, AppState},
	token::{TokenCache, TwitchTokenFetcher},
	url::Url,
};

pub const CLIENT_ID: &str = "test-client";
pub const CLIENT_SECRET: &str = "test-secret";
pub const TOKEN_PATH: &str = "/oauth2/token";
pub const USERS_PATH: &str = "/helix/users";

pub fn mock_url(server: &MockServer, path: &str) -> Url {
	Url::parse(&server.url(path)).expect("Mock endpoint should parse successfully.")
}

pub fn test_credentials() -> ClientCredentials {
	ClientCredentials::new(CLIENT_ID, CLIENT_SECRET)
}

/// Configuration pointing both Twitch endpoints at `server`, default CORS origins.
pub fn test_config(server: &MockServer) -> Config {
	Config::from_vars([
		("TWITCH_CLIENT_ID".to_owned(), CLIENT_ID.to_owned()),
		("TWITCH_CLIENT_SECRET".to_owned(), CLIENT_SECRET.to_owned()),
		("TWITCH_TOKEN_URL".to_owned(), server.url(TOKEN_PATH)),
		("TWITCH_USERS_URL".to_owned(), server.url(USERS_PATH)),
	])
	.expect("Test configuration should load.")
}

pub fn build_test_fetcher(server: &MockServer) -> TwitchTokenFetcher {
	TwitchTokenFetcher::new(ReqwestHttpClient::default(), mock_url(server, TOKEN_PATH))
}

pub fn build_test_lookup(server: &MockServer) -> UserLookup<TwitchTokenFetcher> {
	let http_client = ReqwestHttpClient::default();
	let fetcher = TwitchTokenFetcher::new(http_client.clone(), mock_url(server, TOKEN_PATH));
	let tokens = Arc::new(<TokenCache<TwitchTokenFetcher>>::new(fetcher, test_credentials()));

	UserLookup::new(http_client, mock_url(server, USERS_PATH), CLIENT_ID, tokens)
}

/// Starts the façade on an ephemeral port and returns its base URL.
pub async fn spawn_test_server(config: &Config) -> String {
	let router = server::router(AppState::from_config(config), config)
		.expect("Router should build from the test configuration.");
	let listener =
		TcpListener::bind("127.0.0.1:0").await.expect("Ephemeral test port should bind.");
	let addr = listener.local_addr().expect("Bound listener should report its address.");

	tokio::spawn(server::serve(listener, router, std::future::pending::<()>()));

	format!("http://{addr}")
}

pub async fn mock_token<'a>(
	server: &'a MockServer,
	access_token: &str,
	expires_in: i64,
) -> Mock<'a> {
	let body = serde_json::json!({
		"access_token": access_token,
		"expires_in": expires_in,
		"token_type": "bearer",
	});

	server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "application/json").json_body(body.clone());
		})
		.await
}

pub async fn mock_token_status(server: &MockServer, status: u16) -> Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(status)
				.header("content-type", "application/json")
				.body("{\"status\":401,\"message\":\"invalid client secret\"}");
		})
		.await
}

pub async fn mock_user<'a>(
	server: &'a MockServer,
	login: &'a str,
	image_url: &str,
) -> Mock<'a> {
	let body = serde_json::json!({
		"data": [{
			"id": "19571641",
			"login": login,
			"display_name": login,
			"profile_image_url": image_url,
		}],
	});
	server
		.mock_async(|when, then| {
			when.method(GET).path(USERS_PATH).query_param("login", login);
			then.status(200).header("content-type", "application/json").json_body(body.clone());
		})
		.await
}

pub async fn mock_missing_user<'a>(server: &'a MockServer, login: &'a str) -> Mock<'a> {
	server
		.mock_async(|when, then| {
			when.method(GET).path(USERS_PATH).query_param("login", login);
			then.status(200).header("content-type", "application/json").body("{\"data\":[]}");
		})
		.await
}

pub async fn mock_users_status(server: &MockServer, status: u16) -> Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(GET).path(USERS_PATH);
			then.status(status)
				.header("content-type", "application/json")
				.body("{\"error\":\"Service Unavailable\",\"message\":\"upstream unavailable\"}");
		})
		.await
}
