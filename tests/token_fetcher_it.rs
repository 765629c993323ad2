mod common;

// crates.io
use httpmock::prelude::*;
// self
use common::*;
use twitch_pfp_proxy::{
	error::UpstreamAuthError,
	http::ReqwestHttpClient,
	token::{DEFAULT_EXPIRES_IN_SECS, TokenFetcher, TwitchTokenFetcher},
	url::Url,
};

#[tokio::test]
async fn fetcher_posts_credentials_as_query_parameters() {
	let server = MockServer::start_async().await;
	let fetcher = build_test_fetcher(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.query_param("client_id", CLIENT_ID)
				.query_param("client_secret", CLIENT_SECRET)
				.query_param("grant_type", "client_credentials");
			then.status(200)
				.header("content-type", "application/json")
				.body(
					"{\"access_token\":\"app-token\",\"expires_in\":5011271,\"token_type\":\"bearer\"}",
				);
		})
		.await;
	let token = fetcher
		.fetch_token(&test_credentials())
		.await
		.expect("Token exchange should succeed against the mock endpoint.");

	assert_eq!(token.access_token, "app-token");
	assert_eq!(token.expires_in.whole_seconds(), 5_011_271);

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn fetcher_defaults_missing_expires_in() {
	let server = MockServer::start_async().await;
	let fetcher = build_test_fetcher(&server);
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"no-expiry\"}");
		})
		.await;
	let token = fetcher
		.fetch_token(&test_credentials())
		.await
		.expect("A body without expires_in should still yield a token.");

	assert_eq!(token.access_token, "no-expiry");
	assert_eq!(token.expires_in.whole_seconds(), DEFAULT_EXPIRES_IN_SECS);
}

#[tokio::test]
async fn fetcher_reports_rejected_credentials() {
	let server = MockServer::start_async().await;
	let fetcher = build_test_fetcher(&server);
	let mock = mock_token_status(&server, 401).await;
	let err = fetcher
		.fetch_token(&test_credentials())
		.await
		.expect_err("A 401 from the token endpoint must fail.");

	assert!(matches!(err, UpstreamAuthError::Rejected { status: 401 }));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn fetcher_reports_malformed_body_with_path() {
	let server = MockServer::start_async().await;
	let fetcher = build_test_fetcher(&server);
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":42,\"expires_in\":3600}");
		})
		.await;
	let err = fetcher
		.fetch_token(&test_credentials())
		.await
		.expect_err("A non-string access token must fail to decode.");

	match err {
		UpstreamAuthError::MalformedResponse { source } =>
			assert_eq!(source.path().to_string(), "access_token"),
		other => panic!("Unexpected error: {other:?}."),
	}
}

#[tokio::test]
async fn fetcher_reports_unreachable_endpoint_as_transport() {
	let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Ephemeral port should bind.");
	let addr = listener.local_addr().expect("Bound listener should report its address.");

	drop(listener);

	let token_url = Url::parse(&format!("http://{addr}{TOKEN_PATH}"))
		.expect("Closed endpoint URL should parse successfully.");
	let fetcher = TwitchTokenFetcher::new(ReqwestHttpClient::default(), token_url);
	let err = fetcher
		.fetch_token(&test_credentials())
		.await
		.expect_err("A closed endpoint must fail.");

	assert!(matches!(err, UpstreamAuthError::Transport(_)));
}
