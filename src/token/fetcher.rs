//! Client-credentials exchange against the Twitch token endpoint.

// self
use crate::{
	_prelude::*,
	auth::ClientCredentials,
	error::{TransportError, UpstreamAuthError},
	http::{self, BodyError, ReqwestHttpClient},
};

/// Lifetime assumed when the token endpoint omits `expires_in`.
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Boxed future returned by [`TokenFetcher::fetch_token`].
pub type FetchFuture<'a> =
	Pin<Box<dyn Future<Output = Result<FetchedToken, UpstreamAuthError>> + 'a + Send>>;

/// Performs a single client-credentials exchange.
///
/// Implementations make exactly one attempt per call; caching and single-flight live in
/// [`TokenCache`](crate::token::TokenCache).
pub trait TokenFetcher
where
	Self: Send + Sync,
{
	/// Exchanges `credentials` for a new application token.
	fn fetch_token<'a>(&'a self, credentials: &'a ClientCredentials) -> FetchFuture<'a>;
}

/// Token issued by the provider, before the cache stamps it with absolute instants.
#[derive(Clone, PartialEq, Eq)]
pub struct FetchedToken {
	/// Raw access token value.
	pub access_token: String,
	/// Relative lifetime reported by the provider.
	pub expires_in: Duration,
}
impl Debug for FetchedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FetchedToken")
			.field("access_token", &"<redacted>")
			.field("expires_in", &self.expires_in)
			.finish()
	}
}

#[derive(Deserialize)]
struct TokenResponse {
	access_token: String,
	#[serde(default = "default_expires_in")]
	expires_in: i64,
}

fn default_expires_in() -> i64 {
	DEFAULT_EXPIRES_IN_SECS
}

/// [`TokenFetcher`] that POSTs to Twitch's OAuth token endpoint over reqwest.
#[derive(Clone, Debug)]
pub struct TwitchTokenFetcher {
	http_client: ReqwestHttpClient,
	token_url: Url,
}
impl TwitchTokenFetcher {
	/// Creates a fetcher targeting `token_url`.
	pub fn new(http_client: ReqwestHttpClient, token_url: Url) -> Self {
		Self { http_client, token_url }
	}

	async fn exchange(
		&self,
		credentials: &ClientCredentials,
	) -> Result<FetchedToken, UpstreamAuthError> {
		let response = self
			.http_client
			.post(self.token_url.clone())
			.query(&[
				("client_id", credentials.client_id.as_str()),
				("client_secret", credentials.client_secret.expose()),
				("grant_type", "client_credentials"),
			])
			.send()
			.await
			.map_err(TransportError::from)?;
		let status = response.status();

		if !status.is_success() {
			tracing::warn!(status = status.as_u16(), "Token endpoint rejected the exchange.");

			return Err(UpstreamAuthError::Rejected { status: status.as_u16() });
		}

		let body: TokenResponse = http::read_json(response).await.map_err(|e| match e {
			BodyError::Transport(source) => UpstreamAuthError::from(TransportError::from(source)),
			BodyError::Parse(source) => UpstreamAuthError::MalformedResponse { source },
		})?;

		Ok(FetchedToken {
			access_token: body.access_token,
			expires_in: Duration::seconds(body.expires_in),
		})
	}
}
impl TokenFetcher for TwitchTokenFetcher {
	fn fetch_token<'a>(&'a self, credentials: &'a ClientCredentials) -> FetchFuture<'a> {
		Box::pin(self.exchange(credentials))
	}
}
