//! Helix user lookup that turns a login into a profile image URL.

// crates.io
use reqwest::header::AUTHORIZATION;
// self
use crate::{
	_prelude::*,
	auth::Login,
	error::{TransportError, UpstreamLookupError},
	http::{self, BodyError, ReqwestHttpClient},
	obs::{self, Operation, OperationSpan, Outcome},
	token::{TokenCache, TokenFetcher},
};

/// Profile fields the proxy reads from a Helix user entry.
///
/// Helix sends many more fields per user; they are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
	/// Profile picture URL.
	pub profile_image_url: String,
}

#[derive(Deserialize)]
struct UsersResponse {
	// Absent and `null` both mean no match.
	data: Option<Vec<UserProfile>>,
}

/// Looks users up on Helix with an application token from a shared [`TokenCache`].
pub struct UserLookup<F>
where
	F: ?Sized + TokenFetcher,
{
	http_client: ReqwestHttpClient,
	users_url: Url,
	client_id: String,
	tokens: Arc<TokenCache<F>>,
}
impl<F> UserLookup<F>
where
	F: ?Sized + TokenFetcher,
{
	/// Creates a lookup against `users_url`, authenticating as `client_id`.
	pub fn new(
		http_client: ReqwestHttpClient,
		users_url: Url,
		client_id: impl Into<String>,
		tokens: Arc<TokenCache<F>>,
	) -> Self {
		Self { http_client, users_url, client_id: client_id.into(), tokens }
	}

	/// Token cache backing this lookup.
	pub fn tokens(&self) -> &Arc<TokenCache<F>> {
		&self.tokens
	}

	/// Resolves `login` to its profile image URL.
	pub async fn lookup_profile_image(&self, login: &Login) -> Result<String> {
		self.lookup_profile(login).await.map(|profile| profile.profile_image_url)
	}

	/// Resolves `login` to the first matching Helix user.
	pub async fn lookup_profile(&self, login: &Login) -> Result<UserProfile> {
		const OP: Operation = Operation::UserLookup;

		let span = OperationSpan::new(OP, "lookup_profile");

		obs::record_outcome(OP, Outcome::Attempt);

		let result = span.instrument(self.fetch_first(login)).await;

		match &result {
			Ok(_) => obs::record_outcome(OP, Outcome::Success),
			Err(e) => {
				obs::record_outcome(OP, Outcome::Failure);
				tracing::info!(%login, error = %e, "User lookup failed.");
			},
		}

		result
	}

	async fn fetch_first(&self, login: &Login) -> Result<UserProfile> {
		let token = self.tokens.get_token().await?;
		let response = self
			.http_client
			.get(self.users_url.clone())
			.header("Client-ID", &self.client_id)
			.header(AUTHORIZATION, token.access_token.bearer())
			.query(&[("login", login.as_ref())])
			.send()
			.await
			.map_err(|e| UpstreamLookupError::from(TransportError::from(e)))?;
		let status = response.status();

		if !status.is_success() {
			if status == StatusCode::UNAUTHORIZED {
				self.tokens.invalidate_if(&token);
			}

			return Err(UpstreamLookupError::Rejected { status: status.as_u16() }.into());
		}

		let body: UsersResponse = http::read_json(response).await.map_err(|e| match e {
			BodyError::Transport(source) => UpstreamLookupError::from(TransportError::from(source)),
			BodyError::Parse(source) => UpstreamLookupError::MalformedResponse { source },
		})?;

		body.data
			.unwrap_or_default()
			.into_iter()
			.next()
			.ok_or_else(|| Error::UserNotFound { login: login.to_string() })
	}
}
impl<F> Debug for UserLookup<F>
where
	F: ?Sized + TokenFetcher,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("UserLookup")
			.field("users_url", &self.users_url.as_str())
			.field("client_id", &self.client_id)
			.finish()
	}
}
