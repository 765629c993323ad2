//! Application-token cache with a lazy, single-flight refresh path.
//!
//! [`TokenCache::get_token`] serves the cached token while it has more than the configured
//! margin (60 seconds by default) left. Once the token enters the margin, or before the first
//! fetch, callers serialize on an async guard: the first one performs the exchange, and everyone
//! queued behind it re-checks the cache after acquiring the guard and piggy-backs on the fresh
//! token instead of stampeding the token endpoint.

// self
use crate::{
	_prelude::*,
	auth::{AppToken, ClientCredentials},
	obs::{self, Operation, OperationSpan, Outcome},
	token::{Clock, SystemClock, TokenFetcher},
};

/// Owned, injectable cache in front of a [`TokenFetcher`].
pub struct TokenCache<F>
where
	F: ?Sized + TokenFetcher,
{
	fetcher: Arc<F>,
	credentials: ClientCredentials,
	clock: Arc<dyn Clock>,
	margin: Duration,
	slot: RwLock<Option<AppToken>>,
	refresh_guard: AsyncMutex<()>,
}
impl<F> TokenCache<F>
where
	F: ?Sized + TokenFetcher,
{
	/// Refresh margin applied unless overridden with [`with_margin`](Self::with_margin).
	pub const DEFAULT_MARGIN: Duration = Duration::seconds(60);

	/// Creates an empty cache that fetches with `credentials` and reads the system clock.
	pub fn new(fetcher: impl Into<Arc<F>>, credentials: ClientCredentials) -> Self {
		Self {
			fetcher: fetcher.into(),
			credentials,
			clock: Arc::new(SystemClock),
			margin: Self::DEFAULT_MARGIN,
			slot: RwLock::new(None),
			refresh_guard: AsyncMutex::new(()),
		}
	}

	/// Replaces the time source.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Overrides the refresh margin; negative values are clamped to zero.
	pub fn with_margin(mut self, margin: Duration) -> Self {
		self.margin = if margin.is_negative() { Duration::ZERO } else { margin };

		self
	}

	/// Returns a token that stays valid for longer than the margin, fetching one if needed.
	///
	/// The fast path never touches the refresh guard. On failure nothing is cached and no stale
	/// token is returned.
	pub async fn get_token(&self) -> Result<AppToken> {
		if let Some(token) = self.fresh(self.clock.now()) {
			return Ok(token);
		}

		let span = OperationSpan::new(Operation::TokenFetch, "get_token");

		span.instrument(self.refresh()).await
	}

	/// Returns the cached token, fresh or not, without fetching.
	pub fn cached(&self) -> Option<AppToken> {
		self.slot.read().clone()
	}

	/// Drops the cached token so the next [`get_token`](Self::get_token) call fetches.
	pub fn invalidate(&self) {
		if self.slot.write().take().is_some() {
			tracing::debug!("Dropped cached application token.");
		}
	}

	/// Drops the cached token only if it is still `used`.
	///
	/// A token another caller refreshed in the meantime is kept.
	pub fn invalidate_if(&self, used: &AppToken) {
		let mut slot = self.slot.write();

		if slot.as_ref() == Some(used) {
			*slot = None;

			tracing::debug!("Dropped rejected application token.");
		}
	}

	fn fresh(&self, now: OffsetDateTime) -> Option<AppToken> {
		self.slot.read().as_ref().filter(|token| token.is_fresh_at(now, self.margin)).cloned()
	}

	async fn refresh(&self) -> Result<AppToken> {
		let _singleflight = self.refresh_guard.lock().await;

		if let Some(token) = self.fresh(self.clock.now()) {
			tracing::debug!("Reusing application token refreshed by a concurrent caller.");

			return Ok(token);
		}

		obs::record_outcome(Operation::TokenFetch, Outcome::Attempt);

		match self.fetcher.fetch_token(&self.credentials).await {
			Ok(fetched) => {
				let token =
					AppToken::new(fetched.access_token, self.clock.now(), fetched.expires_in);

				*self.slot.write() = Some(token.clone());

				obs::record_outcome(Operation::TokenFetch, Outcome::Success);
				tracing::info!(expires_at = %token.expires_at, "Fetched application token.");

				Ok(token)
			},
			Err(e) => {
				obs::record_outcome(Operation::TokenFetch, Outcome::Failure);
				tracing::warn!(error = %e, "Application token fetch failed.");

				Err(e.into())
			},
		}
	}
}
impl<F> Debug for TokenCache<F>
where
	F: ?Sized + TokenFetcher,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenCache")
			.field("client_id", &self.credentials.client_id)
			.field("margin", &self.margin)
			.field("cached", &self.slot.read().as_ref().map(|token| token.expires_at))
			.finish()
	}
}
