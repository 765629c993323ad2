//! Cached application token and its lifecycle helpers.

// crates.io
use time::PrimitiveDateTime;
// self
use crate::{_prelude::*, auth::TokenSecret};

/// Lifecycle status of an [`AppToken`] relative to a refresh margin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenStatus {
	/// Token remains valid for longer than the margin.
	Fresh,
	/// Token is still valid but inside the margin; callers should refresh.
	Expiring,
	/// Token exceeded its expiry instant.
	Expired,
}

/// Application access token issued by the client-credentials grant.
#[derive(Clone, PartialEq, Eq)]
pub struct AppToken {
	/// Access token secret; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Instant the cache received the token.
	pub issued_at: OffsetDateTime,
	/// Instant after which the token must no longer be served from cache.
	pub expires_at: OffsetDateTime,
}
impl AppToken {
	/// Builds a token issued at `issued_at` that lives for `expires_in`.
	///
	/// Non-positive lifetimes yield a token that is already expired.
	pub fn new(
		access_token: impl Into<String>,
		issued_at: OffsetDateTime,
		expires_in: Duration,
	) -> Self {
		let lifetime = if expires_in.is_negative() { Duration::ZERO } else { expires_in };
		let expires_at = issued_at
			.checked_add(lifetime)
			.unwrap_or_else(|| PrimitiveDateTime::MAX.assume_offset(issued_at.offset()));

		Self { access_token: TokenSecret::new(access_token), issued_at, expires_at }
	}

	/// Time left before expiry at `now`; negative once expired.
	pub fn remaining_at(&self, now: OffsetDateTime) -> Duration {
		self.expires_at - now
	}

	/// Classifies the token at `now` using the provided refresh margin.
	pub fn status_at(&self, now: OffsetDateTime, margin: Duration) -> TokenStatus {
		let remaining = self.remaining_at(now);

		if remaining <= Duration::ZERO {
			TokenStatus::Expired
		} else if remaining <= margin {
			TokenStatus::Expiring
		} else {
			TokenStatus::Fresh
		}
	}

	/// Returns `true` when the token may be served from cache at `now`.
	pub fn is_fresh_at(&self, now: OffsetDateTime, margin: Duration) -> bool {
		matches!(self.status_at(now, margin), TokenStatus::Fresh)
	}
}
impl Debug for AppToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AppToken")
			.field("access_token", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
