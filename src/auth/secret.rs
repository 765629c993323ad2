//! Redacting wrapper for the client secret and issued access tokens.

// self
use crate::_prelude::*;

const REDACTED: &str = "<redacted>";

/// String that prints as `<redacted>` through both `Debug` and `Display`.
///
/// Only [`expose`](Self::expose) and [`bearer`](Self::bearer) hand out the raw value, and both
/// results end up in outbound requests, never in log fields.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a raw secret.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Raw value for query strings and headers.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// `Authorization` header value for this token.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.0)
	}
}
impl From<String> for TokenSecret {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "TokenSecret({REDACTED})")
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(REDACTED)
	}
}
