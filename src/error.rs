//! Proxy-level error types shared across the token cache, lookup, and HTTP façade.

// self
use crate::_prelude::*;

/// Proxy-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical proxy error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Application token exchange failed.
	#[error(transparent)]
	UpstreamAuth(#[from] UpstreamAuthError),
	/// User-info request failed.
	#[error(transparent)]
	UpstreamLookup(#[from] UpstreamLookupError),
	/// Caller supplied a username that can never match a Twitch login.
	#[error(transparent)]
	InvalidLogin(#[from] crate::auth::LoginError),

	/// Upstream answered successfully but no user matched the login.
	#[error("User `{login}` was not found.")]
	UserNotFound {
		/// Normalized login that was looked up.
		login: String,
	},
}

/// Configuration failures raised while loading the environment.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required variable is absent or blank.
	#[error("Environment variable `{name}` must be set.")]
	MissingVar {
		/// Variable name.
		name: &'static str,
	},
	/// Variables under `prefix` could not be deserialized.
	#[error("Environment variables prefixed with `{prefix}` are invalid.")]
	Env {
		/// Variable prefix being read.
		prefix: &'static str,
		/// Deserialization failure naming the offending variable.
		#[source]
		source: envy::Error,
	},
	/// A variable is present but cannot be parsed.
	#[error("Environment variable `{name}` is invalid: {reason}.")]
	Invalid {
		/// Variable name.
		name: &'static str,
		/// Human-readable parse failure.
		reason: String,
	},
	/// A configured CORS origin is not a valid header value.
	#[error("Allowed origin `{origin}` is not a valid header value.")]
	InvalidOrigin {
		/// Offending origin string.
		origin: String,
	},
}

/// Token endpoint failures.
#[derive(Debug, ThisError)]
pub enum UpstreamAuthError {
	/// Token endpoint answered with a non-success status.
	#[error("Token endpoint rejected the client credentials with HTTP {status}.")]
	Rejected {
		/// HTTP status code returned by the token endpoint.
		status: u16,
	},
	/// Token endpoint responded with JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Token endpoint could not be reached.
	#[error("Token endpoint is unreachable.")]
	Transport(#[from] TransportError),
}

/// User-info endpoint failures.
#[derive(Debug, ThisError)]
pub enum UpstreamLookupError {
	/// User-info endpoint answered with a non-success status.
	#[error("User-info endpoint returned HTTP {status}.")]
	Rejected {
		/// HTTP status code returned by the user-info endpoint.
		status: u16,
	},
	/// User-info endpoint responded with JSON that could not be parsed.
	#[error("User-info endpoint returned malformed JSON.")]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// User-info endpoint could not be reached.
	#[error("User-info endpoint is unreachable.")]
	Transport(#[from] TransportError),
}
impl UpstreamLookupError {
	/// Upstream status code, when the failure carried one.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Rejected { status } => Some(*status),
			_ => None,
		}
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the upstream.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn lookup_error_exposes_upstream_status() {
		assert_eq!(UpstreamLookupError::Rejected { status: 503 }.status(), Some(503));

		let io = std::io::Error::other("connection reset");
		let err = UpstreamLookupError::from(TransportError::network(io));

		assert_eq!(err.status(), None);
	}

	#[test]
	fn transport_error_keeps_source() {
		let io = std::io::Error::other("dns failure");
		let err: Error = UpstreamAuthError::from(TransportError::network(io)).into();
		let mut chain = Vec::new();
		let mut current: Option<&dyn StdError> = Some(&err);

		while let Some(e) = current {
			chain.push(e.to_string());
			current = e.source();
		}

		assert!(chain.iter().any(|message| message == "dns failure"), "chain: {chain:?}");
	}
}
