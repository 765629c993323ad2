//! Application credentials presented to the token endpoint.

// self
use crate::auth::TokenSecret;

/// Client ID + secret pair presented to the token endpoint.
#[derive(Clone, Debug)]
pub struct ClientCredentials {
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: TokenSecret,
}
impl ClientCredentials {
	/// Pairs a client identifier with its secret.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self { client_id: client_id.into(), client_secret: TokenSecret::new(client_secret) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn debug_output_hides_secret() {
		let credentials = ClientCredentials::new("client", "hunter2");
		let rendered = format!("{credentials:?}");

		assert!(rendered.contains("client"));
		assert!(!rendered.contains("hunter2"));
	}
}
