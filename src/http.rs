//! Shared reqwest transport plus the JSON body reader used by every upstream call.
//!
//! Both upstream endpoints answer with small JSON documents. [`read_json`] buffers the body and
//! decodes it through `serde_path_to_error` so a schema drift on Twitch's side surfaces the exact
//! field path in logs instead of a bare "invalid type" message.

// std
use std::ops::Deref;
// crates.io
use reqwest::Response;
use serde::de::DeserializeOwned;
// self
use crate::_prelude::*;

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Cloning is cheap; the underlying connection pool is shared between the token fetcher and the
/// user lookup.
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Failure while reading an upstream JSON body.
#[derive(Debug)]
pub(crate) enum BodyError {
	/// Connection dropped while the body was streaming.
	Transport(ReqwestError),
	/// Body is not the JSON document the caller expected.
	Parse(serde_path_to_error::Error<serde_json::Error>),
}

/// Buffers `response` and decodes it as `T`.
pub(crate) async fn read_json<T>(response: Response) -> Result<T, BodyError>
where
	T: DeserializeOwned,
{
	let bytes = response.bytes().await.map_err(BodyError::Transport)?;

	decode_json(&bytes)
}

pub(crate) fn decode_json<T>(bytes: &[u8]) -> Result<T, BodyError>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut deserializer).map_err(BodyError::Parse)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug, Deserialize)]
	struct Envelope {
		#[allow(dead_code)]
		data: Vec<Entry>,
	}

	#[derive(Debug, Deserialize)]
	struct Entry {
		#[allow(dead_code)]
		profile_image_url: String,
	}

	#[test]
	fn parse_errors_report_field_path() {
		let err = decode_json::<Envelope>(br#"{"data":[{"profile_image_url":7}]}"#)
			.expect_err("Numeric URL must fail to decode.");

		match err {
			BodyError::Parse(inner) =>
				assert_eq!(inner.path().to_string(), "data[0].profile_image_url"),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}
}
