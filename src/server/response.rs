//! JSON bodies and the error-to-status mapping used by the façade.

// crates.io
use axum::{
	Json,
	extract::rejection::{JsonRejection, PathRejection},
	response::{IntoResponse, Response},
};
// self
use crate::_prelude::*;

/// Body of `GET /health`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthBody {
	/// Always `"ok"`.
	pub status: String,
}
impl HealthBody {
	/// The static healthy body.
	pub fn ok() -> Self {
		Self { status: "ok".into() }
	}
}

/// Body of `POST /pfp`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PfpRequest {
	/// Twitch login to resolve.
	pub username: String,
}

/// Successful `/pfp` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PfpBody {
	/// Profile picture URL.
	pub pfp_url: String,
}

/// Error body returned on every failure path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
	/// Human-readable failure summary.
	pub detail: String,
}

/// Failure rendered as `status` + [`ErrorBody`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiError {
	/// Response status.
	pub status: StatusCode,
	/// Response detail message.
	pub detail: String,
}
impl ApiError {
	/// Creates an error with an explicit status.
	pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
		Self { status, detail: detail.into() }
	}
}
impl From<Error> for ApiError {
	fn from(e: Error) -> Self {
		match e {
			Error::Config(_) =>
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Proxy is misconfigured."),
			Error::UpstreamAuth(_) =>
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to get Twitch access token."),
			Error::UpstreamLookup(e) => {
				let status = e
					.status()
					.and_then(|code| StatusCode::from_u16(code).ok())
					.unwrap_or(StatusCode::BAD_GATEWAY);

				Self::new(status, "Failed to fetch Twitch user data.")
			},
			Error::UserNotFound { .. } => Self::new(StatusCode::NOT_FOUND, "User not found."),
			Error::InvalidLogin(e) => Self::new(StatusCode::BAD_REQUEST, e.to_string()),
		}
	}
}
impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		Self::new(rejection.status(), rejection.body_text())
	}
}
impl From<PathRejection> for ApiError {
	fn from(rejection: PathRejection) -> Self {
		Self::new(rejection.status(), rejection.body_text())
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(self.status, Json(ErrorBody { detail: self.detail })).into_response()
	}
}
