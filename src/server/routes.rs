//! Request handlers.

// crates.io
use axum::{
	Json,
	extract::{
		Path, State,
		rejection::{JsonRejection, PathRejection},
	},
};
// self
use crate::{
	auth::Login,
	error::Error,
	server::{ApiError, AppState, HealthBody, PfpBody, PfpRequest},
};

/// `GET /health`.
pub async fn health() -> Json<HealthBody> {
	Json(HealthBody::ok())
}

/// `POST /pfp` with `{"username": "..."}`.
pub async fn pfp_from_body(
	State(state): State<AppState>,
	payload: Result<Json<PfpRequest>, JsonRejection>,
) -> Result<Json<PfpBody>, ApiError> {
	let Json(request) = payload?;

	resolve(&state, &request.username).await
}

/// `GET /pfp/{username}`.
pub async fn pfp_from_path(
	State(state): State<AppState>,
	username: Result<Path<String>, PathRejection>,
) -> Result<Json<PfpBody>, ApiError> {
	let Path(username) = username?;

	resolve(&state, &username).await
}

async fn resolve(state: &AppState, username: &str) -> Result<Json<PfpBody>, ApiError> {
	let login = Login::new(username).map_err(Error::from)?;
	let pfp_url = state.lookup.lookup_profile_image(&login).await?;

	Ok(Json(PfpBody { pfp_url }))
}
