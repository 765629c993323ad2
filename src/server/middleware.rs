//! Façade middleware.

// crates.io
use axum::{
	body::{Body, to_bytes},
	http::{Request, header::CONTENT_LENGTH},
	middleware::Next,
	response::Response,
};

const LOGGED_BODY_LIMIT: usize = 1024;

/// Logs every 5xx response together with its (small) body.
pub async fn log_server_errors(req: Request<Body>, next: Next) -> Response {
	let method = req.method().clone();
	let uri = req.uri().clone();
	let response = next.run(req).await;

	if !response.status().is_server_error() {
		return response;
	}

	let (mut parts, body) = response.into_parts();
	let bytes = match to_bytes(body, LOGGED_BODY_LIMIT).await {
		Ok(bytes) => bytes,
		Err(e) => {
			tracing::error!(
				%method,
				%uri,
				status = %parts.status,
				error = %e,
				"Server error with unreadable body."
			);
			parts.headers.remove(CONTENT_LENGTH);

			return Response::from_parts(parts, Body::empty());
		},
	};

	tracing::error!(
		%method,
		%uri,
		status = %parts.status,
		body = %String::from_utf8_lossy(&bytes),
		"Server error occurred."
	);

	Response::from_parts(parts, Body::from(bytes))
}
