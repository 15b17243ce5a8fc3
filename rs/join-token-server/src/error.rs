use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// A failed token request, rendered as a plain text HTTP error.
///
/// The cause is logged but never sent to the client.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] join_token::Error);

impl ApiError {
	pub fn status(&self) -> StatusCode {
		if self.0.is_input() {
			StatusCode::BAD_REQUEST
		} else {
			StatusCode::INTERNAL_SERVER_ERROR
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = self.status();
		if status.is_client_error() {
			tracing::warn!(err = %self.0, "invalid token request");
			(status, "Room and identity parameters are required").into_response()
		} else {
			tracing::error!(err = %self.0, "failed to generate token");
			(status, "Failed to generate token").into_response()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status() {
		assert_eq!(ApiError::from(join_token::Error::MissingRoom).status(), StatusCode::BAD_REQUEST);
		assert_eq!(ApiError::from(join_token::Error::MissingIdentity).status(), StatusCode::BAD_REQUEST);
		assert_eq!(
			ApiError::from(join_token::Error::MissingSecret).status(),
			StatusCode::INTERNAL_SERVER_ERROR
		);
	}
}
