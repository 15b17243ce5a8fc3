/// Errors produced while issuing or verifying a join token.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("room is required")]
	MissingRoom,

	#[error("identity is required")]
	MissingIdentity,

	#[error("signing key id is required")]
	MissingKeyId,

	#[error("signing secret is required")]
	MissingSecret,

	#[error("failed to sign token: {0}")]
	Sign(#[source] jsonwebtoken::errors::Error),

	#[error("failed to verify token: {0}")]
	Verify(#[source] jsonwebtoken::errors::Error),
}

impl Error {
	/// Returns true if the caller supplied a bad request, as opposed to a server-side failure.
	///
	/// Input errors are never worth retrying.
	pub fn is_input(&self) -> bool {
		matches!(self, Self::MissingRoom | Self::MissingIdentity)
	}
}

pub type Result<T> = std::result::Result<T, Error>;
