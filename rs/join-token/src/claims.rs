use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::VideoGrant;

/// The JWT claims carried by a join token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
	/// The key id of the signing key, so the verifier knows which secret to use.
	#[serde(rename = "iss")]
	pub issuer: String,

	/// The participant identity.
	#[serde(rename = "sub")]
	pub identity: String,

	/// The token id, which is the participant identity.
	#[serde(rename = "jti", default, skip_serializing_if = "String::is_empty")]
	pub id: String,

	/// Seconds since the unix epoch.
	#[serde(rename = "iat", default)]
	pub issued_at: u64,

	#[serde(rename = "nbf", default)]
	pub not_before: u64,

	#[serde(rename = "exp")]
	pub expires_at: u64,

	/// What the participant is allowed to do, and in which room.
	pub video: VideoGrant,
}

impl Claims {
	/// How long the token is valid for, measured from when it was issued.
	pub fn valid_for(&self) -> Duration {
		Duration::from_secs(self.expires_at.saturating_sub(self.issued_at))
	}
}
