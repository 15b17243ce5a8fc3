use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::{Claims, Error, GrantPolicy, Result, SigningKey, VideoGrant};

/// How long an issued token stays valid.
pub const VALID_FOR: Duration = Duration::from_secs(60 * 60);

/// A validated request for a join token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenRequest {
	room: String,
	identity: String,
}

impl TokenRequest {
	/// Both the room and the identity must be non-empty.
	pub fn new(room: impl Into<String>, identity: impl Into<String>) -> Result<Self> {
		let room = room.into();
		let identity = identity.into();

		if room.is_empty() {
			return Err(Error::MissingRoom);
		}
		if identity.is_empty() {
			return Err(Error::MissingIdentity);
		}

		Ok(Self { room, identity })
	}

	pub fn room(&self) -> &str {
		&self.room
	}

	pub fn identity(&self) -> &str {
		&self.identity
	}
}

/// Signs join tokens with a fixed one hour validity window.
#[derive(Clone, Debug)]
pub struct Issuer {
	key: SigningKey,
}

impl Issuer {
	pub fn new(key: SigningKey) -> Self {
		Self { key }
	}

	pub fn key(&self) -> &SigningKey {
		&self.key
	}

	/// Validate the request, build the grant from the policy, and sign it.
	pub fn issue_token(&self, policy: &GrantPolicy, room: &str, identity: &str) -> Result<String> {
		let request = TokenRequest::new(room, identity)?;
		self.issue_request(policy, &request)
	}

	pub fn issue_request(&self, policy: &GrantPolicy, request: &TokenRequest) -> Result<String> {
		let grant = policy.grant(request.room());
		self.issue(request.identity(), grant)
	}

	/// Sign a token for the identity, valid from now.
	pub fn issue(&self, identity: &str, grant: VideoGrant) -> Result<String> {
		self.issue_at(identity, grant, SystemTime::now())
	}

	/// Sign a token for the identity, valid from the given instant.
	pub fn issue_at(&self, identity: &str, grant: VideoGrant, now: SystemTime) -> Result<String> {
		if identity.is_empty() {
			return Err(Error::MissingIdentity);
		}

		// A clock before the epoch is nonsense, but it shouldn't panic.
		let issued_at = now.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();

		let claims = Claims {
			issuer: self.key.key_id().to_string(),
			identity: identity.to_string(),
			id: identity.to_string(),
			issued_at,
			not_before: issued_at,
			expires_at: issued_at + VALID_FOR.as_secs(),
			video: grant,
		};

		self.key.sign(&claims)
	}
}
