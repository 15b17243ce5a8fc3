use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;

use crate::{Claims, Error, Result};

/// The key id and shared secret used to sign join tokens.
///
/// The key id is written to the `iss` claim. The secret never leaves this struct.
#[derive(Clone)]
pub struct SigningKey {
	key_id: String,
	secret: String,
}

impl SigningKey {
	pub fn new(key_id: impl Into<String>, secret: impl Into<String>) -> Self {
		Self {
			key_id: key_id.into(),
			secret: secret.into(),
		}
	}

	pub fn key_id(&self) -> &str {
		&self.key_id
	}

	/// Make sure both halves of the key are present.
	pub fn validate(&self) -> Result<()> {
		if self.key_id.is_empty() {
			return Err(Error::MissingKeyId);
		}
		if self.secret.is_empty() {
			return Err(Error::MissingSecret);
		}
		Ok(())
	}

	/// Sign the claims, producing a compact HS256 JWT.
	pub fn sign(&self, claims: &Claims) -> Result<String> {
		self.validate()?;

		let header = Header::new(Algorithm::HS256);
		let key = EncodingKey::from_secret(self.secret.as_bytes());
		jsonwebtoken::encode(&header, claims, &key).map_err(Error::Sign)
	}

	/// Verify the signature, issuer, and expiration of a token and return its claims.
	pub fn verify(&self, token: &str) -> Result<Claims> {
		self.validate()?;

		let mut validation = Validation::new(Algorithm::HS256);
		validation.set_issuer(&[&self.key_id]);
		validation.set_required_spec_claims(&["exp", "iss", "sub"]);

		let key = DecodingKey::from_secret(self.secret.as_bytes());
		let token = jsonwebtoken::decode::<Claims>(token, &key, &validation).map_err(Error::Verify)?;

		Ok(token.claims)
	}
}

impl fmt::Debug for SigningKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SigningKey")
			.field("key_id", &self.key_id)
			.field("secret", &"[REDACTED]")
			.finish()
	}
}
