//! Join token generation and validation for real-time rooms.
//!
//! A join token is a short-lived HS256 JWT that authorizes one participant to join one room.
//! The capabilities inside the token come from a process-wide [`GrantPolicy`], and the token is signed
//! by an [`Issuer`] holding the [`SigningKey`].
//!
//! ```no_run
//! use join_token::{GrantPolicy, Issuer, SigningKey};
//!
//! let key = SigningKey::new("api-key", "api-secret");
//! let issuer = Issuer::new(key);
//! let policy = GrantPolicy::from_env();
//!
//! let token = issuer.issue_token(&policy, "room1", "alice")?;
//! println!("{token}");
//! # Ok::<(), join_token::Error>(())
//! ```
//!
//! See [`Claims`] for the JWT claims structure and [`VideoGrant`] for the capabilities.

mod claims;
mod error;
mod grant;
mod issue;
mod key;
mod policy;

pub use claims::*;
pub use error::*;
pub use grant::*;
pub use issue::*;
pub use key::*;
pub use policy::*;
