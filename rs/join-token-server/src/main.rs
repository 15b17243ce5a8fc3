//! HTTP endpoint that issues join tokens.
//!
//! - `GET /token?room=<room>&identity=<identity>` returns `{"token": ..., "identity": ...}`
//! - `GET /` is a health check.
//!
//! Capabilities are read once at startup from environment flags, see [`join_token::GrantPolicy`].

mod config;
mod error;
mod log;
mod web;

pub use config::*;
pub use error::*;
pub use log::*;
pub use web::*;

use join_token::{GrantPolicy, Issuer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	// Some dependency may pull in `ring` too, so pick the provider explicitly.
	rustls::crypto::aws_lc_rs::default_provider()
		.install_default()
		.map_err(|_| anyhow::anyhow!("failed to install default crypto provider"))?;

	let config = Config::load()?;
	config.log.init()?;

	let key = config.key.init()?;
	let policy = GrantPolicy::from_env();
	tracing::debug!(?policy, "grant policy");

	// Reject a bad TLS setup before telling systemd we're ready.
	let web = Web::new(WebState::new(Issuer::new(key), policy), config.web)?;

	#[cfg(unix)]
	// Notify systemd that we're ready.
	let _ = sd_notify::notify(true, &[sd_notify::NotifyState::Ready]);

	web.run().await
}
