use anyhow::Context;
use clap::{Args, Parser};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv6Addr, SocketAddr};
use std::path::PathBuf;

use crate::Log;

#[derive(Parser, Clone, Debug, Default, Deserialize, Serialize)]
#[command(version, about = "Issues signed join tokens for real-time rooms")]
#[serde(deny_unknown_fields, default)]
pub struct Config {
	/// Load the configuration from a TOML file instead of the command line.
	#[arg(long)]
	#[serde(skip)]
	pub file: Option<PathBuf>,

	#[command(flatten)]
	pub log: Log,

	#[command(flatten)]
	pub key: KeyConfig,

	#[command(flatten)]
	pub web: WebConfig,
}

impl Config {
	pub fn load() -> anyhow::Result<Self> {
		Self::parse().resolve()
	}

	pub fn load_from<I, T>(args: I) -> anyhow::Result<Self>
	where
		I: IntoIterator<Item = T>,
		T: Into<std::ffi::OsString> + Clone,
	{
		Self::try_parse_from(args)?.resolve()
	}

	// A config file, if provided, replaces everything given on the command line.
	fn resolve(self) -> anyhow::Result<Self> {
		let Some(path) = self.file else {
			return Ok(self);
		};

		let contents =
			std::fs::read_to_string(&path).with_context(|| format!("failed to read config: {}", path.display()))?;
		let mut config: Self =
			toml::from_str(&contents).with_context(|| format!("failed to parse config: {}", path.display()))?;
		config.file = Some(path);

		Ok(config)
	}
}

/// The key material used to sign tokens.
#[derive(Args, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct KeyConfig {
	/// The API key, used as the token issuer.
	#[arg(long = "api-key", env = "LIVEKIT_API_KEY", default_value = "", hide_env_values = true)]
	pub api_key: String,

	/// The API secret, used to sign tokens.
	#[arg(long = "api-secret", env = "LIVEKIT_API_SECRET", default_value = "", hide_env_values = true)]
	#[serde(skip_serializing)]
	pub api_secret: String,
}

impl KeyConfig {
	/// Refuse to serve at all without both halves of the key.
	pub fn init(&self) -> anyhow::Result<join_token::SigningKey> {
		let key = join_token::SigningKey::new(&self.api_key, &self.api_secret);
		key.validate()
			.context("LIVEKIT_API_KEY and LIVEKIT_API_SECRET environment variables are required")?;
		Ok(key)
	}
}

impl fmt::Debug for KeyConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("KeyConfig")
			.field("api_key", &self.api_key)
			.field("api_secret", &"[REDACTED]")
			.finish()
	}
}

#[derive(Args, Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct WebConfig {
	/// Listen on this address instead of all interfaces.
	#[arg(long = "bind")]
	pub bind: Option<SocketAddr>,

	/// The port to listen on, ignored when --bind is set.
	#[arg(long, env = "PORT", default_value_t = 8080)]
	pub port: u16,

	/// Serve HTTPS using --tls-cert and --tls-key.
	///
	/// Anything other than a recognized boolean counts as false.
	#[arg(
		long,
		env = "HTTPS",
		value_parser = parse_flag,
		default_value = "false",
		num_args = 0..=1,
		default_missing_value = "true",
		action = clap::ArgAction::Set,
	)]
	pub https: bool,

	/// The PEM certificate chain for HTTPS.
	#[arg(long = "tls-cert", env = "SSL_CRT_FILE")]
	pub tls_cert: Option<PathBuf>,

	/// The PEM private key for HTTPS.
	#[arg(long = "tls-key", env = "SSL_KEY_FILE")]
	pub tls_key: Option<PathBuf>,
}

impl Default for WebConfig {
	fn default() -> Self {
		Self {
			bind: None,
			port: 8080,
			https: false,
			tls_cert: None,
			tls_key: None,
		}
	}
}

impl WebConfig {
	pub fn addr(&self) -> SocketAddr {
		self.bind
			.unwrap_or_else(|| SocketAddr::new(Ipv6Addr::UNSPECIFIED.into(), self.port))
	}

	/// The certificate and key paths, required when HTTPS is enabled.
	pub fn tls_files(&self) -> anyhow::Result<Option<(PathBuf, PathBuf)>> {
		if !self.https {
			return Ok(None);
		}

		match (&self.tls_cert, &self.tls_key) {
			(Some(cert), Some(key)) => Ok(Some((cert.clone(), key.clone()))),
			_ => anyhow::bail!("SSL_CRT_FILE and SSL_KEY_FILE environment variables are required for HTTPS"),
		}
	}
}

fn parse_flag(value: &str) -> Result<bool, std::convert::Infallible> {
	Ok(join_token::parse_bool(value).unwrap_or(false))
}

#[cfg(test)]
mod tests {
	use super::*;

	use std::io::Write;

	#[test]
	fn key_required() {
		let key = KeyConfig::default();
		assert!(key.init().is_err());

		let key = KeyConfig {
			api_key: "key".to_string(),
			api_secret: String::new(),
		};
		assert!(key.init().is_err());

		let key = KeyConfig {
			api_key: "key".to_string(),
			api_secret: "secret".to_string(),
		};
		assert_eq!(key.init().unwrap().key_id(), "key");
	}

	#[test]
	fn debug_redacts_secret() {
		let key = KeyConfig {
			api_key: "key".to_string(),
			api_secret: "hunter2".to_string(),
		};
		assert!(!format!("{key:?}").contains("hunter2"));
	}

	#[test]
	fn https_flag() {
		let config = Config::try_parse_from(["join-token-server", "--https"]).unwrap();
		assert!(config.web.https);

		let config = Config::try_parse_from(["join-token-server", "--https=1"]).unwrap();
		assert!(config.web.https);

		let config = Config::try_parse_from(["join-token-server", "--https=false"]).unwrap();
		assert!(!config.web.https);

		let config = Config::try_parse_from(["join-token-server", "--https=maybe"]).unwrap();
		assert!(!config.web.https);
	}

	#[test]
	fn tls_files() {
		let mut web = WebConfig::default();
		assert!(web.tls_files().unwrap().is_none());

		web.https = true;
		assert!(web.tls_files().is_err());

		web.tls_cert = Some("cert.pem".into());
		assert!(web.tls_files().is_err());

		web.tls_key = Some("key.pem".into());
		let (cert, key) = web.tls_files().unwrap().unwrap();
		assert_eq!(cert, PathBuf::from("cert.pem"));
		assert_eq!(key, PathBuf::from("key.pem"));
	}

	#[test]
	fn addr() {
		let mut web = WebConfig {
			port: 8081,
			..Default::default()
		};
		assert_eq!(web.addr(), "[::]:8081".parse::<SocketAddr>().unwrap());

		web.bind = Some("127.0.0.1:9000".parse().unwrap());
		assert_eq!(web.addr(), "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
	}

	#[test]
	fn load_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			r#"
[log]
level = "debug"

[key]
api_key = "file-key"
api_secret = "file-secret"

[web]
port = 9443
https = true
tls_cert = "cert.pem"
tls_key = "key.pem"
"#
		)
		.unwrap();

		let path = file.path().to_str().unwrap().to_string();
		let config = Config::load_from(["join-token-server", "--file", path.as_str()]).unwrap();

		assert_eq!(config.log.level, "debug");
		assert_eq!(config.key.api_key, "file-key");
		assert_eq!(config.key.api_secret, "file-secret");
		assert_eq!(config.web.port, 9443);
		assert!(config.web.https);
		assert!(config.web.tls_files().unwrap().is_some());
	}

	#[test]
	fn load_file_rejects_unknown_fields() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[web]\nprot = 1").unwrap();

		let path = file.path().to_str().unwrap().to_string();
		assert!(Config::load_from(["join-token-server", "--file", path.as_str()]).is_err());
	}
}
