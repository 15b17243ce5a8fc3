use anyhow::Context;
use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Logging configuration.
///
/// `RUST_LOG` directives take precedence over the default level.
#[derive(Args, Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct Log {
	/// The default log level: error, warn, info, debug, or trace.
	#[arg(long = "log-level", env = "LOG_LEVEL", default_value = "info")]
	pub level: String,

	/// Write logs as JSON, one object per line.
	#[arg(long = "log-json", env = "LOG_JSON")]
	pub json: bool,
}

impl Default for Log {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			json: false,
		}
	}
}

impl Log {
	pub fn level(&self) -> anyhow::Result<Level> {
		self.level
			.parse()
			.with_context(|| format!("invalid log level: {}", self.level))
	}

	pub fn init(&self) -> anyhow::Result<()> {
		let filter = EnvFilter::builder()
			.with_default_directive(self.level()?.into())
			.from_env_lossy()
			.add_directive("h2=warn".parse()?)
			.add_directive("hyper=info".parse()?)
			.add_directive("rustls=info".parse()?);

		let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
		let layer = if self.json {
			layer.json().with_filter(filter).boxed()
		} else {
			layer.with_filter(filter).boxed()
		};

		tracing_subscriber::registry().with(layer).try_init()?;

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn level() {
		let mut log = Log::default();
		assert_eq!(log.level().unwrap(), Level::INFO);

		log.level = "DEBUG".to_string();
		assert_eq!(log.level().unwrap(), Level::DEBUG);

		log.level = "loud".to_string();
		assert!(log.level().is_err());
	}
}
