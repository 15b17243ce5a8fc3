use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};

use join_token::{GrantPolicy, Issuer, SigningKey};

/// Generate and verify join tokens.
///
/// Capabilities come from the same environment flags the server reads, ex. `CAN_PUBLISH=false`.
#[derive(Parser, Debug)]
#[command(name = "join-token", version)]
struct Cli {
	#[command(flatten)]
	key: KeyArgs,

	#[command(subcommand)]
	command: Command,
}

#[derive(Args, Debug)]
struct KeyArgs {
	/// The key id, written to the `iss` claim.
	#[arg(long, env = "LIVEKIT_API_KEY", hide_env_values = true)]
	api_key: String,

	/// The shared secret used to sign and verify tokens.
	#[arg(long, env = "LIVEKIT_API_SECRET", hide_env_values = true)]
	api_secret: String,
}

impl KeyArgs {
	fn key(&self) -> SigningKey {
		SigningKey::new(&self.api_key, &self.api_secret)
	}
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Print a token for the given room and identity.
	Generate {
		/// The room to join.
		#[arg(long)]
		room: String,

		/// The participant identity.
		#[arg(long)]
		identity: String,
	},

	/// Read a token from stdin, verify it, and print the claims as JSON.
	Verify,
}

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	let key = cli.key.key();

	match cli.command {
		Command::Generate { room, identity } => {
			let policy = GrantPolicy::from_env();
			let issuer = Issuer::new(key);
			let token = issuer
				.issue_token(&policy, &room, &identity)
				.context("failed to generate token")?;

			println!("{token}");
		}
		Command::Verify => {
			let mut token = String::new();
			io::stdin().read_to_string(&mut token).context("failed to read token")?;

			let claims = key.verify(token.trim()).context("failed to verify token")?;
			println!("{}", serde_json::to_string_pretty(&claims)?);
		}
	}

	Ok(())
}
