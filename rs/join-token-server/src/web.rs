use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use axum::{Json, Router};
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use join_token::{GrantPolicy, Issuer, TokenRequest};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::{ApiError, WebConfig};

/// Shared, read-only state for every request.
#[derive(Clone)]
pub struct WebState {
	pub issuer: Arc<Issuer>,
	pub policy: Arc<GrantPolicy>,
}

impl WebState {
	pub fn new(issuer: Issuer, policy: GrantPolicy) -> Self {
		Self {
			issuer: Arc::new(issuer),
			policy: Arc::new(policy),
		}
	}
}

// Missing parameters are treated the same as empty ones.
// A repeated parameter keeps its first value.
#[derive(Debug, Default, PartialEq, Eq)]
struct TokenParams {
	room: String,
	identity: String,
}

impl TokenParams {
	fn from_pairs(pairs: Vec<(String, String)>) -> Self {
		let mut room = None;
		let mut identity = None;

		for (key, value) in pairs {
			match key.as_str() {
				"room" => {
					room.get_or_insert(value);
				}
				"identity" => {
					identity.get_or_insert(value);
				}
				_ => {}
			}
		}

		Self {
			room: room.unwrap_or_default(),
			identity: identity.unwrap_or_default(),
		}
	}
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
	pub token: String,
	pub identity: String,
}

pub struct Web {
	app: Router,
	addr: SocketAddr,
	tls: Option<(PathBuf, PathBuf)>,
}

impl Web {
	/// Fails if HTTPS is enabled without both TLS files.
	pub fn new(state: WebState, config: WebConfig) -> anyhow::Result<Self> {
		Ok(Self {
			app: router(state),
			addr: config.addr(),
			tls: config.tls_files()?,
		})
	}

	pub async fn run(self) -> anyhow::Result<()> {
		let addr = self.addr;
		let tls = self.tls;

		let handle: Handle<SocketAddr> = Handle::new();
		tokio::spawn(shutdown(handle.clone()));

		let app = self.app.into_make_service();

		match tls {
			Some((cert, key)) => {
				let tls = RustlsConfig::from_pem_file(&cert, &key)
					.await
					.with_context(|| format!("failed to load TLS files: {} {}", cert.display(), key.display()))?;

				announce("https", addr);
				axum_server::bind_rustls(addr, tls).handle(handle).serve(app).await?;
			}
			None => {
				announce("http", addr);
				axum_server::bind(addr).handle(handle).serve(app).await?;
			}
		}

		Ok(())
	}
}

fn announce(scheme: &str, addr: SocketAddr) {
	let port = addr.port();
	tracing::info!(%addr, "listening");
	tracing::info!("access the server at {scheme}://localhost:{port}");
	tracing::info!("for example, {scheme}://localhost:{port}/token?room=room1&identity=user1");
}

pub fn router(state: WebState) -> Router {
	let cors = CorsLayer::new()
		.allow_origin(Any)
		.allow_methods([Method::GET, Method::POST, Method::OPTIONS])
		.allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

	// CorsLayer only sends these on preflight, but every response carries them.
	let methods = SetResponseHeaderLayer::if_not_present(
		header::ACCESS_CONTROL_ALLOW_METHODS,
		HeaderValue::from_static("GET, POST, OPTIONS"),
	);
	let headers = SetResponseHeaderLayer::if_not_present(
		header::ACCESS_CONTROL_ALLOW_HEADERS,
		HeaderValue::from_static("Content-Type, Authorization"),
	);

	Router::new()
		.route("/", get(serve_health))
		.route("/token", get(serve_token).post(serve_token))
		.layer(cors)
		.layer(methods)
		.layer(headers)
		.with_state(state)
}

async fn serve_health() -> &'static str {
	"OK"
}

async fn serve_token(
	State(state): State<WebState>,
	Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<TokenResponse>, ApiError> {
	let params = TokenParams::from_pairs(pairs);
	let request = TokenRequest::new(params.room, params.identity)?;
	let token = state.issuer.issue_request(&state.policy, &request)?;

	tracing::info!(room = %request.room(), identity = %request.identity(), "token generated");

	Ok(Json(TokenResponse {
		token,
		identity: request.identity().to_string(),
	}))
}

async fn shutdown(handle: Handle<SocketAddr>) {
	let ctrl_c = async {
		if let Err(err) = tokio::signal::ctrl_c().await {
			tracing::warn!(%err, "failed to listen for ctrl-c");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		use tokio::signal::unix::{SignalKind, signal};

		match signal(SignalKind::terminate()) {
			Ok(mut signal) => {
				signal.recv().await;
			}
			Err(err) => {
				tracing::warn!(%err, "failed to listen for SIGTERM");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}

	tracing::info!("shutting down");
	handle.graceful_shutdown(Some(Duration::from_secs(10)));
}
