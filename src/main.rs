//! `twitch-pfp-proxy` binary: load configuration, install logging, serve.

// std
use std::net::SocketAddr;
// crates.io
use color_eyre::{Result, eyre::WrapErr};
use tokio::net::TcpListener;
// self
use twitch_pfp_proxy::{
	config::Config,
	obs,
	server::{self, AppState},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	obs::init_tracing();

	let config = Config::from_env().wrap_err("Failed to load configuration.")?;
	let state = AppState::from_config(&config);
	let router = server::router(state, &config)?;
	let addr = SocketAddr::new(config.host, config.port);
	let listener =
		TcpListener::bind(addr).await.wrap_err_with(|| format!("Failed to bind {addr}."))?;

	server::serve(listener, router, server::shutdown_signal()).await?;

	Ok(())
}
