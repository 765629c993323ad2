//! Environment-driven configuration.
//!
//! [`Config::from_env`] loads a `.env` file when present and then reads the process
//! environment. Variables are split by prefix: `TWITCH_` carries the application credentials and
//! upstream endpoints, `PFP_PROXY_` carries the listener and cache settings. [`Config::from_vars`]
//! accepts any key/value iterator so tests never need to touch the real environment.

// std
use std::net::{IpAddr, Ipv4Addr};
// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Twitch OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
/// Twitch Helix user-info endpoint.
pub const DEFAULT_USERS_URL: &str = "https://api.twitch.tv/helix/users";
/// Origins allowed to call the proxy from a browser unless overridden.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
	"https://ttvthreads.vercel.app",
	"http://ttvthreads.vercel.app",
	"https://www.ttvthreads.vercel.app",
	"http://www.ttvthreads.vercel.app",
];

const TWITCH_PREFIX: &str = "TWITCH_";
const PROXY_PREFIX: &str = "PFP_PROXY_";
const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_TOKEN_MARGIN_SECS: i64 = 60;

/// `TWITCH_*` variables as read from the environment.
#[derive(Debug, Deserialize)]
struct TwitchEnv {
	client_id: Option<String>,
	client_secret: Option<String>,
	token_url: Option<String>,
	users_url: Option<String>,
}

/// `PFP_PROXY_*` variables as read from the environment.
#[derive(Debug, Deserialize)]
struct ProxyEnv {
	host: Option<IpAddr>,
	port: Option<u16>,
	token_margin_secs: Option<i64>,
	allowed_origins: Option<Vec<String>>,
}

/// Runtime configuration for the proxy.
#[derive(Clone, Debug)]
pub struct Config {
	/// Twitch application client ID (`TWITCH_CLIENT_ID`).
	pub client_id: String,
	/// Twitch application client secret (`TWITCH_CLIENT_SECRET`).
	pub client_secret: TokenSecret,
	/// Bind address (`PFP_PROXY_HOST`).
	pub host: IpAddr,
	/// Bind port (`PFP_PROXY_PORT`).
	pub port: u16,
	/// Browser origins allowed by CORS (`PFP_PROXY_ALLOWED_ORIGINS`, comma separated).
	pub allowed_origins: Vec<String>,
	/// Cached tokens closer than this to expiry are refreshed (`PFP_PROXY_TOKEN_MARGIN_SECS`).
	pub token_margin: Duration,
	/// OAuth token endpoint (`TWITCH_TOKEN_URL`).
	pub token_url: Url,
	/// Helix user-info endpoint (`TWITCH_USERS_URL`).
	pub users_url: Url,
}
impl Config {
	/// Loads `.env` (if any) and reads the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		dotenvy::dotenv().ok();

		Self::from_vars(std::env::vars())
	}

	/// Builds a configuration from an arbitrary set of `(name, value)` pairs.
	pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
	where
		I: IntoIterator<Item = (String, String)>,
	{
		let vars = vars.into_iter().collect::<Vec<_>>();
		let twitch = envy::prefixed(TWITCH_PREFIX)
			.from_iter::<_, TwitchEnv>(vars.iter().cloned())
			.map_err(|source| ConfigError::Env { prefix: TWITCH_PREFIX, source })?;
		let proxy = envy::prefixed(PROXY_PREFIX)
			.from_iter::<_, ProxyEnv>(vars)
			.map_err(|source| ConfigError::Env { prefix: PROXY_PREFIX, source })?;
		let client_id = required("TWITCH_CLIENT_ID", twitch.client_id)?;
		let client_secret =
			TokenSecret::new(required("TWITCH_CLIENT_SECRET", twitch.client_secret)?);
		let margin_secs = proxy.token_margin_secs.unwrap_or(DEFAULT_TOKEN_MARGIN_SECS);

		if margin_secs < 0 {
			return Err(ConfigError::Invalid {
				name: "PFP_PROXY_TOKEN_MARGIN_SECS",
				reason: "margin cannot be negative".into(),
			});
		}

		let allowed_origins = match proxy.allowed_origins {
			Some(origins) => origins
				.iter()
				.map(|origin| origin.trim())
				.filter(|origin| !origin.is_empty())
				.map(str::to_owned)
				.collect(),
			None => DEFAULT_ALLOWED_ORIGINS.iter().map(|origin| (*origin).to_owned()).collect(),
		};

		Ok(Self {
			client_id,
			client_secret,
			host: proxy.host.unwrap_or(DEFAULT_HOST),
			port: proxy.port.unwrap_or(DEFAULT_PORT),
			allowed_origins,
			token_margin: Duration::seconds(margin_secs),
			token_url: parse_url("TWITCH_TOKEN_URL", twitch.token_url, DEFAULT_TOKEN_URL)?,
			users_url: parse_url("TWITCH_USERS_URL", twitch.users_url, DEFAULT_USERS_URL)?,
		})
	}
}

fn non_blank(value: Option<String>) -> Option<String> {
	value.map(|value| value.trim().to_owned()).filter(|value| !value.is_empty())
}

fn required(name: &'static str, value: Option<String>) -> Result<String, ConfigError> {
	non_blank(value).ok_or(ConfigError::MissingVar { name })
}

fn parse_url(
	name: &'static str,
	raw: Option<String>,
	default: &'static str,
) -> Result<Url, ConfigError> {
	let raw = non_blank(raw);
	let url = Url::parse(raw.as_deref().unwrap_or(default))
		.map_err(|e| ConfigError::Invalid { name, reason: e.to_string() })?;

	match url.scheme() {
		"http" | "https" => Ok(url),
		scheme =>
			Err(ConfigError::Invalid { name, reason: format!("unsupported scheme `{scheme}`") }),
	}
}
