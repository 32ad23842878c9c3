use std::{net::IpAddr, path::PathBuf, str::FromStr};

use tracing::Level;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("{0} must be set")]
	Missing(&'static str),
	#[error("{name} has an invalid value {value:?}")]
	Invalid { name: &'static str, value: String },
}

/// Runtime configuration, read from the environment.
///
/// A `.env` file in the working directory is loaded first if present.
#[derive(Debug, Clone)]
pub struct Config {
	pub database_url: String,
	pub host: IpAddr,
	pub port: u16,
	pub media_root: PathBuf,
	pub max_upload_bytes: usize,
	pub log_level: Level,
}

impl Config {
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Builds a configuration from an arbitrary variable source.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

		Ok(Self {
			database_url,
			host: parse_or(&lookup, "HOST", IpAddr::from([127, 0, 0, 1]))?,
			port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
			media_root: lookup("MEDIA_ROOT").map_or_else(|| PathBuf::from("media"), PathBuf::from),
			max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
			log_level: parse_or(&lookup, "LOG_LEVEL", Level::INFO)?,
		})
	}
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
	F: Fn(&str) -> Option<String>,
	T: FromStr,
{
	match lookup(name) {
		Some(value) => value
			.trim()
			.parse()
			.map_err(|_| ConfigError::Invalid { name, value }),
		None => Ok(default),
	}
}
