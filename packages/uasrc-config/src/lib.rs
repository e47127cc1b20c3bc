mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Collections, Config, Cors, Postgres, Service, Storage};

use std::{collections::HashSet, fs, net::SocketAddr, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.parse::<SocketAddr>().is_err() {
		return Err(Error::Validation {
			message: "service.http_bind must be a socket address such as 127.0.0.1:8000."
				.to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	let mut seen = HashSet::new();

	for (label, name) in cfg.collections.labeled() {
		if !is_identifier(name) {
			return Err(Error::Validation {
				message: format!(
					"{label} must start with a letter or underscore and contain only letters, digits, or underscores."
				),
			});
		}
		if !seen.insert(name) {
			return Err(Error::Validation {
				message: format!("{label} must not reuse another collection's table."),
			});
		}
	}

	if cfg.cors.allow_origins.is_empty() {
		return Err(Error::Validation {
			message: "cors.allow_origins must be non-empty; use \"*\" to allow any origin."
				.to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for name in [
		&mut cfg.collections.csm,
		&mut cfg.collections.csm_variables,
		&mut cfg.collections.scrutinizer,
		&mut cfg.collections.scrutinizer_variables,
	] {
		let trimmed = name.trim();

		if trimmed.len() != name.len() {
			*name = trimmed.to_string();
		}
	}

	cfg.cors.allow_origins.retain(|origin| !origin.trim().is_empty());

	for origin in cfg.cors.allow_origins.iter_mut() {
		*origin = origin.trim().to_string();
	}
}

fn is_identifier(name: &str) -> bool {
	let mut chars = name.chars();

	match chars.next() {
		Some(first) if first.is_ascii_alphabetic() || first == '_' =>
			chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
		_ => false,
	}
}
