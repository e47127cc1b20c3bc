use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub collections: Collections,
	#[serde(default)]
	pub cors: Cors,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// Table names backing each document collection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Collections {
	pub csm: String,
	pub csm_variables: String,
	pub scrutinizer: String,
	pub scrutinizer_variables: String,
}
impl Collections {
	pub fn labeled(&self) -> [(&'static str, &str); 4] {
		[
			("collections.csm", self.csm.as_str()),
			("collections.csm_variables", self.csm_variables.as_str()),
			("collections.scrutinizer", self.scrutinizer.as_str()),
			("collections.scrutinizer_variables", self.scrutinizer_variables.as_str()),
		]
	}
}
impl Default for Collections {
	fn default() -> Self {
		Self {
			csm: "csm".to_string(),
			csm_variables: "csm_variables".to_string(),
			scrutinizer: "scrutinizer".to_string(),
			scrutinizer_variables: "scrutinizer_variables".to_string(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Cors {
	/// `"*"` allows any origin.
	pub allow_origins: Vec<String>,
}
impl Cors {
	pub fn allows_any(&self) -> bool {
		self.allow_origins.iter().any(|origin| origin == "*")
	}
}
impl Default for Cors {
	fn default() -> Self {
		Self { allow_origins: vec!["*".to_string()] }
	}
}
