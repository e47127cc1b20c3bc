use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::{Table, Value};

use uasrc_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_table() -> Table {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.")
}

fn section<'a>(root: &'a mut Table, name: &str) -> &'a mut Table {
	root.get_mut(name)
		.and_then(Value::as_table_mut)
		.unwrap_or_else(|| panic!("Template config must include [{name}]."))
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("uasrc_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_table(table: Table) -> Result<Config, Error> {
	let payload = toml::to_string(&table).expect("Failed to render test config.");
	let path = write_temp_config(payload);
	let result = uasrc_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn expect_validation(table: Table, expected: &str) {
	let err = load_table(table).expect_err("Expected validation error.");
	let message = err.to_string();

	assert!(matches!(err, Error::Validation { .. }), "Unexpected error kind: {err:?}");
	assert!(message.contains(expected), "Unexpected error message: {message}");
}

#[test]
fn sample_config_loads() {
	let cfg = load_table(sample_table()).expect("Expected sample config to load.");

	assert_eq!(cfg.service.http_bind, "127.0.0.1:8000");
	assert_eq!(cfg.storage.postgres.pool_max_conns, 8);
	assert_eq!(cfg.collections.scrutinizer_variables, "scrutinizer_variables");
	assert!(cfg.cors.allows_any());
}

#[test]
fn collections_and_cors_fall_back_to_defaults() {
	let mut root = sample_table();

	root.remove("collections");
	root.remove("cors");

	let cfg = load_table(root).expect("Expected config without optional sections to load.");

	assert_eq!(cfg.collections.csm, "csm");
	assert_eq!(cfg.collections.csm_variables, "csm_variables");
	assert_eq!(cfg.collections.scrutinizer, "scrutinizer");
	assert_eq!(cfg.cors.allow_origins, vec!["*".to_string()]);
}

#[test]
fn http_bind_must_be_a_socket_address() {
	let mut root = sample_table();

	section(&mut root, "service")
		.insert("http_bind".to_string(), Value::String("localhost".to_string()));

	expect_validation(root, "service.http_bind must be a socket address");
}

#[test]
fn pool_max_conns_must_be_positive() {
	let mut root = sample_table();
	let storage = section(&mut root, "storage");
	let postgres = section(storage, "postgres");

	postgres.insert("pool_max_conns".to_string(), Value::Integer(0));

	expect_validation(root, "storage.postgres.pool_max_conns must be greater than zero.");
}

#[test]
fn collection_names_must_be_identifiers() {
	let mut root = sample_table();

	section(&mut root, "collections")
		.insert("csm".to_string(), Value::String("csm; DROP TABLE csm".to_string()));

	expect_validation(root, "collections.csm must start with a letter or underscore");
}

#[test]
fn collection_names_are_trimmed_before_validation() {
	let mut root = sample_table();

	section(&mut root, "collections")
		.insert("csm".to_string(), Value::String("  field_csm ".to_string()));

	let cfg = load_table(root).expect("Expected padded collection name to load.");

	assert_eq!(cfg.collections.csm, "field_csm");
}

#[test]
fn collections_must_be_distinct() {
	let mut root = sample_table();

	section(&mut root, "collections")
		.insert("scrutinizer".to_string(), Value::String("csm".to_string()));

	expect_validation(root, "collections.scrutinizer must not reuse another collection's table.");
}

#[test]
fn blank_origins_are_dropped() {
	let mut root = sample_table();

	section(&mut root, "cors").insert(
		"allow_origins".to_string(),
		Value::Array(vec![
			Value::String(" ".to_string()),
			Value::String(" https://example.org ".to_string()),
		]),
	);

	let cfg = load_table(root).expect("Expected config to load.");

	assert_eq!(cfg.cors.allow_origins, vec!["https://example.org".to_string()]);
	assert!(!cfg.cors.allows_any());
}

#[test]
fn origins_must_not_be_empty_after_normalization() {
	let mut root = sample_table();

	section(&mut root, "cors")
		.insert("allow_origins".to_string(), Value::Array(vec![Value::String("".to_string())]));

	expect_validation(root, "cors.allow_origins must be non-empty");
}

#[test]
fn missing_file_reports_read_error() {
	let path = env::temp_dir().join("uasrc_config_test_missing.toml");
	let err = uasrc_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error kind: {err:?}");
}
