use std::{
	collections::HashMap,
	sync::{
		RwLock,
		atomic::{AtomicUsize, Ordering},
	},
};

use serde_json::Value;
use uuid::Uuid;

use uasrc_storage::{
	Error, Result,
	document::Document,
	filter::{Filter, FindOptions, compare_values, sort_documents},
	store::{BoxFuture, DocumentStore},
};

/// In-process [`DocumentStore`] used by service and HTTP tests.
#[derive(Default)]
pub struct MemoryStore {
	collections: RwLock<HashMap<String, Vec<Document>>>,
	failing: RwLock<Option<String>>,
	finds: AtomicUsize,
}
impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a document and returns its generated identifier.
	pub fn insert(&self, collection: &str, body: Value) -> Uuid {
		let id = Uuid::new_v4();
		let body = match body {
			Value::Object(map) => map,
			other => panic!("Test documents must be JSON objects, got {other}."),
		};
		let mut collections = self.collections.write().unwrap_or_else(|err| err.into_inner());

		collections.entry(collection.to_string()).or_default().push(Document::new(id, body));

		id
	}

	/// Makes every subsequent query fail with a storage error carrying `message`.
	pub fn fail_with(&self, message: impl Into<String>) {
		*self.failing.write().unwrap_or_else(|err| err.into_inner()) = Some(message.into());
	}

	pub fn find_count(&self) -> usize {
		self.finds.load(Ordering::SeqCst)
	}

	fn check_failure(&self) -> Result<()> {
		let failing = self.failing.read().unwrap_or_else(|err| err.into_inner());

		match failing.as_ref() {
			Some(message) => Err(Error::Sqlx(sqlx::Error::Protocol(message.clone()))),
			None => Ok(()),
		}
	}

	fn find_now(
		&self,
		collection: &str,
		filter: &Filter,
		options: &FindOptions,
	) -> Result<Vec<Document>> {
		self.finds.fetch_add(1, Ordering::SeqCst);
		self.check_failure()?;

		let collections = self.collections.read().unwrap_or_else(|err| err.into_inner());
		let mut matched = collections
			.get(collection)
			.map(|documents| {
				documents.iter().filter(|doc| filter.matches(&doc.body)).cloned().collect::<Vec<_>>()
			})
			.unwrap_or_default();

		sort_documents(&mut matched, &options.sort);

		Ok(matched
			.into_iter()
			.map(|doc| Document::new(doc.id, options.projection.apply(&doc.body)))
			.collect())
	}

	fn distinct_now(&self, collection: &str, field: &str) -> Result<Vec<Value>> {
		self.check_failure()?;

		let collections = self.collections.read().unwrap_or_else(|err| err.into_inner());
		let mut values = collections
			.get(collection)
			.map(|documents| {
				documents.iter().filter_map(|doc| doc.get(field).cloned()).collect::<Vec<_>>()
			})
			.unwrap_or_default();

		values.sort_by(compare_values);
		values.dedup();

		Ok(values)
	}
}
impl DocumentStore for MemoryStore {
	fn find<'a>(
		&'a self,
		collection: &'a str,
		filter: &'a Filter,
		options: &'a FindOptions,
	) -> BoxFuture<'a, Result<Vec<Document>>> {
		let result = self.find_now(collection, filter, options);

		Box::pin(async move { result })
	}

	fn distinct<'a>(
		&'a self,
		collection: &'a str,
		field: &'a str,
	) -> BoxFuture<'a, Result<Vec<Value>>> {
		let result = self.distinct_now(collection, field);

		Box::pin(async move { result })
	}
}

