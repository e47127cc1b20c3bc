use std::{future::Future, pin::Pin};

use serde_json::Value;

use crate::{
	Result,
	document::Document,
	filter::{Filter, FindOptions},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Read access to named document collections.
pub trait DocumentStore
where
	Self: Send + Sync,
{
	/// Returns matching documents with bodies restricted to `options.projection`.
	fn find<'a>(
		&'a self,
		collection: &'a str,
		filter: &'a Filter,
		options: &'a FindOptions,
	) -> BoxFuture<'a, Result<Vec<Document>>>;

	/// Returns the distinct non-null values of `field`, ascending.
	fn distinct<'a>(
		&'a self,
		collection: &'a str,
		field: &'a str,
	) -> BoxFuture<'a, Result<Vec<Value>>>;
}
