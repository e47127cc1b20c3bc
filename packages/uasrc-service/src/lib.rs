pub mod dates;
pub mod descriptors;
pub mod endpoints;
pub mod filter;
pub mod measurements;
pub mod normalize;

mod error;

pub use error::{Error, Result};
pub use normalize::Params;

use std::sync::Arc;

use serde_json::{Map, Value};

use uasrc_config::Collections;
use uasrc_storage::store::DocumentStore;

/// One response object.
pub type Row = Map<String, Value>;

pub struct UasrcService {
	pub collections: Collections,
	pub store: Arc<dyn DocumentStore>,
}
impl UasrcService {
	pub fn new(collections: Collections, store: Arc<dyn DocumentStore>) -> Self {
		Self { collections, store }
	}
}
