use serde_json::{Map, Value};
use uuid::Uuid;

/// A stored document: the internal identifier plus its JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
	pub id: Uuid,
	pub body: Map<String, Value>,
}
impl Document {
	pub fn new(id: Uuid, body: Map<String, Value>) -> Self {
		Self { id, body }
	}

	pub fn get(&self, field: &str) -> Option<&Value> {
		self.body.get(field).filter(|value| !value.is_null())
	}
}
