//! Store-level query representation.
//!
//! A [`Filter`] is a conjunction of per-field clauses. Backends translate it into their native
//! query language; [`Filter::matches`] is the reference semantics every backend must agree with.

use std::cmp::Ordering;

use serde_json::{Map, Value};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::document::Document;

/// A typed bound value. Timestamps are stored in documents as RFC 3339 strings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
	Number(f64),
	Timestamp(OffsetDateTime),
}
impl Scalar {
	fn compare_with(&self, value: &Value) -> Option<Ordering> {
		match self {
			Self::Number(bound) => json_number(value)?.partial_cmp(bound),
			Self::Timestamp(bound) => Some(json_timestamp(value)?.cmp(bound)),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
	Eq(String),
	/// Inclusive on both ends; a missing bound is unbounded on that side.
	Range { gte: Option<Scalar>, lte: Option<Scalar> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
	pub field: String,
	pub condition: Condition,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
	pub clauses: Vec<Clause>,
}
impl Filter {
	pub fn is_empty(&self) -> bool {
		self.clauses.is_empty()
	}

	pub fn clause(&self, field: &str) -> Option<&Condition> {
		self.clauses.iter().find(|clause| clause.field == field).map(|clause| &clause.condition)
	}

	/// A document matches when every clause holds. A missing or null field fails any clause.
	pub fn matches(&self, body: &Map<String, Value>) -> bool {
		self.clauses.iter().all(|clause| {
			let Some(value) = body.get(&clause.field).filter(|value| !value.is_null()) else {
				return false;
			};

			match &clause.condition {
				Condition::Eq(expected) => json_text(value) == *expected,
				Condition::Range { gte, lte } => {
					let lower_ok = gte.as_ref().is_none_or(|bound| {
						matches!(
							bound.compare_with(value),
							Some(Ordering::Greater | Ordering::Equal)
						)
					});
					let upper_ok = lte.as_ref().is_none_or(|bound| {
						matches!(bound.compare_with(value), Some(Ordering::Less | Ordering::Equal))
					});

					lower_ok && upper_ok
				},
			}
		})
	}
}

/// Fields kept in returned documents; everything else is dropped. An empty projection keeps the
/// whole body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
	fields: Vec<String>,
}
impl Projection {
	pub fn new<I, S>(fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self { fields: fields.into_iter().map(Into::into).collect() }
	}

	pub fn fields(&self) -> &[String] {
		&self.fields
	}

	/// Fields absent from the source are omitted rather than emitted as null.
	pub fn apply(&self, body: &Map<String, Value>) -> Map<String, Value> {
		if self.fields.is_empty() {
			return body.clone();
		}

		self.fields
			.iter()
			.filter_map(|field| body.get(field).map(|value| (field.clone(), value.clone())))
			.collect()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
	Asc,
	Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
	pub field: String,
	pub order: Order,
}
impl SortSpec {
	pub fn asc(field: impl Into<String>) -> Self {
		Self { field: field.into(), order: Order::Asc }
	}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
	pub projection: Projection,
	pub sort: Vec<SortSpec>,
}

/// Sorts documents in place. Documents missing a sort field come first, as null sorts lowest.
pub fn sort_documents(documents: &mut [Document], sort: &[SortSpec]) {
	if sort.is_empty() {
		return;
	}

	documents.sort_by(|left, right| {
		for spec in sort {
			let ordering = compare_optional(left.get(&spec.field), right.get(&spec.field));
			let ordering = match spec.order {
				Order::Asc => ordering,
				Order::Desc => ordering.reverse(),
			};

			if ordering != Ordering::Equal {
				return ordering;
			}
		}

		Ordering::Equal
	});
}

/// Total order over scalar JSON values: numbers before strings before everything else.
pub fn compare_values(left: &Value, right: &Value) -> Ordering {
	match (left, right) {
		(Value::Number(a), Value::Number(b)) => {
			let a = a.as_f64().unwrap_or(f64::NAN);
			let b = b.as_f64().unwrap_or(f64::NAN);

			a.total_cmp(&b)
		},
		(Value::String(a), Value::String(b)) => a.cmp(b),
		(Value::Number(_), _) => Ordering::Less,
		(_, Value::Number(_)) => Ordering::Greater,
		(Value::String(_), _) => Ordering::Less,
		(_, Value::String(_)) => Ordering::Greater,
		_ => left.to_string().cmp(&right.to_string()),
	}
}

fn compare_optional(left: Option<&Value>, right: Option<&Value>) -> Ordering {
	match (left, right) {
		(Some(a), Some(b)) => compare_values(a, b),
		(None, Some(_)) => Ordering::Less,
		(Some(_), None) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	}
}

fn json_text(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		other => other.to_string(),
	}
}

fn json_number(value: &Value) -> Option<f64> {
	value.as_f64()
}

fn json_timestamp(value: &Value) -> Option<OffsetDateTime> {
	OffsetDateTime::parse(value.as_str()?, &Rfc3339).ok()
}
