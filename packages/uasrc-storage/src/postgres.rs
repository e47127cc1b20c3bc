use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
	Error, Result,
	document::Document,
	filter::{Condition, Filter, FindOptions, Order, Scalar, compare_values},
	schema,
	store::{BoxFuture, DocumentStore},
};

/// Collections stored as `(doc_id uuid, doc jsonb)` tables.
#[derive(Clone)]
pub struct PgDocumentStore {
	pool: PgPool,
}
impl PgDocumentStore {
	pub fn new(pool: PgPool) -> Self {
		Self { pool }
	}

	async fn find_documents(
		&self,
		collection: &str,
		filter: &Filter,
		options: &FindOptions,
	) -> Result<Vec<Document>> {
		let mut builder = find_query(collection, filter, options);

		tracing::debug!(collection, clauses = filter.clauses.len(), "Running collection find.");

		let rows: Vec<(Uuid, Value)> = builder.build_query_as().fetch_all(&self.pool).await?;
		let mut documents = Vec::with_capacity(rows.len());

		for (id, doc) in rows {
			let Value::Object(body) = doc else {
				return Err(Error::InvalidDocument { collection: collection.to_string(), id });
			};

			documents.push(Document::new(id, options.projection.apply(&body)));
		}

		Ok(documents)
	}

	async fn distinct_values(&self, collection: &str, field: &str) -> Result<Vec<Value>> {
		let mut builder = distinct_query(collection, field);

		tracing::debug!(collection, field, "Running collection distinct.");

		let mut values: Vec<Value> = builder.build_query_scalar().fetch_all(&self.pool).await?;

		values.sort_by(compare_values);
		values.dedup();

		Ok(values)
	}
}
impl DocumentStore for PgDocumentStore {
	fn find<'a>(
		&'a self,
		collection: &'a str,
		filter: &'a Filter,
		options: &'a FindOptions,
	) -> BoxFuture<'a, Result<Vec<Document>>> {
		Box::pin(self.find_documents(collection, filter, options))
	}

	fn distinct<'a>(
		&'a self,
		collection: &'a str,
		field: &'a str,
	) -> BoxFuture<'a, Result<Vec<Value>>> {
		Box::pin(self.distinct_values(collection, field))
	}
}

/// Values outside this shape are never cast, so they fail the bound instead of the query.
const RFC3339_PATTERN: &str =
	r"^\d{4}-[01]\d-[0-3]\d[Tt][0-2]\d:[0-5]\d:[0-6]\d(\.\d+)?([Zz]|[+-][0-2]\d:[0-5]\d)$";

pub(crate) fn find_query<'a>(
	collection: &str,
	filter: &'a Filter,
	options: &'a FindOptions,
) -> QueryBuilder<'a, Postgres> {
	let mut builder = QueryBuilder::new("SELECT doc_id, doc FROM ");

	builder.push(schema::quote_ident(collection));

	for (position, clause) in filter.clauses.iter().enumerate() {
		builder.push(if position == 0 { " WHERE " } else { " AND " });

		match &clause.condition {
			Condition::Eq(expected) => {
				builder.push("doc->>");
				builder.push_bind(clause.field.as_str());
				builder.push(" = ");
				builder.push_bind(expected.as_str());
			},
			Condition::Range { gte, lte } => {
				let bounds = [(gte, " >= "), (lte, " <= ")];
				let mut first = true;

				for (bound, operator) in bounds {
					let Some(bound) = bound else {
						continue;
					};

					if !first {
						builder.push(" AND ");
					}

					first = false;

					push_range_bound(&mut builder, clause.field.as_str(), operator, *bound);
				}

				if first {
					builder.push("TRUE");
				}
			},
		}
	}

	for (position, spec) in options.sort.iter().enumerate() {
		builder.push(if position == 0 { " ORDER BY " } else { ", " });
		builder.push("(doc->>");
		builder.push_bind(spec.field.as_str());
		builder.push(") COLLATE \"C\"");
		builder.push(match spec.order {
			Order::Asc => " ASC NULLS FIRST",
			Order::Desc => " DESC NULLS LAST",
		});
	}

	builder
}

pub(crate) fn distinct_query<'a>(collection: &str, field: &'a str) -> QueryBuilder<'a, Postgres> {
	let mut builder = QueryBuilder::new("SELECT DISTINCT doc->");

	builder.push_bind(field);
	builder.push(" FROM ");
	builder.push(schema::quote_ident(collection));
	builder.push(" WHERE jsonb_typeof(doc->");
	builder.push_bind(field);
	builder.push(") IS DISTINCT FROM 'null'");
	builder.push(" AND doc ? ");
	builder.push_bind(field);

	builder
}

fn push_range_bound<'a>(
	builder: &mut QueryBuilder<'a, Postgres>,
	field: &'a str,
	operator: &str,
	bound: Scalar,
) {
	match bound {
		Scalar::Number(value) => {
			builder.push("(CASE WHEN jsonb_typeof(doc->");
			builder.push_bind(field);
			builder.push(") = 'number' THEN (doc->>");
			builder.push_bind(field);
			builder.push(")::float8 END)");
			builder.push(operator);
			builder.push_bind(value);
		},
		Scalar::Timestamp(value) => {
			builder.push("(CASE WHEN doc->>");
			builder.push_bind(field);
			builder.push(" ~ '");
			builder.push(RFC3339_PATTERN);
			builder.push("' THEN (doc->>");
			builder.push_bind(field);
			builder.push(")::timestamptz END)");
			builder.push(operator);
			builder.push_bind(value);
		},
	}
}
