use serde_json::Value;
use time::OffsetDateTime;

use uasrc_storage::{
	document::Document,
	filter::{FindOptions, Projection},
};

use crate::{
	Params, Result, Row, UasrcService,
	endpoints::{CSM_MEASUREMENTS, Identity, MeasurementEndpoint, SCRUTINIZER_MEASUREMENTS},
	normalize::MeasurementQuery,
};

impl UasrcService {
	pub async fn csm_measurements(&self, params: &Params) -> Result<Vec<Row>> {
		self.measurements_at(&CSM_MEASUREMENTS, params, OffsetDateTime::now_utc()).await
	}

	pub async fn scrutinizer_measurements(&self, params: &Params) -> Result<Vec<Row>> {
		self.measurements_at(&SCRUTINIZER_MEASUREMENTS, params, OffsetDateTime::now_utc()).await
	}

	/// Runs a measurement endpoint with relative dates resolved against `now`.
	pub async fn measurements_at(
		&self,
		endpoint: &MeasurementEndpoint,
		params: &Params,
		now: OffsetDateTime,
	) -> Result<Vec<Row>> {
		let filter = MeasurementQuery::from_params(endpoint, params, now).to_filter(endpoint);
		let options = FindOptions {
			projection: Projection::new(endpoint.projection.iter().copied()),
			sort: Vec::new(),
		};
		let collection = endpoint.source.collection(&self.collections);
		let documents = self.store.find(collection, &filter, &options).await?;

		tracing::debug!(
			endpoint = endpoint.path,
			clauses = filter.clauses.len(),
			rows = documents.len(),
			"Measurement query finished."
		);

		Ok(documents.into_iter().map(|document| shape_row(document, endpoint.identity)).collect())
	}
}

pub fn shape_row(document: Document, identity: Identity) -> Row {
	let Document { id, mut body } = document;

	body.remove("_id");

	if let Identity::ExposeAs(key) = identity {
		body.insert(key.to_string(), Value::String(id.to_string()));
	}

	body
}
