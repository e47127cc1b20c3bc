use serde_json::Map;

use uasrc_storage::filter::{Filter, FindOptions, Projection, SortSpec};

use crate::{
	Result, Row, UasrcService,
	endpoints::{
		CSM_LOCATIONS, CSM_VARIABLES, DescriptorEndpoint, DistinctEndpoint, SCRUTINIZER_LOCATIONS,
		SCRUTINIZER_VARIABLES,
	},
};

impl UasrcService {
	pub async fn csm_variables(&self) -> Result<Vec<Row>> {
		self.descriptors(&CSM_VARIABLES).await
	}

	pub async fn csm_locations(&self) -> Result<Vec<Row>> {
		self.distinct_rows(&CSM_LOCATIONS).await
	}

	pub async fn scrutinizer_variables(&self) -> Result<Vec<Row>> {
		self.descriptors(&SCRUTINIZER_VARIABLES).await
	}

	pub async fn scrutinizer_locations(&self) -> Result<Vec<Row>> {
		self.distinct_rows(&SCRUTINIZER_LOCATIONS).await
	}

	/// Reads an authored descriptor collection. Identical rows collapse to one.
	pub async fn descriptors(&self, endpoint: &DescriptorEndpoint) -> Result<Vec<Row>> {
		// Tie-breaking on every projected field keeps identical rows adjacent.
		let tie_breakers = endpoint.projection.iter().filter(|field| **field != endpoint.sort_by);
		let options = FindOptions {
			projection: Projection::new(endpoint.projection.iter().copied()),
			sort: std::iter::once(&endpoint.sort_by)
				.chain(tie_breakers)
				.map(|field| SortSpec::asc(*field))
				.collect(),
		};
		let collection = endpoint.source.collection(&self.collections);
		let documents = self.store.find(collection, &Filter::default(), &options).await?;
		let mut rows: Vec<Row> = Vec::with_capacity(documents.len());

		for document in documents {
			if rows.last() != Some(&document.body) {
				rows.push(document.body);
			}
		}

		Ok(rows)
	}

	/// Derives a descriptor list from the distinct values of a measurement field.
	pub async fn distinct_rows(&self, endpoint: &DistinctEndpoint) -> Result<Vec<Row>> {
		let collection = endpoint.source.collection(&self.collections);
		let values = self.store.distinct(collection, endpoint.field).await?;

		Ok(values
			.into_iter()
			.map(|value| {
				let mut row = Map::new();

				row.insert(endpoint.field.to_string(), value);

				row
			})
			.collect())
	}
}
