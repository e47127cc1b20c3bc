use uasrc_storage::filter::{Clause, Condition, Filter, Scalar};

use crate::{endpoints::MeasurementEndpoint, normalize::MeasurementQuery};

/// Optional lower and upper bound of one range dimension, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
	pub lower: Option<T>,
	pub upper: Option<T>,
}
impl<T> Bounds<T> {
	pub fn map<U, F>(self, f: F) -> Bounds<U>
	where
		F: Fn(T) -> U,
	{
		Bounds { lower: self.lower.map(&f), upper: self.upper.map(&f) }
	}
}
impl<T> Default for Bounds<T> {
	fn default() -> Self {
		Self { lower: None, upper: None }
	}
}
impl Bounds<Scalar> {
	/// `[lower, upper]`, `[lower, ∞)`, `(-∞, upper]`, or no constraint at all.
	pub fn condition(self) -> Option<Condition> {
		match (self.lower, self.upper) {
			(Some(lower), Some(upper)) =>
				Some(Condition::Range { gte: Some(lower), lte: Some(upper) }),
			(Some(lower), None) => Some(Condition::Range { gte: Some(lower), lte: None }),
			(None, Some(upper)) => Some(Condition::Range { gte: None, lte: Some(upper) }),
			(None, None) => None,
		}
	}
}

/// Accumulates only the clauses whose inputs are present.
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
	clauses: Vec<Clause>,
}
impl FilterBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn equal(mut self, field: &str, value: Option<String>) -> Self {
		if let Some(value) = value {
			self.clauses.push(Clause { field: field.to_string(), condition: Condition::Eq(value) });
		}

		self
	}

	pub fn range(mut self, field: &str, bounds: Bounds<Scalar>) -> Self {
		if let Some(condition) = bounds.condition() {
			self.clauses.push(Clause { field: field.to_string(), condition });
		}

		self
	}

	pub fn build(self) -> Filter {
		Filter { clauses: self.clauses }
	}
}

impl MeasurementQuery {
	pub fn to_filter(&self, endpoint: &MeasurementEndpoint) -> Filter {
		let builder = self.equals.iter().fold(FilterBuilder::new(), |builder, (field, value)| {
			builder.equal(field, value.clone())
		});

		builder
			.range(endpoint.date.field, self.dates.map(Scalar::Timestamp))
			.range(endpoint.value.field, self.values.map(Scalar::Number))
			.build()
	}
}

#[cfg(test)]
mod tests {
	use time::{OffsetDateTime, macros::datetime};

	use super::*;
	use crate::endpoints::{CSM_MEASUREMENTS, SCRUTINIZER_MEASUREMENTS};

	const START: OffsetDateTime = datetime!(2021-01-01 00:00 UTC);
	const END: OffsetDateTime = datetime!(2021-02-01 00:00 UTC);

	fn query(dates: Bounds<OffsetDateTime>, values: Bounds<f64>) -> MeasurementQuery {
		MeasurementQuery {
			equals: vec![("variable_name", None), ("location_name", None)],
			dates,
			values,
		}
	}

	#[test]
	fn date_clause_follows_the_four_cases() {
		let cases = [
			(Some(START), Some(END), Some((Some(START), Some(END)))),
			(Some(START), None, Some((Some(START), None))),
			(None, Some(END), Some((None, Some(END)))),
			(None, None, None),
		];

		for (lower, upper, expected) in cases {
			let filter =
				query(Bounds { lower, upper }, Bounds::default()).to_filter(&CSM_MEASUREMENTS);
			let expected = expected.map(|(gte, lte)| Condition::Range {
				gte: gte.map(Scalar::Timestamp),
				lte: lte.map(Scalar::Timestamp),
			});

			assert_eq!(filter.clause("collected_on").cloned(), expected);
			assert_eq!(filter.clauses.len(), usize::from(expected.is_some()));
		}
	}

	#[test]
	fn value_clause_follows_the_four_cases() {
		let cases = [
			(Some(4.0), Some(8.0), Some((Some(4.0), Some(8.0)))),
			(Some(4.0), None, Some((Some(4.0), None))),
			(None, Some(8.0), Some((None, Some(8.0)))),
			(None, None, None),
		];

		for (lower, upper, expected) in cases {
			let filter = query(Bounds::default(), Bounds { lower, upper })
				.to_filter(&SCRUTINIZER_MEASUREMENTS);
			let expected = expected.map(|(gte, lte)| Condition::Range {
				gte: gte.map(Scalar::Number),
				lte: lte.map(Scalar::Number),
			});

			assert_eq!(filter.clause("value").cloned(), expected);
			assert_eq!(filter.clauses.len(), usize::from(expected.is_some()));
		}
	}

	#[test]
	fn absent_equalities_add_no_clause() {
		let filter = query(Bounds::default(), Bounds::default()).to_filter(&CSM_MEASUREMENTS);

		assert!(filter.is_empty());
	}

	#[test]
	fn present_equalities_add_one_clause_each() {
		let query = MeasurementQuery {
			equals: vec![
				("variable_name", Some("soil_moisture".to_string())),
				("location_name", None),
			],
			dates: Bounds::default(),
			values: Bounds::default(),
		};
		let filter = query.to_filter(&CSM_MEASUREMENTS);

		assert_eq!(
			filter.clauses,
			vec![Clause {
				field: "variable_name".to_string(),
				condition: Condition::Eq("soil_moisture".to_string()),
			}]
		);
	}

	#[test]
	fn scrutinizer_dates_target_collection_date() {
		let filter = query(Bounds { lower: Some(START), upper: None }, Bounds::default())
			.to_filter(&SCRUTINIZER_MEASUREMENTS);

		assert!(filter.clause("collection_date").is_some());
		assert!(filter.clause("collected_on").is_none());
	}

	#[test]
	fn inverted_bounds_are_kept() {
		let condition = Bounds { lower: Some(Scalar::Number(8.0)), upper: Some(Scalar::Number(4.0)) }
			.condition();

		assert_eq!(
			condition,
			Some(Condition::Range {
				gte: Some(Scalar::Number(8.0)),
				lte: Some(Scalar::Number(4.0)),
			})
		);
	}
}
