use std::collections::HashMap;

use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
	dates,
	endpoints::{MeasurementEndpoint, RangeParams},
	filter::Bounds,
};

/// Raw query parameters as received. Unknown names are carried but never read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Params(HashMap<String, String>);
impl Params {
	pub fn from_pairs<I, K, V>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self(pairs.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
	}

	/// The raw value, with an empty string treated as absent.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str).filter(|value| !value.is_empty())
	}

	pub fn text(&self, name: &str) -> Option<String> {
		self.get(name).map(str::to_string)
	}

	pub fn date(&self, name: &str, now: OffsetDateTime) -> Option<OffsetDateTime> {
		let raw = self.get(name)?;
		let parsed = dates::parse(raw, now);

		if parsed.is_none() {
			tracing::warn!(param = name, value = raw, "Ignoring unparsable date parameter.");
		}

		parsed
	}

	/// Non-finite and unparsable numbers are treated as absent.
	pub fn number(&self, name: &str) -> Option<f64> {
		let raw = self.get(name)?;
		let parsed = raw.trim().parse::<f64>().ok().filter(|value| value.is_finite());

		if parsed.is_none() {
			tracing::warn!(param = name, value = raw, "Ignoring unparsable numeric parameter.");
		}

		parsed
	}
}

/// Normalized filter values for one measurement request.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementQuery {
	/// `(field, value)` per equality parameter, in endpoint order.
	pub equals: Vec<(&'static str, Option<String>)>,
	pub dates: Bounds<OffsetDateTime>,
	pub values: Bounds<f64>,
}
impl MeasurementQuery {
	pub fn from_params(
		endpoint: &MeasurementEndpoint,
		params: &Params,
		now: OffsetDateTime,
	) -> Self {
		let equals =
			endpoint.equality.iter().map(|pair| (pair.field, params.text(pair.param))).collect();

		Self {
			equals,
			dates: bounds(&endpoint.date, |name| params.date(name, now)),
			values: bounds(&endpoint.value, |name| params.number(name)),
		}
	}
}

fn bounds<T, F>(range: &RangeParams, read: F) -> Bounds<T>
where
	F: Fn(&str) -> Option<T>,
{
	Bounds { lower: read(range.lower), upper: read(range.upper) }
}
