//! One declarative entry per HTTP endpoint: which collection it reads, how query parameters map
//! onto document fields, and which fields it returns.

use uasrc_config::Collections;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
	Csm,
	CsmVariables,
	Scrutinizer,
	ScrutinizerVariables,
}
impl Source {
	pub fn collection(self, collections: &Collections) -> &str {
		match self {
			Self::Csm => collections.csm.as_str(),
			Self::CsmVariables => collections.csm_variables.as_str(),
			Self::Scrutinizer => collections.scrutinizer.as_str(),
			Self::ScrutinizerVariables => collections.scrutinizer_variables.as_str(),
		}
	}
}

/// How the internal document identifier appears in response rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
	Strip,
	/// Exposed as a string under the given key.
	ExposeAs(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamField {
	pub param: &'static str,
	pub field: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeParams {
	pub field: &'static str,
	pub lower: &'static str,
	pub upper: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurementEndpoint {
	pub path: &'static str,
	pub source: Source,
	pub equality: &'static [ParamField],
	pub date: RangeParams,
	pub value: RangeParams,
	pub projection: &'static [&'static str],
	pub identity: Identity,
}

/// Reads a descriptor collection sorted ascending by `sort_by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorEndpoint {
	pub path: &'static str,
	pub source: Source,
	pub projection: &'static [&'static str],
	pub sort_by: &'static str,
}

/// Lists the distinct values of one field of a measurement collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistinctEndpoint {
	pub path: &'static str,
	pub source: Source,
	pub field: &'static str,
}

pub const CSM_MEASUREMENTS: MeasurementEndpoint = MeasurementEndpoint {
	path: "/data/csm",
	source: Source::Csm,
	equality: &[
		ParamField { param: "variable_name", field: "variable_name" },
		ParamField { param: "location_name", field: "location_name" },
	],
	date: RangeParams { field: "collected_on", lower: "start_date", upper: "end_date" },
	value: RangeParams { field: "value", lower: "val_min", upper: "val_max" },
	projection: &["location_name", "variable_name", "collected_on", "value"],
	identity: Identity::Strip,
};

pub const SCRUTINIZER_MEASUREMENTS: MeasurementEndpoint = MeasurementEndpoint {
	path: "/scrutinizer/measurements",
	source: Source::Scrutinizer,
	equality: &[
		ParamField { param: "variable", field: "variable_name" },
		ParamField { param: "location_name", field: "location_name" },
		ParamField { param: "location_type", field: "location_type" },
	],
	date: RangeParams { field: "collection_date", lower: "start_date", upper: "end_date" },
	value: RangeParams { field: "value", lower: "min_value", upper: "max_value" },
	projection: &[
		"location_name",
		"location_type",
		"variable_name",
		"variable_desc",
		"value",
		"medium",
		"collected_on",
		"source",
		"unit",
	],
	identity: Identity::ExposeAs("id"),
};

pub const CSM_VARIABLES: DescriptorEndpoint = DescriptorEndpoint {
	path: "/data/csm/variables",
	source: Source::CsmVariables,
	projection: &["name", "desc"],
	sort_by: "name",
};

pub const SCRUTINIZER_VARIABLES: DescriptorEndpoint = DescriptorEndpoint {
	path: "/scrutinizer/variables",
	source: Source::ScrutinizerVariables,
	projection: &["name", "desc", "source", "unit"],
	sort_by: "name",
};

pub const CSM_LOCATIONS: DistinctEndpoint =
	DistinctEndpoint { path: "/data/csm/locations", source: Source::Csm, field: "location_name" };

pub const SCRUTINIZER_LOCATIONS: DistinctEndpoint = DistinctEndpoint {
	path: "/scrutinizer/locations",
	source: Source::Scrutinizer,
	field: "location_name",
};
