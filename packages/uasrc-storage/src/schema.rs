use uasrc_config::Collections;

const MEASUREMENT_INDEXES: [&str; 3] = ["location_name", "variable_name", "location_type"];
const DESCRIPTOR_INDEXES: [&str; 1] = ["name"];

pub fn render_schema(collections: &Collections) -> String {
	let mut out = String::new();

	for table in [collections.csm.as_str(), collections.scrutinizer.as_str()] {
		push_collection(&mut out, table, &MEASUREMENT_INDEXES);
	}
	for table in [collections.csm_variables.as_str(), collections.scrutinizer_variables.as_str()] {
		push_collection(&mut out, table, &DESCRIPTOR_INDEXES);
	}

	out
}

pub fn quote_ident(name: &str) -> String {
	format!("\"{}\"", name.replace('"', "\"\""))
}

fn push_collection(out: &mut String, table: &str, indexed: &[&str]) {
	let quoted = quote_ident(table);

	out.push_str(&format!(
		"\
CREATE TABLE IF NOT EXISTS {quoted} (
\tdoc_id uuid PRIMARY KEY,
\tdoc jsonb NOT NULL CHECK (jsonb_typeof(doc) = 'object')
);
"
	));

	for field in indexed {
		let index = quote_ident(&format!("{table}_{field}_idx"));

		out.push_str(&format!(
			"CREATE INDEX IF NOT EXISTS {index} ON {quoted} ((doc->>'{field}'));\n"
		));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn renders_every_collection() {
		let sql = render_schema(&Collections::default());

		for table in ["csm", "csm_variables", "scrutinizer", "scrutinizer_variables"] {
			assert!(sql.contains(&format!("CREATE TABLE IF NOT EXISTS \"{table}\" (")));
		}

		assert!(sql.contains(
			"CREATE INDEX IF NOT EXISTS \"csm_location_name_idx\" ON \"csm\" ((doc->>'location_name'));"
		));
		assert!(sql.contains(
			"CREATE INDEX IF NOT EXISTS \"scrutinizer_variables_name_idx\" ON \"scrutinizer_variables\" ((doc->>'name'));"
		));
	}

	#[test]
	fn quotes_identifiers() {
		assert_eq!(quote_ident("csm"), "\"csm\"");
		assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
	}
}
