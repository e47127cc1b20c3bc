//! Free-form date parsing for query parameters.
//!
//! Accepts absolute dates and date-times, the keywords `now`, `today`, `yesterday` and `tomorrow`,
//! and offsets such as `3 days ago`, `in 2 weeks`, `+6h` or `-1 week`. Every result is an instant
//! in UTC with the sub-second part dropped.

use std::sync::LazyLock;

use regex::Regex;
use time::{
	Date, Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset,
	format_description::well_known::Rfc3339, macros::format_description,
};

static RELATIVE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"^(?:(?P<sign>[+-])\s*|(?P<in>in)\s+)?(?P<count>\d{1,9})\s*(?P<unit>[a-z]+)(?:\s+(?P<ago>ago))?$",
	)
	.expect("Relative date pattern must compile.")
});

/// Parses `raw` relative to `now`. Returns `None` for empty or unrecognized input.
pub fn parse(raw: &str, now: OffsetDateTime) -> Option<OffsetDateTime> {
	let trimmed = raw.trim();

	if trimmed.is_empty() {
		return None;
	}

	let now = now.to_offset(UtcOffset::UTC);
	let lowered = trimmed.to_ascii_lowercase();
	let parsed =
		keyword(&lowered, now).or_else(|| relative(&lowered, now)).or_else(|| absolute(trimmed))?;

	parsed.to_offset(UtcOffset::UTC).replace_nanosecond(0).ok()
}

fn keyword(input: &str, now: OffsetDateTime) -> Option<OffsetDateTime> {
	let today = now.date();
	let day = match input {
		"now" => return Some(now),
		"today" => today,
		"yesterday" => today.previous_day()?,
		"tomorrow" => today.next_day()?,
		_ => return None,
	};

	Some(day.midnight().assume_utc())
}

fn relative(input: &str, now: OffsetDateTime) -> Option<OffsetDateTime> {
	let captures = RELATIVE.captures(input)?;
	let count: i64 = captures.name("count")?.as_str().parse().ok()?;
	let unit_seconds = unit_seconds(captures.name("unit")?.as_str())?;
	let ago = captures.name("ago").is_some();
	let sign = captures.name("sign").map(|sign| sign.as_str());
	let forward = match (sign, captures.name("in").is_some(), ago) {
		(None, false, true) => false,
		(None, true, false) | (Some("+"), false, false) => true,
		(Some("-"), false, false) => false,
		_ => return None,
	};
	let offset = Duration::seconds(count.checked_mul(unit_seconds)?);

	if forward { now.checked_add(offset) } else { now.checked_sub(offset) }
}

fn unit_seconds(unit: &str) -> Option<i64> {
	let seconds = match unit {
		"s" | "sec" | "secs" | "second" | "seconds" => 1,
		"min" | "mins" | "minute" | "minutes" => 60,
		"h" | "hr" | "hrs" | "hour" | "hours" => 3_600,
		"d" | "day" | "days" => 86_400,
		"w" | "wk" | "wks" | "week" | "weeks" => 604_800,
		_ => return None,
	};

	Some(seconds)
}

fn absolute(input: &str) -> Option<OffsetDateTime> {
	if let Ok(value) = OffsetDateTime::parse(input, &Rfc3339) {
		return Some(value);
	}

	let date_times = [
		format_description!("[year]-[month padding:none]-[day padding:none]T[hour]:[minute]:[second]"),
		format_description!("[year]-[month padding:none]-[day padding:none]T[hour]:[minute]:[second].[subsecond]"),
		format_description!("[year]-[month padding:none]-[day padding:none]T[hour]:[minute]"),
		format_description!("[year]-[month padding:none]-[day padding:none] [hour]:[minute]:[second]"),
		format_description!("[year]-[month padding:none]-[day padding:none] [hour]:[minute]:[second].[subsecond]"),
		format_description!("[year]-[month padding:none]-[day padding:none] [hour]:[minute]"),
	];

	for format in date_times {
		if let Ok(value) = PrimitiveDateTime::parse(input, format) {
			return Some(value.assume_utc());
		}
	}

	let dates = [
		format_description!("[year]-[month padding:none]-[day padding:none]"),
		format_description!("[year]/[month padding:none]/[day padding:none]"),
		format_description!("[month padding:none]/[day padding:none]/[year]"),
	];

	for format in dates {
		if let Ok(value) = Date::parse(input, format) {
			return Some(value.midnight().assume_utc());
		}
	}

	None
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use super::*;

	const NOW: OffsetDateTime = datetime!(2024-03-10 15:30:45.250 UTC);

	#[test]
	fn empty_and_blank_input_is_absent() {
		assert_eq!(parse("", NOW), None);
		assert_eq!(parse("   ", NOW), None);
	}

	#[test]
	fn unparsable_input_is_absent() {
		for raw in ["not-a-date", "2021-13-01", "3 fortnights ago", "in 3 days ago", "soon"] {
			assert_eq!(parse(raw, NOW), None, "{raw} should not parse");
		}
	}

	#[test]
	fn calendar_dates_are_midnight_utc() {
		let expected = Some(datetime!(2021-01-05 00:00 UTC));

		assert_eq!(parse("2021-01-05", NOW), expected);
		assert_eq!(parse("2021/01/05", NOW), expected);
		assert_eq!(parse("01/05/2021", NOW), expected);
		assert_eq!(parse("  2021-01-05 ", NOW), expected);
		assert_eq!(parse("2021-1-5", NOW), expected);
		assert_eq!(parse("2021/1/5", NOW), expected);
		assert_eq!(parse("1/5/2021", NOW), expected);
	}

	#[test]
	fn date_times_are_normalized_to_utc() {
		assert_eq!(parse("2021-01-05T10:20:30Z", NOW), Some(datetime!(2021-01-05 10:20:30 UTC)));
		assert_eq!(
			parse("2021-01-05T10:20:30+02:00", NOW),
			Some(datetime!(2021-01-05 08:20:30 UTC))
		);
		assert_eq!(parse("2021-01-05 10:20", NOW), Some(datetime!(2021-01-05 10:20 UTC)));
		assert_eq!(parse("2021-01-05T10:20:30", NOW), Some(datetime!(2021-01-05 10:20:30 UTC)));
		assert_eq!(parse("2021-1-5 10:20", NOW), Some(datetime!(2021-01-05 10:20 UTC)));
	}

	#[test]
	fn sub_second_precision_is_dropped() {
		assert_eq!(
			parse("2021-01-05T10:20:30.987Z", NOW),
			Some(datetime!(2021-01-05 10:20:30 UTC))
		);
		assert_eq!(parse("now", NOW), Some(datetime!(2024-03-10 15:30:45 UTC)));
	}

	#[test]
	fn keywords_resolve_against_now() {
		assert_eq!(parse("today", NOW), Some(datetime!(2024-03-10 00:00 UTC)));
		assert_eq!(parse("Yesterday", NOW), Some(datetime!(2024-03-09 00:00 UTC)));
		assert_eq!(parse("TOMORROW", NOW), Some(datetime!(2024-03-11 00:00 UTC)));
	}

	#[test]
	fn keywords_use_the_utc_calendar_day() {
		let late_evening_west = datetime!(2024-03-10 22:00 -05:00);

		assert_eq!(parse("today", late_evening_west), Some(datetime!(2024-03-11 00:00 UTC)));
	}

	#[test]
	fn relative_offsets() {
		assert_eq!(parse("3 days ago", NOW), Some(datetime!(2024-03-07 15:30:45 UTC)));
		assert_eq!(parse("1 week ago", NOW), Some(datetime!(2024-03-03 15:30:45 UTC)));
		assert_eq!(parse("in 2 hours", NOW), Some(datetime!(2024-03-10 17:30:45 UTC)));
		assert_eq!(parse("+6h", NOW), Some(datetime!(2024-03-10 21:30:45 UTC)));
		assert_eq!(parse("-90 min", NOW), Some(datetime!(2024-03-10 14:00:45 UTC)));
		assert_eq!(parse("30s ago", NOW), Some(datetime!(2024-03-10 15:30:15 UTC)));
	}

	#[test]
	fn relative_offsets_reject_mixed_direction() {
		assert_eq!(parse("+3 days ago", NOW), None);
		assert_eq!(parse("in -3 days", NOW), None);
		assert_eq!(parse("3 days", NOW), None);
	}
}
