//! Entry number generation.
//!
//! Entry numbers are `JE-{year}-{sequence:05}`, scoped per fiscal year
//! and strictly increasing within it. The next number is derived by
//! parsing the numeric suffix of the latest existing number and
//! incrementing; concurrent creation is resolved by a store-level
//! uniqueness constraint with retry.

/// Prefix for generated entry numbers.
pub const ENTRY_NUMBER_PREFIX: &str = "JE";

/// Formats an entry number from a year and a sequence.
#[must_use]
pub fn format_entry_number(year: i32, sequence: u32) -> String {
    format!("{ENTRY_NUMBER_PREFIX}-{year}-{sequence:05}")
}

/// Parses an entry number back into its year and sequence.
///
/// Returns `None` for anything that does not follow the
/// `JE-{year}-{sequence}` shape.
#[must_use]
pub fn parse_entry_number(number: &str) -> Option<(i32, u32)> {
    let rest = number.strip_prefix(ENTRY_NUMBER_PREFIX)?.strip_prefix('-')?;
    let (year_part, sequence_part) = rest.split_once('-')?;
    let year: i32 = year_part.parse().ok()?;
    let sequence: u32 = sequence_part.parse().ok()?;
    Some((year, sequence))
}

/// Derives the next entry number for a year from the latest existing one.
///
/// A latest number from another year (or an unparseable one) never
/// continues the sequence; the year then starts at 1.
#[must_use]
pub fn next_entry_number(year: i32, latest: Option<&str>) -> String {
    let next_sequence = latest
        .and_then(parse_entry_number)
        .filter(|(latest_year, _)| *latest_year == year)
        .map_or(1, |(_, sequence)| sequence.saturating_add(1));

    format_entry_number(year, next_sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_format() {
        assert_eq!(format_entry_number(2026, 1), "JE-2026-00001");
        assert_eq!(format_entry_number(2026, 123), "JE-2026-00123");
        assert_eq!(format_entry_number(2026, 123_456), "JE-2026-123456");
    }

    #[rstest]
    #[case("JE-2026-00001", Some((2026, 1)))]
    #[case("JE-2026-00042", Some((2026, 42)))]
    #[case("JE-2025-99999", Some((2025, 99_999)))]
    #[case("JE-2026-123456", Some((2026, 123_456)))]
    #[case("JE-2026", None)]
    #[case("XX-2026-00001", None)]
    #[case("JE-abcd-00001", None)]
    #[case("JE-2026-abc", None)]
    #[case("", None)]
    fn test_parse(#[case] input: &str, #[case] expected: Option<(i32, u32)>) {
        assert_eq!(parse_entry_number(input), expected);
    }

    #[test]
    fn test_next_starts_at_one() {
        assert_eq!(next_entry_number(2026, None), "JE-2026-00001");
    }

    #[test]
    fn test_next_increments_latest() {
        assert_eq!(
            next_entry_number(2026, Some("JE-2026-00007")),
            "JE-2026-00008"
        );
    }

    #[test]
    fn test_next_ignores_other_year() {
        assert_eq!(
            next_entry_number(2026, Some("JE-2025-00099")),
            "JE-2026-00001"
        );
    }

    #[test]
    fn test_next_ignores_garbage() {
        assert_eq!(
            next_entry_number(2026, Some("not-a-number")),
            "JE-2026-00001"
        );
    }
}
