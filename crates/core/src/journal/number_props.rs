//! Property-based tests for journal entry number generation.

use proptest::prelude::*;

use super::number::{format_entry_number, next_entry_number, parse_entry_number};

fn year_strategy() -> impl Strategy<Value = i32> {
    1970..=9999i32
}

fn sequence_strategy() -> impl Strategy<Value = u32> {
    1..=99_998u32
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* year and sequence, formatting then parsing
    /// returns the original pair.
    #[test]
    fn prop_format_parse_round_trip(
        year in year_strategy(),
        sequence in sequence_strategy(),
    ) {
        let number = format_entry_number(year, sequence);
        let parsed = parse_entry_number(&number);
        prop_assert_eq!(parsed, Some((year, sequence)));
    }

    /// *For any* existing number in the same year, the next number
    /// increments the sequence by exactly one.
    #[test]
    fn prop_next_increments_sequence(
        year in year_strategy(),
        sequence in sequence_strategy(),
    ) {
        let latest = format_entry_number(year, sequence);
        let next = next_entry_number(year, Some(&latest));
        prop_assert_eq!(parse_entry_number(&next), Some((year, sequence + 1)));
    }

    /// *For any* latest number from a different year, the sequence
    /// restarts at one.
    #[test]
    fn prop_sequence_restarts_per_year(
        year in year_strategy(),
        other_year in year_strategy(),
        sequence in sequence_strategy(),
    ) {
        prop_assume!(year != other_year);
        let latest = format_entry_number(other_year, sequence);
        let next = next_entry_number(year, Some(&latest));
        prop_assert_eq!(parse_entry_number(&next), Some((year, 1)));
    }

    /// *For any* generated number, the year embedded in the number
    /// matches the requested year.
    #[test]
    fn prop_next_preserves_year(
        year in year_strategy(),
        latest in proptest::option::of(sequence_strategy()),
    ) {
        let latest_number = latest.map(|seq| format_entry_number(year, seq));
        let next = next_entry_number(year, latest_number.as_deref());
        let (parsed_year, _) = parse_entry_number(&next).unwrap();
        prop_assert_eq!(parsed_year, year);
    }
}
