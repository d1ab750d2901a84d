//! Property-based tests for the range expression parser
//!
//! Whitespace is insignificant, bare ids are one-element spans, and every
//! malformed token is rejected rather than guessed at.

use gentk_query::core::{parse_range_expression, split_name_list, RangeParseError, Span};
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

/// A single token: bare id or hyphen range
fn arb_token() -> impl Strategy<Value = (u64, Option<u64>)> {
    (0u64..10_000_000, prop::option::of(0u64..10_000_000))
}

fn render_token(token: &(u64, Option<u64>)) -> String {
    match token {
        (a, Some(b)) => format!("{}-{}", a, b),
        (a, None) => a.to_string(),
    }
}

/// Whitespace runs to sprinkle between characters
fn arb_padding() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![Just(' '), Just('\t'), Just('\n')], 0..3)
        .prop_map(|chars| chars.into_iter().collect())
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Each token becomes one span, in input order
    #[test]
    fn prop_tokens_map_to_spans(tokens in prop::collection::vec(arb_token(), 1..8)) {
        let expr = tokens.iter().map(render_token).collect::<Vec<_>>().join(",");
        let spans = parse_range_expression(&expr).unwrap();

        prop_assert_eq!(spans.len(), tokens.len());
        for (span, (a, b)) in spans.iter().zip(&tokens) {
            prop_assert_eq!(*span, Span::new(*a, b.unwrap_or(*a)));
        }
    }

    /// Inserting whitespace anywhere does not change the result
    #[test]
    fn prop_whitespace_insensitive(
        tokens in prop::collection::vec(arb_token(), 1..6),
        pads in prop::collection::vec(arb_padding(), 64),
    ) {
        let expr = tokens.iter().map(render_token).collect::<Vec<_>>().join(",");
        let padded: String = expr
            .chars()
            .enumerate()
            .map(|(i, c)| format!("{}{}", pads[i % pads.len()], c))
            .collect::<String>()
            + &pads[0];

        prop_assert_eq!(
            parse_range_expression(&padded).unwrap(),
            parse_range_expression(&expr).unwrap()
        );
    }

    /// "a-b", "a - b" and " a-b " all parse alike
    #[test]
    fn prop_hyphen_spacing(a in 0u64..1_000_000, b in 0u64..1_000_000) {
        let tight = parse_range_expression(&format!("{}-{}", a, b)).unwrap();
        prop_assert_eq!(&tight, &parse_range_expression(&format!("{} - {}", a, b)).unwrap());
        prop_assert_eq!(&tight, &parse_range_expression(&format!(" {}-{} ", a, b)).unwrap());
        prop_assert_eq!(tight, vec![Span::new(a, b)]);
    }

    /// Any token with a non-digit character is rejected
    #[test]
    fn prop_non_numeric_rejected(prefix in 0u64..1000, junk in "[a-zA-Z+.]{1,4}") {
        let expr = format!("{},{}{}", prefix, prefix, junk);
        prop_assert!(
            matches!(
                parse_range_expression(&expr),
                Err(RangeParseError::InvalidNumber { .. })
            ),
            "'{}' should not parse",
            expr
        );
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_segment_expression() {
    assert_eq!(
        parse_range_expression("7,8-10").unwrap(),
        vec![Span::new(7, 7), Span::new(8, 10)]
    );
    assert_eq!(
        parse_range_expression("7 ,8, 9 -10 ").unwrap(),
        vec![Span::new(7, 7), Span::new(8, 8), Span::new(9, 10)]
    );
}

#[test]
fn test_inverted_range_kept() {
    assert_eq!(parse_range_expression("10-8").unwrap(), vec![Span::new(10, 8)]);
}

#[test]
fn test_malformed_expressions() {
    assert_eq!(parse_range_expression("   "), Err(RangeParseError::Empty));
    assert_eq!(
        parse_range_expression("1,,2"),
        Err(RangeParseError::EmptyToken { position: 1 })
    );
    assert!(matches!(
        parse_range_expression("1-2-3"),
        Err(RangeParseError::TooManyHyphens { .. })
    ));
    assert!(matches!(
        parse_range_expression("5-"),
        Err(RangeParseError::InvalidNumber { .. })
    ));
    assert!(matches!(
        parse_range_expression("-5"),
        Err(RangeParseError::InvalidNumber { .. })
    ));
    assert!(matches!(
        parse_range_expression("99999999999999999999999"),
        Err(RangeParseError::InvalidNumber { .. })
    ));
}

#[test]
fn test_name_list() {
    assert_eq!(split_name_list(" Btbd35f23 ,, Btbd35f24"), vec!["Btbd35f23", "Btbd35f24"]);
    assert!(split_name_list(" , ").is_empty());
}
