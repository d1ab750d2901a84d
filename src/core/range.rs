//! Range expression parser
//!
//! Query parameters address ids and positions with a small syntax:
//! comma-separated tokens, each either a bare integer `n` or a hyphen
//! range `a-b`, e.g. `"7,8-10"`. Whitespace is insignificant anywhere.

use crate::core::error::{RangeParseError, RangeResult};
use crate::core::model::Span;

/// Parse a range expression into one span per token, in input order.
///
/// A bare `n` yields `n-n`. Inverted ranges (`10-8`) are returned as given.
///
/// # Examples
/// ```
/// use gentk_query::core::{parse_range_expression, Span};
/// let spans = parse_range_expression("7, 8 - 10").unwrap();
/// assert_eq!(spans, vec![Span::new(7, 7), Span::new(8, 10)]);
/// ```
pub fn parse_range_expression(expr: &str) -> RangeResult<Vec<Span>> {
    let compact: String = expr.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(RangeParseError::Empty);
    }

    compact
        .split(',')
        .enumerate()
        .map(|(position, token)| parse_token(position, token))
        .collect()
}

fn parse_token(position: usize, token: &str) -> RangeResult<Span> {
    if token.is_empty() {
        return Err(RangeParseError::EmptyToken { position });
    }

    let mut bounds = token.split('-');
    let start = parse_bound(token, bounds.next())?;
    let end = match bounds.next() {
        Some(raw) => parse_bound(token, Some(raw))?,
        None => start,
    };
    if bounds.next().is_some() {
        return Err(RangeParseError::TooManyHyphens {
            token: token.to_string(),
        });
    }

    Ok(Span::new(start, end))
}

fn parse_bound(token: &str, raw: Option<&str>) -> RangeResult<u64> {
    // `str::parse::<u64>` accepts a leading '+', which is not part of the syntax
    match raw {
        Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => digits
            .parse()
            .map_err(|_| RangeParseError::InvalidNumber {
                token: token.to_string(),
            }),
        _ => Err(RangeParseError::InvalidNumber {
            token: token.to_string(),
        }),
    }
}

/// Split a comma-separated name list, trimming whitespace and dropping
/// empty entries. Names keep their input order; duplicates are kept.
pub fn split_name_list(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_id() {
        assert_eq!(parse_range_expression("8").unwrap(), vec![Span::new(8, 8)]);
    }

    #[test]
    fn test_mixed_list() {
        let spans = parse_range_expression("7,8-10").unwrap();
        assert_eq!(spans, vec![Span::new(7, 7), Span::new(8, 10)]);
    }

    #[test]
    fn test_whitespace_inside_tokens() {
        let spans = parse_range_expression("7 ,8, 9 -10 ").unwrap();
        assert_eq!(spans, vec![Span::new(7, 7), Span::new(8, 8), Span::new(9, 10)]);

        let spans = parse_range_expression("30 76 875-3078817").unwrap();
        assert_eq!(spans, vec![Span::new(3_076_875, 3_078_817)]);
    }

    #[test]
    fn test_inverted_range_passes_through() {
        assert_eq!(parse_range_expression("10-8").unwrap(), vec![Span::new(10, 8)]);
    }

    #[test]
    fn test_empty_expression() {
        assert_eq!(parse_range_expression("  "), Err(RangeParseError::Empty));
    }

    #[test]
    fn test_empty_token() {
        assert_eq!(
            parse_range_expression("7,,9"),
            Err(RangeParseError::EmptyToken { position: 1 })
        );
        assert_eq!(
            parse_range_expression("7,"),
            Err(RangeParseError::EmptyToken { position: 1 })
        );
    }

    #[test]
    fn test_non_numeric_token() {
        assert_eq!(
            parse_range_expression("7,abc"),
            Err(RangeParseError::InvalidNumber { token: "abc".to_string() })
        );
        assert_eq!(
            parse_range_expression("8-"),
            Err(RangeParseError::InvalidNumber { token: "8-".to_string() })
        );
        assert_eq!(
            parse_range_expression("+8"),
            Err(RangeParseError::InvalidNumber { token: "+8".to_string() })
        );
    }

    #[test]
    fn test_extra_hyphen() {
        assert_eq!(
            parse_range_expression("1-2-3"),
            Err(RangeParseError::TooManyHyphens { token: "1-2-3".to_string() })
        );
    }

    #[test]
    fn test_split_name_list() {
        assert_eq!(split_name_list(" Btbd35f23 , ,Btbd35f24"), vec!["Btbd35f23", "Btbd35f24"]);
        assert!(split_name_list("").is_empty());
    }
}
