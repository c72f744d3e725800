//! chumsky grammar for the portable filter language.
//!
//! The language is a small subset of SQL WHERE expressions:
//!
//! - comparisons: `year >= 2020`, `country == 'BG'`, `city != "Sofia"`
//! - membership: `genre in ['comedy', 'drama']`, `city not in ['Sofia']`
//! - boolean connectives: `&&`/`AND`, `||`/`OR`, prefix `NOT`
//! - grouping: `(year >= 2020 || country == 'BG') && city != 'Sofia'`
//!
//! Keywords are case-insensitive. `AND` binds tighter than `OR`; chains
//! are left-associative; `NOT` binds tightest.

use chumsky::extra;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;

use crate::ast::{Expression, ExpressionType, FilterValue, Group, Key, Operand};

/// Extra type for parsers - uses Rich errors for better messages
pub type Extra<'src> = extra::Err<Rich<'src, char>>;

// ============================================================================
// Primitive parsers
// ============================================================================

/// Parser for identifiers: alphanumeric, underscore, and dots for nesting
fn ident<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    any()
        .filter(|c: &char| c.is_alphanumeric() || *c == '_' || *c == '.')
        .repeated()
        .at_least(1)
        .to_slice()
        .map(|s: &str| s.to_string())
        .labelled("identifier")
}

/// Case-insensitive keyword matcher
fn kw<'src>(keyword: &'static str) -> impl Parser<'src, &'src str, (), Extra<'src>> + Clone {
    any()
        .filter(|c: &char| c.is_alphabetic())
        .repeated()
        .at_least(1)
        .to_slice()
        .try_map(move |s: &str, span| {
            if s.eq_ignore_ascii_case(keyword) {
                Ok(())
            } else {
                Err(Rich::custom(span, format!("expected keyword '{}'", keyword)))
            }
        })
        .padded()
}

/// Single-quoted string with backslash escapes: 'John\'s'
fn single_quoted<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    just('\'')
        .ignore_then(
            choice((just('\\').ignore_then(any()), none_of("\\'")))
                .repeated()
                .collect::<String>(),
        )
        .then_ignore(just('\''))
        .labelled("single-quoted string")
}

/// Double-quoted string with backslash escapes: "John \"Boss\" Doe"
fn double_quoted<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    just('"')
        .ignore_then(
            choice((just('\\').ignore_then(any()), none_of("\\\"")))
                .repeated()
                .collect::<String>(),
        )
        .then_ignore(just('"'))
        .labelled("double-quoted string")
}

/// Parser for string literals (single or double quoted)
fn string_literal<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    single_quoted().or(double_quoted()).labelled("string literal")
}

/// A field reference: a bare identifier, or a quoted identifier whose
/// quotes are preserved in the key (dialects strip them at render time).
fn key<'src>() -> impl Parser<'src, &'src str, Key, Extra<'src>> + Clone {
    let quoted_single = just('\'')
        .then(none_of("'").repeated())
        .then(just('\''))
        .to_slice()
        .map(|s: &str| s.to_string());

    let quoted_double = just('"')
        .then(none_of("\"").repeated())
        .then(just('"'))
        .to_slice()
        .map(|s: &str| s.to_string());

    choice((ident(), quoted_single, quoted_double))
        .map(Key::new)
        .labelled("field identifier")
}

// ============================================================================
// Constants
// ============================================================================

/// Numeric literal (integer or decimal) - with proper error handling
fn number<'src>() -> impl Parser<'src, &'src str, FilterValue, Extra<'src>> + Clone {
    just('-')
        .or_not()
        .then(
            any()
                .filter(|c: &char| c.is_ascii_digit())
                .repeated()
                .at_least(1),
        )
        .then(
            just('.')
                .then(any().filter(|c: &char| c.is_ascii_digit()).repeated())
                .or_not(),
        )
        .to_slice()
        .try_map(|s: &str, span: SimpleSpan| {
            if s.contains('.') {
                s.parse::<f64>()
                    .map(FilterValue::Decimal)
                    .map_err(|_| Rich::custom(span, "invalid decimal literal"))
            } else {
                s.parse::<i64>()
                    .map(FilterValue::Int)
                    .map_err(|_| Rich::custom(span, "integer overflow"))
            }
        })
        .labelled("number")
}

/// Scalar constant: string, number, or boolean
fn constant<'src>() -> impl Parser<'src, &'src str, FilterValue, Extra<'src>> + Clone {
    let string = string_literal().map(FilterValue::Text);
    let boolean = choice((
        kw("true").to(FilterValue::Bool(true)),
        kw("false").to(FilterValue::Bool(false)),
    ));

    choice((string, number(), boolean)).padded().labelled("constant")
}

/// Constant array: ['comedy', 'drama'] - at least one element
fn constant_list<'src>() -> impl Parser<'src, &'src str, FilterValue, Extra<'src>> + Clone {
    just('[')
        .padded()
        .ignore_then(
            constant()
                .separated_by(just(',').padded())
                .allow_trailing()
                .at_least(1)
                .collect::<Vec<_>>(),
        )
        .then_ignore(just(']').padded())
        .map(FilterValue::List)
        .labelled("constant array like ['a', 'b']")
}

// ============================================================================
// Predicates
// ============================================================================

/// A single comparison or membership predicate
fn predicate<'src>() -> impl Parser<'src, &'src str, Operand, Extra<'src>> + Clone {
    let compare_op = choice((
        just("==").to(ExpressionType::Eq),
        just("!=").to(ExpressionType::Ne),
        just(">=").to(ExpressionType::Gte),
        just("<=").to(ExpressionType::Lte),
        just(">").to(ExpressionType::Gt),
        just("<").to(ExpressionType::Lt),
    ))
    .padded()
    .labelled("comparison operator");

    let comparison = key()
        .padded()
        .then(compare_op)
        .then(constant())
        .map(|((key, op), value)| Operand::from(Expression::new(op, key, value)));

    let membership_op = choice((
        kw("not").ignore_then(kw("in")).to(ExpressionType::Nin),
        kw("nin").to(ExpressionType::Nin),
        kw("in").to(ExpressionType::In),
    ))
    .labelled("membership operator");

    let membership = key()
        .padded()
        .then(membership_op)
        .then(constant_list())
        .map(|((key, op), list)| Operand::from(Expression::new(op, key, list)));

    comparison.or(membership).labelled("predicate")
}

// ============================================================================
// Boolean expression
// ============================================================================

/// Full filter expression with optional leading WHERE keyword.
pub fn filter_expression<'src>() -> impl Parser<'src, &'src str, Expression, Extra<'src>> {
    let operand = recursive(|operand| {
        let grouped = just('(')
            .padded()
            .ignore_then(operand)
            .then_ignore(just(')').padded())
            .try_map(|inner: Operand, span: SimpleSpan| match inner {
                Operand::Expression(expr) => Ok(Operand::Group(Box::new(Group::new(*expr)))),
                // Double parentheses collapse to a single group
                Operand::Group(group) => Ok(Operand::Group(group)),
                _ => Err(Rich::custom(span, "expected a boolean expression inside parentheses")),
            })
            .labelled("parenthesized group");

        let primary = grouped.or(predicate());

        let unary = recursive(|unary| {
            kw("not")
                .ignore_then(unary)
                .map(|inner: Operand| Operand::from(Expression::unary(ExpressionType::Not, inner)))
                .or(primary)
        });

        let and_op = just("&&").padded().ignored().or(kw("and"));
        let and_chain = unary
            .clone()
            .then(and_op.ignore_then(unary).repeated().collect::<Vec<_>>())
            .map(|(first, rest)| {
                rest.into_iter().fold(first, |left, right| {
                    Operand::from(Expression::new(ExpressionType::And, left, right))
                })
            });

        let or_op = just("||").padded().ignored().or(kw("or"));
        and_chain
            .clone()
            .then(or_op.ignore_then(and_chain).repeated().collect::<Vec<_>>())
            .map(|(first, rest)| {
                rest.into_iter().fold(first, |left, right| {
                    Operand::from(Expression::new(ExpressionType::Or, left, right))
                })
            })
    });

    kw("where")
        .or_not()
        .ignore_then(operand)
        .try_map(|top: Operand, span: SimpleSpan| match top {
            Operand::Expression(expr) => Ok(*expr),
            // Remove the top-level grouping
            Operand::Group(group) => Ok(group.content),
            _ => Err(Rich::custom(span, "expected a boolean filter expression")),
        })
        .padded()
}

// ============================================================================
// Error formatting
// ============================================================================

/// Format chumsky errors for human consumption
pub fn format_errors(errs: &[Rich<'_, char>], input: &str) -> String {
    errs.iter()
        .map(|e| {
            let span = e.span();
            let start = span.start;
            let line = input[..start].lines().count().max(1);
            let col = start - input[..start].rfind('\n').map_or(0, |i| i + 1);

            let found = e
                .found()
                .map_or("end of input".to_string(), |c| format!("'{}'", c));

            format!(
                "Line {}, column {}: {} (found {})",
                line,
                col + 1,
                e.reason(),
                found
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Expression {
        filter_expression().parse(input).into_result().unwrap()
    }

    // =========================================================================
    // Primitive tests
    // =========================================================================

    #[test]
    fn test_ident_with_dots() {
        let result = ident().parse("user.name").into_result();
        assert_eq!(result.unwrap(), "user.name");
    }

    #[test]
    fn test_single_quoted_escape() {
        let result = single_quoted().parse(r"'John\'s Book'").into_result();
        assert_eq!(result.unwrap(), "John's Book");
    }

    #[test]
    fn test_double_quoted_escape() {
        let result = double_quoted()
            .parse(r#""John \"Boss\" Doe""#)
            .into_result();
        assert_eq!(result.unwrap(), "John \"Boss\" Doe");
    }

    #[test]
    fn test_backslash_escape() {
        let result = single_quoted().parse(r"'C:\\Users'").into_result();
        assert_eq!(result.unwrap(), "C:\\Users");
    }

    #[test]
    fn test_number_integer() {
        assert_eq!(number().parse("2020").into_result().unwrap(), FilterValue::Int(2020));
    }

    #[test]
    fn test_number_negative_decimal() {
        assert_eq!(
            number().parse("-15.6").into_result().unwrap(),
            FilterValue::Decimal(-15.6)
        );
    }

    #[test]
    fn test_number_overflow() {
        assert!(number().parse("9223372036854775808").into_result().is_err());
    }

    // =========================================================================
    // Predicate tests
    // =========================================================================

    #[test]
    fn test_parse_eq() {
        let expr = parse("country == 'BG'");
        assert_eq!(expr.op, ExpressionType::Eq);
        assert_eq!(*expr.left, Operand::Key(Key::new("country")));
        assert_eq!(
            expr.right.as_deref(),
            Some(&Operand::Value(FilterValue::Text("BG".to_string())))
        );
    }

    #[test]
    fn test_parse_gte_integer() {
        let expr = parse("year >= 2020");
        assert_eq!(expr.op, ExpressionType::Gte);
    }

    #[test]
    fn test_parse_in() {
        let expr = parse("genre in ['comedy', 'documentary', 'drama']");
        assert_eq!(expr.op, ExpressionType::In);
        match expr.right.as_deref() {
            Some(Operand::Value(FilterValue::List(items))) => assert_eq!(items.len(), 3),
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_not_in() {
        let expr = parse("city NOT IN ['Sofia', 'Plovdiv']");
        assert_eq!(expr.op, ExpressionType::Nin);
    }

    #[test]
    fn test_parse_nin_keyword() {
        let expr = parse("city nin ['Sofia']");
        assert_eq!(expr.op, ExpressionType::Nin);
    }

    #[test]
    fn test_parse_empty_list_rejected() {
        let result = filter_expression().parse("genre in []").into_result();
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_quoted_identifier_keeps_quotes() {
        let expr = parse("'article_type' == 'blog'");
        assert_eq!(*expr.left, Operand::Key(Key::new("'article_type'")));
    }

    // =========================================================================
    // Boolean structure tests
    // =========================================================================

    #[test]
    fn test_and_binds_tighter_than_or() {
        // year >= 2020 || country == 'BG' && city != 'Sofia'
        let expr = parse("year >= 2020 || country == 'BG' && city != 'Sofia'");
        assert_eq!(expr.op, ExpressionType::Or);
        match expr.right.as_deref() {
            Some(Operand::Expression(inner)) => assert_eq!(inner.op, ExpressionType::And),
            other => panic!("expected AND on the right, got {:?}", other),
        }
    }

    #[test]
    fn test_and_chain_is_left_associative() {
        let expr = parse("a == 1 && b == 2 && c == 3");
        assert_eq!(expr.op, ExpressionType::And);
        match expr.left.as_ref() {
            Operand::Expression(inner) => assert_eq!(inner.op, ExpressionType::And),
            other => panic!("expected nested AND on the left, got {:?}", other),
        }
    }

    #[test]
    fn test_group_is_preserved() {
        let expr = parse("(year >= 2020 || country == 'BG') && city != 'Sofia'");
        assert_eq!(expr.op, ExpressionType::And);
        assert!(matches!(*expr.left, Operand::Group(_)));
    }

    #[test]
    fn test_top_level_group_removed() {
        let expr = parse("(year >= 2020 || country == 'BG')");
        assert_eq!(expr.op, ExpressionType::Or);
    }

    #[test]
    fn test_not_prefix() {
        let expr = parse("not country == 'BG'");
        assert_eq!(expr.op, ExpressionType::Not);
        assert!(expr.right.is_none());
    }

    #[test]
    fn test_not_group() {
        let expr = parse("NOT (city in ['Sofia'])");
        assert_eq!(expr.op, ExpressionType::Not);
        assert!(matches!(*expr.left, Operand::Group(_)));
    }

    #[test]
    fn test_where_prefix_optional() {
        let with = parse("WHERE country == 'BG'");
        let without = parse("country == 'BG'");
        assert_eq!(with, without);
    }

    #[test]
    fn test_keyword_connectives() {
        let a = parse("a == 1 AND b == 2 OR c == 3");
        let b = parse("a == 1 && b == 2 || c == 3");
        assert_eq!(a, b);
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        let result = filter_expression()
            .parse("country == 'BG' extra")
            .into_result();
        assert!(result.is_err());
    }

    #[test]
    fn test_bare_identifier_rejected() {
        let result = filter_expression().parse("country").into_result();
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_group_rejected() {
        let result = filter_expression().parse("()").into_result();
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_group_inside_expression_rejected() {
        let result = filter_expression()
            .parse("country == 'BG' && ()")
            .into_result();
        assert!(result.is_err());
    }
}
