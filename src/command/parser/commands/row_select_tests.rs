use crate::command::parser::commands::row_select;
use crate::command::parser::error::ParseError;
use crate::command::parser::tokenizer::{TokenCursor, tokenize};
use crate::engine::core::read::aggregate::{Extremum, RowSelect};

#[cfg(test)]
mod row_select_tests {
    use super::*;

    fn parse(input: &str) -> Result<RowSelect, ParseError> {
        let tokens = tokenize(input);
        let mut cursor = TokenCursor::new(&tokens);
        row_select::parse(&mut cursor)
    }

    #[test]
    fn test_parse_source_only() {
        let func = parse("row_min(duration)").expect("Failed to parse row_min");

        assert_eq!(func.extremum(), Extremum::Min);
        assert_eq!(func.src_field(), "duration");
        assert!(func.fetch_fields().is_empty());
        assert_eq!(func.to_string(), "row_min(duration)");
    }

    #[test]
    fn test_parse_with_fetch_fields() {
        let func = parse(r#"ROW_MAX(duration, host, "user id")"#).expect("Failed to parse row_max");

        assert_eq!(func.extremum(), Extremum::Max);
        assert_eq!(func.src_field(), "duration");
        assert_eq!(func.fetch_fields(), &["host".to_string(), "user id".to_string()]);
        assert_eq!(func.to_string(), r#"row_max(duration, host, "user id")"#);
    }

    #[test]
    fn test_parse_wildcard_collapses_to_all_fields() {
        let func = parse("row_min(duration, *)").expect("Failed to parse wildcard");
        assert!(func.fetch_fields().is_empty());
        assert_eq!(func, parse("row_min(duration)").unwrap());

        let func = parse("row_min(duration, host, *)").expect("Failed to parse mixed wildcard");
        assert!(func.fetch_fields().is_empty());
    }

    #[test]
    fn test_canonical_text_parses_back_to_same_function() {
        for input in [
            "row_min(a)",
            "row_max(a, b, c)",
            r#"row_min("odd name", "x,y")"#,
        ] {
            let func = parse(input).unwrap();
            assert_eq!(parse(&func.to_string()).unwrap(), func, "{input}");
        }
    }

    #[test]
    fn test_parse_empty_args_should_fail() {
        assert!(matches!(
            parse("row_min()"),
            Err(ParseError::MissingArgument(_))
        ));
    }

    #[test]
    fn test_parse_wildcard_source_should_fail() {
        assert!(matches!(
            parse("row_min(*)"),
            Err(ParseError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_empty_source_should_fail() {
        assert!(matches!(
            parse(r#"row_min("")"#),
            Err(ParseError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse(r#"row_max("", a)"#),
            Err(ParseError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_keyword_is_case_insensitive() {
        let func = parse("ROW_MAX(a)").expect("Failed to parse ROW_MAX");
        assert_eq!(func.extremum(), Extremum::Max);
    }

    #[test]
    fn test_parse_malformed_argument_lists_should_fail() {
        for input in [
            "row_min",
            "row_min x",
            "row_min(a",
            "row_min(a,",
            "row_min(a, )",
            "row_min(, a)",
            "row_min(a b)",
            "row_min(a, (b))",
        ] {
            assert!(parse(input).is_err(), "Expected failure for {input}");
        }
    }

    #[test]
    fn test_parse_wrong_keyword_should_fail() {
        assert!(matches!(
            parse("count(a)"),
            Err(ParseError::ExpectedKeyword(_, _))
        ));
        assert!(matches!(parse(""), Err(ParseError::MissingArgument(_))));
    }

    #[test]
    fn test_parse_stops_after_closing_paren() {
        let tokens = tokenize("row_min(a), row_max(b)");
        let mut cursor = TokenCursor::new(&tokens);

        row_select::parse(&mut cursor).unwrap();
        assert!(cursor.is_symbol(','));
    }
}
