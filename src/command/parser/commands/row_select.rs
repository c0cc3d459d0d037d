use crate::command::parser::error::ParseError;
use crate::command::parser::tokenizer::{Token, TokenCursor};
use crate::engine::core::read::aggregate::{Extremum, RowSelect};

/// Parses `row_min(src[, fields...])` or `row_max(src[, fields...])`.
pub fn parse(cursor: &mut TokenCursor<'_>) -> Result<RowSelect, ParseError> {
    let extremum = if cursor.is_keyword("row_min") {
        Extremum::Min
    } else if cursor.is_keyword("row_max") {
        Extremum::Max
    } else {
        return match cursor.next() {
            Some(tok) => Err(ParseError::ExpectedKeyword(
                "row_min or row_max".to_string(),
                format!("{:?}", tok),
            )),
            None => Err(ParseError::MissingArgument("row_min or row_max".to_string())),
        };
    };
    cursor.next();
    let func_name = match extremum {
        Extremum::Min => "row_min",
        Extremum::Max => "row_max",
    };

    let mut args = parse_field_names_in_parens(cursor, func_name)?.into_iter();
    let Some(src_field) = args.next() else {
        return Err(ParseError::MissingArgument(format!(
            "{}: source field",
            func_name
        )));
    };
    if src_field == "*" {
        return Err(ParseError::InvalidArgument(format!(
            "{}: source field cannot be '*'",
            func_name
        )));
    }
    if src_field.is_empty() {
        return Err(ParseError::InvalidArgument(format!(
            "{}: source field cannot be empty",
            func_name
        )));
    }

    Ok(RowSelect::new(extremum, src_field, args.collect()))
}

/// Reads `(a, "b", *)`. An empty list `()` is returned as-is.
pub fn parse_field_names_in_parens(
    cursor: &mut TokenCursor<'_>,
    func_name: &str,
) -> Result<Vec<String>, ParseError> {
    match cursor.next() {
        Some(Token::LeftParen) => {}
        Some(tok) => {
            return Err(ParseError::UnexpectedToken(format!(
                "expected '(' after {}, found {:?}",
                func_name, tok
            )));
        }
        None => return Err(ParseError::UnexpectedEnd(format!("missing '(' after {}", func_name))),
    }

    let mut names = Vec::new();
    if matches!(cursor.peek(), Some(Token::RightParen)) {
        cursor.next();
        return Ok(names);
    }

    loop {
        match cursor.next() {
            Some(Token::Symbol('*')) => names.push("*".to_string()),
            Some(tok) => match tok.as_name() {
                Some(name) => names.push(name.to_string()),
                None => {
                    return Err(ParseError::UnexpectedToken(format!(
                        "expected field name in {}(...), found {:?}",
                        func_name, tok
                    )));
                }
            },
            None => {
                return Err(ParseError::UnexpectedEnd(format!(
                    "unterminated {}(...)",
                    func_name
                )));
            }
        }

        match cursor.next() {
            Some(Token::Symbol(',')) => continue,
            Some(Token::RightParen) => return Ok(names),
            Some(tok) => {
                return Err(ParseError::UnexpectedToken(format!(
                    "expected ',' or ')' in {}(...), found {:?}",
                    func_name, tok
                )));
            }
            None => {
                return Err(ParseError::UnexpectedEnd(format!(
                    "unterminated {}(...)",
                    func_name
                )));
            }
        }
    }
}
