use crate::command::parser::commands;
use crate::command::parser::error::ParseError;
use crate::command::parser::tokenizer::{Token, TokenCursor, tokenize};
use crate::engine::core::read::aggregate::RowSelect;
use tracing::{debug, warn};

/// Parses a comma-separated list of stats calls, e.g. `row_min(a, b), row_max(c)`.
pub fn parse_stats_funcs(input: &str) -> Result<Vec<RowSelect>, ParseError> {
    let input = input.trim();
    debug!(target: "logagg::parse", raw = input, "Parsing stats functions");

    let tokens = tokenize(input);
    let mut cursor = TokenCursor::new(&tokens);
    let mut funcs = Vec::new();

    if cursor.is_end() {
        return Err(ParseError::MissingArgument("stats function".to_string()));
    }

    loop {
        let func = match cursor.peek() {
            Some(Token::Word(_)) if cursor.is_keyword("row_min") || cursor.is_keyword("row_max") => {
                commands::row_select::parse(&mut cursor)
            }
            Some(Token::Word(name)) => Err(ParseError::UnknownFunction(name.clone())),
            Some(tok) => Err(ParseError::UnexpectedToken(format!("{:?}", tok))),
            None => Err(ParseError::UnexpectedEnd(
                "expected stats function after ','".to_string(),
            )),
        };
        match func {
            Ok(func) => funcs.push(func),
            Err(err) => {
                warn!(target: "logagg::parse", ?err, "Stats function parsing failed");
                return Err(err);
            }
        }

        if cursor.is_end() {
            break;
        }
        if cursor.is_symbol(',') {
            cursor.next();
            continue;
        }
        let err = ParseError::UnexpectedToken(format!("{:?}", cursor.peek()));
        warn!(target: "logagg::parse", ?err, "Trailing input after stats function");
        return Err(err);
    }

    if tracing::enabled!(tracing::Level::DEBUG) {
        let rendered: Vec<String> = funcs.iter().map(ToString::to_string).collect();
        debug!(target: "logagg::parse", funcs = ?rendered, "Parsed stats functions");
    }
    Ok(funcs)
}

/// Parses a comma-separated list of field names, e.g. `host, "user id"`.
pub fn parse_field_list(input: &str) -> Result<Vec<String>, ParseError> {
    let tokens = tokenize(input.trim());
    let mut cursor = TokenCursor::new(&tokens);
    let mut names = Vec::new();

    while !cursor.is_end() {
        match cursor.next().and_then(Token::as_name) {
            Some(name) => names.push(name.to_string()),
            None => {
                return Err(ParseError::UnexpectedToken(format!(
                    "expected field name in '{}'",
                    input
                )));
            }
        }
        if cursor.is_symbol(',') {
            cursor.next();
            if cursor.is_end() {
                return Err(ParseError::UnexpectedEnd(format!(
                    "trailing ',' in '{}'",
                    input
                )));
            }
        } else if !cursor.is_end() {
            return Err(ParseError::UnexpectedToken(format!(
                "expected ',' between field names in '{}'",
                input
            )));
        }
    }

    Ok(names)
}
