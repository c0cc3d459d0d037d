/// Token represents different types of parsed items in a stats expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Word(String),
    StringLiteral(String),
    Symbol(char),
    LeftParen,  // (
    RightParen, // )
}

impl Token {
    /// Field-name text of a word or quoted literal.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Token::Word(w) => Some(w),
            Token::StringLiteral(s) => Some(s),
            _ => None,
        }
    }
}

const SYMBOLS: &[char] = &[',', '*', '|', '=', ':'];

pub fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !SYMBOLS.contains(&c) && !matches!(c, '(' | ')' | '"' | '\'' | '`')
}

pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '"' | '\'' | '`' => {
                tokens.push(parse_string_literal(&mut chars));
            }
            '(' => {
                chars.next();
                tokens.push(Token::LeftParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RightParen);
            }
            c if SYMBOLS.contains(&c) => {
                chars.next();
                tokens.push(Token::Symbol(c));
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            _ => {
                tokens.push(parse_word(&mut chars));
            }
        }
    }

    tokens
}

fn parse_string_literal<I>(chars: &mut std::iter::Peekable<I>) -> Token
where
    I: Iterator<Item = char>,
{
    let mut string = String::new();
    let Some(quote) = chars.next() else {
        return Token::StringLiteral(string);
    };

    while let Some(&c) = chars.peek() {
        match c {
            c if c == quote => {
                chars.next(); // consume closing quote
                break;
            }
            '\\' if quote != '`' => {
                chars.next(); // consume '\'
                if let Some(&escaped) = chars.peek() {
                    chars.next();
                    match escaped {
                        'n' => string.push('\n'),
                        't' => string.push('\t'),
                        'r' => string.push('\r'),
                        '\\' => string.push('\\'),
                        '"' => string.push('"'),
                        '\'' => string.push('\''),
                        _ => string.push(escaped), // Unknown escape, keep as-is
                    }
                }
            }
            _ => {
                string.push(c);
                chars.next();
            }
        }
    }

    Token::StringLiteral(string)
}

fn parse_word<I>(chars: &mut std::iter::Peekable<I>) -> Token
where
    I: Iterator<Item = char>,
{
    let mut word = String::new();

    while let Some(&c) = chars.peek() {
        if is_word_char(c) {
            word.push(c);
            chars.next();
        } else {
            break;
        }
    }

    Token::Word(word)
}

/// Quotes `name` unless it re-tokenizes to a single identical word.
pub fn quote_token_if_needed(name: &str) -> String {
    if !name.is_empty() && name.chars().all(is_word_char) {
        return name.to_string();
    }
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('"');
    for c in name.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Positioned reader over a token slice.
#[derive(Debug)]
pub struct TokenCursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    pub fn next(&mut self) -> Option<&'a Token> {
        let tok = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(tok)
    }

    pub fn is_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// True when the current token is the bare word `kw` (case-insensitive).
    pub fn is_keyword(&self, kw: &str) -> bool {
        matches!(self.peek(), Some(Token::Word(w)) if w.eq_ignore_ascii_case(kw))
    }

    pub fn is_symbol(&self, sym: char) -> bool {
        matches!(self.peek(), Some(Token::Symbol(c)) if *c == sym)
    }
}
