use crate::command::parser::tokenizer::{Token, TokenCursor, quote_token_if_needed, tokenize};

#[cfg(test)]
mod tokenizer_tests {
    use super::*;

    #[test]
    fn test_tokenize_row_min_call() {
        let tokens = tokenize("row_min(duration, host, *)");

        assert_eq!(
            tokens,
            vec![
                Token::Word("row_min".to_string()),
                Token::LeftParen,
                Token::Word("duration".to_string()),
                Token::Symbol(','),
                Token::Word("host".to_string()),
                Token::Symbol(','),
                Token::Symbol('*'),
                Token::RightParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_quoted_names_and_escapes() {
        let tokens = tokenize(r#"row_max("user id", 'a\'b', `raw\n`)"#);

        assert_eq!(
            tokens,
            vec![
                Token::Word("row_max".to_string()),
                Token::LeftParen,
                Token::StringLiteral("user id".to_string()),
                Token::Symbol(','),
                Token::StringLiteral("a'b".to_string()),
                Token::Symbol(','),
                Token::StringLiteral("raw\\n".to_string()),
                Token::RightParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_words_keep_dots_and_dashes() {
        let tokens = tokenize("  kubernetes.pod-name\t_time\n");

        assert_eq!(
            tokens,
            vec![
                Token::Word("kubernetes.pod-name".to_string()),
                Token::Word("_time".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_empty() {
        let tokens = tokenize("");
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_quote_token_if_needed() {
        assert_eq!(quote_token_if_needed("host"), "host");
        assert_eq!(quote_token_if_needed("user id"), "\"user id\"");
        assert_eq!(quote_token_if_needed("a,b"), "\"a,b\"");
        assert_eq!(quote_token_if_needed(""), "\"\"");
        assert_eq!(quote_token_if_needed("say \"hi\""), r#""say \"hi\"""#);
    }

    #[test]
    fn test_quoted_names_tokenize_back_to_same_text() {
        for name in ["user id", "a\"b", "tab\there", "x(y)", "*"] {
            let tokens = tokenize(&quote_token_if_needed(name));
            assert_eq!(tokens, vec![Token::StringLiteral(name.to_string())], "{name}");
        }
    }

    #[test]
    fn test_cursor_peek_next_and_keywords() {
        let tokens = tokenize("ROW_MIN , x");
        let mut cursor = TokenCursor::new(&tokens);

        assert!(cursor.is_keyword("row_min"));
        assert_eq!(cursor.next(), Some(&Token::Word("ROW_MIN".to_string())));
        assert!(cursor.is_symbol(','));
        cursor.next();
        assert_eq!(cursor.peek(), Some(&Token::Word("x".to_string())));
        cursor.next();
        assert!(cursor.is_end());
        assert_eq!(cursor.next(), None);
    }
}
