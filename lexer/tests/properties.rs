//! Property tests for maximal munch and whitespace/comment handling.

use lexer::{tokenize, Token, TokenKind};
use proptest::prelude::*;

fn ident_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9]{0,8}"
}

fn number_strategy() -> impl Strategy<Value = String> {
    "[0-9]{1,6}"
}

fn kind_text<'a>(tok: &Token, interner: &'a lexer::Interner) -> &'a str {
    let sym = match tok.kind {
        TokenKind::Ident(s) => s,
        TokenKind::Number(s) => s,
        TokenKind::Symbolic(s) => s,
        TokenKind::StringLiteral(s) => s,
    };
    interner.resolve(sym)
}

proptest! {
    #[test]
    fn whitespace_separated_idents_round_trip(words in proptest::collection::vec(ident_strategy(), 1..6)) {
        let input = words.join(" ");
        let (tokens, interner) = tokenize(&input).unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| kind_text(t, &interner)).collect();
        prop_assert_eq!(texts, words);
        for t in &tokens {
            prop_assert!(matches!(t.kind, TokenKind::Ident(_)));
        }
    }

    #[test]
    fn whitespace_separated_numbers_round_trip(words in proptest::collection::vec(number_strategy(), 1..6)) {
        let input = words.join("  ");
        let (tokens, interner) = tokenize(&input).unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| kind_text(t, &interner)).collect();
        prop_assert_eq!(texts, words);
        for t in &tokens {
            prop_assert!(matches!(t.kind, TokenKind::Number(_)));
        }
    }

    #[test]
    fn line_comments_never_leak_a_token(prefix in ident_strategy(), comment in "[a-zA-Z0-9 ]{0,20}") {
        let input = format!("{prefix} // {comment}\n");
        let (tokens, interner) = tokenize(&input).unwrap();
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(kind_text(&tokens[0], &interner), prefix.as_str());
    }

    #[test]
    fn operator_run_always_merges_into_one_token(ops in proptest::collection::vec(
        prop_oneof![Just('+'), Just('-'), Just('*'), Just('='), Just('<'), Just('>')], 1..5
    )) {
        let text: String = ops.into_iter().collect();
        let (tokens, interner) = tokenize(&text).unwrap();
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(kind_text(&tokens[0], &interner), text.as_str());
    }
}
