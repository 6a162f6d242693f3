//! A small Unicode-aware tokenizer (C7): maximal-munch scanning over an
//! [`InputStream`], producing interned [`Token`]s. `numcli` feeds the
//! resulting numeric-literal tokens straight into `numeric_core`'s own
//! parser; every token's text is exactly the source slice it came from
//! (quotes and escapes included for strings), so nothing downstream has
//! to reconstruct what was actually written.

mod error;
mod interner;
mod stream;
mod token;

pub use error::Error;
pub use interner::{Interner, Symbol};
pub use stream::{CharStream, InputStream};
pub use token::{Token, TokenKind};

/// `Ll ∪ Lu`, plus the apostrophe (so `don't`-style identifiers scan as
/// one token instead of splitting on the quote).
pub fn is_alpha(c: char) -> bool {
    c.is_lowercase() || c.is_uppercase() || c == '\''
}

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_alnum(c: char) -> bool {
    is_alpha(c) || is_digit(c)
}

/// Operator characters: `~\`!@#$^&*-=+:<>?/\|`. Closed set, disjoint
/// from brackets/separators, `.` and `_`, both of which get their own
/// dispatch branch below.
pub fn is_symbolic(c: char) -> bool {
    matches!(
        c,
        '~' | '`' | '!' | '@' | '#' | '$' | '^' | '&' | '*' | '-' | '=' | '+' | ':' | '<' | '>' | '?' | '/' | '\\' | '|'
    )
}

/// Brackets and separators always stand alone, never merging with a
/// neighboring bracket or operator.
fn is_bracket(c: char) -> bool {
    matches!(c, '(' | ')' | '{' | '}' | '[' | ']' | '%' | ',' | ';')
}

fn skip_whitespace_and_comments(stream: &mut impl InputStream) -> Result<(), Error> {
    loop {
        while matches!(stream.peek(), Some(c) if c.is_whitespace()) {
            stream.next();
        }
        match (stream.peek(), stream.peek2()) {
            (Some('/'), Some('/')) => {
                stream.next();
                stream.next();
                while !matches!(stream.peek(), None | Some('\n')) {
                    stream.next();
                }
            }
            (Some('/'), Some('*')) => {
                let start = stream.pos();
                stream.next();
                stream.next();
                loop {
                    match (stream.peek(), stream.peek2()) {
                        (None, _) => {
                            tracing::debug!(start, "block comment never closed");
                            return Err(Error::UnterminatedComment(start));
                        }
                        (Some('*'), Some('/')) => {
                            stream.next();
                            stream.next();
                            break;
                        }
                        _ => {
                            stream.next();
                        }
                    }
                }
            }
            _ => break,
        }
    }
    Ok(())
}

fn consume_while(stream: &mut impl InputStream, mut pred: impl FnMut(char) -> bool) -> String {
    let mut s = String::new();
    while matches!(stream.peek(), Some(c) if pred(c)) {
        s.push(stream.next().unwrap());
    }
    s
}

fn lex_ident(stream: &mut impl InputStream, interner: &mut Interner, start: usize) -> Token {
    let s = consume_while(stream, is_alnum);
    Token { kind: TokenKind::Ident(interner.intern(&s)), pos: start }
}

fn lex_symbolic_run(stream: &mut impl InputStream, interner: &mut Interner, start: usize) -> Token {
    let s = consume_while(stream, is_symbolic);
    Token { kind: TokenKind::Symbolic(interner.intern(&s)), pos: start }
}

fn lex_dot_run(stream: &mut impl InputStream, interner: &mut Interner, start: usize) -> Token {
    let s = consume_while(stream, |c| c == '.');
    Token { kind: TokenKind::Symbolic(interner.intern(&s)), pos: start }
}

fn lex_subscript_run(stream: &mut impl InputStream, interner: &mut Interner, start: usize) -> Token {
    let s = consume_while(stream, |c| c == '_');
    Token { kind: TokenKind::Symbolic(interner.intern(&s)), pos: start }
}

fn lex_bracket(stream: &mut impl InputStream, interner: &mut Interner, start: usize) -> Token {
    let c = stream.next().unwrap();
    let mut s = String::new();
    s.push(c);
    Token { kind: TokenKind::Symbolic(interner.intern(&s)), pos: start }
}

/// Numbers: `digits ['.' digits] [('e'|'E') ['+'|'-'] digits]`. May be
/// called with zero leading digits (a bare `.5`), since the dispatcher
/// only routes here once it has confirmed a digit follows the dot.
fn lex_number(stream: &mut impl InputStream, interner: &mut Interner, start: usize) -> Result<Token, Error> {
    let mut s = consume_while(stream, is_digit);

    if stream.peek() == Some('.') && matches!(stream.peek2(), Some(c) if is_digit(c)) {
        s.push(stream.next().unwrap());
        s.push_str(&consume_while(stream, is_digit));
    }

    if matches!(stream.peek(), Some('e') | Some('E')) {
        let exponent_follows = matches!(stream.peek2(), Some(c) if is_digit(c) || c == '+' || c == '-');
        if exponent_follows {
            s.push(stream.next().unwrap());
            if matches!(stream.peek(), Some('+') | Some('-')) {
                s.push(stream.next().unwrap());
            }
            if !matches!(stream.peek(), Some(c) if is_digit(c)) {
                return Err(Error::InvalidToken(start, stream.peek().unwrap_or('\0')));
            }
            s.push_str(&consume_while(stream, is_digit));
        }
    }

    Ok(Token { kind: TokenKind::Number(interner.intern(&s)), pos: start })
}

/// String literals: text is the raw source slice, quotes and escapes
/// included verbatim (a backslash only suppresses the following
/// character's ability to end the string — it is not resolved away).
fn lex_string(stream: &mut impl InputStream, interner: &mut Interner, start: usize) -> Result<Token, Error> {
    let mut s = String::new();
    s.push(stream.next().unwrap());
    loop {
        match stream.peek() {
            None => {
                tracing::debug!(start, "string literal never closed");
                return Err(Error::UnterminatedString(start));
            }
            Some('\\') => {
                s.push(stream.next().unwrap());
                match stream.next() {
                    None => {
                        tracing::debug!(start, "string literal never closed");
                        return Err(Error::UnterminatedString(start));
                    }
                    Some(escaped) => s.push(escaped),
                }
            }
            Some('"') => {
                s.push(stream.next().unwrap());
                break;
            }
            Some(c) => {
                stream.next();
                s.push(c);
            }
        }
    }
    Ok(Token { kind: TokenKind::StringLiteral(interner.intern(&s)), pos: start })
}

/// Scans one token, skipping leading whitespace and comments first.
/// Returns `Ok(None)` at end of stream.
pub fn next_token(stream: &mut impl InputStream, interner: &mut Interner) -> Result<Option<Token>, Error> {
    skip_whitespace_and_comments(stream)?;
    let Some(c) = stream.peek() else {
        return Ok(None);
    };
    let start = stream.pos();

    if is_bracket(c) {
        return Ok(Some(lex_bracket(stream, interner, start)));
    }
    if c == '.' {
        if matches!(stream.peek2(), Some(d) if is_digit(d)) {
            return Ok(Some(lex_number(stream, interner, start)?));
        }
        return Ok(Some(lex_dot_run(stream, interner, start)));
    }
    if c == '"' {
        return Ok(Some(lex_string(stream, interner, start)?));
    }
    if is_alpha(c) {
        return Ok(Some(lex_ident(stream, interner, start)));
    }
    if is_symbolic(c) {
        return Ok(Some(lex_symbolic_run(stream, interner, start)));
    }
    if c == '_' {
        return Ok(Some(lex_subscript_run(stream, interner, start)));
    }
    if is_digit(c) {
        return Ok(Some(lex_number(stream, interner, start)?));
    }

    stream.next();
    tracing::debug!(start, char = %c, "invalid token");
    Err(Error::InvalidToken(start, c))
}

/// Tokenizes an entire string, returning the token list plus the
/// interner that owns their text.
pub fn tokenize(input: &str) -> Result<(Vec<Token>, Interner), Error> {
    let mut stream = CharStream::new(input);
    let mut interner = Interner::new();
    let mut tokens = Vec::new();
    while let Some(tok) = next_token(&mut stream, &mut interner)? {
        tokens.push(tok);
    }
    Ok((tokens, interner))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<String> {
        let (tokens, interner) = tokenize(input).unwrap();
        tokens
            .iter()
            .map(|t| match &t.kind {
                TokenKind::Ident(s) => format!("ident:{}", interner.resolve(*s)),
                TokenKind::Number(s) => format!("num:{}", interner.resolve(*s)),
                TokenKind::Symbolic(s) => format!("sym:{}", interner.resolve(*s)),
                TokenKind::StringLiteral(s) => format!("str:{}", interner.resolve(*s)),
            })
            .collect()
    }

    #[test]
    fn idents_and_numbers() {
        assert_eq!(kinds("foo 42 bar3"), vec!["ident:foo", "num:42", "ident:bar3"]);
    }

    #[test]
    fn apostrophe_is_part_of_identifier() {
        assert_eq!(kinds("don't"), vec!["ident:don't"]);
    }

    #[test]
    fn decimal_and_scientific_numbers() {
        assert_eq!(kinds("3.14 1e10 2.5e-3"), vec!["num:3.14", "num:1e10", "num:2.5e-3"]);
    }

    #[test]
    fn leading_dot_number() {
        assert_eq!(kinds(".5"), vec!["num:.5"]);
    }

    #[test]
    fn dot_run_without_trailing_digit() {
        assert_eq!(kinds("a...b"), vec!["ident:a", "sym:...", "ident:b"]);
    }

    #[test]
    fn subscript_run() {
        assert_eq!(kinds("x__1"), vec!["ident:x", "sym:__", "num:1"]);
    }

    #[test]
    fn maximal_munch_on_operators() {
        assert_eq!(kinds("a <= b"), vec!["ident:a", "sym:<=", "ident:b"]);
        assert_eq!(kinds("foo123bar"), vec!["ident:foo123bar"]);
        assert_eq!(kinds("++"), vec!["sym:++"]);
    }

    #[test]
    fn brackets_never_merge_with_each_other_or_operators() {
        assert_eq!(
            kinds("f(x,y)+1"),
            vec!["ident:f", "sym:(", "ident:x", "sym:,", "ident:y", "sym:)", "sym:+", "num:1"]
        );
    }

    #[test]
    fn line_comment_is_skipped() {
        assert_eq!(kinds("a // trailing\nb"), vec!["ident:a", "ident:b"]);
    }

    #[test]
    fn block_comment_is_skipped() {
        assert_eq!(kinds("a/*b*/c"), vec!["ident:a", "ident:c"]);
    }

    #[test]
    fn unterminated_block_comment_errors() {
        let err = tokenize("a /* never closes").unwrap_err();
        assert!(matches!(err, Error::UnterminatedComment(_)));
    }

    #[test]
    fn string_literal_keeps_quotes_and_escapes_verbatim() {
        assert_eq!(kinds(r#""a\"b""#), vec![r#"str:"a\"b""#]);
    }

    #[test]
    fn unterminated_string_errors() {
        let err = tokenize("\"never closes").unwrap_err();
        assert!(matches!(err, Error::UnterminatedString(_)));
    }

    #[test]
    fn whitespace_only_input_is_empty() {
        let (tokens, _) = tokenize("   \t\n  ").unwrap();
        assert!(tokens.is_empty());
    }

    #[test]
    fn same_spelling_interns_to_same_symbol() {
        let (tokens, _) = tokenize("foo foo").unwrap();
        let (TokenKind::Ident(a), TokenKind::Ident(b)) = (&tokens[0].kind, &tokens[1].kind) else {
            panic!("expected idents");
        };
        assert_eq!(a, b);
    }

    #[test]
    fn scenario_tail_comment_with_operator_and_exponent() {
        assert_eq!(kinds("x + 3.14e-2 // tail"), vec!["ident:x", "sym:+", "num:3.14e-2"]);
    }
}
