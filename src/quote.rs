//! Quoting and tokenizing for the dotted query language.
//!
//! Tokens are separated by whitespace. A double-quoted segment may start
//! anywhere in a token (`b."my book"`) and is unescaped by [`tokenize`].
//! Unquoted `(` and `)` are grouping tokens of their own.

use std::borrow::Cow;

use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, take_while1},
    character::complete::{anychar, char},
    combinator::{map, opt, value},
    sequence::delimited,
    IResult,
};

use crate::error::{QueryError, QueryResult};

/// Characters that force quoting of a book name.
pub const BOOK_DELIMITERS: &str = " ()";

/// Append `s` to `buf` wrapped in double quotes, escaping as needed.
pub fn quote_always(buf: &mut String, s: &str) {
    buf.reserve(s.len() + 2);
    buf.push('"');
    for c in s.chars() {
        match c {
            '"' => buf.push_str("\\\""),
            '\\' => buf.push_str("\\\\"),
            '\n' => buf.push_str("\\n"),
            '\r' => buf.push_str("\\r"),
            '\t' => buf.push_str("\\t"),
            '\u{8}' => buf.push_str("\\b"),
            '\u{c}' => buf.push_str("\\f"),
            _ => buf.push(c),
        }
    }
    buf.push('"');
}

/// Return `s` unchanged unless it is empty or contains a quote, backslash,
/// whitespace, or one of `delimiters`; in that case return its quoted form.
pub fn quote_if_needed<'a>(s: &'a str, delimiters: &str) -> Cow<'a, str> {
    let needs_quoting = s.is_empty()
        || s.chars().any(|c| {
            matches!(c, '\\' | '"' | '\'') || c.is_whitespace() || delimiters.contains(c)
        });

    if needs_quoting {
        let mut buf = String::with_capacity(s.len() + 8);
        quote_always(&mut buf, s);
        Cow::Owned(buf)
    } else {
        Cow::Borrowed(s)
    }
}

/// A lexical unit of a dotted query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Open,
    Close,
    Word {
        text: String,
        /// The token began with a double quote.
        quoted: bool,
    },
}

impl Token {
    pub fn word(text: impl Into<String>) -> Self {
        Token::Word {
            text: text.into(),
            quoted: false,
        }
    }

    /// Unquoted word equal to `keyword`.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Word { text, quoted: false } if text == keyword)
    }
}

#[derive(Default)]
struct WordBuf {
    text: String,
    started: bool,
    quoted: bool,
}

impl WordBuf {
    fn flush(&mut self, tokens: &mut Vec<Token>) {
        if self.started {
            tokens.push(Token::Word {
                text: std::mem::take(&mut self.text),
                quoted: self.quoted,
            });
        }
        self.started = false;
        self.quoted = false;
    }
}

/// One lexical piece of input, before words are assembled.
#[derive(Debug, Clone)]
enum Piece<'a> {
    Quoted(String),
    Bare(&'a str),
    Open,
    Close,
    Space,
}

fn parse_piece(input: &str) -> IResult<&str, Piece<'_>> {
    alt((
        map(parse_quoted, Piece::Quoted),
        value(Piece::Open, char('(')),
        value(Piece::Close, char(')')),
        value(Piece::Space, take_while1(|c: char| c.is_whitespace())),
        map(
            take_while1(|c: char| !c.is_whitespace() && !matches!(c, '"' | '(' | ')')),
            Piece::Bare,
        ),
    ))(input)
}

/// A double-quoted segment with escapes resolved.
fn parse_quoted(input: &str) -> IResult<&str, String> {
    delimited(
        char('"'),
        map(
            opt(escaped_transform(
                is_not("\\\""),
                '\\',
                alt((
                    value('\n', char('n')),
                    value('\r', char('r')),
                    value('\t', char('t')),
                    value('\u{8}', char('b')),
                    value('\u{c}', char('f')),
                    anychar,
                )),
            )),
            Option::unwrap_or_default,
        ),
        char('"'),
    )(input)
}

/// Split a dotted query string into tokens, unescaping quoted segments.
pub fn tokenize(input: &str) -> QueryResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut word = WordBuf::default();
    let mut rest = input;

    while !rest.is_empty() {
        // only an unterminated quote matches no piece
        let (remaining, piece) = parse_piece(rest)
            .map_err(|_| QueryError::parse(tokens.len(), "unterminated quote"))?;
        rest = remaining;

        match piece {
            Piece::Quoted(text) => {
                if !word.started {
                    word.started = true;
                    word.quoted = true;
                }
                word.text.push_str(&text);
            }
            Piece::Bare(text) => {
                word.started = true;
                word.text.push_str(text);
            }
            Piece::Open if word.started => word.text.push('('),
            Piece::Open => tokens.push(Token::Open),
            Piece::Close => {
                word.flush(&mut tokens);
                tokens.push(Token::Close);
            }
            Piece::Space => word.flush(&mut tokens),
        }
    }
    word.flush(&mut tokens);

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quoted(s: &str) -> String {
        let mut buf = String::new();
        quote_always(&mut buf, s);
        buf
    }

    #[test]
    fn test_quote_always_escapes() {
        assert_eq!(quoted("plain"), "\"plain\"");
        assert_eq!(quoted("say \"hi\""), r#""say \"hi\"""#);
        assert_eq!(quoted("a\\b\nc"), r#""a\\b\nc""#);
    }

    #[test]
    fn test_quote_if_needed() {
        assert_eq!(quote_if_needed("work", " "), "work");
        assert!(matches!(quote_if_needed("work", " "), Cow::Borrowed(_)));
        assert_eq!(quote_if_needed("my book", " "), "\"my book\"");
        assert_eq!(quote_if_needed("", " "), "\"\"");
        assert_eq!(quote_if_needed("it's", " "), "\"it's\"");
        assert_eq!(quote_if_needed("a(b)", BOOK_DELIMITERS), "\"a(b)\"");
        assert_eq!(quote_if_needed("a(b)", " "), "a(b)");
    }

    #[test]
    fn test_tokenize_words_and_groups() {
        assert_eq!(
            tokenize("t.work (t.home or  t.office)").unwrap(),
            vec![
                Token::word("t.work"),
                Token::Open,
                Token::word("t.home"),
                Token::word("or"),
                Token::word("t.office"),
                Token::Close,
            ]
        );
    }

    #[test]
    fn test_tokenize_quoted_mid_token() {
        assert_eq!(
            tokenize(r#"b."my book" "free text""#).unwrap(),
            vec![
                Token::word("b.my book"),
                Token::Word {
                    text: "free text".to_string(),
                    quoted: true
                },
            ]
        );
    }

    #[test]
    fn test_tokenize_quoted_parens_are_words() {
        assert_eq!(
            tokenize(r#""(" b."a)""#).unwrap(),
            vec![
                Token::Word {
                    text: "(".to_string(),
                    quoted: true
                },
                Token::word("b.a)"),
            ]
        );
    }

    #[test]
    fn test_tokenize_empty_quoted() {
        assert_eq!(tokenize(r#"b."""#).unwrap(), vec![Token::word("b.")]);
    }

    #[test]
    fn test_tokenize_escapes() {
        assert_eq!(
            tokenize(r#""a\"b\\c\nd\qe" x"#).unwrap(),
            vec![
                Token::Word {
                    text: "a\"b\\c\ndqe".to_string(),
                    quoted: true
                },
                Token::word("x"),
            ]
        );
    }

    #[test]
    fn test_tokenize_trailing_backslash_unterminated() {
        assert!(tokenize(r#""abc\"#).is_err());
    }

    #[test]
    fn test_tokenize_unterminated_quote() {
        let err = tokenize(r#"t.a "oops"#).unwrap_err();
        assert!(matches!(err, QueryError::Parse { position: 1, .. }));
    }

    #[test]
    fn test_quote_tokenize_inverse() {
        for s in ["two words", "tab\there", "q\"uote", "back\\slash", ""] {
            let q = quote_if_needed(s, BOOK_DELIMITERS);
            let tokens = tokenize(&q).unwrap();
            assert_eq!(
                tokens,
                vec![Token::Word {
                    text: s.to_string(),
                    quoted: true
                }]
            );
        }
    }
}
