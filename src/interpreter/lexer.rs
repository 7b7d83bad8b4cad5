use logos::Logos;

use crate::{error::ParseError, interpreter::node::unicode_range::UnicodeRange};

/// A numeric literal with its unit.
#[derive(Debug, PartialEq, Clone)]
pub enum NumberLiteral {
    /// `12`, `12px`
    Integer(i64, String),
    /// `1.5`, `.5em`
    Decimal(f64, String),
    /// `15%`, stored as the fraction `0.15`.
    Percent(f64),
}

/// Represents a lexical token in a CSS value.
///
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// Blanks are kept as [`Token::Whitespace`] because the expression grammar
/// preserves one space between the values of a list.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Numbers, dimensions and percentages such as `3`, `1.5em` or `50%`.
    #[regex(r"[0-9]+(\.[0-9]+)?(%|[a-zA-Z_][a-zA-Z0-9_]*)?", lex_number)]
    #[regex(r"\.[0-9]+(%|[a-zA-Z_][a-zA-Z0-9_]*)?", lex_number)]
    Number(NumberLiteral),
    /// Quoted strings, the quotes are removed and escapes resolved.
    #[regex(r#""([^"\\\n]|\\.)*""#, lex_string, allow_greedy = true)]
    #[regex(r"'([^'\\\n]|\\.)*'", lex_string, allow_greedy = true)]
    String(String),
    /// `#abc`, either a color or an identifier like hash.
    #[regex(r"#[a-zA-Z0-9_-]+", |lex| lex.slice()[1..].to_string())]
    Hash(String),
    /// `$name`
    #[regex(r"\$[a-zA-Z_][a-zA-Z0-9_-]*", |lex| lex.slice()[1..].to_string())]
    Variable(String),
    /// `$name(`, a variable used as a function.
    #[regex(r"\$[a-zA-Z_][a-zA-Z0-9_-]*\(", |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    VariableFunction(String),
    /// `name(`, the start of a function call.
    #[regex(r"-?[a-zA-Z_][a-zA-Z0-9_-]*\(", |lex| {
        let s = lex.slice();
        s[..s.len() - 1].to_string()
    })]
    Function(String),
    /// `url(...)`, the content is kept verbatim, without quotes.
    #[regex(r"url\([^)]*\)", lex_url, allow_greedy = true)]
    Url(String),
    /// `U+0-7F`, `U+4??`
    #[regex(r"[uU]\+[0-9a-fA-F?]{1,6}(-[0-9a-fA-F]{1,6})?", lex_unicode_range)]
    UnicodeRange(UnicodeRange),
    /// Identifier tokens such as `red`, `-webkit-box` or `and`.
    #[regex(r"-?[a-zA-Z_][a-zA-Z0-9_-]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `!important`, `!global`
    #[regex(r"![ \t]*[a-zA-Z_][a-zA-Z0-9_-]*", |lex| {
        lex.slice()[1..].trim_start().to_string()
    })]
    Exclamation(String),
    /// ```
    /// /* Comments. */
    /// ```
    #[regex(r"/\*([^*]|\*[^/])*\*/", |lex| {
        let comment      = lex.slice();
        let newlines     = comment.chars().filter(|&c| c == '\n').count();
        lex.extras.line += newlines;
        logos::Skip
    })]
    Comment,
    /// Blanks, including newlines.
    #[regex(r"[ \t\r\n\f]+", |lex| {
        let newlines     = lex.slice().chars().filter(|&c| c == '\n').count();
        lex.extras.line += newlines;
        Token::Whitespace
    })]
    Whitespace,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `**`
    #[token("**")]
    Power,
    /// `,`
    #[token(",")]
    Comma,
    /// `:`
    #[token(":")]
    Colon,
    /// `:=`
    #[token(":=")]
    Assignment,
    /// `?`
    #[token("?")]
    Question,
    /// `.`
    #[token(".")]
    Period,
    /// `=`
    #[token("=")]
    Equal,
    /// `!=`
    #[token("!=")]
    NotEqual,
    /// `~=`
    #[token("~=")]
    IncludeMatch,
    /// `^=`
    #[token("^=")]
    PrefixMatch,
    /// `$=`
    #[token("$=")]
    SuffixMatch,
    /// `*=`
    #[token("*=")]
    SubstringMatch,
    /// `|=`
    #[token("|=")]
    DashMatch,
    /// `<`
    #[token("<")]
    Less,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>`
    #[token(">")]
    Greater,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `&&`
    #[token("&&")]
    And,
    /// `||`
    #[token("||")]
    Column,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting and diagnostics.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

/// Splits `source` into tokens, each paired with the line it ends on.
///
/// # Errors
/// Returns `ParseError::UnexpectedToken` on the first character sequence that
/// is not a token.
///
/// # Example
/// ```
/// use csspp_expr::interpreter::lexer::{NumberLiteral, Token, tokenize};
///
/// let tokens = tokenize("3px + 1").unwrap();
/// assert_eq!(tokens[0].0, Token::Number(NumberLiteral::Integer(3, "px".into())));
/// assert_eq!(tokens[1].0, Token::Whitespace);
/// assert_eq!(tokens[2].0, Token::Plus);
///
/// assert!(tokenize("3 ` 4").is_err());
/// ```
pub fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer_with_extras(source, LexerExtras { line: 1 });

    while let Some(token) = lexer.next() {
        if let Ok(tok) = token {
            tokens.push((tok, lexer.extras.line));
        } else {
            return Err(ParseError::UnexpectedToken { token: lexer.slice().to_string(),
                                                     line:  lexer.extras.line, });
        }
    }

    Ok(tokens)
}

/// Reads a whole string as a single number.
///
/// Used by `integer()`, `decimal_number()` and `percentage()` to convert
/// strings. Leading and trailing blanks are ignored, a leading `+` or `-`
/// is accepted.
///
/// # Returns
/// - `Some(NumberLiteral)` if the string holds exactly one number.
/// - `None` otherwise.
///
/// # Example
/// ```
/// use csspp_expr::interpreter::lexer::{NumberLiteral, parse_number};
///
/// assert_eq!(parse_number("-12px"), Some(NumberLiteral::Integer(-12, "px".into())));
/// assert_eq!(parse_number("50%"), Some(NumberLiteral::Percent(0.5)));
/// assert_eq!(parse_number("12 px"), None);
/// ```
#[must_use]
pub fn parse_number(text: &str) -> Option<NumberLiteral> {
    let text = text.trim();
    let (negative, text) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let mut lexer = Token::lexer_with_extras(text, LexerExtras { line: 1 });
    let Some(Ok(Token::Number(number))) = lexer.next() else {
        return None;
    };
    if lexer.next().is_some() {
        return None;
    }

    Some(if negative {
             match number {
                 NumberLiteral::Integer(v, dim) => NumberLiteral::Integer(-v, dim),
                 NumberLiteral::Decimal(v, dim) => NumberLiteral::Decimal(-v, dim),
                 NumberLiteral::Percent(v) => NumberLiteral::Percent(-v),
             }
         } else {
             number
         })
}

/// Parses a number, a dimension or a percentage from the current token slice.
///
/// # Returns
/// - `Some(NumberLiteral)`: The parsed literal if successful.
/// - `None`: If the digits do not fit the target type.
fn lex_number(lex: &logos::Lexer<Token>) -> Option<NumberLiteral> {
    let slice = lex.slice();
    let split = slice.find(|c: char| !(c.is_ascii_digit() || c == '.'))
                     .unwrap_or(slice.len());
    let (digits, unit) = slice.split_at(split);

    if unit == "%" {
        return digits.parse::<f64>().ok().map(|v| NumberLiteral::Percent(v / 100.0));
    }
    if digits.contains('.') {
        return digits.parse().ok().map(|v| NumberLiteral::Decimal(v, unit.to_string()));
    }
    digits.parse().ok().map(|v| NumberLiteral::Integer(v, unit.to_string()))
}

/// Removes the quotes of a string token and resolves backslash escapes.
fn lex_string(lex: &logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    let mut out = String::with_capacity(slice.len());
    let mut chars = slice[1..slice.len() - 1].chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Extracts the content of `url(...)`, without blanks or quotes.
fn lex_url(lex: &logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    let inner = slice[4..slice.len() - 1].trim();
    let unquoted = inner.strip_prefix('"')
                        .and_then(|s| s.strip_suffix('"'))
                        .or_else(|| inner.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
                        .unwrap_or(inner);
    unquoted.to_string()
}

/// Parses a `U+` range from the current token slice.
fn lex_unicode_range(lex: &logos::Lexer<Token>) -> Option<UnicodeRange> {
    UnicodeRange::parse(&lex.slice()[2..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn dimensions_and_percentages() {
        assert_eq!(kinds("1.5em 50%"),
                   vec![Token::Number(NumberLiteral::Decimal(1.5, "em".into())),
                        Token::Whitespace,
                        Token::Number(NumberLiteral::Percent(0.5)),]);
        assert_eq!(kinds(".5"), vec![Token::Number(NumberLiteral::Decimal(0.5, String::new()))]);
    }

    #[test]
    fn functions_and_variables() {
        assert_eq!(kinds("rgb($c)"),
                   vec![Token::Function("rgb".into()),
                        Token::Variable("c".into()),
                        Token::RParen,]);
        assert_eq!(kinds("$f(1)"),
                   vec![Token::VariableFunction("f".into()),
                        Token::Number(NumberLiteral::Integer(1, String::new())),
                        Token::RParen,]);
    }

    #[test]
    fn identifiers_with_dashes_and_flags() {
        assert_eq!(kinds("not-equal !important"),
                   vec![Token::Identifier("not-equal".into()),
                        Token::Whitespace,
                        Token::Exclamation("important".into()),]);
        assert_eq!(kinds("a != b")[2], Token::NotEqual);
    }

    #[test]
    fn urls_strings_and_ranges() {
        assert_eq!(kinds("url( \"a.png\" )"), vec![Token::Url("a.png".into())]);
        assert_eq!(kinds(r#""say \"hi\"""#), vec![Token::String("say \"hi\"".into())]);
        let Token::UnicodeRange(r) = &kinds("U+4??")[0] else {
            panic!("expected a unicode range");
        };
        assert_eq!((r.start(), r.end()), (0x400, 0x4ff));
    }

    #[test]
    fn comments_are_skipped_and_lines_counted() {
        let tokens = tokenize("1 /* a\nb */ 2\n3").unwrap();
        assert_eq!(tokens.last().map(|(_, line)| *line), Some(3));
        assert!(!tokens.iter().any(|(t, _)| *t == Token::Comment));
    }
}
