use logos::{Lexer, Logos};

use crate::{atom::Atom, error::{LispError, LispResult}, symbol::intern};


#[derive(Debug, Clone, PartialEq, Logos)]
#[logos(skip r"([ \t\r\n\f]+|;[^\n]*)")]
enum Token<'a> {
    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token("'")]
    Quote,

    #[token("`")]
    Quasiquote,

    #[token(",")]
    Unquote,

    #[token(",@")]
    UnquoteSplicing,

    #[token("\"", lex_string)]
    String(String),

    #[regex(r#"[^()'`",; \t\r\n\f][^() \t\r\n\f]*"#, |lex| lex.slice())]
    Atom(&'a str),
}

/// Scans a string body up to the closing quote. A backslash keeps the next
/// character from closing the string; `\"`, `\\`, `\n` and `\t` are
/// unescaped and any other escape is kept as written.
fn lex_string<'a>(lex: &mut Lexer<'a, Token<'a>>) -> Option<String> {
    let mut content = String::new();
    let mut chars = lex.remainder().char_indices();

    while let Some((index, c)) = chars.next() {
        match c {
            '"' => {
                lex.bump(index + 1);
                return Some(content);
            }
            '\\' => match chars.next() {
                Some((_, '"')) => content.push('"'),
                Some((_, '\\')) => content.push('\\'),
                Some((_, 'n')) => content.push('\n'),
                Some((_, 't')) => content.push('\t'),
                Some((_, other)) => {
                    content.push('\\');
                    content.push(other);
                }
                None => break,
            },
            c => content.push(c),
        }
    }

    None
}

fn parse_simple(text: &str) -> Atom {
    if let Ok(value) = text.parse::<i64>() {
        return Atom::Integer(value);
    }

    // Requiring a digit keeps names such as INF and NAN symbols.
    if text.bytes().any(|b| b.is_ascii_digit()) {
        if let Ok(value) = text.parse::<f64>() {
            return Atom::Real(value);
        }
    }

    if text.eq_ignore_ascii_case("nil") {
        Atom::Nil
    } else {
        Atom::Symbol(intern(text))
    }
}

/// Reads successive expressions out of one source buffer.
pub struct Reader<'a> {
    lexer: Lexer<'a, Token<'a>>,
    failed: bool,
}

impl<'a> Reader<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { lexer: Token::lexer(source), failed: false }
    }

    /// Byte offset just past the last consumed token.
    pub fn offset(&self) -> usize {
        self.lexer.span().end
    }

    fn next_token(&mut self) -> LispResult<Option<Token<'a>>> {
        match self.lexer.next() {
            None => Ok(None),
            Some(Ok(token)) => Ok(Some(token)),
            Some(Err(())) if self.lexer.slice() == "\"" => Err(LispError::syntax("Unterminated string.")),
            Some(Err(())) => Err(LispError::syntax(format!("Unrecognized token '{}'.", self.lexer.slice()))),
        }
    }

    fn expect_token(&mut self) -> LispResult<Token<'a>> {
        self.next_token()?
            .ok_or_else(|| LispError::syntax("End-of-input reached."))
    }

    /// The next complete expression, or `None` once the buffer holds only
    /// whitespace and comments. Running out of input in the middle of an
    /// expression is a syntax error.
    pub fn next_expr(&mut self) -> LispResult<Option<Atom>> {
        let result = match self.next_token() {
            Ok(Some(token)) => self.read_from(token).map(Some),
            Ok(None) => Ok(None),
            Err(err) => Err(err),
        };
        self.failed = result.is_err();
        result
    }

    fn read_expr(&mut self) -> LispResult<Atom> {
        let token = self.expect_token()?;
        self.read_from(token)
    }

    fn read_from(&mut self, token: Token<'a>) -> LispResult<Atom> {
        match token {
            Token::LeftParen => self.read_list(),
            Token::RightParen => Err(LispError::syntax("')' reached unexpectedly.")),
            Token::Quote => self.read_wrapped("QUOTE"),
            Token::Quasiquote => self.read_wrapped("QUASIQUOTE"),
            Token::Unquote => self.read_wrapped("UNQUOTE"),
            Token::UnquoteSplicing => self.read_wrapped("UNQUOTE-SPLICING"),
            Token::String(text) => Ok(Atom::string(text)),
            Token::Atom(text) => Ok(parse_simple(text)),
        }
    }

    fn read_wrapped(&mut self, head: &str) -> LispResult<Atom> {
        let inner = self.read_expr()?;
        Ok(Atom::list([Atom::symbol(head), inner]))
    }

    fn read_list(&mut self) -> LispResult<Atom> {
        let mut items = Vec::new();

        loop {
            match self.expect_token()? {
                Token::RightParen => return Ok(Atom::list(items)),
                Token::Atom(".") => {
                    if items.is_empty() {
                        return Err(LispError::syntax("Improper list error."));
                    }

                    let tail = self.read_expr()?;
                    return match self.expect_token()? {
                        Token::RightParen => Ok(Atom::list_with_tail(items, tail)),
                        _ => Err(LispError::syntax("Expected ')' after dotted tail.")),
                    };
                }
                token => items.push(self.read_from(token)?),
            }
        }
    }
}

impl<'a> Iterator for Reader<'a> {
    type Item = LispResult<Atom>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.next_expr().transpose()
    }
}

/// Reads the first expression of `input` and returns it along with the
/// unread suffix, or `None` when `input` holds no more expressions.
pub fn read_expr(input: &str) -> LispResult<Option<(Atom, &str)>> {
    let mut reader = Reader::new(input);
    let expr = reader.next_expr()?;
    Ok(expr.map(|expr| (expr, &input[reader.offset()..])))
}

/// Parses a source holding exactly one expression.
pub fn parse(input: &str) -> LispResult<Atom> {
    let mut reader = Reader::new(input);
    let expr = reader.next_expr()?
        .ok_or_else(|| LispError::syntax("End-of-input reached."))?;
    if reader.next_token()?.is_some() {
        return Err(LispError::syntax("Unexpected input after expression."));
    }
    Ok(expr)
}
