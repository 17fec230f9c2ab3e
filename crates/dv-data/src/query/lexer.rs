//! Tokenizer for the query subset

use crate::DataError;

/// Query tokens. Keywords are plain identifiers; the parser matches them
/// case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Bare word (keyword, column or table name, unquoted value)
    Ident(String),
    /// Backtick-quoted identifier
    QuotedIdent(String),
    /// Single- or double-quoted string literal
    Str(String),
    /// Numeric literal, kept as written
    Number(String),
    /// `*`
    Star,
    /// `,`
    Comma,
    /// `=`
    Equals,
    /// `;`
    Semicolon,
}

impl Token {
    /// Whether this is the keyword `kw` (case-insensitive)
    pub fn is_keyword(&self, kw: &str) -> bool {
        matches!(self, Token::Ident(word) if word.eq_ignore_ascii_case(kw))
    }

    pub fn describe(&self) -> String {
        match self {
            Token::Ident(s) | Token::Number(s) => s.clone(),
            Token::QuotedIdent(s) => format!("`{}`", s),
            Token::Str(s) => format!("'{}'", s),
            Token::Star => "*".into(),
            Token::Comma => ",".into(),
            Token::Equals => "=".into(),
            Token::Semicolon => ";".into(),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.' || c == '$'
}

/// Split a query string into tokens
pub fn tokenize(input: &str) -> Result<Vec<Token>, DataError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '=' => {
                chars.next();
                tokens.push(Token::Equals);
            }
            ';' => {
                chars.next();
                tokens.push(Token::Semicolon);
            }
            '\'' | '"' | '`' => {
                chars.next();
                let text = read_quoted(&mut chars, c)
                    .ok_or_else(|| DataError::InvalidQuery(format!("Unterminated quote starting at offset {}", start)))?;
                tokens.push(if c == '`' { Token::QuotedIdent(text) } else { Token::Str(text) });
            }
            c if c.is_ascii_digit() || ((c == '-' || c == '+' || c == '.') && next_is_digit(input, start)) => {
                let mut end = start + c.len_utf8();
                chars.next();
                while let Some(&(idx, d)) = chars.peek() {
                    let exponent_sign = (d == '-' || d == '+') && matches!(input[..idx].chars().last(), Some('e' | 'E'));
                    if d.is_ascii_digit() || d == '.' || d == 'e' || d == 'E' || exponent_sign {
                        end = idx + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                // a leading digit may still start a column name such as `2020_total`
                if matches!(chars.peek(), Some(&(_, d)) if is_ident_char(d)) {
                    while let Some(&(idx, d)) = chars.peek() {
                        if !is_ident_char(d) {
                            break;
                        }
                        end = idx + d.len_utf8();
                        chars.next();
                    }
                    tokens.push(Token::Ident(input[start..end].to_string()));
                } else {
                    tokens.push(Token::Number(input[start..end].to_string()));
                }
            }
            c if is_ident_char(c) => {
                let mut end = start;
                while let Some(&(idx, d)) = chars.peek() {
                    if is_ident_char(d) {
                        end = idx + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(input[start..end].to_string()));
            }
            other => {
                return Err(DataError::InvalidQuery(format!(
                    "Unexpected character '{}' at offset {}",
                    other, start
                )))
            }
        }
    }

    Ok(tokens)
}

fn next_is_digit(input: &str, at: usize) -> bool {
    input[at..].chars().nth(1).is_some_and(|c| c.is_ascii_digit())
}

/// Read up to the closing `quote`; a doubled quote is a literal quote
fn read_quoted<I>(chars: &mut std::iter::Peekable<I>, quote: char) -> Option<String>
where
    I: Iterator<Item = (usize, char)>,
{
    let mut text = String::new();
    while let Some((_, c)) = chars.next() {
        if c == quote {
            if matches!(chars.peek(), Some(&(_, q)) if q == quote) {
                chars.next();
                text.push(quote);
            } else {
                return Some(text);
            }
        } else {
            text.push(c);
        }
    }
    None
}
