//! Recursive-descent parser for
//! `SELECT cols|* FROM t [WHERE col = val] [ORDER BY col [ASC|DESC]] [LIMIT n]`

use super::lexer::{tokenize, Token};
use super::{Filter, Literal, OrderBy, Projection, SelectQuery, SortDirection};
use crate::DataError;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn at_keyword(&self, kw: &str) -> bool {
        self.peek().is_some_and(|t| t.is_keyword(kw))
    }

    fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.at_keyword(kw) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, kw: &str) -> Result<(), DataError> {
        if self.eat_keyword(kw) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("Expected {}", kw)))
        }
    }

    fn unexpected(&self, expected: &str) -> DataError {
        match self.peek() {
            Some(token) => DataError::InvalidQuery(format!("{}, found '{}'", expected, token.describe())),
            None => DataError::InvalidQuery(format!("{}, found end of query", expected)),
        }
    }

    /// A column or table name
    fn name(&mut self, what: &str) -> Result<String, DataError> {
        match self.peek() {
            Some(Token::Ident(s) | Token::QuotedIdent(s) | Token::Str(s) | Token::Number(s)) => {
                let s = s.clone();
                self.pos += 1;
                Ok(s)
            }
            _ => Err(self.unexpected(&format!("Expected {}", what))),
        }
    }

    fn projection(&mut self) -> Result<Projection, DataError> {
        if matches!(self.peek(), Some(Token::Star)) {
            self.pos += 1;
            return Ok(Projection::All);
        }

        let mut columns = vec![self.name("a column name or *")?];
        while matches!(self.peek(), Some(Token::Comma)) {
            self.pos += 1;
            columns.push(self.name("a column name")?);
        }
        Ok(Projection::Columns(columns))
    }

    fn filter(&mut self) -> Result<Filter, DataError> {
        let column = self.name("a column name after WHERE")?;
        if !matches!(self.peek(), Some(Token::Equals)) {
            return Err(self.unexpected("Only '=' comparisons are supported in WHERE"));
        }
        self.pos += 1;

        let value = match self.peek() {
            Some(Token::Str(s)) => Literal::Quoted(s.clone()),
            Some(Token::Number(s) | Token::Ident(s) | Token::QuotedIdent(s)) => Literal::Bare(s.clone()),
            _ => return Err(self.unexpected("Expected a value after '='")),
        };
        self.pos += 1;
        Ok(Filter { column, value })
    }

    fn order_by(&mut self) -> Result<OrderBy, DataError> {
        self.expect_keyword("BY")?;
        let column = self.name("a column name after ORDER BY")?;
        let direction = if self.eat_keyword("DESC") {
            SortDirection::Descending
        } else {
            self.eat_keyword("ASC");
            SortDirection::Ascending
        };
        Ok(OrderBy { column, direction })
    }

    fn limit(&mut self) -> Result<usize, DataError> {
        match self.peek() {
            Some(Token::Number(raw)) => {
                if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(DataError::InvalidQuery(format!(
                        "LIMIT must be a non-negative integer, found '{}'",
                        raw
                    )));
                }
                // Digits only, so a failed parse is an overflow; the row count caps it anyway
                let n = raw.parse::<usize>().unwrap_or(usize::MAX);
                self.pos += 1;
                Ok(n)
            }
            _ => Err(self.unexpected("Expected an integer after LIMIT")),
        }
    }
}

/// Parse a query string into a [`SelectQuery`]
pub fn parse_query(input: &str) -> Result<SelectQuery, DataError> {
    if !input.trim_start().get(..6).is_some_and(|kw| kw.eq_ignore_ascii_case("SELECT")) {
        return Err(DataError::UnsupportedQuery);
    }

    let mut parser = Parser {
        tokens: tokenize(input)?,
        pos: 0,
    };
    parser.expect_keyword("SELECT")?;

    let projection = parser.projection()?;
    parser.expect_keyword("FROM")?;
    let table = parser.name("a table name after FROM")?;

    let filter = if parser.eat_keyword("WHERE") {
        Some(parser.filter()?)
    } else {
        None
    };

    let order_by = if parser.eat_keyword("ORDER") {
        Some(parser.order_by()?)
    } else {
        None
    };

    let limit = if parser.eat_keyword("LIMIT") {
        Some(parser.limit()?)
    } else {
        None
    };

    while matches!(parser.peek(), Some(Token::Semicolon)) {
        parser.pos += 1;
    }
    if parser.peek().is_some() {
        return Err(parser.unexpected("Expected end of query"));
    }

    Ok(SelectQuery {
        projection,
        table,
        filter,
        order_by,
        limit,
    })
}
