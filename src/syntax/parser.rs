//! Parser for axiom documents.
//!
//! Grammar:
//!
//! ```text
//! document  := statement*
//! statement := call ('.' | '?')
//! call      := Ident '(' term (',' term)* ')'
//! term      := Ident | Iri | call
//! ```

use super::ast::{Statement, Term};
use super::token::Token;
use crate::axiom::{Axiom, EntityDomain, FactKind};
use crate::error::{Result, TrexError};
use logos::Logos;
use std::iter::Peekable;
use std::ops::Range;

type Spanned = (Token, Range<usize>);

/// Parser state.
pub struct Parser<'a> {
    source: &'a str,
    tokens: Peekable<std::vec::IntoIter<Spanned>>,
    /// Byte offset just past the last consumed token.
    offset: usize,
}

impl<'a> Parser<'a> {
    /// Lex `input` up front so that bad characters are reported with a line.
    pub fn new(input: &'a str) -> Result<Self> {
        let mut tokens = Vec::new();
        for (token, span) in Token::lexer(input).spanned() {
            match token {
                Ok(t) => tokens.push((t, span)),
                Err(()) => {
                    let text = &input[span.clone()];
                    return Err(parse_error(input, span.start, format!("unexpected input '{}'", text)));
                }
            }
        }
        Ok(Self {
            source: input,
            tokens: tokens.into_iter().peekable(),
            offset: 0,
        })
    }

    /// Peek at the next token without consuming it.
    fn peek(&mut self) -> Option<&Token> {
        self.tokens.peek().map(|(t, _)| t)
    }

    /// Consume and return the next token.
    fn next(&mut self) -> Option<Token> {
        let (token, span) = self.tokens.next()?;
        self.offset = span.end;
        Some(token)
    }

    fn error(&mut self, message: impl Into<String>) -> TrexError {
        let at = self.tokens.peek().map(|(_, s)| s.start).unwrap_or(self.offset);
        parse_error(self.source, at, message.into())
    }

    /// Expect a specific token, return error if not found.
    fn expect(&mut self, expected: Token) -> Result<()> {
        match self.peek() {
            Some(t) if *t == expected => {
                self.next();
                Ok(())
            }
            Some(t) => {
                let msg = format!("expected {}, got {}", expected, t);
                Err(self.error(msg))
            }
            None => Err(self.error(format!("expected {}, got end of input", expected))),
        }
    }

    pub fn is_at_end(&mut self) -> bool {
        self.peek().is_none()
    }

    /// Parse `Head(term, ...)` after its head has been consumed.
    fn parse_args(&mut self) -> Result<Vec<Term>> {
        self.expect(Token::LParen)?;
        let mut args = vec![self.parse_term()?];
        loop {
            match self.peek() {
                Some(Token::Comma) => {
                    self.next();
                    args.push(self.parse_term()?);
                }
                Some(Token::RParen) => {
                    self.next();
                    return Ok(args);
                }
                Some(t) => {
                    let msg = format!("expected ',' or ')', got {}", t);
                    return Err(self.error(msg));
                }
                None => return Err(self.error("unexpected end of input in argument list")),
            }
        }
    }

    fn parse_term(&mut self) -> Result<Term> {
        match self.peek() {
            Some(Token::Iri(_)) => match self.next() {
                Some(Token::Iri(iri)) => Ok(Term::Name(iri)),
                _ => unreachable!(),
            },
            Some(Token::Ident(_)) => {
                let Some(Token::Ident(name)) = self.next() else {
                    unreachable!()
                };
                if self.peek() == Some(&Token::LParen) {
                    let args = self.parse_args()?;
                    Ok(Term::Call { head: name, args })
                } else {
                    Ok(Term::Name(name))
                }
            }
            Some(t) => {
                let msg = format!("expected a name or expression, got {}", t);
                Err(self.error(msg))
            }
            None => Err(self.error("expected a name or expression, got end of input")),
        }
    }

    /// Parse one terminated statement.
    pub fn parse_statement(&mut self) -> Result<Statement> {
        let start = self.tokens.peek().map(|(_, s)| s.start).unwrap_or(self.offset);
        let head = match self.peek() {
            Some(Token::Ident(_)) => match self.next() {
                Some(Token::Ident(h)) => h,
                _ => unreachable!(),
            },
            Some(t) => {
                let msg = format!("expected a fact kind, got {}", t);
                return Err(self.error(msg));
            }
            None => return Err(self.error("expected a statement, got end of input")),
        };
        let args = self.parse_args()?;
        let query = match self.peek() {
            Some(Token::Dot) => false,
            Some(Token::Question) => true,
            Some(t) => {
                let msg = format!("expected '.' or '?', got {}", t);
                return Err(self.error(msg));
            }
            None => return Err(self.error("missing '.' or '?' at end of statement")),
        };
        self.next();
        build_statement(&head, args, query)
            .map_err(|message| parse_error(self.source, start, message))
    }

    /// Parse statements until end of input.
    pub fn parse_document(&mut self) -> Result<Vec<Statement>> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }
}

fn build_statement(head: &str, args: Vec<Term>, query: bool) -> std::result::Result<Statement, String> {
    let declared = match head {
        "Class" => Some(EntityDomain::Concept),
        "ObjectProperty" => Some(EntityDomain::Property),
        _ => None,
    };
    if let Some(domain) = declared {
        if query {
            return Err(format!("{} declarations cannot be queried", head));
        }
        return match args.as_slice() {
            [Term::Name(name)] => Ok(Statement::Declare(domain, name.clone())),
            _ => Err(format!("{} takes a single name", head)),
        };
    }

    let kind = FactKind::from_name(head).ok_or_else(|| format!("unknown fact kind {}", head))?;
    let operands = args.iter().map(Term::to_entity).collect();
    let axiom = Axiom::new(kind, operands).map_err(|e| e.to_string())?;
    Ok(if query {
        Statement::Query(axiom)
    } else {
        Statement::Assert(axiom)
    })
}

fn parse_error(source: &str, offset: usize, message: String) -> TrexError {
    let line = source[..offset.min(source.len())].matches('\n').count() + 1;
    TrexError::Parse {
        location: format!("line {}", line),
        message,
    }
}

/// Parse a whole document.
pub fn parse(input: &str) -> Result<Vec<Statement>> {
    Parser::new(input)?.parse_document()
}

/// Parse exactly one statement, as typed at the REPL.
pub fn parse_statement(input: &str) -> Result<Statement> {
    let mut parser = Parser::new(input)?;
    let stmt = parser.parse_statement()?;
    if !parser.is_at_end() {
        return Err(parser.error("unexpected input after statement"));
    }
    Ok(stmt)
}
