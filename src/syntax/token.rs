//! Token definitions for the axiom document lexer.
//!
//! Uses the `logos` crate for fast lexing.

use logos::Logos;

/// Tokens of the functional-style axiom syntax.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]  // Skip whitespace
#[logos(skip r"//[^\n]*")]     // Skip line comments
pub enum Token {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,

    // Statement terminators
    #[token(".")]
    Dot,
    #[token("?")]
    Question,

    /// Full IRI, kept with its angle brackets: `<http://example.org#A>`
    #[regex(r"<[^<>\s]*>", |lex| lex.slice().to_string())]
    Iri(String),

    /// Fact kinds, declarations and short entity names (`ex:Person` included)
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*(:[a-zA-Z0-9_]+)?", |lex| lex.slice().to_string())]
    Ident(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Dot => write!(f, "."),
            Token::Question => write!(f, "?"),
            Token::Iri(s) | Token::Ident(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        Token::lexer(input).filter_map(|t| t.ok()).collect()
    }

    #[test]
    fn test_statement_tokens() {
        assert_eq!(
            lex("SubClassOf(A, ex:B). // trailing"),
            vec![
                Token::Ident("SubClassOf".into()),
                Token::LParen,
                Token::Ident("A".into()),
                Token::Comma,
                Token::Ident("ex:B".into()),
                Token::RParen,
                Token::Dot,
            ]
        );
    }

    #[test]
    fn test_iri_token() {
        assert_eq!(
            lex("<http://example.org/onto#A>?"),
            vec![Token::Iri("<http://example.org/onto#A>".into()), Token::Question]
        );
    }

    #[test]
    fn test_invalid_character() {
        assert!(Token::lexer("A & B").any(|t| t.is_err()));
    }
}
