//! Filter expression tokenizer.

use super::{Keyword, Token, TokenKind};
use crate::error::FilterError;

/// Split a filter expression into tokens.
///
/// Whitespace is skipped. Offsets in tokens and errors are byte offsets into
/// `input`.
///
/// # Example
///
/// ```
/// use tabula_sql::lexer::{tokenize, Keyword, TokenKind};
///
/// let tokens = tokenize("age >= 21 AND name = 'O''Brien'").unwrap();
/// assert_eq!(tokens.len(), 7);
/// assert_eq!(tokens[1].text, ">=");
/// assert_eq!(tokens[3].kind, TokenKind::Keyword(Keyword::And));
/// assert_eq!(tokens[6].text, "O'Brien");
/// ```
pub fn tokenize(input: &str) -> Result<Vec<Token>, FilterError> {
    Lexer::new(input).run()
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input.get(self.pos..)?.chars().next()
    }

    /// Returns the character after the current one without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input.get(self.pos..)?.chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
    }

    fn text_from(&self, start: usize) -> &'a str {
        self.input.get(start..self.pos).unwrap_or_default()
    }

    fn run(mut self) -> Result<Vec<Token>, FilterError> {
        let mut tokens = Vec::new();

        loop {
            self.advance_while(char::is_whitespace);

            let start = self.pos;
            let Some(c) = self.peek() else {
                break;
            };

            let token = match c {
                '(' => self.punct(TokenKind::LParen, start),
                ')' => self.punct(TokenKind::RParen, start),
                ',' => self.punct(TokenKind::Comma, start),
                '=' | '!' | '<' | '>' => self.scan_operator(start)?,
                '\'' => self.scan_string(start)?,
                '-' if self.peek_next().is_some_and(|n| n.is_ascii_digit()) => {
                    self.scan_number(start)?
                },
                c if c.is_ascii_digit() => self.scan_number(start)?,
                c if c.is_ascii_alphabetic() || c == '_' => self.scan_word(start),
                ch => {
                    return Err(FilterError::UnexpectedChar {
                        ch,
                        position: start,
                    });
                },
            };
            tokens.push(token);
        }

        Ok(tokens)
    }

    fn punct(&mut self, kind: TokenKind, start: usize) -> Token {
        self.advance();
        Token::new(kind, self.text_from(start), start)
    }

    /// Scans a comparison operator, preferring the two-character forms.
    fn scan_operator(&mut self, start: usize) -> Result<Token, FilterError> {
        let first = self.advance().unwrap_or_default();
        let two_char = matches!(
            (first, self.peek()),
            ('!' | '>' | '<', Some('=')) | ('<', Some('>'))
        );

        if two_char {
            self.advance();
        } else if first == '!' {
            return Err(FilterError::UnexpectedChar {
                ch: '!',
                position: start,
            });
        }

        Ok(Token::new(TokenKind::Op, self.text_from(start), start))
    }

    /// Scans a single-quoted string literal; `''` is an escaped quote.
    fn scan_string(&mut self, start: usize) -> Result<Token, FilterError> {
        self.advance(); // opening quote
        let mut value = String::new();

        loop {
            match self.advance() {
                Some('\'') if self.peek() == Some('\'') => {
                    self.advance();
                    value.push('\'');
                },
                Some('\'') => break,
                Some(c) => value.push(c),
                None => return Err(FilterError::UnterminatedString { position: start }),
            }
        }

        Ok(Token::new(TokenKind::Str, value, start))
    }

    /// Scans `-?[0-9]+(\.[0-9]+)?`.
    fn scan_number(&mut self, start: usize) -> Result<Token, FilterError> {
        if self.peek() == Some('-') {
            self.advance();
        }
        self.advance_while(|c| c.is_ascii_digit());

        if self.peek() == Some('.') {
            self.advance();
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(FilterError::TrailingDecimalPoint {
                    text: self.text_from(start).to_string(),
                    position: start,
                });
            }
            self.advance_while(|c| c.is_ascii_digit());
        }

        Ok(Token::new(TokenKind::Number, self.text_from(start), start))
    }

    /// Scans an identifier or keyword. Dots are kept inside the word so
    /// `schema.table.column` arrives as one token.
    fn scan_word(&mut self, start: usize) -> Token {
        self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
        let text = self.text_from(start);

        match Keyword::from_word(text) {
            Some(keyword) => Token::new(TokenKind::Keyword(keyword), text, start),
            None => Token::new(TokenKind::Ident, text, start),
        }
    }
}
