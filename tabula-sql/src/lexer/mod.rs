//! Lexer for filter expressions.

mod token;
mod tokenizer;

pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::tokenize;
