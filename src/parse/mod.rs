//! Tokenizer and single-pass evaluator for rule expressions.

mod grammar;
mod token;

pub(crate) use grammar::Evaluator;
pub use token::{
    unescape, ByteClass, Token, TokenKind, Tokenizer, FIRST_BYTE_CLASS, IDENT_CONTINUE,
};
