use std::borrow::Cow;

use crate::error::EvalError;
use crate::types::{FastLookup, MethodRegistry, Value};

use super::token::{unescape, Token, TokenKind, Tokenizer};

// Grammar, evaluated while it is recognized:
//
//   expr      := operand (('&&' | '||') operand)*
//   operand   := '(' expr ')' | statement
//   statement := ('!' | 'not') statement
//              | ident '.' ident '(' value ')'
//   value     := int | float | string | ident | '[' value (',' value)* ']'
//
// `&&` and `||` share one precedence level and fold left to right. Both sides
// are always evaluated so that errors on the right are never masked.

/// Single-pass recursive-descent evaluator over one expression.
pub(crate) struct Evaluator<'src, 'env> {
    tokens: Tokenizer<'src>,
    variables: &'env FastLookup<Value>,
    methods: &'env MethodRegistry,
    depth: usize,
    max_depth: usize,
}

#[derive(Clone, Copy)]
enum BoolOp {
    And,
    Or,
}

impl<'src, 'env> Evaluator<'src, 'env> {
    pub(crate) fn new(
        src: &'src str,
        variables: &'env FastLookup<Value>,
        methods: &'env MethodRegistry,
        max_depth: usize,
    ) -> Self {
        Self {
            tokens: Tokenizer::new(src),
            variables,
            methods,
            depth: 0,
            max_depth,
        }
    }

    /// Evaluate the whole input. Trailing tokens are an error.
    pub(crate) fn run(mut self) -> Result<bool, EvalError> {
        let result = self.expr()?;
        let next = self.tokens.peek();
        if next.kind != TokenKind::Eof {
            return Err(EvalError::UnexpectedToken(next.text.to_owned()));
        }
        Ok(result)
    }

    fn expr(&mut self) -> Result<bool, EvalError> {
        let mut result = self.operand()?;
        loop {
            let op = match self.tokens.peek().kind {
                TokenKind::And => BoolOp::And,
                TokenKind::Or => BoolOp::Or,
                _ => return Ok(result),
            };
            self.tokens.advance();
            let rhs = self.operand()?;
            result = match op {
                BoolOp::And => result & rhs,
                BoolOp::Or => result | rhs,
            };
        }
    }

    fn operand(&mut self) -> Result<bool, EvalError> {
        match self.tokens.peek().kind {
            TokenKind::Eof => Err(EvalError::ExpectingExpression),
            TokenKind::LParen => {
                self.tokens.advance();
                self.enter()?;
                let result = self.expr()?;
                self.depth -= 1;
                self.expect(TokenKind::RParen, EvalError::ExpectingRParen)?;
                Ok(result)
            }
            _ => self.statement(),
        }
    }

    fn statement(&mut self) -> Result<bool, EvalError> {
        let tok = self.tokens.advance();
        if tok.kind == TokenKind::Not || self.is_not_keyword(tok) {
            self.enter()?;
            let result = self.statement()?;
            self.depth -= 1;
            return Ok(!result);
        }
        if tok.kind != TokenKind::Ident {
            return Err(EvalError::ExpectingIdentifier);
        }
        let receiver = tok.text;

        self.expect(TokenKind::Dot, EvalError::ExpectingDot)?;
        let method = self.tokens.advance();
        if method.kind != TokenKind::Ident {
            return Err(EvalError::ExpectingIdentifier);
        }
        self.expect(TokenKind::LParen, EvalError::ExpectingLParen)?;
        let argument = self.value()?;
        self.expect(TokenKind::RParen, EvalError::ExpectingRParen)?;

        let receiver = self
            .variables
            .get(receiver)
            .ok_or_else(|| EvalError::VariableNotFound(receiver.to_owned()))?;
        let operator = self
            .methods
            .get(method.text)
            .ok_or_else(|| EvalError::UnknownMethod(method.text.to_owned()))?;
        Ok(operator.call(receiver, &argument)?)
    }

    /// `not` negates only when it is not itself a receiver (`not.eq(1)`).
    fn is_not_keyword(&self, tok: Token<'_>) -> bool {
        tok.kind == TokenKind::Ident
            && tok.text == "not"
            && self.tokens.peek().kind != TokenKind::Dot
    }

    fn value(&mut self) -> Result<Cow<'env, Value>, EvalError> {
        let tok = self.tokens.advance();
        match tok.kind {
            TokenKind::Int(v) => Ok(Cow::Owned(Value::Int(v))),
            TokenKind::Float(v) => Ok(Cow::Owned(Value::Float(v))),
            TokenKind::Str { escaped } => {
                let content = tok.string_content();
                let s = if escaped {
                    unescape(content)
                } else {
                    content.to_owned()
                };
                Ok(Cow::Owned(Value::String(s)))
            }
            TokenKind::UnterminatedStr => Err(EvalError::UnterminatedString),
            TokenKind::BadNumber => Err(EvalError::InvalidNumber(tok.text.to_owned())),
            TokenKind::Ident => self
                .variables
                .get(tok.text)
                .map(Cow::Borrowed)
                .ok_or_else(|| EvalError::VariableNotFound(tok.text.to_owned())),
            TokenKind::LBracket => {
                self.enter()?;
                let items = self.array_items()?;
                self.depth -= 1;
                Ok(Cow::Owned(Value::Array(items)))
            }
            _ => Err(EvalError::ExpectingValue),
        }
    }

    /// Elements after `[`, through the closing `]`.
    fn array_items(&mut self) -> Result<Vec<Value>, EvalError> {
        let mut items = Vec::new();
        loop {
            items.push(self.value()?.into_owned());
            match self.tokens.advance().kind {
                TokenKind::Comma => {}
                TokenKind::RBracket => return Ok(items),
                TokenKind::Eof => return Err(EvalError::ExpectingRBracket),
                _ => return Err(EvalError::ExpectingComma),
            }
        }
    }

    fn expect(&mut self, kind: TokenKind, err: EvalError) -> Result<(), EvalError> {
        if self.tokens.advance().kind == kind {
            Ok(())
        } else {
            Err(err)
        }
    }

    fn enter(&mut self) -> Result<(), EvalError> {
        if self.depth >= self.max_depth {
            return Err(EvalError::NestingTooDeep(self.max_depth));
        }
        self.depth += 1;
        Ok(())
    }
}
