//! Recursive-descent parser for payoff expressions.
//!
//! Precedence, loosest first: conditional, `or`, `and`, `not`, comparisons,
//! `+ -`, `* / // %`, unary sign, `**`, subscripts, atoms.

use super::ast::{BinaryOp, BoolOp, CompareOp, Expr, UnaryOp};
use super::error::{PayoffError, Span};
use super::lexer::{Token, TokenKind};
use super::namespace::{Binding, Namespace};

/// Maximum nesting of parentheses, subscripts, calls, unary operators and
/// `**` exponents.
pub const MAX_NESTING: usize = 100;

/// Maximum height of the finished syntax tree. Evaluation recurses once per
/// level and must fit a 2 MiB worker stack in unoptimised builds.
pub const MAX_TREE_DEPTH: usize = 200;

/// Parser state wrapping a token stream.
struct Parser<'n> {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    namespace: &'n Namespace,
}

impl<'n> Parser<'n> {
    fn new(tokens: Vec<Token>, namespace: &'n Namespace) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            namespace,
        }
    }

    fn peek(&self) -> &Token {
        // The lexer always terminates the stream with Eof.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &TokenKind) -> Result<Span, PayoffError> {
        let token = self.peek();
        if &token.kind == expected {
            let span = token.span;
            self.advance();
            Ok(span)
        } else {
            Err(PayoffError::compile(
                format!(
                    "expected {}, got {}",
                    expected.describe(),
                    token.kind.describe()
                ),
                token.span,
            ))
        }
    }

    fn enter(&mut self) -> Result<(), PayoffError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(PayoffError::compile(
                format!("expression nests deeper than {MAX_NESTING} levels"),
                self.peek().span,
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

/// Parses a token stream into a name-resolved expression tree.
pub fn parse(tokens: Vec<Token>, namespace: &Namespace) -> Result<Expr, PayoffError> {
    let mut p = Parser::new(tokens, namespace);

    if p.peek_kind() == &TokenKind::Eof {
        return Err(PayoffError::compile("empty expression", p.peek().span));
    }

    let expr = parse_expr(&mut p)?;

    let trailing = p.peek();
    if trailing.kind != TokenKind::Eof {
        return Err(PayoffError::compile(
            format!("unexpected {} after expression", trailing.kind.describe()),
            trailing.span,
        ));
    }

    if expr.depth() > MAX_TREE_DEPTH {
        let end = p.peek().span.end;
        return Err(PayoffError::compile(
            format!("expression tree is deeper than {MAX_TREE_DEPTH} levels"),
            Span::new(0, end),
        ));
    }

    Ok(expr)
}

fn parse_expr(p: &mut Parser) -> Result<Expr, PayoffError> {
    p.enter()?;
    let body = parse_or_expr(p)?;
    let expr = if p.eat(&TokenKind::If) {
        let condition = parse_or_expr(p)?;
        p.expect(&TokenKind::Else)?;
        let else_branch = parse_expr(p)?;
        Expr::Conditional {
            condition: Box::new(condition),
            then_branch: Box::new(body),
            else_branch: Box::new(else_branch),
        }
    } else {
        body
    };
    p.leave();
    Ok(expr)
}

fn parse_or_expr(p: &mut Parser) -> Result<Expr, PayoffError> {
    let first = parse_and_expr(p)?;
    if p.peek_kind() != &TokenKind::Or {
        return Ok(first);
    }
    let mut operands = vec![first];
    while p.eat(&TokenKind::Or) {
        operands.push(parse_and_expr(p)?);
    }
    Ok(Expr::BoolOp {
        op: BoolOp::Or,
        operands,
    })
}

fn parse_and_expr(p: &mut Parser) -> Result<Expr, PayoffError> {
    let first = parse_not_expr(p)?;
    if p.peek_kind() != &TokenKind::And {
        return Ok(first);
    }
    let mut operands = vec![first];
    while p.eat(&TokenKind::And) {
        operands.push(parse_not_expr(p)?);
    }
    Ok(Expr::BoolOp {
        op: BoolOp::And,
        operands,
    })
}

fn parse_not_expr(p: &mut Parser) -> Result<Expr, PayoffError> {
    if !p.eat(&TokenKind::Not) {
        return parse_comparison(p);
    }
    p.enter()?;
    let operand = parse_not_expr(p)?;
    p.leave();
    Ok(Expr::Unary {
        op: UnaryOp::Not,
        operand: Box::new(operand),
    })
}

fn parse_comparison(p: &mut Parser) -> Result<Expr, PayoffError> {
    let first = parse_additive(p)?;
    let mut rest = Vec::new();
    loop {
        let op = match p.peek_kind() {
            TokenKind::Lt => CompareOp::Lt,
            TokenKind::Le => CompareOp::Le,
            TokenKind::Gt => CompareOp::Gt,
            TokenKind::Ge => CompareOp::Ge,
            TokenKind::EqEq => CompareOp::Eq,
            TokenKind::Ne => CompareOp::Ne,
            _ => break,
        };
        p.advance();
        rest.push((op, parse_additive(p)?));
    }
    if rest.is_empty() {
        Ok(first)
    } else {
        Ok(Expr::Compare {
            first: Box::new(first),
            rest,
        })
    }
}

fn parse_additive(p: &mut Parser) -> Result<Expr, PayoffError> {
    let mut lhs = parse_multiplicative(p)?;
    loop {
        let op = match p.peek_kind() {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            _ => break,
        };
        p.advance();
        let rhs = parse_multiplicative(p)?;
        lhs = binary(op, lhs, rhs);
    }
    Ok(lhs)
}

fn parse_multiplicative(p: &mut Parser) -> Result<Expr, PayoffError> {
    let mut lhs = parse_unary(p)?;
    loop {
        let op = match p.peek_kind() {
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::SlashSlash => BinaryOp::FloorDiv,
            TokenKind::Percent => BinaryOp::Mod,
            _ => break,
        };
        p.advance();
        let rhs = parse_unary(p)?;
        lhs = binary(op, lhs, rhs);
    }
    Ok(lhs)
}

fn parse_unary(p: &mut Parser) -> Result<Expr, PayoffError> {
    let op = match p.peek_kind() {
        TokenKind::Plus => UnaryOp::Pos,
        TokenKind::Minus => UnaryOp::Neg,
        _ => return parse_power(p),
    };
    p.advance();
    p.enter()?;
    let operand = parse_unary(p)?;
    p.leave();
    Ok(Expr::Unary {
        op,
        operand: Box::new(operand),
    })
}

/// `**` binds tighter than a unary sign on its left but accepts one on its
/// right: `-2 ** -1` is `-(2 ** (-1))`.
fn parse_power(p: &mut Parser) -> Result<Expr, PayoffError> {
    let base = parse_postfix(p)?;
    if !p.eat(&TokenKind::StarStar) {
        return Ok(base);
    }
    p.enter()?;
    let exponent = parse_unary(p)?;
    p.leave();
    Ok(binary(BinaryOp::Pow, base, exponent))
}

fn parse_postfix(p: &mut Parser) -> Result<Expr, PayoffError> {
    let mut expr = parse_atom(p)?;
    loop {
        match p.peek_kind() {
            TokenKind::LBracket => {
                p.advance();
                expr = parse_subscript(p, expr)?;
            }
            TokenKind::LParen => {
                return Err(PayoffError::compile(
                    "only named functions can be called",
                    p.peek().span,
                ));
            }
            _ => return Ok(expr),
        }
    }
}

/// Parses the inside of `[...]` after the opening bracket.
fn parse_subscript(p: &mut Parser, target: Expr) -> Result<Expr, PayoffError> {
    p.enter()?;
    let start = if p.peek_kind() == &TokenKind::Colon {
        None
    } else {
        Some(parse_expr(p)?)
    };

    let expr = if p.eat(&TokenKind::Colon) {
        let end = if p.peek_kind() == &TokenKind::RBracket {
            None
        } else {
            Some(Box::new(parse_expr(p)?))
        };
        Expr::Slice {
            target: Box::new(target),
            start: start.map(Box::new),
            end,
        }
    } else {
        // Without a colon the index is mandatory.
        match start {
            Some(index) => Expr::Index {
                target: Box::new(target),
                index: Box::new(index),
            },
            None => {
                return Err(PayoffError::compile(
                    "expected an index",
                    p.peek().span,
                ))
            }
        }
    };

    p.expect(&TokenKind::RBracket)?;
    p.leave();
    Ok(expr)
}

fn parse_atom(p: &mut Parser) -> Result<Expr, PayoffError> {
    let token = p.advance();
    match token.kind {
        TokenKind::Number(value) => Ok(Expr::Number(value)),
        TokenKind::True => Ok(Expr::Number(1.0)),
        TokenKind::False => Ok(Expr::Number(0.0)),
        TokenKind::Name(name) => {
            let binding = p.namespace.resolve(&name);
            if p.eat(&TokenKind::LParen) {
                let args = parse_arguments(p)?;
                Ok(Expr::Call {
                    name,
                    callee: binding,
                    args,
                })
            } else if let Binding::Number(value) = binding {
                Ok(Expr::Number(value))
            } else {
                Ok(Expr::Var(binding))
            }
        }
        TokenKind::LParen => {
            let inner = parse_expr(p)?;
            p.expect(&TokenKind::RParen)?;
            Ok(inner)
        }
        other => Err(PayoffError::compile(
            format!("expected an expression, got {}", other.describe()),
            token.span,
        )),
    }
}

/// Parses call arguments after the opening parenthesis. A trailing comma is
/// accepted.
fn parse_arguments(p: &mut Parser) -> Result<Vec<Expr>, PayoffError> {
    let mut args = Vec::new();
    while p.peek_kind() != &TokenKind::RParen {
        args.push(parse_expr(p)?);
        if !p.eat(&TokenKind::Comma) {
            break;
        }
    }
    p.expect(&TokenKind::RParen)?;
    Ok(args)
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}
