//! Syntax tree for payoff expressions.
//!
//! Names are resolved while parsing, so the tree handed to the evaluator
//! never performs a lookup by string.

use super::namespace::Binding;

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Pos,
    Neg,
    Not,
}

/// Arithmetic binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Mod => "%",
            Self::Pow => "**",
        }
    }
}

/// Comparison operators. Chains like `a < b <= c` share operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl CompareOp {
    pub fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
            Self::Gt => lhs > rhs,
            Self::Ge => lhs >= rhs,
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
        }
    }
}

/// Short-circuit operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

/// Expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Var(Binding),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Compare {
        first: Box<Expr>,
        rest: Vec<(CompareOp, Expr)>,
    },
    BoolOp {
        op: BoolOp,
        operands: Vec<Expr>,
    },
    Conditional {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    Slice {
        target: Box<Expr>,
        start: Option<Box<Expr>>,
        end: Option<Box<Expr>>,
    },
    Call {
        name: String,
        callee: Binding,
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Height of the tree, computed without recursion.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            node.for_each_child(|child| stack.push((child, depth + 1)));
        }
        max_depth
    }

    fn for_each_child<'a>(&'a self, mut visit: impl FnMut(&'a Expr)) {
        match self {
            Self::Number(_) | Self::Var(_) => {}
            Self::Unary { operand, .. } => visit(&**operand),
            Self::Binary { lhs, rhs, .. } => {
                visit(&**lhs);
                visit(&**rhs);
            }
            Self::Compare { first, rest } => {
                visit(&**first);
                rest.iter().for_each(|(_, e)| visit(e));
            }
            Self::BoolOp { operands, .. } => operands.iter().for_each(visit),
            Self::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                visit(&**condition);
                visit(&**then_branch);
                visit(&**else_branch);
            }
            Self::Index { target, index } => {
                visit(&**target);
                visit(&**index);
            }
            Self::Slice { target, start, end } => {
                visit(&**target);
                start.iter().chain(end.iter()).for_each(|e| visit(&**e));
            }
            Self::Call { args, .. } => args.iter().for_each(visit),
        }
    }
}
