//! Tree-walking evaluator for compiled payoff expressions.
//!
//! Values are either plain numbers or borrowed views into the path being
//! priced; no allocation happens except for call argument lists.

use super::ast::{BinaryOp, BoolOp, Expr, UnaryOp};
use super::error::PayoffError;
use super::namespace::{Binding, MathFunction, PathVariable};
use crate::analytical::distributions::{erf, erfc};

type EvalResult<T> = Result<T, PayoffError>;

/// Runtime value of a sub-expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// Scalar result; booleans are 1.0 and 0.0.
    Number(f64),
    /// Read-only view of the path or a slice of it.
    Series(&'a [f64]),
}

impl<'a> Value<'a> {
    /// Python-style truthiness: non-zero numbers, non-empty series.
    pub fn is_truthy(self) -> bool {
        match self {
            Self::Number(x) => x != 0.0,
            Self::Series(items) => !items.is_empty(),
        }
    }

    fn number(self, context: &str) -> EvalResult<f64> {
        match self {
            Self::Number(x) => Ok(x),
            Self::Series(_) => Err(PayoffError::eval(format!(
                "'{context}' expects a number, got a path series"
            ))),
        }
    }

    fn series(self, context: &str) -> EvalResult<&'a [f64]> {
        match self {
            Self::Series(items) => Ok(items),
            Self::Number(_) => Err(PayoffError::eval(format!(
                "'{context}' expects a path series, got a number"
            ))),
        }
    }
}

/// Evaluates `expr` against a non-empty path.
pub fn evaluate<'a>(expr: &Expr, path: &'a [f64]) -> EvalResult<Value<'a>> {
    match expr {
        Expr::Number(x) => Ok(Value::Number(*x)),
        Expr::Var(binding) => lookup(binding, path),
        Expr::Unary { op, operand } => {
            let value = evaluate(operand, path)?;
            Ok(Value::Number(match op {
                UnaryOp::Pos => value.number("unary +")?,
                UnaryOp::Neg => -value.number("unary -")?,
                UnaryOp::Not => bool_to_number(!value.is_truthy()),
            }))
        }
        Expr::Binary { op, lhs, rhs } => {
            let lhs = evaluate(lhs, path)?.number(op.symbol())?;
            let rhs = evaluate(rhs, path)?.number(op.symbol())?;
            arithmetic(*op, lhs, rhs).map(Value::Number)
        }
        Expr::Compare { first, rest } => {
            let mut lhs = evaluate(first, path)?.number("comparison")?;
            for (op, operand) in rest {
                let rhs = evaluate(operand, path)?.number("comparison")?;
                if !op.holds(lhs, rhs) {
                    return Ok(Value::Number(0.0));
                }
                lhs = rhs;
            }
            Ok(Value::Number(1.0))
        }
        Expr::BoolOp { op, operands } => {
            let Some((last, init)) = operands.split_last() else {
                return Ok(Value::Number(0.0));
            };
            for operand in init {
                let value = evaluate(operand, path)?;
                // `and` stops at the first falsy operand, `or` at the first truthy one
                if value.is_truthy() == (*op == BoolOp::Or) {
                    return Ok(value);
                }
            }
            evaluate(last, path)
        }
        Expr::Conditional {
            condition,
            then_branch,
            else_branch,
        } => {
            if evaluate(condition, path)?.is_truthy() {
                evaluate(then_branch, path)
            } else {
                evaluate(else_branch, path)
            }
        }
        Expr::Index { target, index } => {
            let items = evaluate(target, path)?.series("indexing")?;
            let raw = evaluate(index, path)?.number("index")?;
            let len = items.len() as i64;
            let mut i = integer_index(raw)?;
            if i < 0 {
                i += len;
            }
            if !(0..len).contains(&i) {
                return Err(PayoffError::eval(format!(
                    "index {raw} out of range for series of length {len}"
                )));
            }
            Ok(Value::Number(items[i as usize]))
        }
        Expr::Slice { target, start, end } => {
            let items = evaluate(target, path)?.series("slicing")?;
            let start = slice_bound(start.as_deref(), path, items.len(), 0)?;
            let end = slice_bound(end.as_deref(), path, items.len(), items.len())?;
            Ok(Value::Series(&items[start..end.max(start)]))
        }
        Expr::Call { name, callee, args } => match callee {
            Binding::Function(function) => {
                let values = args
                    .iter()
                    .map(|arg| evaluate(arg, path))
                    .collect::<EvalResult<Vec<_>>>()?;
                call(*function, &values).map(Value::Number)
            }
            Binding::Undefined(_) => Err(undefined(name)),
            Binding::Number(_) | Binding::Path(_) => {
                Err(PayoffError::eval(format!("'{name}' is not callable")))
            }
        },
    }
}

fn lookup<'a>(binding: &Binding, path: &'a [f64]) -> EvalResult<Value<'a>> {
    match binding {
        Binding::Number(x) => Ok(Value::Number(*x)),
        Binding::Path(variable) => {
            let empty = || PayoffError::eval("payoff path is empty");
            Ok(match variable {
                PathVariable::Path => Value::Series(path),
                PathVariable::Terminal => Value::Number(*path.last().ok_or_else(empty)?),
                PathVariable::Spot => Value::Number(*path.first().ok_or_else(empty)?),
                PathVariable::Step => Value::Number(path.len().saturating_sub(1) as f64),
            })
        }
        Binding::Function(function) => Err(PayoffError::eval(format!(
            "function '{}' cannot be used as a value",
            function.name()
        ))),
        Binding::Undefined(name) => Err(undefined(name)),
    }
}

fn undefined(name: &str) -> PayoffError {
    PayoffError::eval(format!("name '{name}' is not defined"))
}

fn bool_to_number(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

fn integer_index(raw: f64) -> EvalResult<i64> {
    if raw.is_finite() && raw.fract() == 0.0 {
        Ok(raw as i64)
    } else {
        Err(PayoffError::eval(format!(
            "series indices must be integers, got {raw}"
        )))
    }
}

/// Resolves an optional slice bound, clamping it into `0..=len`.
fn slice_bound(
    bound: Option<&Expr>,
    path: &[f64],
    len: usize,
    default: usize,
) -> EvalResult<usize> {
    let Some(expr) = bound else {
        return Ok(default);
    };
    let raw = evaluate(expr, path)?.number("slice bound")?;
    let len = len as i64;
    let mut i = integer_index(raw)?;
    if i < 0 {
        i += len;
    }
    Ok(i.clamp(0, len) as usize)
}

fn arithmetic(op: BinaryOp, lhs: f64, rhs: f64) -> EvalResult<f64> {
    match op {
        BinaryOp::Add => Ok(lhs + rhs),
        BinaryOp::Sub => Ok(lhs - rhs),
        BinaryOp::Mul => Ok(lhs * rhs),
        BinaryOp::Div => {
            if rhs == 0.0 {
                return Err(PayoffError::eval("division by zero"));
            }
            Ok(lhs / rhs)
        }
        BinaryOp::FloorDiv => {
            if rhs == 0.0 {
                return Err(PayoffError::eval("floor division by zero"));
            }
            Ok(floor_div_mod(lhs, rhs).0)
        }
        BinaryOp::Mod => {
            if rhs == 0.0 {
                return Err(PayoffError::eval("modulo by zero"));
            }
            Ok(floor_div_mod(lhs, rhs).1)
        }
        BinaryOp::Pow => checked("**", &[lhs, rhs], lhs.powf(rhs)),
    }
}

/// Floored division and modulo; the remainder takes the sign of the divisor.
fn floor_div_mod(lhs: f64, rhs: f64) -> (f64, f64) {
    let mut rem = lhs % rhs;
    let mut div = (lhs - rem) / rhs;
    if rem != 0.0 {
        if (rhs < 0.0) != (rem < 0.0) {
            rem += rhs;
            div -= 1.0;
        }
    } else {
        rem = 0.0_f64.copysign(rhs);
    }
    let floor_div = if div != 0.0 {
        let floored = div.floor();
        if div - floored > 0.5 {
            floored + 1.0
        } else {
            floored
        }
    } else {
        0.0_f64.copysign(lhs / rhs)
    };
    (floor_div, rem)
}

/// Rejects a non-finite result computed from finite inputs.
fn checked(what: &str, inputs: &[f64], result: f64) -> EvalResult<f64> {
    if result.is_finite() || inputs.iter().any(|x| !x.is_finite()) {
        Ok(result)
    } else if result.is_nan() {
        Err(PayoffError::eval(format!("math domain error in '{what}'")))
    } else {
        Err(PayoffError::eval(format!("math range error in '{what}'")))
    }
}

fn call(function: MathFunction, args: &[Value<'_>]) -> EvalResult<f64> {
    use MathFunction as F;

    let name = function.name();
    match function {
        F::Max | F::Min => extremum(function, args),
        F::Fsum => Ok(fsum(single(name, args)?.series(name)?)),
        F::Prod => Ok(single(name, args)?.series(name)?.iter().product()),
        F::Hypot => {
            let xs = numbers(name, args)?;
            let result = xs.iter().fold(0.0_f64, |acc, &x| acc.hypot(x));
            checked(name, &xs, result)
        }
        F::Log => match args {
            [x] => {
                let x = x.number(name)?;
                checked(name, &[x], x.ln())
            }
            [x, base] => {
                let (x, base) = (x.number(name)?, base.number(name)?);
                checked(name, &[x, base], x.ln() / base.ln())
            }
            _ => Err(arity(name, "1 or 2", args.len())),
        },
        F::Isfinite | F::Isinf | F::Isnan => {
            let x = single(name, args)?.number(name)?;
            Ok(bool_to_number(match function {
                F::Isfinite => x.is_finite(),
                F::Isinf => x.is_infinite(),
                _ => x.is_nan(),
            }))
        }
        F::Pow | F::Atan2 | F::Copysign | F::Fmod => {
            let [x, y] = args else {
                return Err(arity(name, "exactly 2", args.len()));
            };
            let (x, y) = (x.number(name)?, y.number(name)?);
            let result = match function {
                F::Pow => x.powf(y),
                F::Atan2 => x.atan2(y),
                F::Copysign => x.copysign(y),
                _ => x % y,
            };
            checked(name, &[x, y], result)
        }
        _ => {
            let x = single(name, args)?.number(name)?;
            let apply = unary(function).ok_or_else(|| {
                PayoffError::eval(format!("{name}() cannot be applied to a single number"))
            })?;
            checked(name, &[x], apply(x))
        }
    }
}

/// Single-argument numeric functions.
fn unary(function: MathFunction) -> Option<fn(f64) -> f64> {
    use MathFunction as F;

    Some(match function {
        F::Abs | F::Fabs => f64::abs,
        F::Sqrt => f64::sqrt,
        F::Cbrt => f64::cbrt,
        F::Exp => f64::exp,
        F::Exp2 => f64::exp2,
        F::Expm1 => f64::exp_m1,
        F::Log2 => f64::log2,
        F::Log10 => f64::log10,
        F::Log1p => f64::ln_1p,
        F::Sin => f64::sin,
        F::Cos => f64::cos,
        F::Tan => f64::tan,
        F::Asin => f64::asin,
        F::Acos => f64::acos,
        F::Atan => f64::atan,
        F::Sinh => f64::sinh,
        F::Cosh => f64::cosh,
        F::Tanh => f64::tanh,
        F::Asinh => f64::asinh,
        F::Acosh => f64::acosh,
        F::Atanh => f64::atanh,
        F::Floor => f64::floor,
        F::Ceil => f64::ceil,
        F::Trunc => f64::trunc,
        F::Degrees => f64::to_degrees,
        F::Radians => f64::to_radians,
        F::Erf => erf,
        F::Erfc => erfc,
        _ => return None,
    })
}

fn single<'a>(name: &str, args: &[Value<'a>]) -> EvalResult<Value<'a>> {
    match args {
        [value] => Ok(*value),
        _ => Err(arity(name, "exactly 1", args.len())),
    }
}

fn numbers(name: &str, args: &[Value<'_>]) -> EvalResult<Vec<f64>> {
    args.iter().map(|value| value.number(name)).collect()
}

fn arity(name: &str, expected: &str, given: usize) -> PayoffError {
    PayoffError::eval(format!(
        "{name}() takes {expected} argument(s) ({given} given)"
    ))
}

/// `max`/`min` over one series or two or more numbers. The first of equal or
/// unordered candidates wins.
fn extremum(function: MathFunction, args: &[Value<'_>]) -> EvalResult<f64> {
    let name = function.name();
    let better = |candidate: f64, best: f64| match function {
        MathFunction::Min => candidate < best,
        _ => candidate > best,
    };
    let pick = |items: &[f64]| {
        items.split_first().map(|(first, rest)| {
            rest.iter()
                .fold(*first, |best, &x| if better(x, best) { x } else { best })
        })
    };

    match args {
        [] => Err(arity(name, "at least 1", 0)),
        [Value::Series(items)] => pick(*items)
            .ok_or_else(|| PayoffError::eval(format!("{name}() arg is an empty series"))),
        [Value::Number(_)] => Err(PayoffError::eval(format!(
            "{name}() expects a path series or at least two numbers"
        ))),
        _ => {
            let xs = numbers(name, args)?;
            pick(&xs).ok_or_else(|| arity(name, "at least 1", 0))
        }
    }
}

/// Compensated summation.
fn fsum(items: &[f64]) -> f64 {
    if items.iter().any(|x| !x.is_finite()) {
        return items.iter().sum();
    }
    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;
    for &x in items {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            compensation += (sum - t) + x;
        } else {
            compensation += (x - t) + sum;
        }
        sum = t;
    }
    sum + compensation
}
