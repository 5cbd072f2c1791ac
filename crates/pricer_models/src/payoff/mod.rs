//! Sandboxed payoff expression language.
//!
//! A payoff is written as a single numeric expression over the simulated
//! path, for example `max(s - strike, 0)` or `max(fsum(path) / len - k, 0)`
//! with `len` and `k` supplied as context. Compilation lexes, parses and
//! resolves every name once; evaluation walks the resulting tree per path.
//!
//! ## Namespace
//!
//! - `path`: the whole path; `s`/`st`: terminal price; `spot`: initial price;
//!   `step`: number of steps
//! - caller-supplied context values, which shadow every other name
//! - constants `pi`, `e`, `tau`, `inf`, `nan`
//! - elementary math functions plus `max`, `min`, `fsum`, `prod`
//!
//! There is no attribute access, no string literal and no way to reach
//! anything outside this table.

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod namespace;
pub mod parser;

pub use error::{PayoffError, Span};
pub use eval::Value;

use pricer_core::PathPayoff;

use ast::Expr;
use namespace::Namespace;

/// Longest accepted expression, in bytes.
pub const MAX_EXPRESSION_LEN: usize = 4096;

/// A compiled payoff expression.
///
/// Immutable once built, so one instance can be shared by every worker
/// thread of a Monte Carlo run.
///
/// # Examples
/// ```
/// use pricer_core::PathPayoff;
/// use pricer_models::payoff::ExpressionPayoff;
///
/// let lookback = ExpressionPayoff::compile("max(path) - spot").unwrap();
/// assert_eq!(lookback.evaluate(&[100.0, 120.0, 110.0]).unwrap(), 20.0);
/// ```
#[derive(Debug, Clone)]
pub struct ExpressionPayoff {
    source: String,
    root: Expr,
}

impl ExpressionPayoff {
    /// Compiles an expression without extra context.
    pub fn compile(expression: &str) -> Result<Self, PayoffError> {
        Self::compile_with_context(expression, std::iter::empty::<(String, f64)>())
    }

    /// Compiles an expression with named context values such as `strike`.
    pub fn compile_with_context<I, K>(expression: &str, context: I) -> Result<Self, PayoffError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        if expression.len() > MAX_EXPRESSION_LEN {
            return Err(PayoffError::compile(
                format!("expression is longer than {MAX_EXPRESSION_LEN} bytes"),
                Span::new(MAX_EXPRESSION_LEN, expression.len()),
            ));
        }

        let namespace = Namespace::new(context);
        let tokens = lexer::tokenize(expression)?;
        let root = parser::parse(tokens, &namespace)?;

        Ok(Self {
            source: expression.to_string(),
            root,
        })
    }

    /// The expression text this payoff was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluates the payoff for one path.
    ///
    /// # Errors
    /// [`PayoffError::Eval`] for undefined names, type and domain errors, or
    /// a result that is not a finite number.
    pub fn apply(&self, path: &[f64]) -> Result<f64, PayoffError> {
        if path.is_empty() {
            return Err(PayoffError::eval("payoff path is empty"));
        }
        match eval::evaluate(&self.root, path)? {
            Value::Number(x) if x.is_finite() => Ok(x),
            Value::Number(x) => Err(PayoffError::eval(format!(
                "payoff evaluated to a non-finite value ({x})"
            ))),
            Value::Series(_) => Err(PayoffError::eval(
                "payoff must evaluate to a number, got a path series",
            )),
        }
    }
}

impl PathPayoff for ExpressionPayoff {
    fn evaluate(&self, path: &[f64]) -> pricer_core::Result<f64> {
        self.apply(path).map_err(Into::into)
    }
}

/// Compiles `expression` into a payoff, exposing `extra_context` names
/// alongside the path variables.
///
/// # Examples
/// ```
/// use pricer_models::payoff::compile_payoff;
///
/// let digital = compile_payoff("1 if s > barrier else 0", [("barrier", 105.0)]).unwrap();
/// assert_eq!(digital.apply(&[100.0, 106.0]).unwrap(), 1.0);
/// assert!(compile_payoff("s.__class__", [("k", 1.0)]).is_err());
/// ```
pub fn compile_payoff<I, K>(expression: &str, extra_context: I) -> Result<ExpressionPayoff, PayoffError>
where
    I: IntoIterator<Item = (K, f64)>,
    K: Into<String>,
{
    ExpressionPayoff::compile_with_context(expression, extra_context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::PricingError;

    const PATH: [f64; 5] = [100.0, 95.0, 105.0, 110.0, 120.0];

    fn eval_with(expression: &str, context: &[(&str, f64)]) -> Result<f64, PayoffError> {
        compile_payoff(expression, context.iter().copied())?.apply(&PATH)
    }

    fn eval(expression: &str) -> f64 {
        eval_with(expression, &[("strike", 100.0)]).unwrap()
    }

    fn eval_err(expression: &str) -> String {
        match eval_with(expression, &[("strike", 100.0)]) {
            Err(PayoffError::Eval(message)) => message,
            other => panic!("expected an evaluation error for {expression}, got {other:?}"),
        }
    }

    #[test]
    fn test_vanilla_payoffs() {
        assert_eq!(eval("max(s - strike, 0)"), 20.0);
        assert_eq!(eval("max(strike - st, 0)"), 0.0);
        assert_eq!(eval("s - spot"), 20.0);
        assert_eq!(eval("step"), 4.0);
    }

    #[test]
    fn test_path_dependent_payoffs() {
        assert_relative_eq!(eval("max(fsum(path) / (step + 1) - strike, 0)"), 6.0);
        assert_eq!(eval("max(path) - min(path)"), 25.0);
        assert_eq!(eval("min(path[1:])"), 95.0);
        assert_eq!(eval("1 if min(path) < 96 else 0"), 1.0);
        assert_relative_eq!(eval("prod(path[-2:]) / 1000"), 13.2);
    }

    #[test]
    fn test_arithmetic_semantics() {
        assert_eq!(eval("7 // 2"), 3.0);
        assert_eq!(eval("-7 // 2"), -4.0);
        assert_eq!(eval("-7 % 3"), 2.0);
        assert_eq!(eval("7 % -3"), -2.0);
        assert_eq!(eval("-2 ** 2"), -4.0);
        assert_eq!(eval("2 ** -1"), 0.5);
        assert_eq!(eval("2 ** 3 ** 2"), 512.0);
        assert_eq!(eval("(1 + 2) * 3"), 9.0);
        assert_eq!(eval("True + True"), 2.0);
    }

    #[test]
    fn test_logic_and_comparisons() {
        assert_eq!(eval("90 < s <= 120"), 1.0);
        assert_eq!(eval("90 < s < 120"), 0.0);
        assert_eq!(eval("s > strike and 5"), 5.0);
        assert_eq!(eval("0 or 3"), 3.0);
        assert_eq!(eval("not s"), 0.0);
        assert_eq!(eval("1 if path else 2"), 1.0);
        assert_eq!(eval("s if s > 200 else -1 if s > 150 else 7"), 7.0);
    }

    #[test]
    fn test_indexing() {
        assert_eq!(eval("path[0]"), 100.0);
        assert_eq!(eval("path[-1]"), 120.0);
        assert_eq!(eval("path[True]"), 95.0);
        assert_eq!(eval("path[1:3][1]"), 105.0);
        assert_eq!(eval("max(path[-100:100])"), 120.0);
        assert!(eval_err("path[5]").contains("out of range"));
        assert!(eval_err("path[1.5]").contains("must be integers"));
        assert!(eval_err("s[0]").contains("expects a path series"));
    }

    #[test]
    fn test_math_functions() {
        assert_relative_eq!(eval("sqrt(16) + exp(0) + log(e)"), 6.0);
        assert_relative_eq!(eval("log(8, 2)"), 3.0, epsilon = 1e-12);
        assert_relative_eq!(eval("hypot(3, 4)"), 5.0);
        assert_relative_eq!(eval("degrees(pi)"), 180.0);
        assert_relative_eq!(eval("fmod(-7, 3)"), -1.0);
        assert_relative_eq!(eval("copysign(2, -0.0)"), -2.0);
        assert_relative_eq!(eval("erf(0) + erfc(0)"), 1.0, epsilon = 1e-7);
        assert_eq!(eval("floor(-1.5) + ceil(1.2) + trunc(-2.7)"), -2.0);
        assert_eq!(eval("isnan(nan) + isinf(inf) + isfinite(1)"), 3.0);
        assert_eq!(eval("abs(-3) + fabs(-4)"), 7.0);
    }

    #[test]
    fn test_context_shadows_builtins() {
        assert_eq!(eval_with("s", &[("s", 1.0)]).unwrap(), 1.0);
        assert!(eval_with("max(1, 2)", &[("max", 1.0)]).is_err());
    }

    #[test]
    fn test_undefined_names_fail_lazily() {
        assert!(eval_err("open").contains("'open' is not defined"));
        assert!(eval_err("__import__(1)").contains("not defined"));
        assert_eq!(eval("1 if True else undefined_name"), 1.0);
        assert_eq!(eval("1 or exit"), 1.0);
    }

    #[test]
    fn test_evaluation_errors() {
        assert!(eval_err("s / 0").contains("division by zero"));
        assert!(eval_err("s // 0").contains("division by zero"));
        assert!(eval_err("s % 0").contains("modulo by zero"));
        assert!(eval_err("sqrt(-1)").contains("domain"));
        assert!(eval_err("exp(1000)").contains("range"));
        assert!(eval_err("log(0)").contains("log"));
        assert!(eval_err("path").contains("series"));
        assert!(eval_err("inf").contains("non-finite"));
        assert!(eval_err("max").contains("cannot be used as a value"));
        assert!(eval_err("s(1)").contains("not callable"));
        assert!(eval_err("max(1)").contains("at least two numbers"));
        assert!(eval_err("max(path[3:1])").contains("empty"));
        assert!(eval_err("sqrt(1, 2)").contains("argument"));
        assert!(eval_err("path + 1").contains("'+'"));
        assert!(eval_err("path < 1").contains("comparison"));
    }

    #[test]
    fn test_compile_errors_carry_span() {
        let err = compile_payoff("max(s, 1) $", [("k", 1.0)]).unwrap_err();
        assert_eq!(
            err,
            PayoffError::compile("unexpected character '$'", Span::new(10, 11))
        );
    }

    #[test]
    fn test_sandbox_rejections() {
        for expression in [
            "",
            "s.real",
            "__import__('os')",
            "lambda: 0",
            "[x for x in path]",
            "s; s",
            "s = 1",
            "(max)(1, 2)",
        ] {
            assert!(
                ExpressionPayoff::compile(expression).is_err(),
                "{expression:?} should be rejected at compile time"
            );
        }
    }

    #[test]
    fn test_length_limit() {
        let long = format!("s{}", " + 0".repeat(MAX_EXPRESSION_LEN));
        let err = ExpressionPayoff::compile(&long).unwrap_err();
        assert!(matches!(err, PayoffError::Compile { span, .. } if span.start == MAX_EXPRESSION_LEN));
    }

    #[test]
    fn test_empty_path_is_an_evaluation_error() {
        let payoff = ExpressionPayoff::compile("1").unwrap();
        assert!(payoff.apply(&[]).is_err());
    }

    #[test]
    fn test_path_payoff_maps_errors() {
        let payoff = ExpressionPayoff::compile("s / (spot - 100)").unwrap();
        let err = payoff.evaluate(&PATH).unwrap_err();
        assert!(matches!(err, PricingError::PayoffEval(_)));
    }

    #[test]
    fn test_deepest_accepted_expressions_fit_a_worker_stack() {
        use parser::{MAX_NESTING, MAX_TREE_DEPTH};

        // Tokio and rayon workers default to 2 MiB stacks.
        let handle = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(|| {
                let chain = format!("s{}", "+1".repeat(MAX_TREE_DEPTH - 1));
                let payoff = ExpressionPayoff::compile(&chain).unwrap();
                assert_eq!(payoff.apply(&PATH).unwrap(), 120.0 + (MAX_TREE_DEPTH - 1) as f64);

                let too_long = format!("s{}", "+1".repeat(998));
                assert!(ExpressionPayoff::compile(&too_long).is_err());

                let powers = format!("2{}", "**1".repeat(1364));
                assert!(ExpressionPayoff::compile(&powers).is_err());

                let parens = format!(
                    "{}-s{}",
                    "(".repeat(MAX_NESTING - 2),
                    ")".repeat(MAX_NESTING - 2)
                );
                let payoff = ExpressionPayoff::compile(&parens).unwrap();
                assert_eq!(payoff.apply(&PATH).unwrap(), -120.0);
            })
            .unwrap();

        handle.join().unwrap();
    }

    #[test]
    fn test_payoff_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExpressionPayoff>();
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_call_matches_closure(
                terminal in 1.0f64..500.0,
                strike in 1.0f64..500.0,
            ) {
                let payoff = compile_payoff("max(s - strike, 0)", [("strike", strike)]).unwrap();
                let path = [100.0, terminal];
                prop_assert_eq!(payoff.apply(&path).unwrap(), (terminal - strike).max(0.0));
            }

            #[test]
            fn prop_floor_div_and_mod_recombine(
                a in -1e6f64..1e6,
                b in prop_oneof![-1e3f64..-1e-3, 1e-3f64..1e3],
            ) {
                let context = [("a", a), ("b", b)];
                let q = compile_payoff("a // b", context).unwrap().apply(&PATH).unwrap();
                let r = compile_payoff("a % b", context).unwrap().apply(&PATH).unwrap();
                prop_assert!((q * b + r - a).abs() <= 1e-6 * a.abs().max(1.0));
                // The remainder takes the sign of the divisor.
                prop_assert!(r == 0.0 || r.signum() == b.signum());
            }
        }
    }
}
