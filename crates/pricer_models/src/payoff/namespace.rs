//! The sandboxed name space visible to payoff expressions.
//!
//! Lookup order is caller-supplied context, then path variables, then
//! constants, then functions. Nothing outside these tables is reachable.

use std::collections::HashMap;

/// Variables derived from the simulated path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathVariable {
    /// `path`: the whole path as a series.
    Path,
    /// `s`, `st`: terminal price.
    Terminal,
    /// `spot`: initial price.
    Spot,
    /// `step`: number of steps, `len(path) - 1`.
    Step,
}

impl PathVariable {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "path" => Some(Self::Path),
            "s" | "st" => Some(Self::Terminal),
            "spot" => Some(Self::Spot),
            "step" => Some(Self::Step),
            _ => None,
        }
    }
}

/// Functions callable from a payoff expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathFunction {
    /// Largest of a series or of two or more numbers.
    Max,
    /// Smallest of a series or of two or more numbers.
    Min,
    /// Compensated sum of a series or numbers.
    Fsum,
    /// Product of a series or numbers.
    Prod,
    /// Absolute value.
    Abs,
    /// Absolute value.
    Fabs,
    /// Square root.
    Sqrt,
    /// Cube root.
    Cbrt,
    /// e raised to x.
    Exp,
    /// 2 raised to x.
    Exp2,
    /// exp(x) - 1.
    Expm1,
    /// Natural log, or log to the base given as second argument.
    Log,
    /// Base-2 log.
    Log2,
    /// Base-10 log.
    Log10,
    /// log(1 + x).
    Log1p,
    /// x raised to y.
    Pow,
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Tangent.
    Tan,
    /// Arc sine.
    Asin,
    /// Arc cosine.
    Acos,
    /// Arc tangent.
    Atan,
    /// Arc tangent of y / x, quadrant aware.
    Atan2,
    /// Hyperbolic sine.
    Sinh,
    /// Hyperbolic cosine.
    Cosh,
    /// Hyperbolic tangent.
    Tanh,
    /// Inverse hyperbolic sine.
    Asinh,
    /// Inverse hyperbolic cosine.
    Acosh,
    /// Inverse hyperbolic tangent.
    Atanh,
    /// Euclidean norm of the arguments.
    Hypot,
    /// Round toward negative infinity.
    Floor,
    /// Round toward positive infinity.
    Ceil,
    /// Round toward zero.
    Trunc,
    /// Magnitude of x with the sign of y.
    Copysign,
    /// Remainder with the sign of x.
    Fmod,
    /// Radians to degrees.
    Degrees,
    /// Degrees to radians.
    Radians,
    /// Error function.
    Erf,
    /// Complementary error function.
    Erfc,
    /// 1 if finite, else 0.
    Isfinite,
    /// 1 if infinite, else 0.
    Isinf,
    /// 1 if NaN, else 0.
    Isnan,
}

const FUNCTIONS: &[(&str, MathFunction)] = &[
    ("max", MathFunction::Max),
    ("min", MathFunction::Min),
    ("fsum", MathFunction::Fsum),
    ("prod", MathFunction::Prod),
    ("abs", MathFunction::Abs),
    ("fabs", MathFunction::Fabs),
    ("sqrt", MathFunction::Sqrt),
    ("cbrt", MathFunction::Cbrt),
    ("exp", MathFunction::Exp),
    ("exp2", MathFunction::Exp2),
    ("expm1", MathFunction::Expm1),
    ("log", MathFunction::Log),
    ("log2", MathFunction::Log2),
    ("log10", MathFunction::Log10),
    ("log1p", MathFunction::Log1p),
    ("pow", MathFunction::Pow),
    ("sin", MathFunction::Sin),
    ("cos", MathFunction::Cos),
    ("tan", MathFunction::Tan),
    ("asin", MathFunction::Asin),
    ("acos", MathFunction::Acos),
    ("atan", MathFunction::Atan),
    ("atan2", MathFunction::Atan2),
    ("sinh", MathFunction::Sinh),
    ("cosh", MathFunction::Cosh),
    ("tanh", MathFunction::Tanh),
    ("asinh", MathFunction::Asinh),
    ("acosh", MathFunction::Acosh),
    ("atanh", MathFunction::Atanh),
    ("hypot", MathFunction::Hypot),
    ("floor", MathFunction::Floor),
    ("ceil", MathFunction::Ceil),
    ("trunc", MathFunction::Trunc),
    ("copysign", MathFunction::Copysign),
    ("fmod", MathFunction::Fmod),
    ("degrees", MathFunction::Degrees),
    ("radians", MathFunction::Radians),
    ("erf", MathFunction::Erf),
    ("erfc", MathFunction::Erfc),
    ("isfinite", MathFunction::Isfinite),
    ("isinf", MathFunction::Isinf),
    ("isnan", MathFunction::Isnan),
];

impl MathFunction {
    /// Looks a function up by its expression-level name.
    pub fn from_name(name: &str) -> Option<Self> {
        FUNCTIONS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|&(_, function)| function)
    }

    /// Name as written in expressions.
    pub fn name(self) -> &'static str {
        FUNCTIONS
            .iter()
            .find(|(_, function)| *function == self)
            .map_or("<function>", |&(name, _)| name)
    }
}

fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(std::f64::consts::PI),
        "e" => Some(std::f64::consts::E),
        "tau" => Some(std::f64::consts::TAU),
        "inf" => Some(f64::INFINITY),
        "nan" => Some(f64::NAN),
        _ => None,
    }
}

/// What a name refers to once resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// Context value or constant, folded at compile time.
    Number(f64),
    Path(PathVariable),
    Function(MathFunction),
    /// Reported when evaluated, so unused branches may mention it.
    Undefined(String),
}

/// Compile-time name table.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    context: HashMap<String, f64>,
}

impl Namespace {
    /// Builds a namespace from caller-supplied context values.
    ///
    /// Later duplicates of a key replace earlier ones.
    pub fn new<I, K>(context: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self {
            context: context
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }

    /// Resolves `name` following the sandbox lookup order.
    pub fn resolve(&self, name: &str) -> Binding {
        if let Some(&value) = self.context.get(name) {
            return Binding::Number(value);
        }
        if let Some(variable) = PathVariable::from_name(name) {
            return Binding::Path(variable);
        }
        if let Some(value) = constant(name) {
            return Binding::Number(value);
        }
        match MathFunction::from_name(name) {
            Some(function) => Binding::Function(function),
            None => Binding::Undefined(name.to_string()),
        }
    }
}
