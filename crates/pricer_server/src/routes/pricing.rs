//! Option pricing endpoints
//!
//! `POST /api/price` runs the Monte Carlo engine on a payoff expression;
//! `POST /api/price/lattice` runs the binomial lattice on a vanilla contract.
//!
//! Request bodies are read leniently: numbers may arrive as numeric strings
//! (HTML forms send them that way), missing fields take defaults, and a body
//! that is not a JSON object is treated as `{}`.

use axum::{body::Bytes, extract::State, response::Json, routing::post, Router};
use pricer_core::{ExerciseStyle, OptionType};
use pricer_models::payoff::compile_payoff;
use pricer_pricing::lattice::{price_lattice, LatticeParams};
use pricer_pricing::mc::{GbmParams, MonteCarloConfig, MonteCarloPricer};
use serde::Serialize;
use serde_json::{Map, Value};

use super::{ApiError, AppState};

/// Payoff used when the request does not name one.
pub const DEFAULT_PAYOFF: &str = "max(s - strike, 0)";

/// Build the pricing routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/price", post(monte_carlo_handler))
        .route("/api/price/lattice", post(lattice_handler))
}

/// Validated Monte Carlo request, echoed back as `inputs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonteCarloRequest {
    pub spot: f64,
    pub strike: f64,
    pub rate: f64,
    pub volatility: f64,
    pub maturity: f64,
    pub steps: usize,
    pub paths: usize,
    pub dividend_yield: f64,
    pub payoff_expression: String,
    /// As given; negative seeds select the stream of their absolute value.
    pub seed: Option<i64>,
}

/// Validated lattice request, echoed back as `inputs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatticeRequest {
    pub spot: f64,
    pub strike: f64,
    pub rate: f64,
    pub volatility: f64,
    pub maturity: f64,
    pub steps: usize,
    pub option_type: OptionType,
    pub exercise: ExerciseStyle,
    pub dividend_yield: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloResponse {
    pub price: f64,
    pub std_error: f64,
    pub inputs: MonteCarloRequest,
}

#[derive(Debug, Clone, Serialize)]
pub struct LatticeResponse {
    pub price: f64,
    pub inputs: LatticeRequest,
}

/// Loosely typed JSON object with per-field coercion.
struct Payload(Map<String, Value>);

impl Payload {
    fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => Payload(map),
            _ => Payload(Map::new()),
        }
    }

    fn float(&self, key: &str, default: f64) -> Result<f64, ApiError> {
        let parsed = match self.0.get(key) {
            None => Some(default),
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            Some(_) => None,
        };
        parsed.ok_or_else(|| ApiError::BadRequest(format!("{key} must be a number")))
    }

    fn integer(&self, key: &str, default: usize, maximum: usize) -> Result<usize, ApiError> {
        let parsed = match self.0.get(key) {
            None => Some(default as i64),
            Some(Value::Number(n)) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
            Some(_) => None,
        };
        let value =
            parsed.ok_or_else(|| ApiError::BadRequest(format!("{key} must be an integer")))?;

        if value < 1 {
            return Err(ApiError::BadRequest(format!("{key} must be at least 1")));
        }
        let value = value as usize;
        if value > maximum {
            return Err(ApiError::BadRequest(format!(
                "{key} must be at most {maximum}"
            )));
        }
        Ok(value)
    }

    fn optional_seed(&self, key: &str) -> Result<Option<i64>, ApiError> {
        let invalid = || ApiError::BadRequest(format!("{key} must be an integer or omitted"));
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if matches!(s.as_str(), "" | "none" | "null") => Ok(None),
            Some(Value::String(s)) => s.trim().parse::<i64>().map(Some).map_err(|_| invalid()),
            Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(invalid),
            Some(_) => Err(invalid()),
        }
    }

    fn text(&self, key: &str, default: &str) -> Result<String, ApiError> {
        match self.0.get(key) {
            None => Ok(default.to_string()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(ApiError::BadRequest(format!("{key} must be a string"))),
        }
    }
}

/// Parse a Monte Carlo request, applying defaults and the server limits.
pub fn parse_monte_carlo_request(
    body: &[u8],
    max_steps: usize,
    max_paths: usize,
) -> Result<MonteCarloRequest, ApiError> {
    let payload = Payload::from_body(body);
    Ok(MonteCarloRequest {
        spot: payload.float("spot", 100.0)?,
        strike: payload.float("strike", 100.0)?,
        rate: payload.float("rate", 0.05)?,
        volatility: payload.float("volatility", 0.2)?,
        maturity: payload.float("maturity", 1.0)?,
        steps: payload.integer("steps", 252, max_steps)?,
        paths: payload.integer("paths", 50_000, max_paths)?,
        dividend_yield: payload.float("dividend_yield", 0.0)?,
        payoff_expression: payload.text("payoff_expression", DEFAULT_PAYOFF)?,
        seed: payload.optional_seed("seed")?,
    })
}

/// Parse a lattice request, applying defaults and the step limit.
pub fn parse_lattice_request(body: &[u8], max_steps: usize) -> Result<LatticeRequest, ApiError> {
    let payload = Payload::from_body(body);
    Ok(LatticeRequest {
        spot: payload.float("spot", 100.0)?,
        strike: payload.float("strike", 100.0)?,
        rate: payload.float("rate", 0.05)?,
        volatility: payload.float("volatility", 0.2)?,
        maturity: payload.float("maturity", 1.0)?,
        steps: payload.integer("steps", 100, max_steps)?,
        option_type: payload.text("option_type", "call")?.parse()?,
        exercise: payload.text("exercise", "european")?.parse()?,
        dividend_yield: payload.float("dividend_yield", 0.0)?,
    })
}

/// POST /api/price - Monte Carlo pricing of an expression payoff
async fn monte_carlo_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MonteCarloResponse>, ApiError> {
    let request = parse_monte_carlo_request(&body, state.config.max_steps, state.config.max_paths)?;
    let payoff = compile_payoff(&request.payoff_expression, [("strike", request.strike)])?;

    let gbm = GbmParams {
        spot: request.spot,
        rate: request.rate,
        volatility: request.volatility,
        dividend_yield: request.dividend_yield,
        maturity: request.maturity,
    };
    let config = MonteCarloConfig::builder()
        .n_paths(request.paths)
        .n_steps(request.steps)
        .maybe_seed(request.seed.map(i64::unsigned_abs))
        .build()?;
    let pricer = MonteCarloPricer::new(config)?;

    let result = tokio::task::spawn_blocking(move || pricer.price(&gbm, &payoff)).await??;

    tracing::info!(
        spot = request.spot,
        strike = request.strike,
        steps = request.steps,
        paths = request.paths,
        seed = result.seed,
        payoff = %request.payoff_expression,
        price = result.price,
        std_error = result.std_error,
        "Monte Carlo price computed"
    );

    Ok(Json(MonteCarloResponse {
        price: result.price,
        std_error: result.std_error,
        inputs: request,
    }))
}

/// POST /api/price/lattice - CRR binomial lattice pricing
async fn lattice_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<LatticeResponse>, ApiError> {
    let request = parse_lattice_request(&body, state.config.max_steps)?;
    let params = LatticeParams {
        spot: request.spot,
        strike: request.strike,
        rate: request.rate,
        volatility: request.volatility,
        maturity: request.maturity,
        steps: request.steps,
        option_type: request.option_type,
        exercise: request.exercise,
        dividend_yield: request.dividend_yield,
    };

    let price = tokio::task::spawn_blocking(move || price_lattice(&params)).await??;

    tracing::info!(
        spot = request.spot,
        strike = request.strike,
        steps = request.steps,
        option_type = %request.option_type,
        exercise = %request.exercise,
        price,
        "Lattice price computed"
    );

    Ok(Json(LatticeResponse {
        price,
        inputs: request,
    }))
}
