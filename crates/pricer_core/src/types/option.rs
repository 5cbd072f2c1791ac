//! Option type and exercise style definitions.
//!
//! Both enums parse case-insensitively from their lowercase names and
//! serialise back to lowercase, which is the form used on every adapter
//! boundary (HTTP JSON, CLI flags).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::PricingError;

/// Option payoff direction.
///
/// # Examples
/// ```
/// use pricer_core::OptionType;
///
/// assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
/// assert_eq!(OptionType::Put.intrinsic(110.0, 100.0), 0.0);
/// assert_eq!("CALL".parse::<OptionType>().unwrap(), OptionType::Call);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Right to buy: pays `max(S - K, 0)`.
    #[default]
    Call,
    /// Right to sell: pays `max(K - S, 0)`.
    Put,
}

impl OptionType {
    /// Immediate exercise value of the option at underlying price `spot`.
    #[inline]
    pub fn intrinsic(self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    /// Lowercase name used on adapter boundaries.
    pub fn as_str(self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

impl FromStr for OptionType {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "call" => Ok(OptionType::Call),
            "put" => Ok(OptionType::Put),
            other => Err(PricingError::invalid_parameter(
                "option_type",
                format!("must be 'call' or 'put', got '{other}'"),
            )),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Option exercise style.
///
/// # Variants
/// - `European`: Exercise only at expiry
/// - `American`: Exercise at any lattice node up to expiry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseStyle {
    /// European style: exercise only at expiry.
    #[default]
    European,
    /// American style: exercise at any time before expiry.
    American,
}

impl ExerciseStyle {
    /// Returns `true` if early exercise is permitted.
    #[inline]
    pub fn allows_early_exercise(self) -> bool {
        matches!(self, ExerciseStyle::American)
    }

    /// Lowercase name used on adapter boundaries.
    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseStyle::European => "european",
            ExerciseStyle::American => "american",
        }
    }
}

impl FromStr for ExerciseStyle {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "european" => Ok(ExerciseStyle::European),
            "american" => Ok(ExerciseStyle::American),
            other => Err(PricingError::invalid_parameter(
                "exercise",
                format!("must be 'european' or 'american', got '{other}'"),
            )),
        }
    }
}

impl fmt::Display for ExerciseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intrinsic_values() {
        assert_eq!(OptionType::Call.intrinsic(105.0, 100.0), 5.0);
        assert_eq!(OptionType::Call.intrinsic(95.0, 100.0), 0.0);
        assert_eq!(OptionType::Put.intrinsic(95.0, 100.0), 5.0);
        assert_eq!(OptionType::Put.intrinsic(105.0, 100.0), 0.0);
    }

    #[test]
    fn test_option_type_parsing() {
        assert_eq!("call".parse::<OptionType>().unwrap(), OptionType::Call);
        assert_eq!(" Put ".parse::<OptionType>().unwrap(), OptionType::Put);
        assert!(matches!(
            "straddle".parse::<OptionType>(),
            Err(PricingError::InvalidParameter {
                name: "option_type",
                ..
            })
        ));
    }

    #[test]
    fn test_exercise_parsing() {
        assert_eq!(
            "European".parse::<ExerciseStyle>().unwrap(),
            ExerciseStyle::European
        );
        assert_eq!(
            "AMERICAN".parse::<ExerciseStyle>().unwrap(),
            ExerciseStyle::American
        );
        assert!("bermudan".parse::<ExerciseStyle>().is_err());
    }

    #[test]
    fn test_early_exercise_flag() {
        assert!(ExerciseStyle::American.allows_early_exercise());
        assert!(!ExerciseStyle::European.allows_early_exercise());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&OptionType::Put).unwrap(), "\"put\"");
        assert_eq!(
            serde_json::from_str::<ExerciseStyle>("\"american\"").unwrap(),
            ExerciseStyle::American
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for option_type in [OptionType::Call, OptionType::Put] {
            assert_eq!(option_type.to_string().parse::<OptionType>().unwrap(), option_type);
        }
    }
}
