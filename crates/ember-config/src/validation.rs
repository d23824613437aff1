//! Conversion of preset fields into typed controls.
//!
//! Every check returns [`ConfigError::InvalidParameter`] naming the field.
//!
//! # Example
//!
//! ```rust
//! use ember_config::validation::{parse_algorithm, parse_slope};
//! use ember_core::{Algorithm, FilterSlope};
//!
//! assert_eq!(parse_algorithm("soft-tanh").unwrap(), Algorithm::SoftTanh);
//! assert_eq!(parse_slope(24).unwrap(), FilterSlope::Slope24dB);
//! assert!(parse_slope(18).is_err());
//! ```

use std::ops::RangeInclusive;

use ember_core::{Algorithm, FilterSlope, OversampleQuality};

use crate::error::ConfigError;

/// Look up an algorithm by id or display name.
pub fn parse_algorithm(id: &str) -> Result<Algorithm, ConfigError> {
    Algorithm::from_id(id)
        .or_else(|| Algorithm::ALL.into_iter().find(|a| a.name().eq_ignore_ascii_case(id)))
        .ok_or_else(|| {
            let known: Vec<&str> = Algorithm::ALL.iter().map(|a| a.id()).collect();
            ConfigError::invalid(
                "algorithm",
                format!("unknown algorithm '{id}' (expected one of: {})", known.join(", ")),
            )
        })
}

/// Slope from its dB/oct value.
pub fn parse_slope(db: u32) -> Result<FilterSlope, ConfigError> {
    FilterSlope::from_db(db).ok_or_else(|| {
        ConfigError::invalid("post_slope", format!("{db} dB/oct is not 6, 12, 24 or 48"))
    })
}

/// Quality from its oversampling factor.
pub fn parse_quality(factor: u32) -> Result<OversampleQuality, ConfigError> {
    OversampleQuality::from_factor(factor as usize).ok_or_else(|| {
        ConfigError::invalid("quality", format!("{factor}x is not 1, 2, 4, 8 or 16"))
    })
}

/// Reject values outside `range`, including NaN.
pub fn check_range(
    param: &str,
    value: f64,
    range: &RangeInclusive<f64>,
) -> Result<f64, ConfigError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::invalid(
            param,
            format!("{value} outside [{}, {}]", range.start(), range.end()),
        ))
    }
}
