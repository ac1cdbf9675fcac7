//! Validators for configuration values.
//!
//! A validator looks at the final merged value of one key and either accepts
//! it or explains what is wrong. The generators here cover the common cases;
//! any `Fn(&str) -> Result<(), ValidationError>` closure works as well.

use regex_lite::Regex;
use std::num::ParseIntError;
use thiserror::Error;

/// Reason a value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("must match {pattern}")]
    NoMatch { pattern: String },

    #[error("invalid pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("must not be empty")]
    Empty,

    #[error("value {value} is not a valid integer: {source}")]
    NotAnInteger {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("value {value} is negative")]
    Negative { value: String },

    #[error("value {value} is out of range [{min}..{max}]")]
    OutOfRange { value: String, min: i128, max: i128 },

    #[error("value {value} is not a valid boolean value")]
    NotBoolean { value: String },

    #[error("value {value} is not a valid regex pattern")]
    NotRegex { value: String },

    #[error("cannot be empty")]
    NoCharacter,

    #[error("cannot consist of multiple characters")]
    MultipleCharacters,

    #[error("{0}")]
    Custom(String),
}

impl ValidationError {
    /// Failure with a free-form message, for hand-written validators.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

/// Checks a configuration value.
pub trait Validate: Send + Sync {
    fn validate(&self, value: &str) -> Result<(), ValidationError>;
}

impl<F> Validate for F
where
    F: Fn(&str) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, value: &str) -> Result<(), ValidationError> {
        self(value)
    }
}

// --- generators for common validators ---

/// Value must contain a match for `pattern`. Use `^`/`$` to match the whole value.
///
/// An invalid pattern is reported every time the validator runs.
pub fn pattern(pattern: &str) -> impl Validate + use<> {
    let pattern = pattern.to_string();
    let compiled = Regex::new(&pattern).map_err(|e| e.to_string());
    move |value: &str| match &compiled {
        Ok(re) if re.is_match(value) => Ok(()),
        Ok(_) => Err(ValidationError::NoMatch {
            pattern: pattern.clone(),
        }),
        Err(reason) => Err(ValidationError::InvalidPattern {
            pattern: pattern.clone(),
            reason: reason.clone(),
        }),
    }
}

pub fn not_empty() -> impl Validate {
    |value: &str| {
        if value.is_empty() {
            Err(ValidationError::Empty)
        } else {
            Ok(())
        }
    }
}

/// Value must be a non-negative integer in `[min, max]`.
pub fn uint_range(min: u64, max: u64) -> impl Validate {
    move |value: &str| {
        let n = parse_uint(value)?;
        if n < min || n > max {
            return Err(ValidationError::OutOfRange {
                value: value.to_string(),
                min: min.into(),
                max: max.into(),
            });
        }
        Ok(())
    }
}

/// Value must be an integer in `[min, max]`.
pub fn int_range(min: i64, max: i64) -> impl Validate {
    move |value: &str| {
        let n = parse_int(value)?;
        if n < min || n > max {
            return Err(ValidationError::OutOfRange {
                value: value.to_string(),
                min: min.into(),
                max: max.into(),
            });
        }
        Ok(())
    }
}

pub fn is_boolean() -> impl Validate {
    |value: &str| {
        parse_bool(value)
            .map(|_| ())
            .ok_or_else(|| ValidationError::NotBoolean {
                value: value.to_string(),
            })
    }
}

/// Value must itself compile as a regular expression.
pub fn is_regex() -> impl Validate {
    |value: &str| {
        Regex::new(value)
            .map(|_| ())
            .map_err(|_| ValidationError::NotRegex {
                value: value.to_string(),
            })
    }
}

/// Value must be exactly one character (Unicode scalar value).
pub fn single_character() -> impl Validate {
    |value: &str| {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Err(ValidationError::NoCharacter),
            (Some(_), Some(_)) => Err(ValidationError::MultipleCharacters),
            (Some(_), None) => Ok(()),
        }
    }
}

// --- conversion helpers ---

/// Strict base-10 parse: optional sign, digits, nothing else.
pub fn parse_int(s: &str) -> Result<i64, ValidationError> {
    s.parse::<i64>()
        .map_err(|source| ValidationError::NotAnInteger {
            value: s.to_string(),
            source,
        })
}

/// Like [`parse_int`], but negative values are rejected separately.
pub fn parse_uint(s: &str) -> Result<u64, ValidationError> {
    let n = parse_int(s)?;
    u64::try_from(n).map_err(|_| ValidationError::Negative {
        value: s.to_string(),
    })
}

/// Accepts `1`, `0`, and `t`, `f`, `true`, `false` in any case.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" => Some(true),
        "0" => Some(false),
        s if s.eq_ignore_ascii_case("t") || s.eq_ignore_ascii_case("true") => Some(true),
        s if s.eq_ignore_ascii_case("f") || s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}
