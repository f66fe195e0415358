//! Unified error handling for `ai-embedding-service`.
//!
//! This module exposes a single top-level error type [`EmbeddingServiceError`]
//! for the whole library and groups config-time failures in [`ConfigError`].
//! Small helpers for reading/validating environment values are provided and
//! return the unified [`Result<T>`] alias.
//!
//! All messages include the suffix `[Embedding Service]` to simplify attribution in logs.

use reqwest::StatusCode;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, EmbeddingServiceError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-embedding-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EmbeddingServiceError {
    /// Configuration/validation errors (startup only).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Underlying HTTP transport error (connection refused, TLS, ...).
    #[error("[Embedding Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// Upstream returned a non-successful HTTP status.
    #[error("[Embedding Service] HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    /// Response payload could not be decoded as expected.
    #[error("[Embedding Service] decode error: {0}")]
    Decode(String),

    /// The model returned a vector of unexpected length.
    #[error("[Embedding Service] embedding dimension mismatch: got {got}, want {want}")]
    DimensionMismatch { got: usize, want: usize },
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[Embedding Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (ports, dimensions, timeouts).
    #[error("[Embedding Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[Embedding Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        var: &'static str,
        reason: &'static str,
    },

    /// A numeric field was outside of the allowed range.
    #[error("[Embedding Service] {field} is out of range: {detail}")]
    OutOfRange {
        field: &'static str,
        detail: &'static str,
    },

    /// Model name was empty.
    #[error("[Embedding Service] model name must not be empty")]
    EmptyModel,
}

/* ------------------------------------------------------------------------- */
/* Env helpers                                                               */
/* ------------------------------------------------------------------------- */

/// Parses an optional number through `lookup` (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the value is set but does not parse.
pub fn opt_number<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(v) if !v.trim().is_empty() => v.trim().parse::<T>().map(Some).map_err(|_| {
            EmbeddingServiceError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected a number",
            })
        }),
        _ => Ok(None),
    }
}

/* ------------------------------------------------------------------------- */
/* Validation helpers                                                        */
/* ------------------------------------------------------------------------- */

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ConfigError::InvalidFormat`] otherwise.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Validates that a floating-point value lies within an inclusive range.
///
/// # Errors
/// Returns [`ConfigError::OutOfRange`] if `value` is outside `[min, max]` or not finite.
pub fn validate_range_f32(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            detail: "expected value in inclusive range",
        }
        .into())
    }
}

/// Trims an upstream body to a short single-line snippet for error messages.
pub fn make_snippet(text: &str) -> String {
    text.chars()
        .take(240)
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |k| {
            pairs
                .iter()
                .find(|(name, _)| *name == k)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn opt_number_parses_and_reports() {
        let lookup = lookup_from(&[("EMBEDDING_DIM", "384"), ("EMBEDDING_TIMEOUT_MS", "soon")]);
        let dim: Option<usize> = opt_number(&lookup, "EMBEDDING_DIM").unwrap();
        assert_eq!(dim, Some(384));

        let missing: Option<usize> = opt_number(&lookup, "NOT_SET").unwrap();
        assert_eq!(missing, None);

        let bad = opt_number::<_, u64>(&lookup, "EMBEDDING_TIMEOUT_MS");
        assert!(bad.is_err());
    }

    #[test]
    fn endpoint_and_range_validation() {
        assert!(validate_http_endpoint("OLLAMA_URL", "http://localhost:11434").is_ok());
        assert!(validate_http_endpoint("OLLAMA_URL", "localhost:11434").is_err());
        assert!(validate_range_f32("threshold", 0.65, 0.0, 1.0).is_ok());
        assert!(validate_range_f32("threshold", 1.5, 0.0, 1.0).is_err());
        assert!(validate_range_f32("threshold", f32::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn snippet_is_single_line_and_bounded() {
        let long = "x\n".repeat(500);
        let s = make_snippet(&long);
        assert!(!s.contains('\n'));
        assert!(s.chars().count() <= 240);
    }
}
