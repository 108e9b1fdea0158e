//! Parse the model's reply into a field mapping
//!
//! Two strategies are tried in a fixed order: strict JSON, then the
//! permissive literal dialect in [`crate::literal`]. The first strategy that
//! parses decides the outcome; a strict parse that yields something other than
//! an object is not retried permissively. Nothing is stripped or repaired
//! before parsing.

use crate::literal::{self, Literal};
use csa_domain::{FieldMapping, FieldValue};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Which strategy produced a mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    /// `serde_json` on the full reply
    StrictJson,
    /// Literal-expression superset of JSON
    PermissiveLiteral,
}

impl fmt::Display for ParseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseStrategy::StrictJson => f.write_str("strict JSON"),
            ParseStrategy::PermissiveLiteral => f.write_str("permissive literal"),
        }
    }
}

/// A successfully parsed reply
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    /// The extracted fields
    pub mapping: FieldMapping,
    /// Strategy that accepted the reply
    pub strategy: ParseStrategy,
}

/// Why a reply was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailureReason {
    /// Neither strategy could parse the text
    Unparseable {
        /// Error from the strict JSON attempt
        strict: String,
        /// Error from the permissive attempt
        permissive: String,
    },
    /// Parsed, but the value is not a mapping of field names
    NotAMapping {
        /// Kind of value found instead
        found: &'static str,
    },
}

/// A rejected reply, carrying the raw text for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    raw: String,
    reason: ParseFailureReason,
}

impl ParseFailure {
    /// The reply exactly as received
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Why it was rejected
    pub fn reason(&self) -> &ParseFailureReason {
        &self.reason
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            ParseFailureReason::Unparseable { strict, permissive } => write!(
                f,
                "response is not valid JSON ({}) nor a literal mapping ({})",
                strict, permissive
            ),
            ParseFailureReason::NotAMapping { found } => {
                write!(f, "response is a {}, not a JSON object", found)
            }
        }
    }
}

impl std::error::Error for ParseFailure {}

/// Parse a model reply into a field mapping
pub fn parse_response(raw: &str) -> Result<ParsedResponse, ParseFailure> {
    let failure = |reason| ParseFailure {
        raw: raw.to_string(),
        reason,
    };

    let strict_error = match serde_json::from_str::<Value>(raw) {
        Ok(value) => {
            let mapping = json_mapping(value)
                .map_err(|found| failure(ParseFailureReason::NotAMapping { found }))?;
            return Ok(ParsedResponse {
                mapping,
                strategy: ParseStrategy::StrictJson,
            });
        }
        Err(e) => e.to_string(),
    };

    debug!(error = %strict_error, "Strict JSON parse failed, trying permissive literal parse");

    match literal::parse(raw) {
        Ok(lit) => {
            let mapping = literal_mapping(lit)
                .map_err(|found| failure(ParseFailureReason::NotAMapping { found }))?;
            Ok(ParsedResponse {
                mapping,
                strategy: ParseStrategy::PermissiveLiteral,
            })
        }
        Err(e) => Err(failure(ParseFailureReason::Unparseable {
            strict: strict_error,
            permissive: e.to_string(),
        })),
    }
}

fn json_mapping(value: Value) -> Result<FieldMapping, &'static str> {
    match value {
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(name, value)| (name, json_field_value(value)))
            .collect()),
        Value::Null => Err("null"),
        Value::Bool(_) => Err("boolean"),
        Value::Number(_) => Err("number"),
        Value::String(_) => Err("string"),
        Value::Array(_) => Err("list"),
    }
}

/// Coerce any JSON value to a field value; only null is absent
fn json_field_value(value: Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Absent,
        Value::String(text) => FieldValue::Text(text),
        other => FieldValue::Text(other.to_string()),
    }
}

fn literal_mapping(lit: Literal) -> Result<FieldMapping, &'static str> {
    let entries = match lit {
        Literal::Dict(entries) => entries,
        other => return Err(other.kind()),
    };

    let mut mapping = FieldMapping::new();
    for (key, value) in entries {
        let name = match key {
            Literal::Str(name) => name,
            _ => return Err("mapping with non-string keys"),
        };
        mapping.insert(name, literal_field_value(value));
    }
    Ok(mapping)
}

fn literal_field_value(lit: Literal) -> FieldValue {
    match lit {
        Literal::Null => FieldValue::Absent,
        Literal::Str(text) => FieldValue::Text(text),
        Literal::Number(text) => FieldValue::Text(text),
        Literal::Bool(b) => FieldValue::Text(b.to_string()),
        nested => FieldValue::Text(nested.to_json().to_string()),
    }
}
