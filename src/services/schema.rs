//! Response schemas for the JSON-returning call sites
//!
//! Keys are read by exact name. Types are checked, values are not: a score of
//! 7.5 or a sentiment of "mixto" passes through untouched.

use crate::models::Evaluation;
use crate::utils::error::{CallSite, ParseError};
use serde_json::{Map, Value};

pub const KEY_SCORE: &str = "evaluation_score";
pub const KEY_HALLUCINATION: &str = "hallucination";
pub const KEY_COMMENT: &str = "comentario";
pub const KEY_SENTIMENT: &str = "sentimiento";
pub const KEY_TOXIC: &str = "toxico";

/// Parse a model reply as a JSON object
pub fn parse_object(site: CallSite, text: &str) -> Result<Map<String, Value>, ParseError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ParseError::invalid_json(
            site,
            format!("expected an object, got {}", json_type(&other)),
        )),
        Err(e) => Err(ParseError::invalid_json(site, e.to_string())),
    }
}

fn field<'a>(
    site: CallSite,
    map: &'a Map<String, Value>,
    key: &'static str,
) -> Result<&'a Value, ParseError> {
    map.get(key).ok_or_else(|| ParseError::missing_key(site, key))
}

pub fn require_f64(
    site: CallSite,
    map: &Map<String, Value>,
    key: &'static str,
) -> Result<f64, ParseError> {
    field(site, map, key)?
        .as_f64()
        .ok_or_else(|| ParseError::wrong_type(site, key, "number"))
}

pub fn require_bool(
    site: CallSite,
    map: &Map<String, Value>,
    key: &'static str,
) -> Result<bool, ParseError> {
    field(site, map, key)?
        .as_bool()
        .ok_or_else(|| ParseError::wrong_type(site, key, "boolean"))
}

pub fn require_string(
    site: CallSite,
    map: &Map<String, Value>,
    key: &'static str,
) -> Result<String, ParseError> {
    field(site, map, key)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ParseError::wrong_type(site, key, "string"))
}

/// `{"evaluation_score": number, "hallucination": bool, "comentario": string}`
pub fn parse_evaluation(text: &str) -> Result<Evaluation, ParseError> {
    let site = CallSite::Evaluation;
    let map = parse_object(site, text)?;

    Ok(Evaluation {
        score: require_f64(site, &map, KEY_SCORE)?,
        hallucination: require_bool(site, &map, KEY_HALLUCINATION)?,
        comment: require_string(site, &map, KEY_COMMENT)?,
    })
}

/// `{"sentimiento": string}`
pub fn parse_sentiment(site: CallSite, text: &str) -> Result<String, ParseError> {
    let map = parse_object(site, text)?;
    require_string(site, &map, KEY_SENTIMENT)
}

/// `{"toxico": bool}`
pub fn parse_toxicity(site: CallSite, text: &str) -> Result<bool, ParseError> {
    let map = parse_object(site, text)?;
    require_bool(site, &map, KEY_TOXIC)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
