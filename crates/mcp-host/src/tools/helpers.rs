// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Shared helper functions for MCP tools: argument extraction and translation

use crate::envelope::{Envelope, codes};
use ptt_client::{Args, InvalidToken, SearchType, Token};
use serde_json::{Value, json};
use thiserror::Error;

/// A tool call whose arguments cannot be turned into a board call.
#[derive(Debug, Error)]
pub enum ArgumentError {
    #[error("missing required argument '{0}'")]
    Missing(&'static str),
    #[error("argument '{name}' must be {expected}")]
    WrongType {
        name: &'static str,
        expected: &'static str,
    },
    #[error(transparent)]
    Token(#[from] InvalidToken),
}

impl From<ArgumentError> for Envelope {
    fn from(err: ArgumentError) -> Self {
        Envelope::failure(codes::INVALID_ARGUMENT, err.to_string())
    }
}

pub type ArgResult<T> = Result<T, ArgumentError>;

/// Look up an argument, treating explicit `null` as absent.
fn get<'a>(args: &'a Value, name: &str) -> Option<&'a Value> {
    args.get(name).filter(|v| !v.is_null())
}

pub fn required_str(args: &Value, name: &'static str) -> ArgResult<String> {
    optional_str(args, name)?.ok_or(ArgumentError::Missing(name))
}

pub fn optional_str(args: &Value, name: &'static str) -> ArgResult<Option<String>> {
    match get(args, name) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ArgumentError::WrongType {
            name,
            expected: "a string",
        }),
    }
}

pub fn required_int(args: &Value, name: &'static str) -> ArgResult<i64> {
    optional_int(args, name)?.ok_or(ArgumentError::Missing(name))
}

pub fn optional_int(args: &Value, name: &'static str) -> ArgResult<Option<i64>> {
    match get(args, name) {
        None => Ok(None),
        Some(v) => v.as_i64().map(Some).ok_or(ArgumentError::WrongType {
            name,
            expected: "an integer",
        }),
    }
}

pub fn int_or(args: &Value, name: &'static str, default: i64) -> ArgResult<i64> {
    Ok(optional_int(args, name)?.unwrap_or(default))
}

pub fn bool_or(args: &Value, name: &'static str, default: bool) -> ArgResult<bool> {
    match get(args, name) {
        None => Ok(default),
        Some(v) => v.as_bool().ok_or(ArgumentError::WrongType {
            name,
            expected: "a boolean",
        }),
    }
}

/// Signature file selector: a number or `"x"` for random, sent as given.
pub fn sign_file(args: &Value) -> ArgResult<Value> {
    match get(args, "sign_file") {
        None => Ok(json!("0")),
        Some(v @ (Value::String(_) | Value::Number(_))) => Ok(v.clone()),
        Some(_) => Err(ArgumentError::WrongType {
            name: "sign_file",
            expected: "a string or integer",
        }),
    }
}

/// Resolve a token argument such as `comment_type` to its enumeration.
pub fn required_token<T: Token>(args: &Value, name: &'static str) -> ArgResult<T> {
    Ok(T::parse_token(&required_str(args, name)?)?)
}

/// A list of `[kind, value]` string pairs.
pub fn pair_list(args: &Value, name: &'static str) -> ArgResult<Option<Vec<(String, String)>>> {
    let wrong = ArgumentError::WrongType {
        name,
        expected: "a list of [kind, value] string pairs",
    };
    let Some(value) = get(args, name) else {
        return Ok(None);
    };
    let Some(items) = value.as_array() else {
        return Err(wrong);
    };

    let mut pairs = Vec::with_capacity(items.len());
    for item in items {
        match item.as_array().map(|a| a.as_slice()) {
            Some([Value::String(kind), Value::String(value)]) => {
                pairs.push((kind.clone(), value.clone()))
            }
            _ => return Err(wrong),
        }
    }
    Ok(Some(pairs))
}

/// Translate a search list into the client's `[[TYPE, condition], ...]` form.
pub fn search_list(pairs: &[(String, String)]) -> ArgResult<Value> {
    let resolved = SearchType::parse_list(pairs)?;
    Ok(Value::Array(
        resolved
            .into_iter()
            .map(|(kind, condition)| json!([kind, condition]))
            .collect(),
    ))
}

/// Build call arguments from `(name, value)` pairs.
pub fn call_args<const N: usize>(pairs: [(&str, Value); N]) -> Args {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// JSON schema for a search list argument.
pub fn search_list_schema(description: &str) -> Value {
    json!({
        "type": "array",
        "description": description,
        "items": {
            "type": "array",
            "items": { "type": "string" },
            "minItems": 2,
            "maxItems": 2
        }
    })
}
