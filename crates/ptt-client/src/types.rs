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

//! Enumerated argument values understood by the board client.
//!
//! Callers name these with human-readable tokens ("PUSH", "keyword", ...).
//! Tokens resolve case-insensitively against a fixed table; anything else is
//! an [`InvalidToken`] and must never reach the client.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;

/// A token that did not resolve to any member of its enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {what} '{token}' (expected one of: {expected})")]
pub struct InvalidToken {
    pub what: &'static str,
    pub token: String,
    pub expected: String,
}

/// Enumerations that can be named by a caller-supplied token.
pub trait Token: FromStr + IntoEnumIterator + std::fmt::Display {
    /// What the token selects, for error messages.
    const WHAT: &'static str;

    fn parse_token(token: &str) -> Result<Self, InvalidToken> {
        Self::from_str(token.trim()).map_err(|_| InvalidToken {
            what: Self::WHAT,
            token: token.to_string(),
            expected: Self::iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

/// Search criteria for post and mail listings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchType {
    Keyword,
    Author,
    Comment,
    Mark,
    Money,
}

impl Token for SearchType {
    const WHAT: &'static str = "search type";
}

impl SearchType {
    /// Resolve a list of `(kind, condition)` pairs, failing on the first bad kind.
    pub fn parse_list<S: AsRef<str>>(
        pairs: &[(S, S)],
    ) -> Result<Vec<(SearchType, String)>, InvalidToken> {
        pairs
            .iter()
            .map(|(kind, condition)| {
                Ok((
                    SearchType::parse_token(kind.as_ref())?,
                    condition.as_ref().to_string(),
                ))
            })
            .collect()
    }
}

/// Comment (push) kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommentType {
    Push,
    Boo,
    Arrow,
}

impl Token for CommentType {
    const WHAT: &'static str = "comment type";
}

/// Which index `get_newest_index` reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NewIndex {
    Board,
    Mail,
}

impl Token for NewIndex {
    const WHAT: &'static str = "index type";
}

/// Destination of a reply.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplyTo {
    Board,
    Mail,
    BoardMail,
}

impl Token for ReplyTo {
    const WHAT: &'static str = "reply target";
}
