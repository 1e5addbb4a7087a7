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

//! Session client interfaces for the PTT bulletin board.
//!
//! The board protocol itself lives in an external client library. This crate
//! defines the seam the gateway talks through:
//!
//! - [`SessionClient`] - the single `invoke(op, args)` call surface of one
//!   logged-in (or logging-in) session.
//! - [`ClientFactory`] - constructs a fresh client for each login attempt.
//! - [`PttError`] - the closed taxonomy of failures a client may raise.
//! - [`types`] - enumerated argument values understood by the client.
//! - [`bridge`] - the concrete transport: a child process speaking
//!   newline-delimited JSON over stdio.

pub mod bridge;
pub mod error;
pub mod types;

use serde_json::Value;
use std::future::Future;

pub use bridge::{BridgeClient, BridgeConfig, BridgeFactory};
pub use error::PttError;
pub use types::{CommentType, InvalidToken, NewIndex, ReplyTo, SearchType, Token};

/// Keyword arguments for one invocation, keyed by parameter name.
pub type Args = serde_json::Map<String, Value>;

/// One session with the board.
///
/// A client starts out unauthenticated; the gateway drives `login` and
/// `logout` through [`SessionClient::invoke`] like any other operation.
/// Calls are strictly sequential: the `&mut self` receiver guarantees at most
/// one request is in flight per client.
pub trait SessionClient {
    /// Invoke a named operation with keyword arguments.
    ///
    /// An empty payload (`null`, `{}`, `[]`, ...) is a successful return; only
    /// raised failures come back as `Err`.
    fn invoke(
        &mut self,
        op: &str,
        args: &Args,
    ) -> impl Future<Output = Result<Value, PttError>> + Send;
}

/// Creates unauthenticated clients, one per login attempt.
pub trait ClientFactory {
    type Client: SessionClient;

    fn create(&self) -> Result<Self::Client, PttError>;
}
