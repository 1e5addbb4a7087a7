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

//! Command gateway
//!
//! The single path every session-bound operation goes through: check for a
//! session, invoke, then shape the outcome into an [`Envelope`].

use crate::classify::{classify, interpolate};
use crate::envelope::Envelope;
use crate::session::SessionContext;
use ptt_client::{Args, ClientFactory, PttError, SessionClient};
use serde_json::Value;
use tracing::{debug, warn};

/// Treat an empty payload as this failure.
///
/// The board client reports "no such item" for several reads as an empty
/// success rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyPolicy {
    pub code: &'static str,
    /// May interpolate call arguments, e.g. `找不到看板: {board}`.
    pub message: &'static str,
}

/// What a successful call hands back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessShape {
    /// The payload, as returned.
    Data,
    /// Acknowledgement only: the payload is dropped.
    Ack(&'static str),
    /// The payload plus a message.
    DataWithMessage(&'static str),
}

/// Static description of one catalog operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub empty: Option<EmptyPolicy>,
    pub success: SuccessShape,
}

impl Operation {
    pub const fn data(name: &'static str) -> Self {
        Self {
            name,
            empty: None,
            success: SuccessShape::Data,
        }
    }

    pub const fn ack(name: &'static str, message: &'static str) -> Self {
        Self {
            name,
            empty: None,
            success: SuccessShape::Ack(message),
        }
    }

    pub const fn data_with_message(name: &'static str, message: &'static str) -> Self {
        Self {
            name,
            empty: None,
            success: SuccessShape::DataWithMessage(message),
        }
    }

    pub const fn empty_is(mut self, code: &'static str, message: &'static str) -> Self {
        self.empty = Some(EmptyPolicy { code, message });
        self
    }

    /// Shape a successful payload.
    fn on_success(&self, payload: Value, args: &Args) -> Envelope {
        if let Some(policy) = self.empty
            && is_empty_payload(&payload)
        {
            return Envelope::failure(policy.code, interpolate(policy.message, args));
        }
        match self.success {
            SuccessShape::Data => Envelope::data(payload),
            SuccessShape::Ack(message) => Envelope::message(message),
            SuccessShape::DataWithMessage(message) => Envelope::data_with_message(payload, message),
        }
    }
}

/// Falsy payloads: `null`, `false`, `0`, `""`, `[]`, `{}`.
pub fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Errors after which the stored client cannot be trusted.
fn session_is_dead(err: &PttError) -> bool {
    matches!(err, PttError::RequireLogin(_) | PttError::Transport(_))
}

/// Run one operation against the current session.
pub async fn dispatch<F: ClientFactory>(
    session: &mut SessionContext<F>,
    op: &Operation,
    args: Args,
) -> Envelope {
    let Some(client) = session.client_mut() else {
        debug!("{} rejected: not logged in", op.name);
        return Envelope::not_logged_in();
    };

    debug!("Dispatching {}", op.name);
    match client.invoke(op.name, &args).await {
        Ok(payload) => op.on_success(payload, &args),
        Err(e) => {
            if session_is_dead(&e) {
                warn!("{} failed with {}, discarding session: {}", op.name, e.kind(), e);
                session.invalidate();
            } else {
                debug!("{} failed with {}: {}", op.name, e.kind(), e);
            }
            classify(&e, &args)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::codes;
    use crate::testing::{ScriptedFactory, credentials};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    const GET_POST: Operation = Operation::data("get_post")
        .empty_is(codes::POST_NOT_FOUND, "找不到文章或文章可能已被刪除");
    const GET_BOARD_INFO: Operation =
        Operation::data("get_board_info").empty_is(codes::NO_SUCH_BOARD, "找不到看板: {board}");
    const POST: Operation = Operation::ack("post", "發文成功");

    fn board(name: &str) -> Args {
        let mut args = Args::new();
        args.insert("board".into(), json!(name));
        args
    }

    async fn logged_in(factory: &ScriptedFactory) -> SessionContext<ScriptedFactory> {
        let mut session = SessionContext::new(factory.clone(), credentials());
        session.login().await;
        session
    }

    #[tokio::test]
    async fn test_no_session_never_reaches_client() {
        let factory = ScriptedFactory::new();
        let mut session = SessionContext::new(factory.clone(), credentials());

        let env = dispatch(&mut session, &GET_POST, board("Gossiping")).await;
        assert_eq!(env, Envelope::not_logged_in());
        assert!(factory.calls().is_empty());
    }

    #[tokio::test]
    async fn test_data_passes_through() {
        let factory = ScriptedFactory::new();
        let mut session = logged_in(&factory).await;
        factory.respond("get_post", Ok(json!({"title": "[問卦] test"})));

        let env = dispatch(&mut session, &GET_POST, board("Gossiping")).await;
        assert_eq!(env, Envelope::data(json!({"title": "[問卦] test"})));

        let last = factory.calls().pop().unwrap();
        assert_eq!(last.op, "get_post");
        assert_eq!(last.args["board"], "Gossiping");
    }

    #[test_case(json!(null); "null")]
    #[test_case(json!({}); "empty object")]
    #[test_case(json!([]); "empty list")]
    #[test_case(json!(""); "empty string")]
    #[tokio::test]
    async fn test_empty_payload_is_not_found(payload: Value) {
        let factory = ScriptedFactory::new();
        let mut session = logged_in(&factory).await;
        factory.respond("get_post", Ok(payload));

        let env = dispatch(&mut session, &GET_POST, board("Gossiping")).await;
        assert_eq!(env.code(), Some(codes::POST_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_empty_message_interpolates_args() {
        let factory = ScriptedFactory::new();
        let mut session = logged_in(&factory).await;
        factory.respond("get_board_info", Ok(json!({})));

        let env = dispatch(&mut session, &GET_BOARD_INFO, board("Gossiping")).await;
        assert_eq!(
            env,
            Envelope::failure(codes::NO_SUCH_BOARD, "找不到看板: Gossiping")
        );
    }

    #[tokio::test]
    async fn test_ack_drops_payload() {
        let factory = ScriptedFactory::new();
        let mut session = logged_in(&factory).await;
        factory.respond("post", Ok(json!({"aid": "1Zabc"})));

        let env = dispatch(&mut session, &POST, board("Test")).await;
        assert_eq!(env, Envelope::message("發文成功"));
    }

    #[tokio::test]
    async fn test_ack_without_policy_accepts_empty() {
        let factory = ScriptedFactory::new();
        let mut session = logged_in(&factory).await;
        factory.respond("post", Ok(Value::Null));

        let env = dispatch(&mut session, &POST, board("Test")).await;
        assert!(env.is_success());
    }

    #[tokio::test]
    async fn test_raised_error_is_classified() {
        let factory = ScriptedFactory::new();
        let mut session = logged_in(&factory).await;
        factory.respond("post", Err(PttError::NoSuchBoard("x".into())));

        let env = dispatch(&mut session, &POST, board("Gossiping")).await;
        assert_eq!(
            env,
            Envelope::failure(codes::NO_SUCH_BOARD, "找不到看板: Gossiping")
        );
        assert!(session.is_logged_in());
    }

    #[tokio::test]
    async fn test_dead_session_is_discarded() {
        let factory = ScriptedFactory::new();
        let mut session = logged_in(&factory).await;
        factory.respond("get_post", Err(PttError::Transport("eof".into())));

        let env = dispatch(&mut session, &GET_POST, board("Gossiping")).await;
        assert_eq!(env.code(), Some(codes::UNKNOWN_ERROR));
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_empty_payload_rules() {
        assert!(is_empty_payload(&json!(0)));
        assert!(is_empty_payload(&json!(false)));
        assert!(!is_empty_payload(&json!(1)));
        assert!(!is_empty_payload(&json!(["Gossiping", "1Zabc"])));
        assert!(!is_empty_payload(&json!(true)));
    }
}
