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

//! The result envelope every operation returns.
//!
//! Serialized shapes:
//!
//! ```text
//! {"success": true, "data": ..., "message": "..."}   // data and/or message
//! {"success": false, "message": "...", "code": "NO_SUCH_BOARD"}
//! ```

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Stable machine-readable failure codes.
pub mod codes {
    pub const NOT_LOGGED_IN: &str = "NOT_LOGGED_IN";
    pub const VERIFY_FIRST: &str = "VERIFY_FIRST";
    pub const NO_SUCH_BOARD: &str = "NO_SUCH_BOARD";
    pub const NO_SUCH_POST: &str = "NO_SUCH_POST";
    pub const NO_PERMISSION: &str = "NO_PERMISSION";
    pub const LOGIN_FAILED: &str = "LOGIN_FAILED";
    pub const WRONG_CREDENTIALS: &str = "WRONG_CREDENTIALS";
    pub const CANT_RESPONSE: &str = "CANT_RESPONSE";
    pub const NO_FAST_COMMENT: &str = "NO_FAST_COMMENT";
    pub const NO_SUCH_USER: &str = "NO_SUCH_USER";
    pub const NO_SUCH_MAIL: &str = "NO_SUCH_MAIL";
    pub const MAILBOX_FULL: &str = "MAILBOX_FULL";
    pub const NO_MONEY: &str = "NO_MONEY";
    pub const SET_CONTACT_MAIL_FIRST: &str = "SET_CONTACT_MAIL_FIRST";
    pub const WRONG_PASSWORD: &str = "WRONG_PASSWORD";
    pub const NEED_MODERATOR_PERMISSION: &str = "NEED_MODERATOR_PERMISSION";
    pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

    pub const POST_NOT_FOUND: &str = "POST_NOT_FOUND";
    pub const MAIL_NOT_FOUND: &str = "MAIL_NOT_FOUND";
    pub const GET_BOARD_LIST_FAILED: &str = "GET_BOARD_LIST_FAILED";
    pub const GET_FAVOURITE_BOARDS_FAILED: &str = "GET_FAVOURITE_BOARDS_FAILED";
    pub const GET_AID_FROM_URL_FAILED: &str = "GET_AID_FROM_URL_FAILED";
    pub const GET_BOTTOM_POST_LIST_FAILED: &str = "GET_BOTTOM_POST_LIST_FAILED";

    pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
    pub const FOLLOW_PROMPTS: &str = "FOLLOW_PROMPTS";
}

/// Message returned whenever an operation needs a session and there is none.
pub const NOT_LOGGED_IN_MESSAGE: &str = "尚未登入，請先執行 login";

/// Uniform result of a gateway operation.
///
/// A failure always carries a code; a success never does.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Success {
        data: Option<Value>,
        message: Option<String>,
    },
    Failure {
        code: &'static str,
        message: String,
    },
}

impl Envelope {
    pub fn data(data: Value) -> Self {
        Self::Success {
            data: Some(data),
            message: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::Success {
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn data_with_message(data: Value, message: impl Into<String>) -> Self {
        Self::Success {
            data: Some(data),
            message: Some(message.into()),
        }
    }

    pub fn failure(code: &'static str, message: impl Into<String>) -> Self {
        Self::Failure {
            code,
            message: message.into(),
        }
    }

    pub fn not_logged_in() -> Self {
        Self::failure(codes::NOT_LOGGED_IN, NOT_LOGGED_IN_MESSAGE)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { code, .. } => Some(code),
        }
    }

    pub fn message_text(&self) -> Option<&str> {
        match self {
            Self::Success { message, .. } => message.as_deref(),
            Self::Failure { message, .. } => Some(message),
        }
    }
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success { data, message } => {
                let len = 1 + usize::from(data.is_some()) + usize::from(message.is_some());
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("success", &true)?;
                if let Some(data) = data {
                    map.serialize_entry("data", data)?;
                }
                if let Some(message) = message {
                    map.serialize_entry("message", message)?;
                }
                map.end()
            }
            Self::Failure { code, message } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("message", message)?;
                map.serialize_entry("code", code)?;
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_success_shapes() {
        assert_eq!(
            serde_json::to_value(Envelope::data(json!({"aid": "1abc"}))).unwrap(),
            json!({"success": true, "data": {"aid": "1abc"}})
        );
        assert_eq!(
            serde_json::to_value(Envelope::message("發文成功")).unwrap(),
            json!({"success": true, "message": "發文成功"})
        );
        assert_eq!(
            serde_json::to_value(Envelope::data_with_message(json!("12:00"), "ok")).unwrap(),
            json!({"success": true, "data": "12:00", "message": "ok"})
        );
    }

    #[test]
    fn test_failure_always_has_code() {
        let env = Envelope::not_logged_in();
        assert_eq!(env.code(), Some(codes::NOT_LOGGED_IN));
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({
                "success": false,
                "message": NOT_LOGGED_IN_MESSAGE,
                "code": "NOT_LOGGED_IN",
            })
        );
        assert_eq!(Envelope::message("x").code(), None);
    }
}
