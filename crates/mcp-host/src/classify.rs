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

//! Error classification
//!
//! Maps every [`PttError`] onto a stable `(code, message)` failure. Message
//! templates may name call arguments as `{board}`; `{a|b}` takes the first of
//! `a`, `b` present in the call. Errors outside the table fall through to
//! `UNKNOWN_ERROR`, which echoes the cause and the call arguments.

use crate::envelope::{Envelope, NOT_LOGGED_IN_MESSAGE, codes};
use ptt_client::{Args, PttError};
use serde_json::Value;

/// Arguments whose values never appear in messages.
const SECRET_ARGS: &[&str] = &["ptt_pw", "new_password"];

/// Classification row for a known error kind, `None` for the fallback.
fn entry(err: &PttError) -> Option<(&'static str, &'static str)> {
    let row = match err {
        PttError::RequireLogin(_) => (codes::NOT_LOGGED_IN, NOT_LOGGED_IN_MESSAGE),
        PttError::UnregisteredUser(_) => (codes::VERIFY_FIRST, "未註冊使用者"),
        PttError::NoSuchBoard(_) => (codes::NO_SUCH_BOARD, "找不到看板: {board}"),
        PttError::NoSuchPost(_) => (codes::NO_SUCH_POST, "在看板 {board} 中找不到文章 AID: {aid}"),
        PttError::NoPermission(_) => (codes::NO_PERMISSION, "沒有權限"),
        PttError::LoginError(_) => (codes::LOGIN_FAILED, "登入失敗"),
        PttError::WrongIdOrPassword(_) => (codes::WRONG_CREDENTIALS, "帳號或密碼錯誤"),
        PttError::CantResponse(_) => (codes::CANT_RESPONSE, "已結案並標記, 不得回應"),
        PttError::NoFastComment(_) => (codes::NO_FAST_COMMENT, "推文間隔太短"),
        PttError::NoSuchUser(_) => (codes::NO_SUCH_USER, "找不到使用者: {ptt_id|user_id}"),
        PttError::NoSuchMail(_) => (codes::NO_SUCH_MAIL, "找不到信件: {index}"),
        PttError::MailboxFull(_) => (codes::MAILBOX_FULL, "信箱已滿"),
        PttError::NoMoney(_) => (codes::NO_MONEY, "餘額不足"),
        PttError::SetContactMailFirst(_) => (codes::SET_CONTACT_MAIL_FIRST, "請先設定聯絡信箱"),
        PttError::WrongPassword(_) => (codes::WRONG_PASSWORD, "密碼錯誤"),
        PttError::NeedModeratorPermission(_) => (codes::NEED_MODERATOR_PERMISSION, "需要板主權限"),
        PttError::Transport(_) | PttError::Unknown { .. } => return None,
    };
    Some(row)
}

/// Classify a raised error into a failure envelope.
pub fn classify(err: &PttError, args: &Args) -> Envelope {
    match entry(err) {
        Some((code, template)) => Envelope::failure(code, interpolate(template, args)),
        None => Envelope::failure(
            codes::UNKNOWN_ERROR,
            format!("發生未知錯誤: {} (參數: {})", err, render_args(args)),
        ),
    }
}

/// Fill `{name}` / `{a|b}` placeholders from call arguments.
///
/// Placeholders naming no argument in the call are left as written.
pub fn interpolate(template: &str, args: &Args) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let placeholder = &after[..close];
        match placeholder.split('|').find_map(|name| args.get(name.trim())) {
            Some(value) => out.push_str(&display_value(value)),
            None => {
                out.push('{');
                out.push_str(placeholder);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_args(args: &Args) -> String {
    let redacted: Args = args
        .iter()
        .map(|(k, v)| {
            let v = if SECRET_ARGS.contains(&k.as_str()) {
                Value::String("***".to_string())
            } else {
                v.clone()
            };
            (k.clone(), v)
        })
        .collect();
    Value::Object(redacted).to_string()
}
