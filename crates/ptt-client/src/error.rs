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

//! Failures raised by a session client.

use thiserror::Error;

/// Every failure kind the board client can raise.
///
/// The named variants mirror the client library's exception kinds. Anything
/// else it reports lands in [`PttError::Unknown`] with the original kind name
/// preserved, and breakage of the bridge itself is [`PttError::Transport`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PttError {
    #[error("login required: {0}")]
    RequireLogin(String),
    #[error("unregistered user: {0}")]
    UnregisteredUser(String),
    #[error("no such board: {0}")]
    NoSuchBoard(String),
    #[error("no such post: {0}")]
    NoSuchPost(String),
    #[error("no permission: {0}")]
    NoPermission(String),
    #[error("login failed: {0}")]
    LoginError(String),
    #[error("wrong id or password: {0}")]
    WrongIdOrPassword(String),
    #[error("cannot respond to post: {0}")]
    CantResponse(String),
    #[error("commenting too fast: {0}")]
    NoFastComment(String),
    #[error("no such user: {0}")]
    NoSuchUser(String),
    #[error("no such mail: {0}")]
    NoSuchMail(String),
    #[error("mailbox full: {0}")]
    MailboxFull(String),
    #[error("insufficient balance: {0}")]
    NoMoney(String),
    #[error("contact mail must be set first: {0}")]
    SetContactMailFirst(String),
    #[error("wrong password: {0}")]
    WrongPassword(String),
    #[error("moderator permission required: {0}")]
    NeedModeratorPermission(String),
    #[error("bridge transport error: {0}")]
    Transport(String),
    #[error("{kind}: {message}")]
    Unknown { kind: String, message: String },
}

impl PttError {
    /// Map a kind name reported by the client library onto a variant.
    ///
    /// Kind names are the library's exception class names. Names outside the
    /// known set are kept verbatim in [`PttError::Unknown`].
    pub fn from_kind(kind: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            "RequireLogin" => Self::RequireLogin(message),
            "UnregisteredUser" => Self::UnregisteredUser(message),
            "NoSuchBoard" => Self::NoSuchBoard(message),
            "NoSuchPost" => Self::NoSuchPost(message),
            "NoPermission" => Self::NoPermission(message),
            "LoginError" => Self::LoginError(message),
            "WrongIDorPassword" => Self::WrongIdOrPassword(message),
            "CantResponse" => Self::CantResponse(message),
            "NoFastComment" => Self::NoFastComment(message),
            "NoSuchUser" => Self::NoSuchUser(message),
            "NoSuchMail" => Self::NoSuchMail(message),
            "MailboxFull" => Self::MailboxFull(message),
            "NoMoney" => Self::NoMoney(message),
            "SetContactMailFirst" => Self::SetContactMailFirst(message),
            "WrongPassword" => Self::WrongPassword(message),
            "NeedModeratorPermission" => Self::NeedModeratorPermission(message),
            other => Self::Unknown {
                kind: other.to_string(),
                message,
            },
        }
    }

    /// The kind name this error would be reported under by the client library.
    pub fn kind(&self) -> &str {
        match self {
            Self::RequireLogin(_) => "RequireLogin",
            Self::UnregisteredUser(_) => "UnregisteredUser",
            Self::NoSuchBoard(_) => "NoSuchBoard",
            Self::NoSuchPost(_) => "NoSuchPost",
            Self::NoPermission(_) => "NoPermission",
            Self::LoginError(_) => "LoginError",
            Self::WrongIdOrPassword(_) => "WrongIDorPassword",
            Self::CantResponse(_) => "CantResponse",
            Self::NoFastComment(_) => "NoFastComment",
            Self::NoSuchUser(_) => "NoSuchUser",
            Self::NoSuchMail(_) => "NoSuchMail",
            Self::MailboxFull(_) => "MailboxFull",
            Self::NoMoney(_) => "NoMoney",
            Self::SetContactMailFirst(_) => "SetContactMailFirst",
            Self::WrongPassword(_) => "WrongPassword",
            Self::NeedModeratorPermission(_) => "NeedModeratorPermission",
            Self::Transport(_) => "Transport",
            Self::Unknown { kind, .. } => kind,
        }
    }
}
