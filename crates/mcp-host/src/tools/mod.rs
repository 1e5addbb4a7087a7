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

//! MCP Tools for operating a PTT session
//!
//! This module defines the operation catalog exposed to AI assistants. Tools are
//! organized into submodules by category:
//!
//! - `lifecycle`: Session tools (login, logout)
//! - `posts`: Post tools (get_post, get_newest_index, post, reply_post, del_post, comment,
//!   get_post_index_range)
//! - `mail`: Mail tools (mail, get_mail, del_mail)
//! - `users`: User tools (give_money, get_user, search_user, change_pw)
//! - `boards`: Board and site tools (get_time, board lists, board info, moderation)
//! - `helpers`: Argument extraction and token translation
//!
//! Every session-bound tool validates its arguments first, then goes through
//! [`gateway::dispatch`].

mod boards;
mod helpers;
mod lifecycle;
mod mail;
mod posts;
mod users;

use crate::envelope::{Envelope, codes};
use crate::gateway::{self, Operation};
use crate::mcp_types::Tool;
use crate::prompts::POST_INDEX_RANGE_PROMPT;
use crate::session::SessionContext;
use helpers::ArgResult;
use ptt_client::{Args, ClientFactory};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

/// Get all available tools
pub fn get_tools() -> Vec<Tool> {
    vec![
        // Session tools
        lifecycle::tool_login(),
        lifecycle::tool_logout(),
        // Post tools
        posts::tool_get_post(),
        posts::tool_get_newest_index(),
        posts::tool_post(),
        posts::tool_reply_post(),
        posts::tool_del_post(),
        posts::tool_comment(),
        posts::tool_get_post_index_range(),
        // Mail tools
        mail::tool_mail(),
        mail::tool_get_mail(),
        mail::tool_del_mail(),
        // User tools
        users::tool_give_money(),
        users::tool_get_user(),
        users::tool_search_user(),
        users::tool_change_pw(),
        // Board tools
        boards::tool_get_time(),
        boards::tool_get_all_boards(),
        boards::tool_get_favourite_boards(),
        boards::tool_get_board_info(),
        boards::tool_get_aid_from_url(),
        boards::tool_get_bottom_post_list(),
        boards::tool_set_board_title(),
        boards::tool_bucket(),
    ]
}

/// Validate arguments, then dispatch through the gateway.
async fn run<F: ClientFactory>(
    session: &mut SessionContext<F>,
    op: &Operation,
    args: ArgResult<Args>,
) -> Envelope {
    match args {
        Ok(args) => gateway::dispatch(session, op, args).await,
        Err(e) => {
            debug!("{} rejected: {}", op.name, e);
            e.into()
        }
    }
}

/// Execute a tool call
pub async fn execute_tool<F: ClientFactory>(
    session: &mut SessionContext<F>,
    name: &str,
    arguments: &Value,
) -> Result<Envelope, ToolError> {
    // Arguments are not logged: some carry passwords.
    debug!("Executing tool: {}", name);

    let envelope = match name {
        // Session tools
        "login" => session.login().await,
        "logout" => session.logout().await,
        // Post tools
        "get_post" => run(session, &posts::GET_POST, posts::get_post_args(arguments)).await,
        "get_newest_index" => {
            run(
                session,
                &posts::GET_NEWEST_INDEX,
                posts::get_newest_index_args(arguments),
            )
            .await
        }
        "post" => run(session, &posts::POST, posts::post_args(arguments)).await,
        "reply_post" => {
            run(session, &posts::REPLY_POST, posts::reply_post_args(arguments)).await
        }
        "del_post" => run(session, &posts::DEL_POST, posts::del_post_args(arguments)).await,
        "comment" => run(session, &posts::COMMENT, posts::comment_args(arguments)).await,
        "get_post_index_range" => {
            Envelope::failure(codes::FOLLOW_PROMPTS, POST_INDEX_RANGE_PROMPT)
        }
        // Mail tools
        "mail" => run(session, &mail::MAIL, mail::mail_args(arguments)).await,
        "get_mail" => run(session, &mail::GET_MAIL, mail::get_mail_args(arguments)).await,
        "del_mail" => run(session, &mail::DEL_MAIL, mail::del_mail_args(arguments)).await,
        // User tools
        "give_money" => {
            run(session, &users::GIVE_MONEY, users::give_money_args(arguments)).await
        }
        "get_user" => run(session, &users::GET_USER, users::get_user_args(arguments)).await,
        "search_user" => {
            run(session, &users::SEARCH_USER, users::search_user_args(arguments)).await
        }
        "change_pw" => run(session, &users::CHANGE_PW, users::change_pw_args(arguments)).await,
        // Board tools
        "get_time" => run(session, &boards::GET_TIME, Ok(Args::new())).await,
        "get_all_boards" => run(session, &boards::GET_ALL_BOARDS, Ok(Args::new())).await,
        "get_favourite_boards" => {
            run(session, &boards::GET_FAVOURITE_BOARDS, Ok(Args::new())).await
        }
        "get_board_info" => {
            run(
                session,
                &boards::GET_BOARD_INFO,
                boards::get_board_info_args(arguments),
            )
            .await
        }
        "get_aid_from_url" => {
            run(
                session,
                &boards::GET_AID_FROM_URL,
                boards::get_aid_from_url_args(arguments),
            )
            .await
        }
        "get_bottom_post_list" => {
            run(
                session,
                &boards::GET_BOTTOM_POST_LIST,
                boards::board_args(arguments),
            )
            .await
        }
        "set_board_title" => {
            run(
                session,
                &boards::SET_BOARD_TITLE,
                boards::set_board_title_args(arguments),
            )
            .await
        }
        "bucket" => run(session, &boards::BUCKET, boards::bucket_args(arguments)).await,
        _ => return Err(ToolError::UnknownTool(name.to_string())),
    };
    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedFactory, credentials};
    use pretty_assertions::assert_eq;
    use ptt_client::PttError;
    use serde_json::json;

    /// Valid arguments for every tool at once.
    fn everything() -> Value {
        json!({
            "board": "Test",
            "aid": "1Zabc",
            "index": 1,
            "index_type": "BOARD",
            "title_index": 1,
            "title": "hello",
            "content": "world",
            "reply_to": "BOARD",
            "comment_type": "PUSH",
            "ptt_id": "CodingMan",
            "money": 10,
            "user_id": "CodingMan",
            "new_password": "n3w",
            "url": "https://www.ptt.cc/bbs/Test/M.1.A.2.html",
            "new_title": "title",
            "bucket_days": 7,
            "reason": "spam"
        })
    }

    const UNGATED: &[&str] = &["login", "logout", "get_post_index_range"];

    #[tokio::test]
    async fn test_every_tool_requires_session() {
        let factory = ScriptedFactory::new();
        let mut session = SessionContext::new(factory.clone(), credentials());

        for tool in get_tools() {
            if UNGATED.contains(&tool.name.as_str()) {
                continue;
            }
            let env = execute_tool(&mut session, &tool.name, &everything())
                .await
                .unwrap();
            assert_eq!(env, Envelope::not_logged_in(), "tool {}", tool.name);
        }
        assert!(factory.calls().is_empty());
    }

    #[tokio::test]
    async fn test_every_tool_reaches_its_operation() {
        let factory = ScriptedFactory::new();
        let mut session = SessionContext::new(factory.clone(), credentials());
        session.login().await;

        for tool in get_tools() {
            if UNGATED.contains(&tool.name.as_str()) {
                continue;
            }
            let env = execute_tool(&mut session, &tool.name, &everything())
                .await
                .unwrap();
            assert!(env.is_success(), "tool {}: {:?}", tool.name, env);
            let last = factory.calls().pop().unwrap();
            assert_eq!(last.op, tool.name);
        }
    }

    #[tokio::test]
    async fn test_login_logout_scenario() {
        let factory = ScriptedFactory::new();
        let mut session = SessionContext::new(factory.clone(), credentials());
        let args = json!({"board": "Gossiping", "index": 1});

        let env = execute_tool(&mut session, "login", &json!({})).await.unwrap();
        assert_eq!(env, Envelope::message("登入成功"));
        let env = execute_tool(&mut session, "login", &json!({})).await.unwrap();
        assert_eq!(env, Envelope::message("登入成功"));

        factory.respond("get_post", Ok(json!({"title": "hi"})));
        let env = execute_tool(&mut session, "get_post", &args).await.unwrap();
        assert!(env.is_success());

        let env = execute_tool(&mut session, "logout", &json!({})).await.unwrap();
        assert_eq!(env, Envelope::message("登出成功"));
        let env = execute_tool(&mut session, "get_post", &args).await.unwrap();
        assert_eq!(env, Envelope::not_logged_in());

        let ops: Vec<_> = factory.calls().into_iter().map(|c| c.op).collect();
        assert_eq!(ops, vec!["login", "logout", "login", "get_post", "logout"]);
    }

    #[tokio::test]
    async fn test_bad_token_never_reaches_client() {
        let factory = ScriptedFactory::new();
        let mut session = SessionContext::new(factory.clone(), credentials());
        session.login().await;

        let env = execute_tool(
            &mut session,
            "get_newest_index",
            &json!({"index_type": "BOARD", "board": "Test", "search_list": [["BOGUS", "x"]]}),
        )
        .await
        .unwrap();
        assert_eq!(env.code(), Some(codes::INVALID_ARGUMENT));
        assert_eq!(factory.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_arguments_checked_before_session() {
        let factory = ScriptedFactory::new();
        let mut session = SessionContext::new(factory, credentials());

        let env = execute_tool(&mut session, "get_post", &json!({})).await.unwrap();
        assert_eq!(env.code(), Some(codes::INVALID_ARGUMENT));
    }

    #[tokio::test]
    async fn test_newest_index_returns_data() {
        let factory = ScriptedFactory::new();
        let mut session = SessionContext::new(factory.clone(), credentials());
        session.login().await;
        factory.respond("get_newest_index", Ok(json!(12345)));

        let env = execute_tool(
            &mut session,
            "get_newest_index",
            &json!({"index_type": "BOARD", "board": "Gossiping"}),
        )
        .await
        .unwrap();
        assert_eq!(env, Envelope::data(json!(12345)));
    }

    #[tokio::test]
    async fn test_get_time_carries_message() {
        let factory = ScriptedFactory::new();
        let mut session = SessionContext::new(factory.clone(), credentials());
        session.login().await;
        factory.respond("get_time", Ok(json!("14:02")));

        let env = execute_tool(&mut session, "get_time", &json!({})).await.unwrap();
        assert_eq!(
            env,
            Envelope::data_with_message(json!("14:02"), "取得 PTT 系統時間成功")
        );
    }

    #[tokio::test]
    async fn test_classified_failure_uses_call_args() {
        let factory = ScriptedFactory::new();
        let mut session = SessionContext::new(factory.clone(), credentials());
        session.login().await;
        factory.respond("search_user", Err(PttError::NoSuchUser("none".into())));

        let env = execute_tool(&mut session, "search_user", &json!({"ptt_id": "Nobody"}))
            .await
            .unwrap();
        assert_eq!(
            env,
            Envelope::failure(codes::NO_SUCH_USER, "找不到使用者: Nobody")
        );
    }

    #[tokio::test]
    async fn test_post_index_range_needs_no_session() {
        let factory = ScriptedFactory::new();
        let mut session = SessionContext::new(factory.clone(), credentials());

        let env = execute_tool(&mut session, "get_post_index_range", &Value::Null)
            .await
            .unwrap();
        assert_eq!(env.code(), Some(codes::FOLLOW_PROMPTS));
        assert!(env.message_text().unwrap().contains("get_newest_index"));
        assert!(factory.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let factory = ScriptedFactory::new();
        let mut session = SessionContext::new(factory, credentials());
        let result = execute_tool(&mut session, "no_such_tool", &json!({})).await;
        assert!(matches!(result, Err(ToolError::UnknownTool(name)) if name == "no_such_tool"));
    }

    #[test]
    fn test_tool_names_unique() {
        let mut names: Vec<_> = get_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names.len(), 24);
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 24);
    }
}
