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

//! Post tools: read, write, reply, delete, comment

use super::helpers::{
    ArgResult, call_args, int_or, optional_str, pair_list, required_int, required_str,
    required_token, search_list, search_list_schema, sign_file,
};
use crate::envelope::codes;
use crate::gateway::Operation;
use crate::mcp_types::Tool;
use ptt_client::{Args, CommentType, NewIndex, ReplyTo};
use serde_json::{Value, json};

pub const GET_POST: Operation =
    Operation::data("get_post").empty_is(codes::POST_NOT_FOUND, "找不到文章或文章可能已被刪除");
pub const GET_NEWEST_INDEX: Operation = Operation::data("get_newest_index");
pub const POST: Operation = Operation::ack("post", "發文成功");
pub const REPLY_POST: Operation = Operation::ack("reply_post", "回覆成功");
pub const DEL_POST: Operation = Operation::ack("del_post", "刪除成功");
pub const COMMENT: Operation = Operation::ack("comment", "推文成功");

// ============================================================================
// Tool Definitions
// ============================================================================

/// Schema properties shared by every tool that addresses one post.
fn post_locator() -> Value {
    json!({
        "board": {
            "type": "string",
            "description": "Board name (e.g., 'Gossiping')"
        },
        "aid": {
            "type": "string",
            "description": "Post AID (e.g., '1ZkY9Yxy'). Takes precedence over index."
        },
        "index": {
            "type": "integer",
            "description": "Post index on the board, starting at 1",
            "default": 0
        }
    })
}

fn with_locator(extra: Value) -> Value {
    let mut properties = post_locator();
    if let (Some(base), Value::Object(extra)) = (properties.as_object_mut(), extra) {
        base.extend(extra);
    }
    properties
}

pub fn tool_get_post() -> Tool {
    Tool {
        name: "get_post".to_string(),
        description: "Fetch one post from a board, by AID or by index. Returns the post's \
            metadata, content and comments. Requires login."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": post_locator(),
            "required": ["board"]
        }),
    }
}

pub fn tool_get_newest_index() -> Tool {
    Tool {
        name: "get_newest_index".to_string(),
        description: "Get the newest post index of a board, or the newest mail index. An \
            optional search list narrows the count to matching posts. Requires login."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "index_type": {
                    "type": "string",
                    "enum": ["BOARD", "MAIL"],
                    "description": "Which index to read"
                },
                "board": {
                    "type": "string",
                    "description": "Board name (needed when index_type is BOARD)"
                },
                "search_list": search_list_schema(
                    "Search filters, e.g. [[\"KEYWORD\", \"PyPtt\"]], [[\"AUTHOR\", \"CodingMan\"]], \
                     [[\"COMMENT\", \"100\"]], [[\"MONEY\", \"5\"]]"
                )
            },
            "required": ["index_type"]
        }),
    }
}

pub fn tool_post() -> Tool {
    Tool {
        name: "post".to_string(),
        description: "Publish a new post on a board. Requires login.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "board": {
                    "type": "string",
                    "description": "Board to post on"
                },
                "title_index": {
                    "type": "integer",
                    "description": "Title category number, as listed by the board's posting menu"
                },
                "title": {
                    "type": "string",
                    "description": "Post title"
                },
                "content": {
                    "type": "string",
                    "description": "Post body"
                },
                "sign_file": {
                    "type": ["string", "integer"],
                    "description": "Signature file number, or 'x' for a random one",
                    "default": "0"
                }
            },
            "required": ["board", "title_index", "title", "content"]
        }),
    }
}

pub fn tool_reply_post() -> Tool {
    Tool {
        name: "reply_post".to_string(),
        description: "Reply to a post on the board, by mail to its author, or both. \
            Requires login."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": with_locator(json!({
                "reply_to": {
                    "type": "string",
                    "enum": ["BOARD", "MAIL", "BOARD_MAIL"],
                    "description": "Where the reply goes"
                },
                "content": {
                    "type": "string",
                    "description": "Reply body"
                },
                "sign_file": {
                    "type": ["string", "integer"],
                    "description": "Signature file number, or 'x' for a random one",
                    "default": "0"
                }
            })),
            "required": ["reply_to", "board", "content"]
        }),
    }
}

pub fn tool_del_post() -> Tool {
    Tool {
        name: "del_post".to_string(),
        description: "Delete a post, by AID or by index. Requires login and permission to \
            delete the post."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": post_locator(),
            "required": ["board"]
        }),
    }
}

pub fn tool_comment() -> Tool {
    Tool {
        name: "comment".to_string(),
        description: "Comment on a post: push (推), boo (噓) or arrow (→). Requires login. \
            The board rejects comments posted too quickly in succession."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": with_locator(json!({
                "comment_type": {
                    "type": "string",
                    "enum": ["PUSH", "BOO", "ARROW"],
                    "description": "Kind of comment"
                },
                "content": {
                    "type": "string",
                    "description": "Comment text"
                }
            })),
            "required": ["board", "comment_type", "content"]
        }),
    }
}

pub fn tool_get_post_index_range() -> Tool {
    Tool {
        name: "get_post_index_range".to_string(),
        description: "Explain how to find the first and last post index of a given date on a \
            board. Returns instructions (code FOLLOW_PROMPTS) to carry out with get_newest_index \
            and get_post."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    }
}

// ============================================================================
// Call Arguments
// ============================================================================

/// `board`, `aid` (sent as null when absent), `index`.
fn locator(args: &Value) -> ArgResult<[(&'static str, Value); 3]> {
    Ok([
        ("board", json!(required_str(args, "board")?)),
        ("aid", json!(optional_str(args, "aid")?)),
        ("index", json!(int_or(args, "index", 0)?)),
    ])
}

pub fn get_post_args(args: &Value) -> ArgResult<Args> {
    Ok(call_args(locator(args)?))
}

pub fn get_newest_index_args(args: &Value) -> ArgResult<Args> {
    let index_type: NewIndex = required_token(args, "index_type")?;
    let mut call = call_args([
        ("index_type", json!(index_type)),
        ("board", json!(optional_str(args, "board")?)),
    ]);
    if let Some(pairs) = pair_list(args, "search_list")?
        && !pairs.is_empty()
    {
        call.insert("search_list".to_string(), search_list(&pairs)?);
    }
    Ok(call)
}

pub fn post_args(args: &Value) -> ArgResult<Args> {
    Ok(call_args([
        ("board", json!(required_str(args, "board")?)),
        ("title_index", json!(required_int(args, "title_index")?)),
        ("title", json!(required_str(args, "title")?)),
        ("content", json!(required_str(args, "content")?)),
        ("sign_file", sign_file(args)?),
    ]))
}

pub fn reply_post_args(args: &Value) -> ArgResult<Args> {
    let reply_to: ReplyTo = required_token(args, "reply_to")?;
    let mut call = call_args([
        ("reply_to", json!(reply_to)),
        ("content", json!(required_str(args, "content")?)),
        ("sign_file", sign_file(args)?),
    ]);
    call.extend(locator(args)?.map(|(k, v)| (k.to_string(), v)));
    Ok(call)
}

pub fn del_post_args(args: &Value) -> ArgResult<Args> {
    Ok(call_args(locator(args)?))
}

pub fn comment_args(args: &Value) -> ArgResult<Args> {
    let comment_type: CommentType = required_token(args, "comment_type")?;
    let mut call = call_args([
        ("comment_type", json!(comment_type)),
        ("content", json!(required_str(args, "content")?)),
    ]);
    call.extend(locator(args)?.map(|(k, v)| (k.to_string(), v)));
    Ok(call)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::helpers::ArgumentError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_post_defaults() {
        let call = get_post_args(&json!({"board": "Gossiping"})).unwrap();
        assert_eq!(
            Value::Object(call),
            json!({"board": "Gossiping", "aid": null, "index": 0})
        );
    }

    #[test]
    fn test_newest_index_translates_tokens() {
        let call = get_newest_index_args(&json!({
            "index_type": "board",
            "board": "Python",
            "search_list": [["author", "CodingMan"]]
        }))
        .unwrap();
        assert_eq!(
            Value::Object(call),
            json!({
                "index_type": "BOARD",
                "board": "Python",
                "search_list": [["AUTHOR", "CodingMan"]]
            })
        );
    }

    #[test]
    fn test_newest_index_omits_empty_search_list() {
        let call =
            get_newest_index_args(&json!({"index_type": "MAIL", "search_list": []})).unwrap();
        assert!(!call.contains_key("search_list"));
        assert_eq!(call["board"], Value::Null);
    }

    #[test]
    fn test_newest_index_rejects_bogus_search_type() {
        let err = get_newest_index_args(&json!({
            "index_type": "BOARD",
            "board": "Python",
            "search_list": [["BOGUS", "x"]]
        }))
        .unwrap_err();
        assert!(matches!(err, ArgumentError::Token(_)));
    }

    #[test]
    fn test_reply_post_args() {
        let call = reply_post_args(&json!({
            "reply_to": "board_mail",
            "board": "Test",
            "content": "thanks",
            "aid": "1Zabc"
        }))
        .unwrap();
        assert_eq!(
            Value::Object(call),
            json!({
                "reply_to": "BOARD_MAIL",
                "board": "Test",
                "content": "thanks",
                "sign_file": "0",
                "aid": "1Zabc",
                "index": 0
            })
        );
    }

    #[test]
    fn test_comment_requires_known_type() {
        assert!(
            comment_args(&json!({"board": "Test", "comment_type": "LIKE", "content": "hi"}))
                .is_err()
        );
        let call =
            comment_args(&json!({"board": "Test", "comment_type": "push", "content": "hi"}))
                .unwrap();
        assert_eq!(call["comment_type"], "PUSH");
    }

    #[test]
    fn test_post_requires_title_index() {
        let err = post_args(&json!({"board": "Test", "title": "t", "content": "c"})).unwrap_err();
        assert!(matches!(err, ArgumentError::Missing("title_index")));
    }
}
