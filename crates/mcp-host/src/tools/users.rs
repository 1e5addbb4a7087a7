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

//! User tools: lookup, search, money transfer, password change

use super::helpers::{ArgResult, call_args, optional_int, optional_str, required_int, required_str};
use crate::envelope::codes;
use crate::gateway::Operation;
use crate::mcp_types::Tool;
use ptt_client::Args;
use serde_json::{Value, json};

pub const GIVE_MONEY: Operation = Operation::ack("give_money", "轉帳成功");
pub const GET_USER: Operation =
    Operation::data("get_user").empty_is(codes::NO_SUCH_USER, "找不到使用者: {user_id}");
pub const SEARCH_USER: Operation =
    Operation::data("search_user").empty_is(codes::NO_SUCH_USER, "找不到使用者: {ptt_id}");
pub const CHANGE_PW: Operation = Operation::ack("change_pw", "密碼更改成功");

// ============================================================================
// Tool Definitions
// ============================================================================

pub fn tool_give_money() -> Tool {
    Tool {
        name: "give_money".to_string(),
        description: "Transfer P coins to another user, optionally wrapped in a red envelope \
            with a title and message. Requires login."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "ptt_id": {
                    "type": "string",
                    "description": "Recipient's PTT ID"
                },
                "money": {
                    "type": "integer",
                    "description": "Amount of P coins"
                },
                "red_bag_title": {
                    "type": "string",
                    "description": "Red envelope title"
                },
                "red_bag_content": {
                    "type": "string",
                    "description": "Red envelope message"
                }
            },
            "required": ["ptt_id", "money"]
        }),
    }
}

pub fn tool_get_user() -> Tool {
    Tool {
        name: "get_user".to_string(),
        description: "Look up a user's public profile (login count, posts, money level, last \
            login). Requires login."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "user_id": {
                    "type": "string",
                    "description": "PTT ID to look up"
                }
            },
            "required": ["user_id"]
        }),
    }
}

pub fn tool_search_user() -> Tool {
    Tool {
        name: "search_user".to_string(),
        description: "Search PTT IDs starting with the given prefix. Results are paged; \
            min_page and max_page bound the pages read. Requires login."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "ptt_id": {
                    "type": "string",
                    "description": "ID prefix to search for"
                },
                "min_page": {
                    "type": "integer",
                    "description": "First result page to read"
                },
                "max_page": {
                    "type": "integer",
                    "description": "Last result page to read"
                }
            },
            "required": ["ptt_id"]
        }),
    }
}

pub fn tool_change_pw() -> Tool {
    Tool {
        name: "change_pw".to_string(),
        description: "Change the logged-in account's password. Requires login.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "new_password": {
                    "type": "string",
                    "description": "The new password"
                }
            },
            "required": ["new_password"]
        }),
    }
}

// ============================================================================
// Call Arguments
// ============================================================================

pub fn give_money_args(args: &Value) -> ArgResult<Args> {
    let mut call = call_args([
        ("ptt_id", json!(required_str(args, "ptt_id")?)),
        ("money", json!(required_int(args, "money")?)),
    ]);
    for name in ["red_bag_title", "red_bag_content"] {
        if let Some(text) = optional_str(args, name)?
            && !text.is_empty()
        {
            call.insert(name.to_string(), json!(text));
        }
    }
    Ok(call)
}

pub fn get_user_args(args: &Value) -> ArgResult<Args> {
    Ok(call_args([("user_id", json!(required_str(args, "user_id")?))]))
}

pub fn search_user_args(args: &Value) -> ArgResult<Args> {
    Ok(call_args([
        ("ptt_id", json!(required_str(args, "ptt_id")?)),
        ("min_page", json!(optional_int(args, "min_page")?)),
        ("max_page", json!(optional_int(args, "max_page")?)),
    ]))
}

pub fn change_pw_args(args: &Value) -> ArgResult<Args> {
    Ok(call_args([(
        "new_password",
        json!(required_str(args, "new_password")?),
    )]))
}
