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

//! Mail tools: send, read, delete

use super::helpers::{
    ArgResult, bool_or, call_args, optional_str, pair_list, required_int, required_str,
    search_list, search_list_schema, sign_file,
};
use crate::envelope::codes;
use crate::gateway::Operation;
use crate::mcp_types::Tool;
use ptt_client::{Args, SearchType, Token};
use serde_json::{Value, json};

pub const MAIL: Operation = Operation::ack("mail", "寄信成功");
pub const GET_MAIL: Operation =
    Operation::data("get_mail").empty_is(codes::MAIL_NOT_FOUND, "找不到信件或信件可能已被刪除");
pub const DEL_MAIL: Operation = Operation::ack("del_mail", "刪除成功");

// ============================================================================
// Tool Definitions
// ============================================================================

pub fn tool_mail() -> Tool {
    Tool {
        name: "mail".to_string(),
        description: "Send mail to a PTT user. Requires login.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "ptt_id": {
                    "type": "string",
                    "description": "Recipient's PTT ID"
                },
                "title": {
                    "type": "string",
                    "description": "Mail subject"
                },
                "content": {
                    "type": "string",
                    "description": "Mail body"
                },
                "sign_file": {
                    "type": ["string", "integer"],
                    "description": "Signature file number, or 'x' for a random one",
                    "default": "0"
                },
                "backup": {
                    "type": "boolean",
                    "description": "Keep a copy in the sender's mailbox",
                    "default": true
                }
            },
            "required": ["ptt_id", "title", "content"]
        }),
    }
}

pub fn tool_get_mail() -> Tool {
    Tool {
        name: "get_mail".to_string(),
        description: "Read one mail from the mailbox by index. A search type and condition, or \
            a search list, restricts the mailbox to matching mail first. Requires login."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "index": {
                    "type": "integer",
                    "description": "Mail index, starting at 1"
                },
                "search_type": {
                    "type": "string",
                    "enum": ["KEYWORD", "AUTHOR"],
                    "description": "Search kind, used together with search_condition"
                },
                "search_condition": {
                    "type": "string",
                    "description": "Search condition for search_type"
                },
                "search_list": search_list_schema(
                    "Search filters, e.g. [[\"KEYWORD\", \"PyPtt\"]], [[\"AUTHOR\", \"CodingMan\"]]. \
                     Ignored when search_type and search_condition are given."
                )
            },
            "required": ["index"]
        }),
    }
}

pub fn tool_del_mail() -> Tool {
    Tool {
        name: "del_mail".to_string(),
        description: "Delete one mail from the mailbox by index. Requires login.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "index": {
                    "type": "integer",
                    "description": "Mail index, starting at 1"
                }
            },
            "required": ["index"]
        }),
    }
}

// ============================================================================
// Call Arguments
// ============================================================================

pub fn mail_args(args: &Value) -> ArgResult<Args> {
    Ok(call_args([
        ("ptt_id", json!(required_str(args, "ptt_id")?)),
        ("title", json!(required_str(args, "title")?)),
        ("content", json!(required_str(args, "content")?)),
        ("sign_file", sign_file(args)?),
        ("backup", json!(bool_or(args, "backup", true)?)),
    ]))
}

/// A search type with a condition wins over a search list; empty values count as absent.
pub fn get_mail_args(args: &Value) -> ArgResult<Args> {
    let mut call = call_args([("index", json!(required_int(args, "index")?))]);

    let search_type = optional_str(args, "search_type")?.filter(|s| !s.is_empty());
    let condition = optional_str(args, "search_condition")?.filter(|s| !s.is_empty());
    if let (Some(search_type), Some(condition)) = (search_type, condition) {
        call.insert(
            "search_type".to_string(),
            json!(SearchType::parse_token(&search_type)?),
        );
        call.insert("search_condition".to_string(), json!(condition));
    } else if let Some(pairs) = pair_list(args, "search_list")?
        && !pairs.is_empty()
    {
        call.insert("search_list".to_string(), search_list(&pairs)?);
    }
    Ok(call)
}

pub fn del_mail_args(args: &Value) -> ArgResult<Args> {
    Ok(call_args([("index", json!(required_int(args, "index")?))]))
}
