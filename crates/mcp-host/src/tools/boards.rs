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

//! Board and site tools: system time, board lists, board info, moderation

use super::helpers::{ArgResult, bool_or, call_args, required_int, required_str};
use crate::envelope::codes;
use crate::gateway::Operation;
use crate::mcp_types::Tool;
use ptt_client::Args;
use serde_json::{Value, json};

pub const GET_TIME: Operation = Operation::data_with_message("get_time", "取得 PTT 系統時間成功");
pub const GET_ALL_BOARDS: Operation =
    Operation::data("get_all_boards").empty_is(codes::GET_BOARD_LIST_FAILED, "無法取得看板清單");
pub const GET_FAVOURITE_BOARDS: Operation = Operation::data("get_favourite_boards")
    .empty_is(codes::GET_FAVOURITE_BOARDS_FAILED, "無法取得我的最愛清單");
pub const GET_BOARD_INFO: Operation =
    Operation::data("get_board_info").empty_is(codes::NO_SUCH_BOARD, "找不到看板: {board}");
pub const GET_AID_FROM_URL: Operation = Operation::data("get_aid_from_url").empty_is(
    codes::GET_AID_FROM_URL_FAILED,
    "無法從網址取得看板名稱與文章編號: {url}",
);
pub const GET_BOTTOM_POST_LIST: Operation = Operation::data("get_bottom_post_list").empty_is(
    codes::GET_BOTTOM_POST_LIST_FAILED,
    "無法取得看板 {board} 的置底文章清單",
);
pub const SET_BOARD_TITLE: Operation = Operation::ack("set_board_title", "看板標題設定成功");
pub const BUCKET: Operation = Operation::ack("bucket", "水桶成功");

// ============================================================================
// Tool Definitions
// ============================================================================

fn no_arguments(name: &str, description: &str) -> Tool {
    Tool {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    }
}

fn board_only(name: &str, description: &str) -> Tool {
    Tool {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "board": {
                    "type": "string",
                    "description": "Board name (e.g., 'Gossiping')"
                }
            },
            "required": ["board"]
        }),
    }
}

pub fn tool_get_time() -> Tool {
    no_arguments(
        "get_time",
        "Get the PTT system time (HH:MM). Requires login.",
    )
}

pub fn tool_get_all_boards() -> Tool {
    no_arguments(
        "get_all_boards",
        "List the names of every board on the site. Slow; requires login.",
    )
}

pub fn tool_get_favourite_boards() -> Tool {
    no_arguments(
        "get_favourite_boards",
        "List the logged-in account's favourite boards. Requires login.",
    )
}

pub fn tool_get_board_info() -> Tool {
    Tool {
        name: "get_board_info".to_string(),
        description: "Get a board's information: moderators, online users, posting rules. \
            Requires login."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "board": {
                    "type": "string",
                    "description": "Board name (e.g., 'Gossiping')"
                },
                "get_post_types": {
                    "type": "boolean",
                    "description": "Also fetch the board's post title categories",
                    "default": false
                }
            },
            "required": ["board"]
        }),
    }
}

pub fn tool_get_aid_from_url() -> Tool {
    Tool {
        name: "get_aid_from_url".to_string(),
        description: "Resolve a PTT web URL (https://www.ptt.cc/bbs/<board>/M.xxx.A.yyy.html) \
            into its board name and post AID. Requires login."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "Post URL"
                }
            },
            "required": ["url"]
        }),
    }
}

pub fn tool_get_bottom_post_list() -> Tool {
    board_only(
        "get_bottom_post_list",
        "List the posts pinned to the bottom of a board. Requires login.",
    )
}

pub fn tool_set_board_title() -> Tool {
    Tool {
        name: "set_board_title".to_string(),
        description: "Set a board's title. Requires login as one of the board's moderators."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "board": {
                    "type": "string",
                    "description": "Board name"
                },
                "new_title": {
                    "type": "string",
                    "description": "New board title"
                }
            },
            "required": ["board", "new_title"]
        }),
    }
}

pub fn tool_bucket() -> Tool {
    Tool {
        name: "bucket".to_string(),
        description: "Ban (water-bucket) a user from posting on a board for a number of days. \
            Requires login as one of the board's moderators."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "board": {
                    "type": "string",
                    "description": "Board name"
                },
                "bucket_days": {
                    "type": "integer",
                    "description": "Length of the ban in days"
                },
                "reason": {
                    "type": "string",
                    "description": "Reason shown to the user"
                },
                "ptt_id": {
                    "type": "string",
                    "description": "PTT ID to ban"
                }
            },
            "required": ["board", "bucket_days", "reason", "ptt_id"]
        }),
    }
}

// ============================================================================
// Call Arguments
// ============================================================================

pub fn board_args(args: &Value) -> ArgResult<Args> {
    Ok(call_args([("board", json!(required_str(args, "board")?))]))
}

pub fn get_board_info_args(args: &Value) -> ArgResult<Args> {
    Ok(call_args([
        ("board", json!(required_str(args, "board")?)),
        (
            "get_post_types",
            json!(bool_or(args, "get_post_types", false)?),
        ),
    ]))
}

pub fn get_aid_from_url_args(args: &Value) -> ArgResult<Args> {
    Ok(call_args([("url", json!(required_str(args, "url")?))]))
}

pub fn set_board_title_args(args: &Value) -> ArgResult<Args> {
    Ok(call_args([
        ("board", json!(required_str(args, "board")?)),
        ("new_title", json!(required_str(args, "new_title")?)),
    ]))
}

pub fn bucket_args(args: &Value) -> ArgResult<Args> {
    Ok(call_args([
        ("board", json!(required_str(args, "board")?)),
        ("bucket_days", json!(required_int(args, "bucket_days")?)),
        ("reason", json!(required_str(args, "reason")?)),
        ("ptt_id", json!(required_str(args, "ptt_id")?)),
    ]))
}
