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

//! MCP prompts: multi-step procedures built on the board tools

use crate::mcp_types::{Prompt, PromptMessage, PromptsListResult};

/// Get list of available prompts
pub fn get_prompts() -> Vec<Prompt> {
    vec![Prompt {
        name: "ptt_post_index_range".to_string(),
        description: Some(
            "Find the first and last post index of a given date on a board, by binary search \
             with get_newest_index and get_post"
                .to_string(),
        ),
        arguments: vec![],
    }]
}

/// Get prompt content by name
pub fn get_prompt(name: &str) -> Option<PromptsListResult> {
    match name {
        "ptt_post_index_range" => Some(PromptsListResult {
            messages: vec![PromptMessage {
                role: "user".to_string(),
                content: POST_INDEX_RANGE_PROMPT.to_string(),
            }],
        }),
        _ => None,
    }
}

pub const POST_INDEX_RANGE_PROMPT: &str = r#"# Finding the post index range of a date

Goal: for a board (e.g. `Gossiping`) and a target date (e.g. `7/6`, the `M/DD`
form PTT shows in post listings), find `start_index`, the first post of that
date, and `end_index`, the last one.

Tools:
- `get_newest_index(index_type="BOARD", board=...)` returns the newest post index.
- `get_post(board=..., index=...)` returns a post; its date is the `M/DD` part of
  the post's date. A deleted post may fail or come back empty: step to a
  neighbouring index and retry.

## Step 1: bounds

Call `get_newest_index(index_type="BOARD", board="Gossiping")` and call the
result `max_index`. Search between `low = 1` and `high = max_index`.

## Step 2: start_index (first post of the day)

Binary search. At each step read the date of `get_post(index=mid)`:
- Earlier than `7/6` (e.g. `7/5`): the start lies to the right. Set `low = mid + 1`.
- Equal to or later than `7/6`: `mid` may be the answer. Record `ans = mid`
  and keep looking left with `high = mid - 1`.

When the loop ends, `ans` is `start_index`.

## Step 3: end_index (last post of the day)

Reset `low = 1`, `high = max_index` and binary search again:
- Later than `7/6` (e.g. `7/7`): the end lies to the left. Set `high = mid - 1`.
- Equal to or earlier than `7/6`: record `ans = mid` and keep looking right
  with `low = mid + 1`.

When the loop ends, `ans` is `end_index`.

## Step 4: verify and report

Fetch `start_index` and `end_index` once more and confirm both carry the
target date.

- If both match and `start_index <= end_index`, report: "On Gossiping, posts
  dated 7/6 span indexes start_index to end_index."
- Otherwise (for example the found start is dated `7/7`, meaning nothing was
  posted that day), report: "No posts dated 7/6 were found on Gossiping."
"#;
