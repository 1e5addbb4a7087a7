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

//! Session lifecycle tools: login, logout

use crate::mcp_types::Tool;
use serde_json::json;

pub fn tool_login() -> Tool {
    Tool {
        name: "login".to_string(),
        description: "Log in to PTT with the account configured for this server. Any existing \
            session is logged out first, and other sessions of the same account are kicked. \
            Every other tool except logout requires a successful login."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    }
}

pub fn tool_logout() -> Tool {
    Tool {
        name: "logout".to_string(),
        description: "Log out of PTT. The session is discarded even if the board reports an \
            error while logging out."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    }
}
