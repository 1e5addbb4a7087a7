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

//! MCP Server implementation
//!
//! This module implements the Model Context Protocol server that communicates
//! over stdio using JSON-RPC 2.0.

use crate::mcp_types::*;
use crate::session::SessionContext;
use crate::{prompts, tools};
use eyre::Result;
use ptt_client::ClientFactory;
use serde::Serialize;
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

/// MCP protocol version we support
const PROTOCOL_VERSION: &str = "2024-11-05";

/// MCP Server state
pub struct McpServer<F: ClientFactory> {
    session: SessionContext<F>,
    initialized: bool,
    shutdown_requested: bool,
}

impl<F: ClientFactory> McpServer<F> {
    /// Create a new MCP server around the (not yet logged in) session
    pub fn new(session: SessionContext<F>) -> Self {
        Self {
            session,
            initialized: false,
            shutdown_requested: false,
        }
    }

    /// Run the MCP server over stdio
    pub async fn run_stdio(&mut self) -> Result<()> {
        info!("Starting MCP server on stdio");
        let reader = BufReader::new(tokio::io::stdin());
        self.run(reader, tokio::io::stdout()).await
    }

    /// Serve line-delimited JSON-RPC until EOF or a `shutdown` request.
    pub async fn run<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;

            if bytes_read == 0 {
                info!("EOF on stdin, shutting down");
                break;
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            // Request bodies are not logged: tool arguments may carry passwords.
            debug!("Received {} bytes", line.len());

            // Parse the JSON-RPC message
            let response = match serde_json::from_str::<Value>(line) {
                Ok(msg) => self.handle_message(msg).await,
                Err(e) => {
                    error!("Failed to parse JSON: {}", e);
                    Some(JsonRpcResponse::error(
                        RequestId::Number(0),
                        JsonRpcError::parse_error(e.to_string()),
                    ))
                }
            };

            // Send response if we have one (notifications don't get responses)
            if let Some(resp) = response {
                let response_json = serde_json::to_string(&resp)?;
                debug!("Sending: {}", response_json);
                writer.write_all(response_json.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }

            // Exit after responding to shutdown request
            if self.shutdown_requested {
                info!("Shutdown complete");
                break;
            }
        }

        Ok(())
    }

    /// Log out of the board if still logged in. Safe to call more than once.
    pub async fn shutdown(&mut self) {
        self.session.shutdown().await;
    }

    /// Handle an incoming JSON-RPC message
    async fn handle_message(&mut self, msg: Value) -> Option<JsonRpcResponse> {
        // Check if this is a notification (no id) or request (has id)
        let id = msg.get("id").cloned();
        let method = msg.get("method").and_then(|m| m.as_str());
        let params = msg.get("params").cloned().unwrap_or(json!({}));

        let method = match method {
            Some(m) => m,
            None => {
                return id.map(|id| {
                    JsonRpcResponse::error(
                        parse_request_id(&id),
                        JsonRpcError::invalid_request("Missing method"),
                    )
                });
            }
        };

        debug!("Handling method: {}", method);

        // Handle the method
        let result = match method {
            // Lifecycle methods
            "initialize" => self.handle_initialize(&params),
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                info!("Client initialized");
                return None; // Notification, no response
            }
            "shutdown" => {
                info!("Shutdown requested");
                self.shutdown_requested = true;
                Ok(json!({}))
            }

            // Tool methods
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(&params).await,

            // Prompt methods
            "prompts/list" => self.handle_prompts_list(),
            "prompts/get" => self.handle_prompts_get(&params),

            // Ping
            "ping" => Ok(json!({})),

            // Unknown method
            _ => {
                warn!("Unknown method: {}", method);
                Err(JsonRpcError::method_not_found(method))
            }
        };

        // Notifications never get a response, not even an error
        let id = id?;

        Some(match result {
            Ok(value) => JsonRpcResponse::success(parse_request_id(&id), value),
            Err(error) => JsonRpcResponse::error(parse_request_id(&id), error),
        })
    }

    /// Handle initialize request
    fn handle_initialize(&mut self, params: &Value) -> Result<Value, JsonRpcError> {
        let init_params: InitializeParams = serde_json::from_value(params.clone())
            .map_err(|e| JsonRpcError::invalid_params(e.to_string()))?;

        info!(
            "Initializing MCP server (client {}, protocol {})",
            init_params
                .client_info
                .as_ref()
                .map(|c| c.name.as_str())
                .unwrap_or("unknown"),
            init_params.protocol_version
        );

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
                prompts: Some(PromptsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "ptt-mcp-host".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        to_value(result)
    }

    /// Handle tools/list request
    fn handle_tools_list(&self) -> Result<Value, JsonRpcError> {
        to_value(ToolsListResult {
            tools: tools::get_tools(),
        })
    }

    /// Handle tools/call request
    ///
    /// Operation failures are tool results with `isError`, not JSON-RPC errors.
    async fn handle_tools_call(&mut self, params: &Value) -> Result<Value, JsonRpcError> {
        let call_params: ToolCallParams = serde_json::from_value(params.clone())
            .map_err(|e| JsonRpcError::invalid_params(e.to_string()))?;

        if !self.initialized {
            debug!("tools/call before the client sent initialized");
        }

        let result = match tools::execute_tool(
            &mut self.session,
            &call_params.name,
            &call_params.arguments,
        )
        .await
        {
            Ok(envelope) => {
                if let Some(code) = envelope.code() {
                    debug!(
                        "Tool {} failed with {}: {}",
                        call_params.name,
                        code,
                        envelope.message_text().unwrap_or_default()
                    );
                }
                ToolCallResult::from_envelope(&envelope)
                    .map_err(|e| JsonRpcError::internal_error(e.to_string()))?
            }
            Err(e) => {
                warn!("{}", e);
                ToolCallResult::error(e.to_string())
            }
        };

        to_value(result)
    }

    /// Handle prompts/list request
    fn handle_prompts_list(&self) -> Result<Value, JsonRpcError> {
        to_value(PromptsListResponse {
            prompts: prompts::get_prompts(),
        })
    }

    /// Handle prompts/get request
    fn handle_prompts_get(&self, params: &Value) -> Result<Value, JsonRpcError> {
        let get_params: PromptGetParams = serde_json::from_value(params.clone())
            .map_err(|e| JsonRpcError::invalid_params(e.to_string()))?;

        let result = prompts::get_prompt(&get_params.name).ok_or_else(|| {
            JsonRpcError::invalid_params(format!("Unknown prompt: {}", get_params.name))
        })?;

        to_value(result)
    }
}

fn to_value<T: Serialize>(value: T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}

/// Parse a request ID from JSON value
fn parse_request_id(value: &Value) -> RequestId {
    match value {
        Value::String(s) => RequestId::String(s.clone()),
        Value::Number(n) => RequestId::Number(n.as_i64().unwrap_or(0)),
        _ => RequestId::Number(0),
    }
}
