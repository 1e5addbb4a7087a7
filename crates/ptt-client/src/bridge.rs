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

//! Stdio bridge to the board client library.
//!
//! Each [`BridgeClient`] owns one child process hosting one board session.
//! The two sides exchange newline-delimited JSON:
//!
//! ```text
//! -> {"op": "get_post", "args": {"board": "Gossiping", "aid": null, "index": 1}}
//! <- {"ok": true, "data": {...}}
//! <- {"ok": false, "error": {"kind": "NoSuchBoard", "message": "..."}}
//! ```
//!
//! Exactly one request is outstanding at a time. If a caller abandons a
//! request, its reply is drained before the next one is sent. The child is
//! killed when the client is dropped.

use crate::{Args, ClientFactory, PttError, SessionClient};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info};

/// How to launch the bridge process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub command: String,
    pub args: Vec<String>,
}

#[derive(Serialize)]
struct BridgeRequest<'a> {
    op: &'a str,
    args: &'a Args,
}

#[derive(Deserialize)]
struct BridgeResponse {
    ok: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Option<BridgeFailure>,
}

#[derive(Deserialize)]
struct BridgeFailure {
    kind: String,
    #[serde(default)]
    message: String,
}

impl BridgeResponse {
    fn into_result(self) -> Result<Value, PttError> {
        if self.ok {
            return Ok(self.data);
        }
        match self.error {
            Some(failure) => Err(PttError::from_kind(&failure.kind, failure.message)),
            None => Err(PttError::Transport(
                "bridge reported failure without an error".to_string(),
            )),
        }
    }
}

/// Where the request/reply exchange stands.
///
/// A caller may abandon an `invoke` future at any await point. The state left
/// behind tells the next call how to get the stream back in step.
#[derive(Debug)]
enum Channel {
    Ready,
    /// A request line may be partly written.
    Sending,
    /// The request went out and its reply line is still unread.
    AwaitingReply,
    Broken(String),
}

/// One board session hosted in a bridge child process.
pub struct BridgeClient {
    // Held so the child is killed on drop.
    _child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    channel: Channel,
}

impl BridgeClient {
    /// Spawn a bridge process.
    pub fn spawn(config: &BridgeConfig) -> Result<Self, PttError> {
        info!("Spawning board bridge: {}", config.command);
        let mut child = Command::new(&config.command)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                PttError::Transport(format!("failed to spawn '{}': {}", config.command, e))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| PttError::Transport("bridge stdin not piped".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| PttError::Transport("bridge stdout not piped".to_string()))?;

        Ok(Self {
            _child: child,
            stdin,
            stdout: BufReader::new(stdout),
            channel: Channel::Ready,
        })
    }

    /// Mark the channel unusable and report why.
    fn fail(&mut self, reason: String) -> PttError {
        self.channel = Channel::Broken(reason.clone());
        PttError::Transport(reason)
    }

    /// Bring the stream back in step after an abandoned request.
    ///
    /// A reply still owed to an interrupted call is read and thrown away. A
    /// request cut off while being written leaves the bridge with a torn line,
    /// which cannot be recovered.
    async fn resync(&mut self) -> Result<(), PttError> {
        match self.channel {
            Channel::Ready => Ok(()),
            Channel::AwaitingReply => {
                debug!("Discarding reply to an interrupted request");
                self.read_reply().await?;
                self.channel = Channel::Ready;
                Ok(())
            }
            Channel::Sending => {
                Err(self.fail("an earlier request was interrupted while being sent".to_string()))
            }
            Channel::Broken(ref reason) => Err(PttError::Transport(reason.clone())),
        }
    }

    async fn read_reply(&mut self) -> Result<String, PttError> {
        let mut reply = String::new();
        match self.stdout.read_line(&mut reply).await {
            Ok(0) => Err(self.fail("bridge closed its output".to_string())),
            Ok(_) => Ok(reply),
            Err(e) => Err(self.fail(format!("could not receive reply: {}", e))),
        }
    }

    async fn send(&mut self, line: &str) -> Result<(), PttError> {
        self.channel = Channel::Sending;
        let sent = match self.stdin.write_all(line.as_bytes()).await {
            Ok(()) => self.stdin.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = sent {
            return Err(self.fail(format!("could not send request: {}", e)));
        }
        self.channel = Channel::AwaitingReply;
        Ok(())
    }

    async fn round_trip(&mut self, op: &str, args: &Args) -> Result<Value, PttError> {
        self.resync().await?;

        let mut line = serde_json::to_string(&BridgeRequest { op, args })
            .map_err(|e| PttError::Transport(format!("could not encode request: {}", e)))?;
        line.push('\n');

        self.send(&line).await?;
        let reply = self.read_reply().await?;
        self.channel = Channel::Ready;

        let response: BridgeResponse = match serde_json::from_str(reply.trim()) {
            Ok(response) => response,
            Err(e) => return Err(self.fail(format!("could not decode reply: {}", e))),
        };
        response.into_result()
    }
}

impl SessionClient for BridgeClient {
    async fn invoke(&mut self, op: &str, args: &Args) -> Result<Value, PttError> {
        debug!("bridge <- {}", op);
        let result = self.round_trip(op, args).await;
        if let Err(e) = &result {
            debug!("bridge -> {} failed: {}", op, e);
        }
        result
    }
}

/// Spawns a fresh bridge process per login.
#[derive(Debug, Clone)]
pub struct BridgeFactory {
    config: BridgeConfig,
}

impl BridgeFactory {
    pub fn new(config: BridgeConfig) -> Self {
        Self { config }
    }
}

impl ClientFactory for BridgeFactory {
    type Client = BridgeClient;

    fn create(&self) -> Result<BridgeClient, PttError> {
        BridgeClient::spawn(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    fn scripted(script: &str) -> BridgeConfig {
        BridgeConfig {
            command: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
        }
    }

    #[tokio::test]
    async fn test_round_trip_success_and_failure() {
        let config = scripted(
            r#"read line; echo '{"ok":true,"data":{"title":"hello"}}'
               read line; echo '{"ok":false,"error":{"kind":"NoSuchBoard","message":"nope"}}'"#,
        );
        let mut client = BridgeFactory::new(config).create().unwrap();

        let data = client.invoke("get_post", &Args::new()).await.unwrap();
        assert_eq!(data, json!({"title": "hello"}));

        let err = client.invoke("get_post", &Args::new()).await.unwrap_err();
        assert_eq!(err, PttError::NoSuchBoard("nope".to_string()));
    }

    #[tokio::test]
    async fn test_dead_bridge_is_transport_error() {
        let mut client = BridgeClient::spawn(&scripted("exit 0")).unwrap();
        let err = client.invoke("get_time", &Args::new()).await.unwrap_err();
        assert!(matches!(err, PttError::Transport(_)));

        // The stream never produced a reply, so the client stays unusable.
        let err = client.invoke("get_time", &Args::new()).await.unwrap_err();
        assert!(matches!(err, PttError::Transport(_)));
    }

    #[tokio::test]
    async fn test_abandoned_request_does_not_block_logout() {
        // Answers every request slowly, echoing it back as the payload.
        let config = scripted(
            r#"while read -r line; do sleep 0.3; echo "{\"ok\":true,\"data\":$line}"; done"#,
        );
        let mut client = BridgeClient::spawn(&config).unwrap();

        let abandoned = tokio::time::timeout(
            Duration::from_millis(50),
            client.invoke("get_post", &Args::new()),
        )
        .await;
        assert!(abandoned.is_err());

        // The stale get_post reply is skipped; logout gets its own answer.
        let data = client.invoke("logout", &Args::new()).await.unwrap();
        assert_eq!(data, json!({"op": "logout", "args": {}}));
    }

    #[tokio::test]
    async fn test_undecodable_reply_breaks_channel() {
        let config = scripted(
            r#"read -r line; echo 'not json'
               read -r line; echo '{"ok":true,"data":1}'"#,
        );
        let mut client = BridgeClient::spawn(&config).unwrap();

        let err = client.invoke("get_time", &Args::new()).await.unwrap_err();
        assert!(matches!(err, PttError::Transport(_)));
        let err = client.invoke("get_time", &Args::new()).await.unwrap_err();
        assert!(matches!(err, PttError::Transport(_)));
    }

    #[test]
    fn test_missing_program_fails_to_spawn() {
        let config = BridgeConfig {
            command: "/nonexistent/pyptt-bridge".to_string(),
            args: vec![],
        };
        let err = BridgeClient::spawn(&config).err().unwrap();
        assert!(matches!(err, PttError::Transport(_)));
    }
}
