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

//! Scripted session client for tests.

use crate::session::Credentials;
use ptt_client::{Args, ClientFactory, PttError, SessionClient};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub fn credentials() -> Credentials {
    Credentials {
        ptt_id: "CodingMan".to_string(),
        password: "s3cret".to_string(),
    }
}

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct Call {
    pub client: usize,
    pub op: String,
    pub args: Args,
}

#[derive(Default)]
struct Script {
    responses: HashMap<String, Result<Value, PttError>>,
    create_error: Option<PttError>,
    stalled: HashSet<String>,
    calls: Vec<Call>,
    created: usize,
}

/// Factory whose clients answer from a shared script and log every call.
///
/// Responses are per operation and sticky; unscripted operations return
/// `true`.
#[derive(Clone, Default)]
pub struct ScriptedFactory {
    script: Arc<Mutex<Script>>,
}

impl ScriptedFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, op: &str, response: Result<Value, PttError>) {
        self.script
            .lock()
            .unwrap()
            .responses
            .insert(op.to_string(), response);
    }

    /// Make `op` record its call and then never answer.
    pub fn stall(&self, op: &str) {
        self.script.lock().unwrap().stalled.insert(op.to_string());
    }

    pub fn fail_create(&self, err: PttError) {
        self.script.lock().unwrap().create_error = Some(err);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }
}

pub struct ScriptedClient {
    pub id: usize,
    script: Arc<Mutex<Script>>,
}

impl SessionClient for ScriptedClient {
    async fn invoke(&mut self, op: &str, args: &Args) -> Result<Value, PttError> {
        let (stalled, response) = {
            let mut script = self.script.lock().unwrap();
            script.calls.push(Call {
                client: self.id,
                op: op.to_string(),
                args: args.clone(),
            });
            let response = script
                .responses
                .get(op)
                .cloned()
                .unwrap_or(Ok(Value::Bool(true)));
            (script.stalled.contains(op), response)
        };
        if stalled {
            std::future::pending::<()>().await;
        }
        response
    }
}

impl ClientFactory for ScriptedFactory {
    type Client = ScriptedClient;

    fn create(&self) -> Result<ScriptedClient, PttError> {
        let mut script = self.script.lock().unwrap();
        if let Some(err) = script.create_error.clone() {
            return Err(err);
        }
        let id = script.created;
        script.created += 1;
        Ok(ScriptedClient {
            id,
            script: self.script.clone(),
        })
    }
}
