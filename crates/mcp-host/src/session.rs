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

//! Session store and lifecycle
//!
//! [`SessionContext`] holds at most one logged-in client plus the credentials
//! used to establish it. It is owned by the server and threaded by `&mut`
//! into every operation, so login, logout, and dispatch are serialized.

use crate::classify::classify;
use crate::envelope::{Envelope, codes};
use ptt_client::{Args, ClientFactory, SessionClient};
use serde_json::Value;
use std::fmt;
use tracing::{info, warn};

/// Board credentials, fixed at startup.
#[derive(Clone)]
pub struct Credentials {
    pub ptt_id: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("ptt_id", &self.ptt_id)
            .field("password", &"***")
            .finish()
    }
}

/// The single board session and everything needed to (re)establish it.
pub struct SessionContext<F: ClientFactory> {
    factory: F,
    credentials: Credentials,
    client: Option<F::Client>,
    shut_down: bool,
}

impl<F: ClientFactory> SessionContext<F> {
    pub fn new(factory: F, credentials: Credentials) -> Self {
        Self {
            factory,
            credentials,
            client: None,
            shut_down: false,
        }
    }

    #[cfg(test)]
    pub fn is_logged_in(&self) -> bool {
        self.client.is_some()
    }

    /// The live client, if logged in.
    pub fn client_mut(&mut self) -> Option<&mut F::Client> {
        self.client.as_mut()
    }

    /// Drop the stored client without talking to it.
    ///
    /// Used when the client is known to be dead.
    pub fn invalidate(&mut self) {
        if self.client.take().is_some() {
            info!("Session discarded");
        }
    }

    /// Log in with the stored credentials, replacing any existing session.
    ///
    /// The previous session is logged out first; failures doing so are
    /// ignored. On failure the store is left empty.
    pub async fn login(&mut self) -> Envelope {
        if let Some(mut previous) = self.client.take() {
            info!("Logging out previous session before re-login");
            if let Err(e) = previous.invoke("logout", &Args::new()).await {
                warn!("Ignoring error while tearing down previous session: {}", e);
            }
        }

        let mut client = match self.factory.create() {
            Ok(client) => client,
            Err(e) => {
                warn!("Could not create session client: {}", e);
                return classify(&e, &Args::new());
            }
        };

        let mut args = Args::new();
        args.insert("ptt_id".into(), Value::String(self.credentials.ptt_id.clone()));
        args.insert("ptt_pw".into(), Value::String(self.credentials.password.clone()));
        args.insert("kick_other_session".into(), Value::Bool(true));

        info!("Logging in as {}", self.credentials.ptt_id);
        match client.invoke("login", &args).await {
            Ok(_) => {
                info!("Logged in as {}", self.credentials.ptt_id);
                self.client = Some(client);
                Envelope::message("登入成功")
            }
            Err(e) => {
                warn!("Login as {} failed: {}", self.credentials.ptt_id, e);
                // Credentials stay out of the diagnostic echo.
                classify(&e, &Args::new())
            }
        }
    }

    /// Log out. The store is empty afterwards whatever the client reports.
    pub async fn logout(&mut self) -> Envelope {
        let Some(mut client) = self.client.take() else {
            return Envelope::failure(codes::NOT_LOGGED_IN, "尚未登入，無需登出");
        };

        if let Err(e) = client.invoke("logout", &Args::new()).await {
            warn!("Logout reported an error, session discarded anyway: {}", e);
        } else {
            info!("Logged out");
        }
        Envelope::message("登出成功")
    }

    /// Best-effort logout before exit. Only the first call does anything.
    pub async fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        if self.client.is_some() {
            info!("Logging out before exit");
            let _ = self.logout().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedFactory, credentials};
    use pretty_assertions::assert_eq;
    use ptt_client::PttError;

    #[tokio::test]
    async fn test_login_stores_client() {
        let factory = ScriptedFactory::new();
        let mut session = SessionContext::new(factory.clone(), credentials());

        let env = session.login().await;
        assert_eq!(env, Envelope::message("登入成功"));
        assert!(session.is_logged_in());

        let calls = factory.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].op, "login");
        assert_eq!(calls[0].args["ptt_id"], "CodingMan");
        assert_eq!(calls[0].args["kick_other_session"], true);
    }

    #[tokio::test]
    async fn test_relogin_replaces_session_even_if_old_logout_fails() {
        let factory = ScriptedFactory::new();
        let mut session = SessionContext::new(factory.clone(), credentials());
        session.login().await;

        factory.respond("logout", Err(PttError::Transport("gone".into())));
        let env = session.login().await;
        assert!(env.is_success());
        assert_eq!(session.client_mut().map(|c| c.id), Some(1));

        let ops: Vec<_> = factory
            .calls()
            .into_iter()
            .map(|c| (c.client, c.op))
            .collect();
        assert_eq!(
            ops,
            vec![
                (0, "login".to_string()),
                (0, "logout".to_string()),
                (1, "login".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_login_leaves_store_empty() {
        let factory = ScriptedFactory::new();
        let mut session = SessionContext::new(factory.clone(), credentials());
        session.login().await;

        factory.respond("login", Err(PttError::WrongIdOrPassword("bad".into())));
        let env = session.login().await;
        assert_eq!(env.code(), Some(codes::WRONG_CREDENTIALS));
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn test_factory_failure_is_classified() {
        let factory = ScriptedFactory::new();
        factory.fail_create(PttError::Transport("no such program".into()));
        let mut session = SessionContext::new(factory, credentials());

        let env = session.login().await;
        assert_eq!(env.code(), Some(codes::UNKNOWN_ERROR));
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn test_logout_clears_store_even_on_error() {
        let factory = ScriptedFactory::new();
        let mut session = SessionContext::new(factory.clone(), credentials());
        session.login().await;

        factory.respond("logout", Err(PttError::RequireLogin("expired".into())));
        let env = session.logout().await;
        assert_eq!(env, Envelope::message("登出成功"));
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn test_logout_without_session() {
        let factory = ScriptedFactory::new();
        let mut session = SessionContext::new(factory.clone(), credentials());

        let env = session.logout().await;
        assert_eq!(env.code(), Some(codes::NOT_LOGGED_IN));
        assert_eq!(env.message_text(), Some("尚未登入，無需登出"));
        assert!(factory.calls().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_logs_out_once() {
        let factory = ScriptedFactory::new();
        let mut session = SessionContext::new(factory.clone(), credentials());
        session.login().await;

        session.shutdown().await;
        session.shutdown().await;
        assert!(!session.is_logged_in());

        let logouts = factory
            .calls()
            .iter()
            .filter(|c| c.op == "logout")
            .count();
        assert_eq!(logouts, 1);
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let rendered = format!("{:?}", credentials());
        assert!(rendered.contains("CodingMan"));
        assert!(!rendered.contains("s3cret"));
    }
}
