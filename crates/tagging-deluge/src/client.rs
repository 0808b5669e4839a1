//! Blocking JSON-RPC client for the Deluge Web UI.

use crate::error::Result;
use crate::rpc::{
    RpcRequest, SESSION_COOKIE, decode_response, enabled_plugins, endpoint_url, expect_bool,
    session_cookie,
};
use reqwest::header::{COOKIE, SET_COOKIE};
use serde_json::{Value, json};
use std::time::Duration;
use tagging::{TagSnapshot, Timestamp};
use tagging_sync::{HostStatus, SyncError, TagSource};
use tracing::{debug, info, warn};

/// Name the plugin registers under in `web.get_plugins`.
pub const PLUGIN_NAME: &str = "Tagging";

pub const METHOD_IS_INITIALIZED: &str = "tagging.is_initialized";
pub const METHOD_GET_TAG_UPDATES: &str = "tagging.get_tag_updates_dict";
pub const METHOD_SET_TORRENT_TAGS: &str = "tagging.set_torrent_tags";

/// Connection settings for a Deluge Web UI.
#[derive(Debug, Clone)]
pub struct DelugeConfig {
    /// Base URL of the web UI. `/json` is appended when missing.
    pub url: String,
    /// Web UI password. Without one the client only reuses an existing
    /// session.
    pub password: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for DelugeConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8112".to_string(),
            password: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DelugeConfig {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A Deluge Web session speaking the Tagging plugin's RPC methods.
pub struct DelugeClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    password: Option<String>,
    session: Option<String>,
    next_id: u64,
}

impl std::fmt::Debug for DelugeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelugeClient")
            .field("endpoint", &self.endpoint)
            .field("has_password", &self.password.is_some())
            .field("has_session", &self.session.is_some())
            .finish()
    }
}

impl DelugeClient {
    pub fn new(config: DelugeConfig) -> Result<Self> {
        let endpoint = endpoint_url(&config.url)?;
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint,
            password: config.password,
            session: None,
            next_id: 0,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether a session cookie has been received.
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Invoke `method` with positional `params` and return its result.
    pub fn call(&mut self, method: &str, params: Value) -> Result<Value> {
        self.next_id += 1;
        let request = RpcRequest {
            method,
            params,
            id: self.next_id,
        };
        debug!(method, id = self.next_id, "rpc call");

        let mut builder = self.http.post(&self.endpoint).json(&request);
        if let Some(session) = &self.session {
            builder = builder.header(COOKIE, format!("{}={}", SESSION_COOKIE, session));
        }

        let response = builder.send()?.error_for_status()?;
        if let Some(session) = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(session_cookie)
        {
            self.session = Some(session);
        }

        decode_response(&response.text()?)
    }

    pub fn check_session(&mut self) -> Result<bool> {
        let result = self.call("auth.check_session", json!([]))?;
        expect_bool("auth.check_session", result)
    }

    /// Log in with the configured password. Returns `false` without a
    /// request when no password is set.
    pub fn login(&mut self) -> Result<bool> {
        let Some(password) = self.password.clone() else {
            return Ok(false);
        };
        let result = self.call("auth.login", json!([password]))?;
        let accepted = expect_bool("auth.login", result)?;
        if accepted {
            info!(endpoint = %self.endpoint, "logged in");
        } else {
            warn!(endpoint = %self.endpoint, "login rejected");
        }
        Ok(accepted)
    }

    /// Whether the web UI is connected to a daemon.
    pub fn is_connected(&mut self) -> Result<bool> {
        let result = self.call("web.connected", json!([]))?;
        expect_bool("web.connected", result)
    }

    pub fn enabled_plugins(&mut self) -> Result<Vec<String>> {
        let result = self.call("web.get_plugins", json!([]))?;
        enabled_plugins(result)
    }
}

impl TagSource for DelugeClient {
    fn host_status(&mut self) -> tagging_sync::Result<HostStatus> {
        if !self.check_session()? {
            if self.password.is_none() {
                return Ok(HostStatus::login_pending());
            }
            // A rejected password counts against the retry budget.
            if !self.login()? {
                return Ok(HostStatus::unavailable());
            }
        }

        if !self.is_connected()? {
            debug!("web UI not connected to a daemon");
            return Ok(HostStatus::unavailable());
        }

        let rpc_ready = self.enabled_plugins()?.iter().any(|p| p == PLUGIN_NAME);
        if !rpc_ready {
            debug!(plugin = PLUGIN_NAME, "plugin not enabled");
        }

        Ok(HostStatus {
            login_visible: false,
            rpc_ready,
        })
    }

    fn is_initialized(&mut self) -> tagging_sync::Result<bool> {
        let result = self.call(METHOD_IS_INITIALIZED, json!([]))?;
        Ok(expect_bool(METHOD_IS_INITIALIZED, result)?)
    }

    fn get_tag_updates(
        &mut self,
        since: Option<&Timestamp>,
    ) -> tagging_sync::Result<Option<TagSnapshot>> {
        let params = match since {
            Some(ts) => json!([ts.as_value()]),
            None => json!([]),
        };
        let result = self.call(METHOD_GET_TAG_UPDATES, params)?;
        TagSnapshot::from_response(result).map_err(|e| SyncError::MalformedSnapshot(e.to_string()))
    }

    fn set_torrent_tags(&mut self, torrent_ids: &[String], tag_id: &str) -> tagging_sync::Result<()> {
        self.call(METHOD_SET_TORRENT_TAGS, json!([torrent_ids, tag_id]))?;
        Ok(())
    }
}
