//! HTTP transport seam.
//!
//! [`Transport`] is the only place the client touches the network. The
//! production implementation, [`HttpTransport`], speaks JSON over `reqwest`;
//! tests substitute an in-memory implementation.

use crate::config::ConnectionConfig;
use crate::core::error::{H2oAutoMLError, Result};

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// HTTP verb of a REST call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// A JSON request/response channel to an H2O cluster.
///
/// Implementations return the decoded response body on success and
/// [`H2oAutoMLError::Server`] for error statuses.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Issue `method path`, with an optional JSON body.
    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value>;
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    credentials: Option<(String, String)>,
}

impl HttpTransport {
    /// Build a transport from a validated connection configuration.
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        let credentials = match (&config.username, &config.password) {
            (Some(user), Some(password)) => Some((user.clone(), password.clone())),
            _ => None,
        };
        Ok(HttpTransport {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Cluster base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let url = self.url(path);
        log::debug!("{} {}", method, url);

        let mut request = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        if let Some((ref user, ref password)) = self.credentials {
            request = request.basic_auth(user, Some(password));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
            let message = server_message(&body);
            log::debug!("{} {} -> HTTP {}: {}", method, url, status.as_u16(), message);
            return Err(H2oAutoMLError::Server {
                status: status.as_u16(),
                message,
                body,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Human-readable message of an H2O error body.
///
/// H2O error schemas carry `msg` and, for developers, `dev_msg`; anything
/// else is rendered verbatim.
pub fn server_message(body: &Value) -> String {
    for key in ["msg", "dev_msg", "exception_msg"] {
        if let Some(msg) = body.get(key).and_then(Value::as_str) {
            if !msg.is_empty() {
                return msg.to_string();
            }
        }
    }
    match body {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
