pub mod types;

pub use types::{Message, Notification, NotificationFeed, Product, User, parse_timestamp};

use crate::config::ApiConfig;
use crate::errors::{AgriBidError, AgriBidResult, FieldError};
use crate::session::Session;
use crate::utils::http::{MAX_BODY_BYTES, limited_body};
use crate::utils::truncate_for_display;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};
use types::ListEnvelope;

/// Longest error body echoed back to the user.
const MAX_ERROR_BODY: usize = 200;

/// Error bodies are only mined for field messages; no need to buffer more.
const ERROR_BODY_READ_LIMIT: usize = 64 * 1024;

/// Typed client for the AgriBid REST backend.
///
/// Every call is a single request: no retries, no caching. Authenticated
/// calls take the [`Session`] explicitly.
pub struct ApiClient {
    base_url: String,
    client: Client,
    messages_timeout: Duration,
    max_body_bytes: usize,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: crate::utils::http::http_client(config.timeout()),
            messages_timeout: config.messages_timeout(),
            max_body_bytes: MAX_BODY_BYTES,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(builder: RequestBuilder, session: Option<&Session>) -> RequestBuilder {
        match session {
            Some(s) => builder.header("Authorization", s.bearer()),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, what: &str) -> AgriBidResult<Response> {
        let resp = builder.send().await.map_err(|e| {
            warn!("{what} request failed: {e}");
            AgriBidError::from(e)
        })?;
        let status = resp.status();
        if status.is_success() {
            debug!("{what}: HTTP {status}");
            return Ok(resp);
        }
        let text = match limited_body(resp, ERROR_BODY_READ_LIMIT).await {
            Ok((bytes, _)) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                debug!("{what}: could not read error body: {e}");
                String::new()
            }
        };
        warn!("{what}: HTTP {status}");
        Err(error_for_status(status, &text))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        session: Option<&Session>,
        timeout: Option<Duration>,
    ) -> AgriBidResult<T> {
        let mut builder = Self::authorized(self.client.get(self.url(path)), session);
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let resp = self.send(builder, path).await?;
        self.decode_body(resp, path).await
    }

    async fn decode_body<T: DeserializeOwned>(
        &self,
        resp: Response,
        what: &str,
    ) -> AgriBidResult<T> {
        let (bytes, truncated) = limited_body(resp, self.max_body_bytes)
            .await
            .map_err(|e| match e.downcast::<reqwest::Error>() {
                Ok(transport) => AgriBidError::from(transport),
                Err(e) => {
                    warn!("{what}: {e}");
                    AgriBidError::Decode(e.to_string())
                }
            })?;
        if truncated {
            warn!("{what}: body exceeds {} bytes", self.max_body_bytes);
            return Err(AgriBidError::Decode(format!(
                "response body too large: exceeds limit {}",
                self.max_body_bytes
            )));
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!("{what}: undecodable body: {e}");
            AgriBidError::Decode(format!(
                "{e} (body: {})",
                truncate_for_display(&String::from_utf8_lossy(&bytes), MAX_ERROR_BODY)
            ))
        })
    }

    /// All product listings. Sends the bearer token when a session is given.
    pub async fn list_products(&self, session: Option<&Session>) -> AgriBidResult<Vec<Product>> {
        let list: ListEnvelope<Product> = self.get_json("products", session, None).await?;
        Ok(list.into_vec())
    }

    pub async fn list_users(&self, session: &Session) -> AgriBidResult<Vec<User>> {
        let list: ListEnvelope<User> = self.get_json("users", Some(session), None).await?;
        Ok(list.into_vec())
    }

    /// Messages exchanged about one product, across all participants.
    ///
    /// Uses the shorter message timeout rather than the client default.
    pub async fn messages_for_product(
        &self,
        session: &Session,
        product_id: i64,
    ) -> AgriBidResult<Vec<Message>> {
        let path = format!("messages/product/{product_id}");
        let list: ListEnvelope<Message> = self
            .get_json(&path, Some(session), Some(self.messages_timeout))
            .await?;
        Ok(list.into_vec())
    }

    pub async fn notifications(&self, session: &Session) -> AgriBidResult<NotificationFeed> {
        self.get_json("notifications", Some(session), None).await
    }

    pub async fn grant_admin(&self, session: &Session, user_id: i64) -> AgriBidResult<()> {
        self.post_role(session, &format!("users/{user_id}/admin"))
            .await?;
        info!("granted admin role to user {user_id}");
        Ok(())
    }

    pub async fn revoke_admin(&self, session: &Session, user_id: i64) -> AgriBidResult<()> {
        self.post_role(session, &format!("users/{user_id}/revoke-admin"))
            .await?;
        info!("revoked admin role from user {user_id}");
        Ok(())
    }

    async fn post_role(&self, session: &Session, path: &str) -> AgriBidResult<()> {
        let builder = Self::authorized(self.client.post(self.url(path)), Some(session));
        // Body is informational only
        self.send(builder, path).await.map(|_| ())
    }
}

/// Map a non-2xx response onto the error taxonomy.
pub(crate) fn error_for_status(status: StatusCode, body: &str) -> AgriBidError {
    match status {
        StatusCode::UNAUTHORIZED => AgriBidError::Unauthorized,
        StatusCode::UNPROCESSABLE_ENTITY => AgriBidError::Validation {
            fields: parse_field_errors(body),
        },
        _ => AgriBidError::Api {
            status: status.as_u16(),
            body: truncate_for_display(body, MAX_ERROR_BODY),
        },
    }
}

/// Extract field-level messages from a 422 body.
///
/// Understands `{"errors": {"field": ["msg", ..]}}`,
/// `{"errors": [{"field"|"path"|"param": .., "message"|"msg": ..}]}` and a
/// plain `{"message": ".."}`.
pub(crate) fn parse_field_errors(body: &str) -> Vec<FieldError> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    match &value["errors"] {
        Value::Object(map) => {
            for (field, msgs) in map {
                match msgs {
                    Value::Array(list) => {
                        for m in list.iter().filter_map(Value::as_str) {
                            out.push(FieldError {
                                field: field.clone(),
                                message: m.to_string(),
                            });
                        }
                    }
                    Value::String(m) => out.push(FieldError {
                        field: field.clone(),
                        message: m.clone(),
                    }),
                    _ => {}
                }
            }
        }
        Value::Array(list) => {
            for item in list {
                let field = ["field", "path", "param"]
                    .iter()
                    .find_map(|k| item[*k].as_str())
                    .unwrap_or("request");
                let Some(message) = ["message", "msg"].iter().find_map(|k| item[*k].as_str())
                else {
                    continue;
                };
                out.push(FieldError {
                    field: field.to_string(),
                    message: message.to_string(),
                });
            }
        }
        _ => {}
    }
    if out.is_empty()
        && let Some(m) = value["message"].as_str()
    {
        out.push(FieldError {
            field: "request".to_string(),
            message: m.to_string(),
        });
    }
    out
}
