//! HTTP client for the study API
//!
//! Thin blocking wrapper over ureq. Every error is classified as either
//! a server answer (the server spoke, its word is final) or a network
//! failure (the server may never have seen the request). Callers use
//! that split to decide whether an operation can be retried later.

use serde::{Deserialize, Serialize};
use study_core::{PublicUser, Topic};

/// What went wrong talking to the API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with an error status. Final.
    #[error("{msg} (HTTP {code})")]
    Server { code: u16, msg: String },

    /// The request never completed. The server's state is unknown.
    #[error("network error: {0}")]
    Network(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Deserialize)]
struct ErrorBody {
    msg: String,
}

#[derive(Deserialize)]
pub struct AuthResponse {
    pub msg: String,
    #[serde(default)]
    pub token: Option<String>,
    pub user: PublicUser,
}

#[derive(Deserialize)]
pub struct MessageResponse {
    pub msg: String,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct CreateTopicRequest<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    level: &'a str,
}

/// Blocking client for one API base URL.
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn register(&self, name: &str, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let response = ureq::post(&self.url("/api/auth/register"))
            .send_json(&RegisterRequest {
                name,
                email,
                password,
            });
        into_json(response)
    }

    pub fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let response =
            ureq::post(&self.url("/api/auth/login")).send_json(&LoginRequest { email, password });
        into_json(response)
    }

    pub fn list_topics(&self) -> ClientResult<Vec<Topic>> {
        into_json(ureq::get(&self.url("/api/topics")).call())
    }

    pub fn get_topic(&self, slug: &str) -> ClientResult<Topic> {
        into_json(ureq::get(&self.url(&format!("/api/topics/{}", slug))).call())
    }

    pub fn create_topic(
        &self,
        token: &str,
        title: &str,
        description: Option<&str>,
        level: &str,
    ) -> ClientResult<Topic> {
        let response = ureq::post(&self.url("/api/topics"))
            .set("Authorization", &format!("Bearer {}", token))
            .send_json(&CreateTopicRequest {
                title,
                description,
                level,
            });
        into_json(response)
    }

    pub fn delete_topic(&self, token: &str, slug: &str) -> ClientResult<MessageResponse> {
        let response = ureq::delete(&self.url(&format!("/api/topics/{}", slug)))
            .set("Authorization", &format!("Bearer {}", token))
            .call();
        into_json(response)
    }
}

/// Turn a ureq response into a typed body, mapping error statuses onto
/// the server/network split. The server's `{msg}` body is preferred;
/// a bare status code stands in when the body is not ours.
fn into_json<T: serde::de::DeserializeOwned>(
    response: Result<ureq::Response, ureq::Error>,
) -> ClientResult<T> {
    match response {
        Ok(resp) => resp
            .into_json()
            .map_err(|e| ClientError::Network(format!("unreadable response: {}", e))),
        Err(ureq::Error::Status(code, resp)) => {
            let msg = resp
                .into_json::<ErrorBody>()
                .map(|body| body.msg)
                .unwrap_or_else(|_| format!("HTTP {}", code));
            Err(ClientError::Server { code, msg })
        }
        Err(e) => Err(ClientError::Network(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:4000/");
        assert_eq!(client.url("/api/topics"), "http://localhost:4000/api/topics");
    }

    #[test]
    fn test_server_error_displays_msg_and_code() {
        let err = ClientError::Server {
            code: 404,
            msg: "topic not found".into(),
        };
        assert_eq!(err.to_string(), "topic not found (HTTP 404)");
    }

    #[test]
    fn test_network_error_display() {
        let err = ClientError::Network("connection refused".into());
        assert_eq!(err.to_string(), "network error: connection refused");
    }
}
