//! Client for reading and writing a single file through the Contents API.
//!
//! The store is content-addressed per path with a linear revision chain:
//! every write carries the blob sha it is based on, which is the API's only
//! concurrency safeguard. Responses are validated against explicit structs
//! rather than trusted field access.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{header, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::AppError;

/// Result of fetching a file. A missing file is a normal outcome, not an
/// error; `exists` is false and both fields are `None`.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    pub exists: bool,
    pub content: Option<Vec<u8>>,
    pub sha: Option<String>,
}

/// Successful GET response for a contents path.
#[derive(Debug, Deserialize)]
struct ContentsResponse {
    content: Option<String>,
    sha: String,
}

/// PUT request body for a contents path. Omitting `sha` creates the file;
/// providing it updates only if the remote still matches.
#[derive(Debug, Serialize)]
struct WriteRequest<'a> {
    message: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

/// Successful PUT response; the new blob sha is nested under `content`.
#[derive(Debug, Deserialize)]
struct WriteResponse {
    content: Option<WrittenContent>,
}

#[derive(Debug, Deserialize)]
struct WrittenContent {
    sha: String,
}

/// Error body GitHub attaches to non-success responses.
#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    message: Option<String>,
}

/// Client for the GitHub Contents API, bound to one owner/repo pair.
#[derive(Clone)]
pub struct ContentsClient {
    http: reqwest::Client,
    api_base: String,
    owner: String,
    repo: String,
    token: String,
}

impl ContentsClient {
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gitnote-backend/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            token: config.token.clone(),
        }
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base, self.owner, self.repo, path
        )
    }

    /// Fetch a file by path. 404 maps to `exists: false`; any other
    /// non-success response is surfaced with GitHub's status and message.
    pub async fn fetch_file(&self, path: &str) -> Result<RemoteFile, AppError> {
        let response = self
            .http
            .get(self.contents_url(path))
            .header(header::AUTHORIZATION, format!("token {}", self.token))
            .header(header::ACCEPT, "application/vnd.github.v3+json")
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("File {} not found, treating as first run", path);
            return Ok(RemoteFile {
                exists: false,
                content: None,
                sha: None,
            });
        }

        let status = response.status();
        if !status.is_success() {
            return Err(upstream_error(status, response).await);
        }

        let body: ContentsResponse = response.json().await.map_err(|e| AppError::Upstream {
            status: status.as_u16(),
            message: format!("Malformed contents response: {}", e),
        })?;

        let content = match body.content {
            Some(encoded) => Some(decode_content(&encoded)?),
            None => None,
        };

        Ok(RemoteFile {
            exists: true,
            content,
            sha: Some(body.sha),
        })
    }

    /// Write a file by path, based on `base_sha` when the file already
    /// exists. Returns the new blob sha on success.
    pub async fn write_file(
        &self,
        path: &str,
        content: &[u8],
        base_sha: Option<&str>,
    ) -> Result<String, AppError> {
        let body = WriteRequest {
            message: format!("Web Update: {}", path),
            content: BASE64.encode(content),
            sha: base_sha,
        };

        let response = self
            .http
            .put(self.contents_url(path))
            .header(header::AUTHORIZATION, format!("token {}", self.token))
            .header(header::ACCEPT, "application/vnd.github.v3+json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::CONFLICT {
            let message = error_message(response).await;
            // Fetch the sha now at the head so the caller can reconcile
            // against it. If that fetch fails too, the conflict is still
            // reported, just without the marker.
            let current_revision = match self.fetch_file(path).await {
                Ok(remote) => remote.sha,
                Err(_) => None,
            };
            return Err(AppError::Conflict {
                message,
                current_revision,
            });
        }
        if !status.is_success() {
            return Err(upstream_error(status, response).await);
        }

        // A success response without the nested sha means we cannot track
        // the revision chain, so treat it as an upstream failure.
        let body: WriteResponse = response.json().await.map_err(|e| AppError::Upstream {
            status: status.as_u16(),
            message: format!("Malformed write response: {}", e),
        })?;

        match body.content {
            Some(written) => Ok(written.sha),
            None => Err(AppError::Upstream {
                status: status.as_u16(),
                message: "Write response missing content sha".to_string(),
            }),
        }
    }
}

/// Decode base64 file content. GitHub inserts line breaks into the encoded
/// body, so whitespace is stripped first.
fn decode_content(encoded: &str) -> Result<Vec<u8>, AppError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    BASE64.decode(compact).map_err(|e| AppError::Upstream {
        status: 200,
        message: format!("Invalid base64 content: {}", e),
    })
}

async fn upstream_error(status: StatusCode, response: reqwest::Response) -> AppError {
    AppError::Upstream {
        status: status.as_u16(),
        message: error_message(response).await,
    }
}

/// Extract GitHub's `message` field, falling back to the raw body.
async fn error_message(response: reqwest::Response) -> String {
    let fallback = response
        .status()
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string();
    let raw = match response.text().await {
        Ok(text) => text,
        Err(_) => return fallback,
    };
    match serde_json::from_str::<GitHubErrorBody>(&raw) {
        Ok(GitHubErrorBody {
            message: Some(message),
        }) => message,
        _ => {
            if raw.is_empty() {
                fallback
            } else {
                raw
            }
        }
    }
}
