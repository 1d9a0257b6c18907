//! GitHub REST API client utilities.
//!
//! This crate provides a lightweight client for the one GitHub endpoint the
//! dispatch inputs summary needs: repository contents. It focuses on:
//!
//! - Constructing an HTTP client with GitHub's recommended headers
//! - Validating `GITHUB_API_URL` (GitHub Enterprise Server uses its own host)
//! - Retrieving a file at a given ref and decoding its base64 payload
//!
//! The primary entry point is [`GitHubClient`]. Create an instance via
//! [`GitHubClient::new`], and then fetch files with
//! [`GitHubClient::fetch_file_content`].
//!
//! # Example
//!
//! ```no_run
//! use dispatch_api::{ApiError, DEFAULT_API_BASE, GitHubClient};
//!
//! async fn print_workflow(token: &str) -> Result<(), ApiError> {
//!     let client = GitHubClient::new(DEFAULT_API_BASE, Some(token))?;
//!     let yaml = client.fetch_file_content("octo", "app", ".github/workflows/deploy.yml", "main").await?;
//!     println!("{yaml}");
//!     Ok(())
//! }
//! ```

mod contents;

use std::{env, time::Duration};

use reqwest::{Client, RequestBuilder, Url, header};
use thiserror::Error;
use tracing::debug;

pub use contents::{contents_path, decode_content_payload};

/// Public GitHub API endpoint used when `GITHUB_API_URL` is not set.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
/// API version pinned through the `X-GitHub-Api-Version` header.
pub const GITHUB_API_VERSION: &str = "2022-11-28";
/// Hostnames allowed for local development regardless of scheme.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Errors surfaced by the GitHub client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid GitHub API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("GitHub token contains characters that are not valid in a header")]
    InvalidToken,
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("GitHub API returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("GitHub API response did not contain file content")]
    MissingContent,
    #[error("failed to decode file content: {0}")]
    Decode(String),
}

#[derive(Debug, Clone)]
/// Thin wrapper around a configured `reqwest::Client` for GitHub API access.
///
/// Default headers carry the API version, the JSON media type, and the bearer
/// token when one is provided. Requests are resolved against a validated base
/// URL.
pub struct GitHubClient {
    pub base_url: String,
    pub http: Client,
    pub user_agent: String,
}

impl GitHubClient {
    /// Construct a [`GitHubClient`] for `base_url`, authenticating with `token` when present.
    ///
    /// Non-localhost hosts must use HTTPS. Any host is otherwise accepted so
    /// GitHub Enterprise Server installations work.
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self, ApiError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        validate_base_url(&base_url)?;

        let mut default_headers = header::HeaderMap::new();
        if let Some(token) = token.map(str::trim).filter(|token| !token.is_empty()) {
            let mut authorization = header::HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| ApiError::InvalidToken)?;
            authorization.set_sensitive(true);
            default_headers.insert(header::AUTHORIZATION, authorization);
        }
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/vnd.github+json"));
        default_headers.insert("x-github-api-version", header::HeaderValue::from_static(GITHUB_API_VERSION));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            base_url,
            http,
            user_agent: format!("dispatch-inputs/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Build a `reqwest::RequestBuilder` for a method and API-relative path.
    pub fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "building request");

        self.http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
    }

    /// Fetch a repository file at `git_ref` and return its text.
    ///
    /// The contents endpoint answers with a JSON object whose `content` field
    /// holds the base64 encoded file. Directory listings, symlinks, and other
    /// shapes are reported as [`ApiError::MissingContent`].
    pub async fn fetch_file_content(&self, owner: &str, repo: &str, path: &str, git_ref: &str) -> Result<String, ApiError> {
        let response = self
            .request(reqwest::Method::GET, &contents_path(owner, repo, path))
            .query(&[("ref", git_ref)])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: status_error_message(status.as_u16(), &text),
            });
        }

        let payload: serde_json::Value = serde_json::from_str(&text).map_err(|_| ApiError::MissingContent)?;
        decode_content_payload(&payload)
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS
fn validate_base_url(base: &str) -> Result<(), ApiError> {
    let invalid = |reason: String| ApiError::InvalidBaseUrl {
        url: base.to_string(),
        reason,
    };

    let parsed_base_url = Url::parse(base).map_err(|error| invalid(error.to_string()))?;
    let host_name = parsed_base_url.host_str().ok_or_else(|| invalid("URL must include a host".into()))?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(());
    }

    if parsed_base_url.scheme() != "https" {
        return Err(invalid(format!(
            "https is required for non-localhost hosts; got '{}://'",
            parsed_base_url.scheme()
        )));
    }

    Ok(())
}

/// Build a readable message for a failed response, with hints for auth failures.
fn status_error_message(status_code: u16, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message").and_then(|message| message.as_str()).map(str::to_string))
        .unwrap_or_else(|| dispatch_util::redact_sensitive(body.trim()));

    match status_code {
        401 => format!("{detail}. Hint: pass a token through GITHUB_TOKEN"),
        403 | 404 => format!("{detail}. Hint: the token needs `contents: read` permission on the repository"),
        _ => detail,
    }
}
