//! GitHub REST client: notification source and tracker API for the bridge.
//!
//! Works against github.com and GitHub Enterprise. The web root decides both
//! hosts: `github.com` talks to `api.github.com`, an enterprise root `R` talks
//! to `R/api/v3/`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, LAST_MODIFIED, LINK};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use url::Url;

use hubbell_common::config::AppConfig;
use hubbell_common::error::AppError;
use hubbell_common::types::{Comment, Notification, NotificationBatch, Resource};
use hubbell_engine::ports::{NotificationSource, TrackerApi};

const USER_AGENT: &str = concat!("hubbell/", env!("CARGO_PKG_VERSION"));

/// Page size for the notifications listing (the API maximum).
const NOTIFICATIONS_PER_PAGE: u32 = 100;

pub struct GitHubClient {
    http: Client,
    api_url: Url,
    browsing_host: String,
    tab_url: String,
    token: Option<String>,
    only_participating: bool,
}

impl GitHubClient {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let root_url = normalize_root_url(&config.github_root_url)?;
        let api_url = api_url_for(&root_url)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        let browsing_host = root_url
            .host_str()
            .ok_or_else(|| AppError::Config("GITHUB_ROOT_URL has no host".to_string()))?
            .to_string();

        let tab_path = if config.github_only_participating {
            "notifications/participating"
        } else {
            "notifications"
        };
        let tab_url = root_url.join(tab_path)?.to_string();

        tracing::info!(
            api_url = %api_url,
            browsing_host = %browsing_host,
            authenticated = config.github_token.is_some(),
            "GitHub client configured"
        );

        Ok(Self {
            http,
            api_url,
            browsing_host,
            tab_url,
            token: config.github_token.clone(),
            only_participating: config.github_only_participating,
        })
    }

    /// Point the client at a different API base (e.g. a local mock server).
    pub fn with_api_url(mut self, api_url: Url) -> Self {
        self.api_url = api_url;
        self
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    fn get(&self, url: Url) -> RequestBuilder {
        let request = self
            .http
            .get(url)
            .header(ACCEPT, "application/vnd.github+json");

        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("token {}", token)),
            None => request,
        }
    }

    /// Resolve an absolute API path (as found in subject URLs, including any
    /// `/api/v3` prefix) against the API origin.
    fn path_url(&self, path: &str) -> Result<Url, AppError> {
        Ok(self.api_url.join(path)?)
    }

    fn notifications_url(&self, cursor: Option<&str>) -> Result<Url, AppError> {
        let mut url = self.api_url.join("notifications")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("per_page", &NOTIFICATIONS_PER_PAGE.to_string());
            if self.only_participating {
                query.append_pair("participating", "true");
            }
            if let Some(cursor) = cursor {
                query.append_pair("since", &since_param(cursor));
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl NotificationSource for GitHubClient {
    async fn fetch_notifications(
        &self,
        cursor: Option<&str>,
    ) -> Result<NotificationBatch, AppError> {
        let mut batch = NotificationBatch::default();
        let mut next = Some(self.notifications_url(cursor)?);
        let mut first_page = true;

        while let Some(page_url) = next.take() {
            let response = ensure_success(self.get(page_url).send().await?).await?;

            if first_page {
                batch.last_modified = header_str(response.headers(), LAST_MODIFIED.as_str());
                batch.poll_interval_secs = header_str(response.headers(), "x-poll-interval")
                    .and_then(|v| v.parse().ok());
                first_page = false;
            }

            next = header_str(response.headers(), LINK.as_str())
                .and_then(|link| next_page_link(&link))
                .map(|link| Url::parse(&link))
                .transpose()?;

            let page: Vec<Notification> = response.json().await?;
            batch.notifications.extend(page);
        }

        tracing::debug!(
            count = batch.notifications.len(),
            last_modified = ?batch.last_modified,
            "Fetched notifications"
        );

        Ok(batch)
    }
}

#[async_trait]
impl TrackerApi for GitHubClient {
    async fn fetch_comments(
        &self,
        path: &str,
        since: &str,
        per_page: u32,
    ) -> Result<Vec<Comment>, AppError> {
        let mut url = self.path_url(path)?;
        url.query_pairs_mut()
            .append_pair("since", since)
            .append_pair("per_page", &per_page.to_string());

        let response = ensure_success(self.get(url).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn fetch_resource(&self, path: &str) -> Result<Resource, AppError> {
        let response = self.get(self.path_url(path)?).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(response.json().await?);
        }

        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }

    fn browsing_hostname(&self) -> String {
        self.browsing_host.clone()
    }

    fn fallback_tab_url(&self) -> String {
        self.tab_url.clone()
    }
}

/// Parse the configured web root, making sure it ends with a slash.
pub fn normalize_root_url(root: &str) -> Result<Url, AppError> {
    let trimmed = root.trim();
    if trimmed.ends_with('/') {
        Ok(Url::parse(trimmed)?)
    } else {
        Ok(Url::parse(&format!("{}/", trimmed))?)
    }
}

/// API base for a web root.
pub fn api_url_for(root_url: &Url) -> Result<Url, AppError> {
    match root_url.host_str() {
        Some("github.com") | Some("www.github.com") => Ok(Url::parse("https://api.github.com/")?),
        Some(_) => Ok(root_url.join("api/v3/")?),
        None => Err(AppError::Config(format!("{} has no host", root_url))),
    }
}

/// The `since` query value for a poll cursor: HTTP dates become ISO-8601,
/// anything else is passed through untouched.
pub fn since_param(cursor: &str) -> String {
    match DateTime::parse_from_rfc2822(cursor) {
        Ok(date) => date
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        Err(_) => cursor.to_string(),
    }
}

/// Extract the `rel="next"` target from a `Link` header.
pub fn next_page_link(link_header: &str) -> Option<String> {
    link_header.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_next = pieces.any(|param| {
            let param = param.trim();
            param == "rel=\"next\"" || param == "rel=next"
        });

        if is_next {
            Some(
                target
                    .trim_start_matches('<')
                    .trim_end_matches('>')
                    .to_string(),
            )
        } else {
            None
        }
    })
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Turn a non-2xx response into `AppError::Api`, using the JSON `message` when present.
async fn ensure_success(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or(body);

    Err(AppError::Api {
        status: status.as_u16(),
        message,
    })
}
