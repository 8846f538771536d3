//! Target-URL resolution: where a notification should open when clicked.
//!
//! Resolution happens at click time, not at fetch time, so the deep link points
//! at the first comment the user has not read yet.

use url::Url;

use hubbell_common::error::AppError;
use hubbell_common::types::{Notification, SubjectType};

use crate::cursor::last_read_cursor;
use crate::ports::TrackerApi;

/// Resolve the web URL a notification should open.
///
/// Errors here (missing or malformed subject URL, unsupported subject type)
/// are for the caller to absorb; API failures for issues and pull requests are
/// already absorbed by the URL heuristic.
pub async fn resolve_target_url(
    api: &dyn TrackerApi,
    notification: &Notification,
) -> Result<String, AppError> {
    match &notification.subject.kind {
        SubjectType::Issue | SubjectType::PullRequest => issue_or_pr_url(api, notification).await,
        SubjectType::RepositoryInvitation => Ok(invitation_url(notification)),
        SubjectType::Other(tag) => Err(AppError::UnsupportedSubject(tag.clone())),
    }
}

fn invitation_url(notification: &Notification) -> String {
    format!("{}/invitations", notification.repository.html_url)
}

async fn issue_or_pr_url(
    api: &dyn TrackerApi,
    notification: &Notification,
) -> Result<String, AppError> {
    let subject_url = notification
        .subject
        .url
        .as_deref()
        .ok_or(AppError::MissingField("subject.url"))?;
    let url = Url::parse(subject_url)?;
    let since = last_read_cursor(notification);

    match thread_url_from_api(api, url.path(), &since).await {
        Ok(target) => Ok(target),
        Err(e) => {
            tracing::debug!(
                notification_id = %notification.id,
                error = %e,
                "Tracker lookup failed, deriving URL from subject"
            );
            web_url_from_api_url(url, &api.browsing_hostname())
        }
    }
}

/// Deep link to the oldest unread comment, else the thread itself.
async fn thread_url_from_api(
    api: &dyn TrackerApi,
    path: &str,
    since: &str,
) -> Result<String, AppError> {
    let comments = api
        .fetch_comments(&format!("{}/comments", path), since, 1)
        .await?;

    if let Some(comment) = comments.into_iter().next() {
        return Ok(comment.html_url);
    }

    let resource = api.fetch_resource(path).await?;
    if resource.is_not_found() {
        return Ok(api.fallback_tab_url());
    }

    resource.html_url.ok_or(AppError::MissingField("html_url"))
}

/// Turn a REST URL such as `https://api.host/api/v3/repos/o/r/pulls/2` into
/// its web page `https://host/o/r/pull/2` without calling the API.
pub fn web_url_from_api_url(mut url: Url, hostname: &str) -> Result<String, AppError> {
    url.set_host(Some(hostname))?;

    let path = url
        .path()
        .replacen("/api/v3", "", 1)
        .replacen("/repos", "", 1)
        .replacen("/pulls/", "/pull/", 1);
    url.set_path(&path);

    Ok(url.to_string())
}
