use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of thread a notification refers to.
///
/// The tracker uses an open set of string tags; the ones without a dedicated
/// URL handler are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubjectType {
    Issue,
    PullRequest,
    RepositoryInvitation,
    Other(String),
}

impl From<String> for SubjectType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "Issue" => SubjectType::Issue,
            "PullRequest" => SubjectType::PullRequest,
            "RepositoryInvitation" => SubjectType::RepositoryInvitation,
            _ => SubjectType::Other(tag),
        }
    }
}

impl From<SubjectType> for String {
    fn from(kind: SubjectType) -> Self {
        kind.to_string()
    }
}

impl std::fmt::Display for SubjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubjectType::Issue => write!(f, "Issue"),
            SubjectType::PullRequest => write!(f, "PullRequest"),
            SubjectType::RepositoryInvitation => write!(f, "RepositoryInvitation"),
            SubjectType::Other(tag) => write!(f, "{}", tag),
        }
    }
}

/// The thread a notification is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: SubjectType,
    /// API URL of the issue / pull request; null for some subject kinds.
    pub url: Option<String>,
}

/// Repository summary embedded in a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub full_name: String,
    pub html_url: String,
}

/// An unread notification thread as returned by the tracker API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub reason: String,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub last_read_at: Option<DateTime<Utc>>,
    pub subject: Subject,
    pub repository: Repository,
}

/// A comment on an issue or pull request. Only the web link is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub html_url: String,
}

/// An issue or pull request resource.
///
/// Error bodies from the API deserialize into this too, with only `message` set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Resource {
    pub fn is_not_found(&self) -> bool {
        self.message.as_deref() == Some("Not Found")
    }
}

/// Desktop notification template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayKind {
    Basic,
}

/// What the desktop runtime is asked to show for one notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDisplay {
    pub title: String,
    pub icon_url: String,
    pub kind: DisplayKind,
    pub message: String,
    pub context_message: String,
}

/// User-facing toggles read on every poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserOptions {
    pub show_desktop_notif: bool,
    pub play_notif_sound: bool,
}

/// Result of one notification fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationBatch {
    pub notifications: Vec<Notification>,
    /// `Last-Modified` of the response, usable as the next cursor
    pub last_modified: Option<String>,
    /// Server-requested minimum seconds until the next poll (`X-Poll-Interval`)
    pub poll_interval_secs: Option<u64>,
}

/// User interaction reported by the desktop runtime, keyed by cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    Clicked(String),
    Closed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json(kind: &str, last_read_at: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "id": "4021",
            "unread": true,
            "reason": "mention",
            "updated_at": "2024-03-01T10:00:00Z",
            "last_read_at": last_read_at,
            "subject": {
                "title": "Fix flaky build",
                "url": "https://api.github.com/repos/octo/hello/issues/7",
                "latest_comment_url": null,
                "type": kind
            },
            "repository": {
                "id": 1,
                "full_name": "octo/hello",
                "html_url": "https://github.com/octo/hello"
            }
        })
    }

    #[test]
    fn test_deserialize_tracker_notification() {
        let n: Notification =
            serde_json::from_value(sample_json("Issue", serde_json::Value::Null)).unwrap();
        assert_eq!(n.id, "4021");
        assert_eq!(n.subject.kind, SubjectType::Issue);
        assert_eq!(n.last_read_at, None);
        assert_eq!(n.repository.full_name, "octo/hello");
    }

    #[test]
    fn test_unknown_subject_type_is_preserved() {
        let n: Notification =
            serde_json::from_value(sample_json("Discussion", serde_json::Value::Null)).unwrap();
        assert_eq!(n.subject.kind, SubjectType::Other("Discussion".to_string()));

        let back = serde_json::to_value(&n).unwrap();
        assert_eq!(back["subject"]["type"], "Discussion");
    }

    #[test]
    fn test_missing_last_read_at_defaults_to_none() {
        let mut value = sample_json("PullRequest", serde_json::Value::Null);
        value.as_object_mut().unwrap().remove("last_read_at");
        let n: Notification = serde_json::from_value(value).unwrap();
        assert!(n.last_read_at.is_none());
        assert_eq!(n.subject.kind, SubjectType::PullRequest);
    }

    #[test]
    fn test_resource_not_found_signal() {
        let r: Resource = serde_json::from_str(
            r#"{"message":"Not Found","documentation_url":"https://docs.github.com"}"#,
        )
        .unwrap();
        assert!(r.is_not_found());
        assert!(r.html_url.is_none());

        let ok: Resource =
            serde_json::from_str(r#"{"html_url":"https://github.com/octo/hello/issues/7"}"#)
                .unwrap();
        assert!(!ok.is_not_found());
    }
}
