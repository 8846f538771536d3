//! Integration tests for the tracker client and the Redis stores.
//!
//! The GitHub client tests run against a local mockito server. The Redis tests
//! need a running Redis and are ignored by default:
//!
//! ```bash
//! REDIS_URL="redis://localhost:6379" \
//!   cargo test -p hubbell-notifier --test integration -- --ignored --nocapture
//! ```

use chrono::{DateTime, Utc};
use mockito::Matcher;
use url::Url;

use hubbell_common::config::AppConfig;
use hubbell_common::error::AppError;
use hubbell_common::redis_pool::create_redis_pool;
use hubbell_common::types::{Notification, Repository, Subject, SubjectType, UserOptions};
use hubbell_engine::ports::{NotificationCache, NotificationSource, OptionsStore, TrackerApi};
use hubbell_notifier::github::GitHubClient;
use hubbell_notifier::redis_store::{OPTIONS_KEY, RedisNotificationCache, RedisOptionsStore};

// ============================================================
// Helpers
// ============================================================

fn test_config(root: &str, only_participating: bool) -> AppConfig {
    AppConfig {
        github_root_url: root.to_string(),
        github_token: Some("secret".to_string()),
        github_only_participating: only_participating,
        redis_url: None,
        poll_interval_secs: 60,
        notification_delay_ms: 0,
        notification_cache_prefix: "github-notifier".to_string(),
        notification_icon: "icon.png".to_string(),
        notification_sound: "bell.ogg".to_string(),
        sound_command: "paplay".to_string(),
        show_desktop_notif: true,
        play_notif_sound: false,
        notify_on_startup: false,
        http_timeout_secs: 5,
    }
}

fn client_for(server: &mockito::ServerGuard, api_path: &str) -> GitHubClient {
    let api_url = Url::parse(&server.url()).unwrap().join(api_path).unwrap();
    GitHubClient::new(&test_config("https://github.com/", false))
        .unwrap()
        .with_api_url(api_url)
}

fn notification_json(id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "unread": true,
        "reason": "comment",
        "updated_at": "2024-03-01T10:00:00Z",
        "last_read_at": null,
        "subject": {
            "title": format!("Thread {}", id),
            "url": format!("https://api.github.com/repos/octo/hello/issues/{}", id),
            "type": "Issue"
        },
        "repository": {
            "full_name": "octo/hello",
            "html_url": "https://github.com/octo/hello"
        }
    })
}

// ============================================================
// GitHubClient
// ============================================================

#[test]
fn test_hosts_and_tab_url_for_github_com() {
    let client = GitHubClient::new(&test_config("https://github.com", false)).unwrap();
    assert_eq!(client.api_url().as_str(), "https://api.github.com/");
    assert_eq!(client.browsing_hostname(), "github.com");
    assert_eq!(client.fallback_tab_url(), "https://github.com/notifications");
}

#[test]
fn test_hosts_and_tab_url_for_enterprise() {
    let client = GitHubClient::new(&test_config("https://git.corp.example/", true)).unwrap();
    assert_eq!(client.api_url().as_str(), "https://git.corp.example/api/v3/");
    assert_eq!(client.browsing_hostname(), "git.corp.example");
    assert_eq!(
        client.fallback_tab_url(),
        "https://git.corp.example/notifications/participating"
    );
}

#[tokio::test]
async fn test_fetch_notifications_follows_pagination() {
    let mut server = mockito::Server::new_async().await;
    let next = format!("<{}/notifications?page=2>; rel=\"next\"", server.url());

    let first = server
        .mock("GET", "/notifications")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("per_page".into(), "100".into()),
            Matcher::UrlEncoded("since".into(), "2024-03-01T09:00:00Z".into()),
        ]))
        .match_header("authorization", "token secret")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_header("last-modified", "Fri, 01 Mar 2024 10:00:00 GMT")
        .with_header("x-poll-interval", "120")
        .with_header("link", &next)
        .with_body(serde_json::json!([notification_json("1"), notification_json("2")]).to_string())
        .create_async()
        .await;

    let second = server
        .mock("GET", "/notifications")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_header("last-modified", "Fri, 01 Mar 2024 11:00:00 GMT")
        .with_body(serde_json::json!([notification_json("3")]).to_string())
        .create_async()
        .await;

    let client = client_for(&server, "/");
    let batch = client
        .fetch_notifications(Some("Fri, 01 Mar 2024 09:00:00 GMT"))
        .await
        .unwrap();

    first.assert_async().await;
    second.assert_async().await;

    let ids: Vec<&str> = batch.notifications.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(
        batch.last_modified.as_deref(),
        Some("Fri, 01 Mar 2024 10:00:00 GMT")
    );
    assert_eq!(batch.poll_interval_secs, Some(120));
}

#[tokio::test]
async fn test_fetch_notifications_surfaces_auth_errors() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/notifications")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"message":"Bad credentials"}"#)
        .create_async()
        .await;

    let client = client_for(&server, "/");
    let err = client.fetch_notifications(None).await.unwrap_err();

    match err {
        AppError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Bad credentials");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_fetch_comments_uses_subject_path_on_api_origin() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v3/repos/org/repo/pulls/42/comments")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("since".into(), "2024-03-01T10:00:01.000Z".into()),
            Matcher::UrlEncoded("per_page".into(), "1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id":1,"html_url":"https://ghe.example/org/repo/pull/42#issuecomment-1"}]"#)
        .create_async()
        .await;

    let client = client_for(&server, "/api/v3/");
    let comments = client
        .fetch_comments(
            "/api/v3/repos/org/repo/pulls/42/comments",
            "2024-03-01T10:00:01.000Z",
            1,
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(comments.len(), 1);
    assert_eq!(
        comments[0].html_url,
        "https://ghe.example/org/repo/pull/42#issuecomment-1"
    );
}

#[tokio::test]
async fn test_fetch_resource_not_found_is_a_value() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/repos/octo/hello/issues/9")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Not Found","documentation_url":"https://docs.github.com"}"#)
        .create_async()
        .await;

    let client = client_for(&server, "/");
    let resource = client
        .fetch_resource("/repos/octo/hello/issues/9")
        .await
        .unwrap();

    assert!(resource.is_not_found());
}

#[tokio::test]
async fn test_fetch_resource_server_error_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/repos/octo/hello/issues/9")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let client = client_for(&server, "/");
    let err = client
        .fetch_resource("/repos/octo/hello/issues/9")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Api { status: 500, .. }));
}

// ============================================================
// Redis stores
// ============================================================

fn cached_notification() -> Notification {
    Notification {
        id: "77".to_string(),
        reason: "assign".to_string(),
        updated_at: DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc),
        last_read_at: None,
        subject: Subject {
            title: "Assigned".to_string(),
            kind: SubjectType::Issue,
            url: Some("https://api.github.com/repos/octo/hello/issues/77".to_string()),
        },
        repository: Repository {
            full_name: "octo/hello".to_string(),
            html_url: "https://github.com/octo/hello".to_string(),
        },
    }
}

#[tokio::test]
#[ignore] // Requires REDIS_URL, run explicitly with --ignored
async fn test_redis_cache_round_trip() {
    let redis_url = std::env::var("REDIS_URL").unwrap();
    let redis = create_redis_pool(&redis_url).await.unwrap();
    let cache = RedisNotificationCache::new(redis);
    let key = "github-notifier-test-77";

    cache.set(key, &cached_notification()).await.unwrap();
    assert_eq!(cache.get(key).await.unwrap(), Some(cached_notification()));

    cache.remove(key).await.unwrap();
    assert!(cache.get(key).await.unwrap().is_none());

    // Second remove is a no-op
    cache.remove(key).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires REDIS_URL, run explicitly with --ignored
async fn test_redis_options_overlay_defaults() {
    let redis_url = std::env::var("REDIS_URL").unwrap();
    let mut redis = create_redis_pool(&redis_url).await.unwrap();

    let _: () = redis::cmd("DEL")
        .arg(OPTIONS_KEY)
        .query_async(&mut redis)
        .await
        .unwrap();
    let _: () = redis::cmd("HSET")
        .arg(OPTIONS_KEY)
        .arg("play_notif_sound")
        .arg("true")
        .query_async(&mut redis)
        .await
        .unwrap();

    let defaults = UserOptions {
        show_desktop_notif: true,
        play_notif_sound: false,
    };
    let store = RedisOptionsStore::new(redis, defaults);
    let options = store.get_all().await.unwrap();

    assert!(options.show_desktop_notif);
    assert!(options.play_notif_sound);
}
