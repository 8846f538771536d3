use chrono::{Duration, SecondsFormat};

use hubbell_common::types::Notification;

/// Lower bound for "unread comments" queries on a notification's thread.
///
/// With a read marker, the marker plus one second (so the comment that set the
/// marker is excluded); otherwise the thread's last update time.
pub fn last_read_cursor(notification: &Notification) -> String {
    let cursor = match notification.last_read_at {
        Some(read_at) => read_at + Duration::seconds(1),
        None => notification.updated_at,
    };

    cursor.to_rfc3339_opts(SecondsFormat::Millis, true)
}
