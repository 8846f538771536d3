use serde::Deserialize;

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Web root of the tracker (github.com or a GitHub Enterprise host)
    pub github_root_url: String,

    /// Personal access token sent with every API request
    pub github_token: Option<String>,

    /// Only fetch notifications the user directly participates in
    pub github_only_participating: bool,

    /// Redis connection string; in-memory stores are used when unset
    pub redis_url: Option<String>,

    /// Minimum seconds between notification polls (default: 60)
    pub poll_interval_secs: u64,

    /// Delay between rendering consecutive desktop notifications (default: 50)
    pub notification_delay_ms: u64,

    /// Prefix for notification cache keys (default: "github-notifier")
    pub notification_cache_prefix: String,

    /// Icon shown on desktop notifications
    pub notification_icon: String,

    /// Alert sound played when a batch of notifications arrives
    pub notification_sound: String,

    /// External player used when the `audio` feature is disabled
    pub sound_command: String,

    /// Default for the "show desktop notifications" user option
    pub show_desktop_notif: bool,

    /// Default for the "play notification sound" user option
    pub play_notif_sound: bool,

    /// Notify for everything already unread when the daemon starts
    pub notify_on_startup: bool,

    /// HTTP request timeout in seconds (default: 30)
    pub http_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            github_root_url: std::env::var("GITHUB_ROOT_URL")
                .unwrap_or_else(|_| "https://github.com/".to_string()),
            github_token: std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
            github_only_participating: env_flag("GITHUB_ONLY_PARTICIPATING", false)?,
            redis_url: std::env::var("REDIS_URL").ok().filter(|u| !u.is_empty()),
            poll_interval_secs: std::env::var("POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("POLL_INTERVAL_SECS must be a valid u64"))?,
            notification_delay_ms: std::env::var("NOTIFICATION_DELAY_MS")
                .unwrap_or_else(|_| "50".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("NOTIFICATION_DELAY_MS must be a valid u64"))?,
            notification_cache_prefix: std::env::var("NOTIFICATION_CACHE_PREFIX")
                .unwrap_or_else(|_| "github-notifier".to_string()),
            notification_icon: std::env::var("NOTIFICATION_ICON")
                .unwrap_or_else(|_| "assets/icon-notif.png".to_string()),
            notification_sound: std::env::var("NOTIFICATION_SOUND")
                .unwrap_or_else(|_| "assets/bell.ogg".to_string()),
            sound_command: std::env::var("SOUND_COMMAND")
                .unwrap_or_else(|_| default_sound_command().to_string()),
            show_desktop_notif: env_flag("SHOW_DESKTOP_NOTIF", true)?,
            play_notif_sound: env_flag("PLAY_NOTIF_SOUND", false)?,
            notify_on_startup: env_flag("NOTIFY_ON_STARTUP", false)?,
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("HTTP_TIMEOUT_SECS must be a valid u64"))?,
        })
    }
}

/// Parse a loose boolean ("true", "1", "yes", "on" and their negatives).
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_flag(name: &str, default: bool) -> anyhow::Result<bool> {
    match std::env::var(name) {
        Ok(value) => parse_flag(&value)
            .ok_or_else(|| anyhow::anyhow!("{name} must be a boolean (true/false)")),
        Err(_) => Ok(default),
    }
}

fn default_sound_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "afplay"
    } else {
        "paplay"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_accepts_common_spellings() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" YES "), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }
}
