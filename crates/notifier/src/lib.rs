//! Adapters that connect the notification bridge to the outside world:
//! - `github`: tracker REST API (notifications, comments, issues / pull requests)
//! - `redis_store`: notification cache and user options in Redis
//! - `desktop`: OS notifications with click / close events
//! - `tabs`: browser navigation
//! - `sound`: alert sound playback

pub mod desktop;
pub mod github;
pub mod redis_store;
pub mod sound;
pub mod tabs;
