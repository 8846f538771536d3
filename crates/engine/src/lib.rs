pub mod bridge;
pub mod checker;
pub mod cursor;
pub mod lifecycle;
pub mod ports;
pub mod reasons;
pub mod renderer;
pub mod resolver;
pub mod store;

pub use bridge::{BridgeSettings, Collaborators, NotificationBridge};
pub use checker::PollOutcome;
