#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used)]

//! Headless toast engine: a store of notification records, per-toast
//! auto-dismiss countdowns that can be paused, and enter/exit motion for
//! whatever renders them.

pub mod animation;
pub mod config;
pub mod error;
pub mod factory;
pub mod manager;
pub mod store;
pub mod telemetry;
pub mod timers;
pub mod toast;
pub mod types;

pub use config::{Config, EngineSettings};
pub use manager::{PromiseOptions, Resolver, ToastManager};
pub use store::{Snapshot, Subscription, ToastStore};
pub use toast::{ActionButton, Toast, ToastId, ToastOptions};
pub use types::{AnimationMode, Lifecycle, Position, ToastDuration, ToastKind};

pub type Result<T> = std::result::Result<T, error::Error>;
