//! # Pomotimer Core Library
//!
//! Core logic for the pomotimer interval timer: a work / short-break /
//! long-break rotation on a fixed four-session cycle.
//!
//! ## Architecture
//!
//! - **Session scheduler**: a tick-driven state machine. The caller supplies
//!   the periodic driver and a [`SchedulerHost`] that paints render frames and
//!   shows completion notifications; the core never touches a UI toolkit
//! - **Formatting**: `MM:SS` clock and `N/4` cycle progress text
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`SessionScheduler`]: countdown and session rotation
//! - [`Config`]: application configuration management
//! - [`Event`]: serializable record of timer activity

pub mod error;
pub mod events;
pub mod format;
pub mod storage;
pub mod timer;

pub use error::ConfigError;
pub use events::Event;
pub use format::{format_clock, format_progress};
pub use storage::Config;
pub use timer::{
    Accent, Completion, RenderFrame, SchedulerConfig, SchedulerHost, SchedulerState,
    SessionKind, SessionScheduler, TickOutcome,
};
