//! Hosted backend adapters for StudyShare.
//!
//! - [`RestClient`] implements [`studyshare_core::DataClient`] over the
//!   PostgREST-style table API.
//! - [`RealtimeClient`] subscribes to row changes over the Phoenix websocket
//!   and delivers them as [`studyshare_core::realtime::ChangeEvent`]s.

mod client;
mod config;
mod error;
mod filters;
mod realtime;

pub use client::RestClient;
pub use config::{BackendConfig, DEFAULT_HEARTBEAT_SECS, DEFAULT_TIMEOUT_SECS};
pub use error::{BackendError, Result};
pub use filters::{filter_params, select_params};
pub use realtime::{
    channel_topic, heartbeat_message, join_message, leave_message, parse_frame, FrameAction,
    PhoenixMessage, RealtimeClient, RealtimeSubscription,
};
