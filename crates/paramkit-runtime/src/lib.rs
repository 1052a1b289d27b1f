//! Small runtime helpers shared by request handlers.
//!
//! - [`retry`]: bounded retry with fixed or computed delays
//! - [`cache`]: in-process key-value cache with per-entry TTL
//! - [`client`]: client address extraction from proxy headers

pub mod cache;
pub mod client;
pub mod retry;

pub use cache::TtlCache;
pub use client::{client_ip, HeaderSource, DEFAULT_CLIENT_IP};
pub use retry::{retry, sleep, Delay, RetryError, RetryPolicy, DEFAULT_RETRY_DELAY};

#[cfg(feature = "async")]
pub use retry::{retry_async, sleep_async};
