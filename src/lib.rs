//! Offline-capable news reader: data layer and sync orchestration.
//!
//! The crate is organized around four cooperating services:
//!
//! - [`storage`]: persistent article cache, bookmarks, and the offline
//!   action queue, all in one SQLite database
//! - [`connectivity`]: explicit online/offline state with subscriber
//!   notifications
//! - [`remote`]: the paginated headline source, with an auxiliary
//!   response cache and a keyless fixture mode
//! - [`sync`]: per-request remote-vs-cache decisions and session result
//!   list management
//!
//! [`bookmarks`] layers a durable, always-available article subset on top
//! of storage, and [`maintenance`] scopes the explicit cache clear so
//! bookmarks survive it.

pub mod bookmarks;
pub mod config;
pub mod connectivity;
pub mod maintenance;
pub mod remote;
pub mod storage;
pub mod sync;
pub mod util;
