pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod reconcile;
pub mod storage;

#[cfg(feature = "tui")]
pub mod tui;
