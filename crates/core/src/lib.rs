//! # lob-core
//!
//! Shared building blocks for the LOB dataset builder: the
//! structure-of-arrays snapshot series, session-half grid definitions,
//! the fixed lookback-window and depth-weight configuration tables,
//! layered configuration loading, and tracing initialization.

pub mod config;
pub mod logging;
pub mod types;
