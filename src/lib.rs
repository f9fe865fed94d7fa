//! LinkPulse - URL shortener with click analytics
//!
//! The core is a cache-aside consistency engine: redirects read a volatile
//! cache first and fall back to durable storage, click counters live in the
//! cache between flushes, and a reconciler periodically overwrites the durable
//! baseline from counter snapshots.
//!
//! # Architecture
//! - `storage`: durable key -> URL mapping (SeaORM, SQLite/MySQL/PostgreSQL)
//! - `cache`: URL lookup entries and click counters (Redis or in-process)
//! - `services`: shorten, redirect and analytics operations
//! - `analytics`: counter reconciliation (periodic + on shutdown)
//! - `api`: actix-web HTTP adapters
//! - `config`: configuration management
//! - `runtime`: application lifecycle and execution modes
//! - `system`: logging setup

pub mod analytics;
pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
