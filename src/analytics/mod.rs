//! Click counter reconciliation
//!
//! Drains live counters from the cache layer into the durable baseline on a
//! fixed interval, and once more on shutdown.

pub mod reconciler;

pub use reconciler::{ReconcileReport, Reconciler, ReconcilerHandle};
