//! Triage - support ticket routing core
//!
//! This library scores incoming support tickets and assigns each one to the
//! least-loaded qualified agent, or falls back to the standard queue or senior
//! escalation when automatic assignment is not possible.

pub mod cli;
pub mod config;
pub mod directory;
pub mod logging;
pub mod metrics;
pub mod routing;
pub mod ticket;
