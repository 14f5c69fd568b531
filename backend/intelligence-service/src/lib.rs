//! Customer behavioral intelligence engine.
//!
//! Converts the storefront's raw interaction history and transactional
//! order history into a behavioral profile, suggested classification tags,
//! action notes, a customer-type label, a next-best-action recommendation,
//! and a churn-risk estimate. Deterministic, rule-based scoring; the
//! thresholds are fixed business heuristics, not fitted parameters.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod stores;
