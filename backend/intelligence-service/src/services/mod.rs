pub mod behavior;
pub mod insights;
pub mod reconcile;
pub mod report;
pub mod suggestions;

pub use behavior::{analyze_customer_behavior, analyze_order_history, AnalysisOptions};
pub use reconcile::{order_stats, reconcile, OrderStats};
pub use report::IntelligenceEngine;
pub use suggestions::{suggested_notes, suggested_tags};
