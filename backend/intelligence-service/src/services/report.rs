use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::behavior::{analyze_customer_behavior, analyze_order_history, AnalysisOptions};
use super::insights;
use super::reconcile::{order_stats, reconcile};
use super::suggestions::{suggested_notes, suggested_tags};
use crate::config::EngineThresholds;
use crate::error::Result;
use crate::models::{
    CustomerBehavior, CustomerInsights, EventBehavior, IntelligenceReport, SuggestionSet,
    UserSummary,
};
use crate::stores::{EventStore, IdentityStore, OrderStore};

/// Top-level engine: one instance per process, stateless between requests.
/// All I/O goes through the three store traits; everything downstream of
/// them is pure.
pub struct IntelligenceEngine {
    event_store: Arc<dyn EventStore>,
    order_store: Arc<dyn OrderStore>,
    identity_store: Arc<dyn IdentityStore>,
    thresholds: EngineThresholds,
}

impl IntelligenceEngine {
    pub fn new(
        event_store: Arc<dyn EventStore>,
        order_store: Arc<dyn OrderStore>,
        identity_store: Arc<dyn IdentityStore>,
        thresholds: EngineThresholds,
    ) -> Self {
        Self {
            event_store,
            order_store,
            identity_store,
            thresholds,
        }
    }

    /// Event-window analysis alone, without order reconciliation. Useful
    /// on its own for inspection; the report path always reconciles.
    pub async fn analyze_customer_behavior(
        &self,
        user_id: Uuid,
        options: &AnalysisOptions,
    ) -> Result<EventBehavior> {
        analyze_customer_behavior(
            self.event_store.as_ref(),
            self.identity_store.as_ref(),
            user_id,
            options,
            &self.thresholds,
        )
        .await
    }

    /// Full intelligence report: behavior (hybrid or order-fallback),
    /// suggested tags and notes, and classified insights.
    pub async fn generate_customer_intelligence(
        &self,
        user_id: Uuid,
        options: &AnalysisOptions,
    ) -> Result<IntelligenceReport> {
        let event_behavior = self.analyze_customer_behavior(user_id, options).await?;
        // order stats are fetched unconditionally; the fallback path reads
        // orders again with different status semantics
        let stats = order_stats(self.order_store.as_ref(), user_id).await?;

        let behavior = if event_behavior.total_events > 0 {
            reconcile(event_behavior, &stats)
        } else {
            tracing::warn!(%user_id, "no events in window, falling back to order history");
            CustomerBehavior::Orders(
                analyze_order_history(self.order_store.as_ref(), user_id).await?,
            )
        };

        let tags = suggested_tags(&behavior, &self.thresholds);
        let notes = suggested_notes(&behavior, &self.thresholds);

        let insights = CustomerInsights {
            customer_type: insights::customer_type(&behavior, &self.thresholds),
            next_best_action: insights::next_best_action(&behavior, &self.thresholds),
            risk_level: insights::risk_level(&behavior),
        };

        // absent identity is non-fatal; the header stays empty
        let user = match self.identity_store.find_by_id(user_id).await? {
            Some(identity) => UserSummary {
                email: identity.email,
                tier: identity.tier,
                current_tags: identity.tags,
                current_notes: identity.notes_count,
            },
            None => UserSummary::default(),
        };

        let confidence = if tags.is_empty() {
            0
        } else {
            let mean: f64 = tags.iter().map(|t| t.confidence).sum::<f64>() / tags.len() as f64;
            (mean * 100.0).round() as u32
        };

        tracing::info!(
            %user_id,
            data_source = behavior.data_source(),
            tags = tags.len(),
            notes = notes.len(),
            "intelligence report generated"
        );

        Ok(IntelligenceReport {
            user_id,
            user,
            behavior,
            suggestions: SuggestionSet {
                tags,
                notes,
                confidence,
            },
            insights,
            generated_at: Utc::now(),
        })
    }
}
