mod browsing;
mod engagement;
mod freq;
mod search;
mod shopping;

use chrono::Utc;
use event_schema::EventType;
use std::collections::HashMap;
use uuid::Uuid;

pub use browsing::analyze_browsing;
pub use engagement::{analyze_engagement, engagement_score};
pub use search::analyze_search;
pub use shopping::{abandonment_rate, analyze_shopping};

use freq::FrequencyMap;

use crate::config::EngineThresholds;
use crate::error::Result;
use crate::models::{
    AnalysisPeriod, CategoryCount, ColorCount, EventBehavior, OrderBehavior, OrderBrowsing,
    OrderEngagement, OrderSearch, OrderShopping, PurchaseFrequency, PurchaseHistory, SizeCount,
};
use crate::stores::{EventFilter, EventStore, IdentityStore, OrderFilter, OrderStore};

#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub days: i64,
    pub include_anonymous: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            days: AnalysisPeriod::DEFAULT_DAYS,
            include_anonymous: false,
        }
    }
}

/// Aggregate the event-log window into an event-sourced behavior profile.
///
/// With `include_anonymous`, the filter widens to anonymous events carrying
/// the user's known email, which takes one identity lookup.
pub async fn analyze_customer_behavior(
    event_store: &dyn EventStore,
    identity_store: &dyn IdentityStore,
    user_id: Uuid,
    options: &AnalysisOptions,
    thresholds: &EngineThresholds,
) -> Result<EventBehavior> {
    let period = AnalysisPeriod::last_days(options.days);

    let email_alternative = if options.include_anonymous {
        identity_store
            .find_by_id(user_id)
            .await?
            .and_then(|identity| identity.email)
    } else {
        None
    };

    let events = event_store
        .query(&EventFilter {
            user_id,
            email_alternative,
            from: period.start_date,
        })
        .await?;

    tracing::debug!(%user_id, days = options.days, count = events.len(), "event window loaded");

    let mut event_counts: HashMap<EventType, u64> = HashMap::new();
    for event in &events {
        *event_counts.entry(event.event_type).or_insert(0) += 1;
    }

    Ok(EventBehavior {
        user_id,
        period,
        total_events: events.len() as u64,
        last_activity: events.last().map(|e| e.timestamp),
        browsing: analyze_browsing(&events),
        shopping: analyze_shopping(&events, thresholds),
        engagement: analyze_engagement(&events),
        search: analyze_search(&events),
        event_counts,
    })
}

/// Recency in days after which an orderless customer stops counting as
/// recent anywhere.
const NO_ORDER_RECENCY: i64 = 999;

/// Fallback: reconstruct a behavior profile from order history alone, for
/// customers with no events in the window. Order status is deliberately
/// not filtered here; reconciliation stats are the stricter read.
pub async fn analyze_order_history(
    order_store: &dyn OrderStore,
    user_id: Uuid,
) -> Result<OrderBehavior> {
    let orders = order_store
        .query(&OrderFilter {
            user_id,
            exclude_statuses: Vec::new(),
        })
        .await?;

    if orders.is_empty() {
        return Ok(OrderBehavior::empty(user_id));
    }

    let total_orders = orders.len() as u64;
    let total_spent: f64 = orders.iter().map(|o| o.total_price).sum();
    let avg_order_value = total_spent / total_orders as f64;

    // store returns newest first
    let last_order_date = orders.first().map(|o| o.created_at);
    let recency = last_order_date
        .map(|d| (Utc::now() - d).num_days())
        .unwrap_or(NO_ORDER_RECENCY);

    let mut categories = FrequencyMap::new();
    let mut colors = FrequencyMap::new();
    let mut sizes = FrequencyMap::new();

    for order in &orders {
        for item in &order.items {
            let quantity = item.quantity as u64;
            if let Some(color) = &item.color {
                colors.bump_by(color, quantity);
            }
            if let Some(size) = &item.size {
                sizes.bump_by(size, quantity);
            }
            // category inferred from the SKU prefix, e.g. "COAT-001" -> "coat"
            if let Some(prefix) = item.sku.as_deref().and_then(|sku| sku.split('-').next()) {
                categories.bump_by(&prefix.to_lowercase(), quantity);
            }
        }
    }

    let top_categories = categories
        .sorted_desc()
        .into_iter()
        .take(3)
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();

    // colors and sizes keep encounter order, matching the live report
    let top_colors = colors
        .iter()
        .take(3)
        .map(|(color, count)| ColorCount {
            color: color.to_string(),
            count,
        })
        .collect();
    let top_sizes = sizes
        .iter()
        .take(3)
        .map(|(size, count)| SizeCount {
            size: size.to_string(),
            count,
        })
        .collect();

    let frequency = if total_orders >= 5 {
        PurchaseFrequency::Frequent
    } else if total_orders >= 2 {
        PurchaseFrequency::Repeat
    } else {
        PurchaseFrequency::OneTime
    };

    Ok(OrderBehavior {
        user_id,
        period: AnalysisPeriod::last_days(365),
        total_events: total_orders,
        event_counts: HashMap::from([(EventType::Purchase, total_orders)]),
        browsing: OrderBrowsing {
            // rough view estimate, no events to count
            total_views: total_orders * 3,
            categories_viewed: categories.iter().map(|(c, _)| c.to_string()).collect(),
            top_categories,
            top_colors,
            top_sizes,
        },
        shopping: OrderShopping {
            cart_actions: crate::models::CartActions {
                items_added: total_orders,
                items_removed: 0,
                abandonment_rate: 0,
            },
            purchase_history: PurchaseHistory {
                total_orders,
                total_spent,
                avg_order_value,
                frequency,
                recency,
                last_purchase: last_order_date,
            },
        },
        engagement: OrderEngagement {
            engagement_score: order_engagement_score(total_orders, total_spent, recency),
            ..OrderEngagement::default()
        },
        search: OrderSearch::default(),
        last_activity: last_order_date,
    })
}

/// Tiered 0-100 engagement score over order count, lifetime spend and
/// recency. Each dimension contributes one of two tiers or nothing.
fn order_engagement_score(total_orders: u64, total_spent: f64, recency: i64) -> u32 {
    let mut score = 0u32;

    if total_orders >= 5 {
        score += 40;
    } else if total_orders >= 2 {
        score += 20;
    }

    if total_spent >= 10_000.0 {
        score += 40;
    } else if total_spent >= 1_000.0 {
        score += 20;
    }

    if recency <= 30 {
        score += 20;
    } else if recency <= 90 {
        score += 10;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_engagement_tiers_sum_to_one_hundred() {
        assert_eq!(order_engagement_score(6, 12_000.0, 10), 100);
        assert_eq!(order_engagement_score(2, 1_500.0, 60), 50);
        assert_eq!(order_engagement_score(1, 500.0, 200), 0);
    }

    #[test]
    fn order_engagement_middle_tiers() {
        assert_eq!(order_engagement_score(4, 0.0, 999), 20);
        assert_eq!(order_engagement_score(0, 9_999.0, 999), 20);
        assert_eq!(order_engagement_score(0, 0.0, 90), 10);
    }
}
