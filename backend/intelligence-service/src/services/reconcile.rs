use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::behavior::abandonment_rate;
use crate::error::Result;
use crate::models::{CustomerBehavior, EventBehavior, OrderStatus, PurchaseStats};
use crate::stores::{OrderFilter, OrderStore};

/// Authoritative purchase figures from the order store. Event-tracked
/// purchases undercount (ad blockers, app checkouts), so these replace
/// them during reconciliation.
#[derive(Debug, Clone, Default)]
pub struct OrderStats {
    pub total_orders: u64,
    pub total_spent: f64,
    pub avg_order_value: f64,
    pub last_order_date: Option<DateTime<Utc>>,
}

pub async fn order_stats(order_store: &dyn OrderStore, user_id: Uuid) -> Result<OrderStats> {
    let orders = order_store
        .query(&OrderFilter {
            user_id,
            exclude_statuses: vec![OrderStatus::Cancelled, OrderStatus::Failed],
        })
        .await?;

    let total_orders = orders.len() as u64;
    let total_spent: f64 = orders.iter().map(|o| o.total_price).sum();
    let avg_order_value = if total_orders > 0 {
        total_spent / total_orders as f64
    } else {
        0.0
    };

    Ok(OrderStats {
        total_orders,
        total_spent,
        avg_order_value,
        last_order_date: orders.iter().map(|o| o.created_at).max(),
    })
}

/// Merge authoritative order totals into an event-sourced profile and
/// retag it hybrid. The purchases block is replaced wholesale (order count
/// stands in for item count); the abandonment rate is recomputed against
/// the authoritative purchase count when both sides are non-zero.
pub fn reconcile(mut behavior: EventBehavior, stats: &OrderStats) -> CustomerBehavior {
    behavior.shopping.purchases = PurchaseStats {
        count: stats.total_orders,
        total_spent: stats.total_spent,
        average_order_value: stats.avg_order_value.round(),
        items_purchased: stats.total_orders,
        last_order_date: stats.last_order_date,
    };

    let items_added = behavior.shopping.cart_actions.items_added;
    if stats.total_orders > 0 && items_added > 0 {
        behavior.shopping.cart_actions.abandonment_rate =
            abandonment_rate(items_added, stats.total_orders);
    }

    CustomerBehavior::Hybrid(behavior)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalysisPeriod;
    use std::collections::HashMap;

    fn events_profile(items_added: u64) -> EventBehavior {
        let mut behavior = EventBehavior {
            user_id: Uuid::new_v4(),
            period: AnalysisPeriod::last_days(30),
            event_counts: HashMap::new(),
            total_events: 1,
            browsing: Default::default(),
            shopping: Default::default(),
            engagement: Default::default(),
            search: Default::default(),
            last_activity: None,
        };
        behavior.shopping.cart_actions.items_added = items_added;
        behavior.shopping.cart_actions.abandonment_rate = 100;
        behavior
    }

    #[test]
    fn reconcile_replaces_purchases_and_retags_hybrid() {
        let stats = OrderStats {
            total_orders: 3,
            total_spent: 900.0,
            avg_order_value: 300.4,
            last_order_date: Some(Utc::now()),
        };
        let reconciled = reconcile(events_profile(4), &stats);
        let CustomerBehavior::Hybrid(profile) = reconciled else {
            panic!("expected hybrid profile");
        };
        assert_eq!(profile.shopping.purchases.count, 3);
        assert_eq!(profile.shopping.purchases.average_order_value, 300.0);
        assert_eq!(profile.shopping.purchases.items_purchased, 3);
        assert_eq!(profile.shopping.cart_actions.abandonment_rate, 25);
    }

    #[test]
    fn zero_orders_keep_the_event_derived_abandonment() {
        let reconciled = reconcile(events_profile(4), &OrderStats::default());
        let CustomerBehavior::Hybrid(profile) = reconciled else {
            panic!("expected hybrid profile");
        };
        assert_eq!(profile.shopping.purchases.count, 0);
        assert_eq!(profile.shopping.cart_actions.abandonment_rate, 100);
    }
}
