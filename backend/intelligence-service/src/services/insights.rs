use chrono::Utc;

use crate::config::EngineThresholds;
use crate::models::{
    CustomerBehavior, CustomerType, EventBehavior, NextBestAction, OrderBehavior,
    PriceSensitivityLevel, Priority, RiskLevel, RiskRating,
};

/// First-match-wins customer-type ladder, one rung set per data source.
pub fn customer_type(behavior: &CustomerBehavior, thresholds: &EngineThresholds) -> CustomerType {
    match behavior {
        CustomerBehavior::Orders(profile) => order_customer_type(profile, thresholds),
        CustomerBehavior::Events(profile) | CustomerBehavior::Hybrid(profile) => {
            event_customer_type(profile, thresholds)
        }
    }
}

fn order_customer_type(profile: &OrderBehavior, thresholds: &EngineThresholds) -> CustomerType {
    let history = &profile.shopping.purchase_history;
    if history.total_orders >= thresholds.vip_min_orders
        && history.total_spent >= thresholds.vip_min_spend
    {
        CustomerType::VipPremium
    } else if history.total_orders >= 3 {
        CustomerType::LoyalCustomer
    } else if history.total_orders >= 1 {
        CustomerType::RepeatCustomer
    } else {
        CustomerType::NewVisitor
    }
}

fn event_customer_type(profile: &EventBehavior, thresholds: &EngineThresholds) -> CustomerType {
    let purchases = &profile.shopping.purchases;
    if purchases.count >= thresholds.vip_min_orders
        && purchases.average_order_value > thresholds.vip_aov
    {
        CustomerType::VipPremium
    } else if purchases.count >= 3 {
        CustomerType::LoyalCustomer
    } else if profile.engagement.engagement_score >= 70 && purchases.count == 0 {
        CustomerType::HighIntentBrowser
    } else if profile.shopping.price_sensitivity.level == PriceSensitivityLevel::High {
        CustomerType::PriceConsciousShopper
    } else if profile.browsing.total_views >= 10 && purchases.count == 0 {
        CustomerType::WindowShopper
    } else {
        CustomerType::NewVisitor
    }
}

/// First-match-wins outreach recommendation ladder.
pub fn next_best_action(
    behavior: &CustomerBehavior,
    thresholds: &EngineThresholds,
) -> NextBestAction {
    match behavior {
        CustomerBehavior::Orders(profile) => order_next_action(profile, thresholds),
        CustomerBehavior::Events(profile) | CustomerBehavior::Hybrid(profile) => {
            event_next_action(profile)
        }
    }
}

fn order_next_action(profile: &OrderBehavior, thresholds: &EngineThresholds) -> NextBestAction {
    let history = &profile.shopping.purchase_history;

    if history.total_orders >= thresholds.vip_min_orders
        && history.total_spent >= thresholds.vip_min_spend
    {
        return NextBestAction {
            action: "vip_exclusive",
            message: "Offer VIP exclusive preview of new collection".to_string(),
            priority: Priority::High,
        };
    }
    if history.total_orders >= 1 && history.recency > 90 {
        return NextBestAction {
            action: "winback_campaign",
            message: format!(
                "Last purchase {} days ago - Send winback offer with 15% discount",
                history.recency
            ),
            priority: Priority::High,
        };
    }
    if history.total_orders >= 3 {
        return NextBestAction {
            action: "loyalty_reward",
            message: "Thank loyal customer with special gift or points".to_string(),
            priority: Priority::Medium,
        };
    }
    NextBestAction {
        action: "continue_monitoring",
        message: "Continue tracking purchase behavior".to_string(),
        priority: Priority::Low,
    }
}

fn event_next_action(profile: &EventBehavior) -> NextBestAction {
    let cart = &profile.shopping.cart_actions;
    let purchases = &profile.shopping.purchases;

    if profile.engagement.needs_consultation {
        return NextBestAction {
            action: "offer_consultation",
            message: "Offer personalized styling consultation via chat or email".to_string(),
            priority: Priority::High,
        };
    }
    if cart.abandonment_rate > 70 && cart.items_added >= 3 {
        return NextBestAction {
            action: "send_cart_reminder",
            message: "Send abandoned cart email with 10% discount code".to_string(),
            priority: Priority::High,
        };
    }
    if !profile.search.repeated_queries.is_empty() {
        let queries: Vec<&str> = profile
            .search
            .repeated_queries
            .iter()
            .map(|q| q.query.as_str())
            .collect();
        return NextBestAction {
            action: "product_recommendation",
            message: format!("Recommend products matching: {}", queries.join(", ")),
            priority: Priority::Medium,
        };
    }
    if purchases.count >= 3 {
        return NextBestAction {
            action: "vip_upgrade",
            message: "Invite to VIP program with exclusive benefits".to_string(),
            priority: Priority::Medium,
        };
    }
    if profile.browsing.total_views >= 15 && purchases.count == 0 {
        return NextBestAction {
            action: "first_purchase_incentive",
            message: "Send first-time buyer discount (15% off)".to_string(),
            priority: Priority::Medium,
        };
    }
    NextBestAction {
        action: "monitor",
        message: "Continue monitoring behavior patterns".to_string(),
        priority: Priority::Low,
    }
}

/// Churn-risk ladder; the reason string names the rule that fired.
pub fn risk_level(behavior: &CustomerBehavior) -> RiskLevel {
    match behavior {
        CustomerBehavior::Orders(profile) => order_risk(profile),
        CustomerBehavior::Events(profile) | CustomerBehavior::Hybrid(profile) => {
            event_risk(profile)
        }
    }
}

fn order_risk(profile: &OrderBehavior) -> RiskLevel {
    let history = &profile.shopping.purchase_history;

    if history.total_orders >= 1 && history.recency >= 90 {
        return RiskLevel {
            level: RiskRating::High,
            reason: format!("No activity in {} days", history.recency),
        };
    }
    if history.total_orders >= 1 && history.recency >= 30 {
        return RiskLevel {
            level: RiskRating::Medium,
            reason: format!("Last order {} days ago", history.recency),
        };
    }
    RiskLevel {
        level: RiskRating::Low,
        reason: "Active customer".to_string(),
    }
}

fn event_risk(profile: &EventBehavior) -> RiskLevel {
    let days_since_activity = profile
        .last_activity
        .map(|ts| (Utc::now() - ts).num_days())
        .unwrap_or(999);
    let purchases = &profile.shopping.purchases;
    let cart = &profile.shopping.cart_actions;

    // previous customer gone quiet
    if purchases.count >= 1 && days_since_activity >= 30 {
        return RiskLevel {
            level: RiskRating::High,
            reason: format!("No activity in {days_since_activity} days"),
        };
    }
    if cart.abandonment_rate > 80 && cart.items_added >= 5 {
        return RiskLevel {
            level: RiskRating::Medium,
            reason: format!("{}% cart abandonment", cart.abandonment_rate),
        };
    }
    if days_since_activity <= 7 || purchases.count >= 2 {
        return RiskLevel {
            level: RiskRating::Low,
            reason: "Active customer".to_string(),
        };
    }
    RiskLevel {
        level: RiskRating::Medium,
        reason: "Normal activity".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalysisPeriod;
    use chrono::Duration;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn order_profile(total_orders: u64, total_spent: f64, recency: i64) -> OrderBehavior {
        let mut profile = OrderBehavior::empty(Uuid::new_v4());
        profile.shopping.purchase_history.total_orders = total_orders;
        profile.shopping.purchase_history.total_spent = total_spent;
        profile.shopping.purchase_history.recency = recency;
        profile
    }

    fn event_profile() -> EventBehavior {
        EventBehavior {
            user_id: Uuid::new_v4(),
            period: AnalysisPeriod::last_days(30),
            event_counts: HashMap::new(),
            total_events: 1,
            browsing: Default::default(),
            shopping: Default::default(),
            engagement: Default::default(),
            search: Default::default(),
            last_activity: Some(Utc::now()),
        }
    }

    #[test]
    fn vip_order_history_classifies_vip_with_low_risk() {
        let behavior = CustomerBehavior::Orders(order_profile(6, 12_000.0, 10));
        let thresholds = EngineThresholds::default();
        assert_eq!(customer_type(&behavior, &thresholds), CustomerType::VipPremium);
        assert_eq!(risk_level(&behavior).level, RiskRating::Low);
        assert_eq!(next_best_action(&behavior, &thresholds).action, "vip_exclusive");
    }

    #[test]
    fn order_ladder_falls_through_to_new_visitor() {
        let thresholds = EngineThresholds::default();
        assert_eq!(
            customer_type(&CustomerBehavior::Orders(order_profile(3, 500.0, 5)), &thresholds),
            CustomerType::LoyalCustomer
        );
        assert_eq!(
            customer_type(&CustomerBehavior::Orders(order_profile(1, 100.0, 5)), &thresholds),
            CustomerType::RepeatCustomer
        );
        assert_eq!(
            customer_type(&CustomerBehavior::Orders(order_profile(0, 0.0, 999)), &thresholds),
            CustomerType::NewVisitor
        );
    }

    #[test]
    fn stale_order_history_raises_risk() {
        assert_eq!(
            risk_level(&CustomerBehavior::Orders(order_profile(2, 500.0, 95))).level,
            RiskRating::High
        );
        assert_eq!(
            risk_level(&CustomerBehavior::Orders(order_profile(2, 500.0, 45))).level,
            RiskRating::Medium
        );
    }

    #[test]
    fn winback_outranks_loyalty_reward() {
        let action = next_best_action(
            &CustomerBehavior::Orders(order_profile(4, 500.0, 120)),
            &EngineThresholds::default(),
        );
        assert_eq!(action.action, "winback_campaign");
        assert_eq!(action.priority, Priority::High);
    }

    #[test]
    fn high_engagement_without_purchases_is_high_intent_browser() {
        let mut profile = event_profile();
        profile.engagement.engagement_score = 75;
        assert_eq!(
            customer_type(
                &CustomerBehavior::Hybrid(profile),
                &EngineThresholds::default()
            ),
            CustomerType::HighIntentBrowser
        );
    }

    #[test]
    fn events_vip_needs_both_count_and_aov() {
        let mut profile = event_profile();
        profile.shopping.purchases.count = 5;
        profile.shopping.purchases.average_order_value = 2_500_000.0;
        assert_eq!(
            customer_type(
                &CustomerBehavior::Hybrid(profile.clone()),
                &EngineThresholds::default()
            ),
            CustomerType::VipPremium
        );
        profile.shopping.purchases.average_order_value = 1_000.0;
        assert_eq!(
            customer_type(
                &CustomerBehavior::Hybrid(profile),
                &EngineThresholds::default()
            ),
            CustomerType::LoyalCustomer
        );
    }

    #[test]
    fn consultation_need_tops_the_event_action_ladder() {
        let mut profile = event_profile();
        profile.engagement.needs_consultation = true;
        profile.shopping.cart_actions.items_added = 10;
        profile.shopping.cart_actions.abandonment_rate = 90;
        let action = next_best_action(
            &CustomerBehavior::Hybrid(profile),
            &EngineThresholds::default(),
        );
        assert_eq!(action.action, "offer_consultation");
    }

    #[test]
    fn quiet_past_buyer_is_high_risk() {
        let mut profile = event_profile();
        profile.shopping.purchases.count = 1;
        profile.last_activity = Some(Utc::now() - Duration::days(40));
        assert_eq!(
            risk_level(&CustomerBehavior::Hybrid(profile)).level,
            RiskRating::High
        );
    }

    #[test]
    fn recent_activity_is_low_risk() {
        let profile = event_profile();
        assert_eq!(
            risk_level(&CustomerBehavior::Hybrid(profile)).level,
            RiskRating::Low
        );
    }

    #[test]
    fn heavy_abandonment_without_purchases_is_medium_risk() {
        let mut profile = event_profile();
        profile.last_activity = Some(Utc::now() - Duration::days(10));
        profile.shopping.cart_actions.items_added = 6;
        profile.shopping.cart_actions.abandonment_rate = 85;
        assert_eq!(
            risk_level(&CustomerBehavior::Hybrid(profile)).level,
            RiskRating::Medium
        );
    }
}
