//! End-to-end report generation over mocked stores.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use event_schema::{EventData, EventType, InteractionEvent};
use mockall::mock;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use intelligence_service::config::EngineThresholds;
use intelligence_service::error::{IntelligenceError, Result};
use intelligence_service::models::{
    CustomerBehavior, CustomerType, Order, OrderItem, OrderStatus, RiskRating,
};
use intelligence_service::services::{AnalysisOptions, IntelligenceEngine};
use intelligence_service::stores::{
    CustomerIdentity, EventFilter, EventStore, IdentityStore, OrderFilter, OrderStore,
};

mock! {
    Events {}

    #[async_trait]
    impl EventStore for Events {
        async fn query(&self, filter: &EventFilter) -> Result<Vec<InteractionEvent>>;
    }
}

mock! {
    Orders {}

    #[async_trait]
    impl OrderStore for Orders {
        async fn query(&self, filter: &OrderFilter) -> Result<Vec<Order>>;
    }
}

mock! {
    Identities {}

    #[async_trait]
    impl IdentityStore for Identities {
        async fn find_by_id(&self, user_id: Uuid) -> Result<Option<CustomerIdentity>>;
    }
}

fn engine(
    events: MockEvents,
    orders: MockOrders,
    identities: MockIdentities,
) -> IntelligenceEngine {
    IntelligenceEngine::new(
        Arc::new(events),
        Arc::new(orders),
        Arc::new(identities),
        EngineThresholds::default(),
    )
}

fn event(user_id: Uuid, event_type: EventType, data: serde_json::Value) -> InteractionEvent {
    InteractionEvent::new(Some(user_id), event_type, EventData::from(data))
}

fn order(user_id: Uuid, total_price: f64, days_ago: i64, sku: &str) -> Order {
    Order {
        id: Uuid::new_v4(),
        user_id,
        status: OrderStatus::Delivered,
        total_price,
        created_at: Utc::now() - Duration::days(days_ago),
        items: vec![OrderItem {
            name: Some("item".to_string()),
            sku: Some(sku.to_string()),
            quantity: 1,
            price: total_price,
            ..OrderItem::default()
        }],
    }
}

#[tokio::test]
async fn vip_order_history_fallback_report() {
    let user_id = Uuid::new_v4();

    let mut events = MockEvents::new();
    events.expect_query().returning(|_| Ok(Vec::new()));

    // fetched once for stats, once for the fallback profile
    let mut orders = MockOrders::new();
    let fixture: Vec<Order> = (0..6).map(|i| order(user_id, 2_000.0, 10 + i, "DRESS-001")).collect();
    orders
        .expect_query()
        .times(2)
        .returning(move |_| Ok(fixture.clone()));

    let mut identities = MockIdentities::new();
    identities.expect_find_by_id().returning(|_| {
        Ok(Some(CustomerIdentity {
            email: Some("vip@example.com".to_string()),
            tier: Some("gold".to_string()),
            tags: vec!["tier:vip".to_string()],
            notes_count: 2,
        }))
    });

    let report = engine(events, orders, identities)
        .generate_customer_intelligence(user_id, &AnalysisOptions::default())
        .await
        .unwrap();

    let CustomerBehavior::Orders(profile) = &report.behavior else {
        panic!("expected orders fallback profile");
    };
    assert_eq!(profile.shopping.purchase_history.total_orders, 6);
    assert_eq!(profile.shopping.purchase_history.total_spent, 12_000.0);
    assert_eq!(profile.engagement.engagement_score, 100);
    assert_eq!(profile.browsing.top_categories[0].category, "dress");

    assert_eq!(report.insights.customer_type, CustomerType::VipPremium);
    assert_eq!(report.insights.risk_level.level, RiskRating::Low);
    assert_eq!(report.insights.next_best_action.action, "vip_exclusive");

    assert!(report.suggestions.tags.len() <= 5);
    assert_eq!(report.suggestions.tags[0].tag, "tier:vip");
    assert!(report
        .suggestions
        .tags
        .iter()
        .any(|t| t.tag == "interested:dress"));
    assert_eq!(report.user.email.as_deref(), Some("vip@example.com"));
}

#[tokio::test]
async fn repeated_no_result_searches_produce_hybrid_report_with_assistance() {
    let user_id = Uuid::new_v4();

    let mut events = MockEvents::new();
    events.expect_query().returning(move |_| {
        Ok((0..3)
            .map(|_| {
                event(
                    user_id,
                    EventType::Search,
                    json!({ "query": "blue scarf", "resultsCount": 0 }),
                )
            })
            .collect())
    });

    let mut orders = MockOrders::new();
    orders.expect_query().returning(|_| Ok(Vec::new()));

    let mut identities = MockIdentities::new();
    identities.expect_find_by_id().returning(|_| Ok(None));

    let report = engine(events, orders, identities)
        .generate_customer_intelligence(user_id, &AnalysisOptions::default())
        .await
        .unwrap();

    let CustomerBehavior::Hybrid(profile) = &report.behavior else {
        panic!("expected hybrid profile for a non-empty event window");
    };
    assert_eq!(profile.search.repeated_queries.len(), 1);
    assert_eq!(profile.search.repeated_queries[0].query, "blue scarf");
    assert_eq!(profile.search.repeated_queries[0].count, 3);
    assert_eq!(profile.search.no_result_queries, vec!["blue scarf"]);
    assert!(profile.search.needs_assistance);

    assert_eq!(
        report.insights.next_best_action.action,
        "product_recommendation"
    );
    assert!(report
        .suggestions
        .notes
        .iter()
        .any(|n| n.content.contains("blue scarf")));
    // identity absent: empty header, report still generated
    assert!(report.user.email.is_none());
    assert!(report.user.current_tags.is_empty());
}

#[tokio::test]
async fn cart_abandonment_reconciles_against_order_count() {
    let user_id = Uuid::new_v4();

    let mut events = MockEvents::new();
    events.expect_query().returning(move |_| {
        let mut window: Vec<InteractionEvent> = (0..4)
            .map(|_| event(user_id, EventType::AddToCart, json!({ "category": "Coats" })))
            .collect();
        window.push(event(
            user_id,
            EventType::Purchase,
            json!({ "totalAmount": 150.0, "items": [{ "price": 150.0 }] }),
        ));
        Ok(window)
    });

    let mut orders = MockOrders::new();
    let fixture = vec![order(user_id, 150.0, 1, "COAT-002")];
    orders
        .expect_query()
        .returning(move |_| Ok(fixture.clone()));

    let mut identities = MockIdentities::new();
    identities.expect_find_by_id().returning(|_| Ok(None));

    let report = engine(events, orders, identities)
        .generate_customer_intelligence(user_id, &AnalysisOptions::default())
        .await
        .unwrap();

    let CustomerBehavior::Hybrid(profile) = &report.behavior else {
        panic!("expected hybrid profile");
    };
    // 4 adds, 1 authoritative order: round((4-1)/4*100) = 75
    assert_eq!(profile.shopping.cart_actions.abandonment_rate, 75);
    assert_eq!(profile.shopping.purchases.count, 1);
    assert!(report
        .suggestions
        .tags
        .iter()
        .any(|t| t.tag == "behavior:cart_abandoner"));
}

#[tokio::test]
async fn anonymous_widening_queries_by_known_email() {
    let user_id = Uuid::new_v4();

    let mut identities = MockIdentities::new();
    identities.expect_find_by_id().returning(|_| {
        Ok(Some(CustomerIdentity {
            email: Some("shopper@example.com".to_string()),
            ..CustomerIdentity::default()
        }))
    });

    let mut events = MockEvents::new();
    events
        .expect_query()
        .withf(|filter: &EventFilter| {
            filter.email_alternative.as_deref() == Some("shopper@example.com")
        })
        .returning(move |_| Ok(vec![event(user_id, EventType::PageView, json!({}))]));

    let mut orders = MockOrders::new();
    orders.expect_query().returning(|_| Ok(Vec::new()));

    let options = AnalysisOptions {
        days: 30,
        include_anonymous: true,
    };
    let report = engine(events, orders, identities)
        .generate_customer_intelligence(user_id, &options)
        .await
        .unwrap();

    assert!(matches!(report.behavior, CustomerBehavior::Hybrid(_)));
}

#[tokio::test]
async fn event_store_outage_propagates() {
    let mut events = MockEvents::new();
    events
        .expect_query()
        .returning(|_| Err(IntelligenceError::store("event", "connection refused")));

    let mut orders = MockOrders::new();
    orders.expect_query().returning(|_| Ok(Vec::new()));
    let mut identities = MockIdentities::new();
    identities.expect_find_by_id().returning(|_| Ok(None));

    let err = engine(events, orders, identities)
        .generate_customer_intelligence(Uuid::new_v4(), &AnalysisOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        IntelligenceError::StoreUnavailable { store: "event", .. }
    ));
}

#[tokio::test]
async fn customer_with_no_events_and_no_orders_is_a_new_visitor() {
    let mut events = MockEvents::new();
    events.expect_query().returning(|_| Ok(Vec::new()));
    let mut orders = MockOrders::new();
    orders.expect_query().returning(|_| Ok(Vec::new()));
    let mut identities = MockIdentities::new();
    identities.expect_find_by_id().returning(|_| Ok(None));

    let report = engine(events, orders, identities)
        .generate_customer_intelligence(Uuid::new_v4(), &AnalysisOptions::default())
        .await
        .unwrap();

    let CustomerBehavior::Orders(profile) = &report.behavior else {
        panic!("expected orders fallback profile");
    };
    assert_eq!(profile.total_events, 0);
    assert_eq!(report.insights.customer_type, CustomerType::NewVisitor);
    assert_eq!(report.insights.next_best_action.action, "continue_monitoring");
    assert!(report.suggestions.tags.is_empty());
    assert_eq!(report.suggestions.confidence, 0);
}
