use chrono::{DateTime, Duration, Utc};
use event_schema::EventType;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Analysis window the events were drawn from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPeriod {
    pub days: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl AnalysisPeriod {
    pub const DEFAULT_DAYS: i64 = 30;

    /// Window ending now. `days` comes in from the query string, so
    /// non-positive or chrono-unrepresentable counts fall back to the
    /// default window instead of panicking in `Duration::days`.
    pub fn last_days(days: i64) -> Self {
        let end_date = Utc::now();
        let start_date = Duration::try_days(days)
            .filter(|_| days > 0)
            .and_then(|span| end_date.checked_sub_signed(span));
        match start_date {
            Some(start_date) => Self {
                days,
                start_date,
                end_date,
            },
            None => Self {
                days: Self::DEFAULT_DAYS,
                start_date: end_date - Duration::days(Self::DEFAULT_DAYS),
                end_date,
            },
        }
    }
}

/// A ranked category/brand/color interest with its saturation confidence.
#[derive(Debug, Clone, Serialize)]
pub struct RankedInterest {
    pub name: String,
    pub count: u64,
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowsingProfile {
    pub total_views: u64,
    pub unique_products: u64,
    pub average_views_per_product: f64,
    pub top_categories: Vec<RankedInterest>,
    pub top_brands: Vec<RankedInterest>,
    pub top_colors: Vec<RankedInterest>,
    pub preferred_sizes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartActions {
    pub items_added: u64,
    pub items_removed: u64,
    /// Percentage, rounded. Unclamped: can go negative or past 100 when
    /// purchased line items outnumber tracked cart adds.
    pub abandonment_rate: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseStats {
    pub count: u64,
    pub total_spent: f64,
    pub average_order_value: f64,
    pub items_purchased: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_order_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSensitivityLevel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterUsage {
    pub price_low: u64,
    pub price_high: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSensitivity {
    pub level: PriceSensitivityLevel,
    pub filter_usage: FilterUsage,
    pub average_purchase_price: f64,
}

impl Default for PriceSensitivity {
    fn default() -> Self {
        Self {
            level: PriceSensitivityLevel::Medium,
            filter_usage: FilterUsage::default(),
            average_purchase_price: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingProfile {
    pub cart_actions: CartActions,
    pub purchases: PurchaseStats,
    pub price_sensitivity: PriceSensitivity,
    pub preferred_categories: Vec<String>,
    pub preferred_brands: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementProfile {
    pub search_count: u64,
    pub chat_sessions: u64,
    pub chat_messages: u64,
    pub wishlist_items: u64,
    pub chat_intents: BTreeMap<String, u64>,
    /// Most frequent chat intent; ties go to the intent seen first.
    pub primary_intent: Option<String>,
    pub needs_consultation: bool,
    pub engagement_score: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepeatedQuery {
    pub query: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchProfile {
    pub total_searches: u64,
    pub unique_queries: u64,
    pub repeated_queries: Vec<RepeatedQuery>,
    pub no_result_queries: Vec<String>,
    pub needs_assistance: bool,
}

/// Behavior profile derived from the event log (pre- or post-reconciliation).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBehavior {
    pub user_id: Uuid,
    pub period: AnalysisPeriod,
    pub event_counts: HashMap<EventType, u64>,
    pub total_events: u64,
    pub browsing: BrowsingProfile,
    pub shopping: ShoppingProfile,
    pub engagement: EngagementProfile,
    pub search: SearchProfile,
    pub last_activity: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorCount {
    pub color: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SizeCount {
    pub size: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBrowsing {
    pub total_views: u64,
    pub categories_viewed: Vec<String>,
    pub top_categories: Vec<CategoryCount>,
    pub top_colors: Vec<ColorCount>,
    pub top_sizes: Vec<SizeCount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PurchaseFrequency {
    #[serde(rename = "frequent")]
    Frequent,
    #[serde(rename = "repeat")]
    Repeat,
    #[serde(rename = "one-time")]
    OneTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseHistory {
    pub total_orders: u64,
    pub total_spent: f64,
    pub avg_order_value: f64,
    pub frequency: PurchaseFrequency,
    /// Days since the last order; 999 when there is none.
    pub recency: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_purchase: Option<DateTime<Utc>>,
}

impl Default for PurchaseHistory {
    fn default() -> Self {
        Self {
            total_orders: 0,
            total_spent: 0.0,
            avg_order_value: 0.0,
            frequency: PurchaseFrequency::OneTime,
            recency: 999,
            last_purchase: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderShopping {
    pub cart_actions: CartActions,
    pub purchase_history: PurchaseHistory,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEngagement {
    pub engagement_score: u32,
    pub chat_messages: u64,
    pub chat_intents: BTreeMap<String, u64>,
    pub needs_consultation: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSearch {
    pub total_searches: u64,
    pub unique_queries: u64,
}

/// Behavior profile reconstructed from order history alone (event-log
/// fallback path).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBehavior {
    pub user_id: Uuid,
    pub period: AnalysisPeriod,
    pub event_counts: HashMap<EventType, u64>,
    pub total_events: u64,
    pub browsing: OrderBrowsing,
    pub shopping: OrderShopping,
    pub engagement: OrderEngagement,
    pub search: OrderSearch,
    pub last_activity: Option<DateTime<Utc>>,
}

impl OrderBehavior {
    /// Zeroed profile for a user with no orders at all.
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            period: AnalysisPeriod::last_days(365),
            event_counts: HashMap::new(),
            total_events: 0,
            browsing: OrderBrowsing::default(),
            shopping: OrderShopping::default(),
            engagement: OrderEngagement::default(),
            search: OrderSearch::default(),
            last_activity: None,
        }
    }
}

/// Aggregated customer behavior with explicit provenance.
///
/// The variant decides which rule set applies downstream, so suggestion
/// and insight code pattern-matches exhaustively instead of comparing a
/// string tag. `Orders` is produced only when the event store returned
/// zero events for the window; the report path retags `Events` to
/// `Hybrid` after order reconciliation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "dataSource", rename_all = "lowercase")]
pub enum CustomerBehavior {
    Events(EventBehavior),
    Hybrid(EventBehavior),
    Orders(OrderBehavior),
}

impl CustomerBehavior {
    pub fn user_id(&self) -> Uuid {
        match self {
            CustomerBehavior::Events(b) | CustomerBehavior::Hybrid(b) => b.user_id,
            CustomerBehavior::Orders(b) => b.user_id,
        }
    }

    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        match self {
            CustomerBehavior::Events(b) | CustomerBehavior::Hybrid(b) => b.last_activity,
            CustomerBehavior::Orders(b) => b.last_activity,
        }
    }

    pub fn data_source(&self) -> &'static str {
        match self {
            CustomerBehavior::Events(_) => "events",
            CustomerBehavior::Hybrid(_) => "hybrid",
            CustomerBehavior::Orders(_) => "orders",
        }
    }
}
