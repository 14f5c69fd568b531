use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open event payload. Instrumentation sends whatever attributes the event
/// kind carries (`category`, `query`, `items`, ...); consumers read through
/// the typed accessors, which default instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventData(pub Map<String, Value>);

/// One line item inside a `purchase` event's `items` array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurchaseItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub quantity: Option<u32>,
}

impl EventData {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn category(&self) -> Option<&str> {
        self.str_field("category")
    }

    pub fn brand(&self) -> Option<&str> {
        self.str_field("brand")
    }

    pub fn color(&self) -> Option<&str> {
        self.str_field("color")
    }

    pub fn size(&self) -> Option<&str> {
        self.str_field("size")
    }

    pub fn product_id(&self) -> Option<&str> {
        self.str_field("productId")
    }

    pub fn query(&self) -> Option<&str> {
        self.str_field("query")
    }

    pub fn sort_by(&self) -> Option<&str> {
        self.str_field("sortBy")
    }

    pub fn intent(&self) -> Option<&str> {
        self.str_field("intent")
    }

    pub fn email(&self) -> Option<&str> {
        self.str_field("email")
    }

    /// Result count reported by a `search` event; missing means the
    /// instrumentation predates the field and is treated as zero results.
    pub fn results_count(&self) -> i64 {
        self.0.get("resultsCount").and_then(Value::as_i64).unwrap_or(0)
    }

    /// Total paid on a `purchase` event, zero when absent.
    pub fn total_amount(&self) -> f64 {
        self.0.get("totalAmount").and_then(Value::as_f64).unwrap_or(0.0)
    }

    /// Line items of a `purchase` event; malformed or missing arrays read
    /// as empty rather than failing deep inside an analyzer.
    pub fn items(&self) -> Vec<PurchaseItem> {
        self.0
            .get("items")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }
}

impl From<Value> for EventData {
    /// Non-object payloads collapse to the empty map.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => EventData(map),
            _ => EventData::default(),
        }
    }
}
