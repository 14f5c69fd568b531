use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::payload::EventData;

/// Kinds of interaction the storefront instruments.
///
/// Serialized in snake_case; the same strings are stored in the event log's
/// `event_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ProductView,
    ProductClick,
    AddToCart,
    RemoveFromCart,
    Search,
    FilterApply,
    ChatStart,
    ChatMessage,
    WishlistAdd,
    WishlistRemove,
    CheckoutStart,
    CheckoutComplete,
    Purchase,
    EmailOpen,
    EmailClick,
    ScrollDepth,
    TimeOnPage,
    PageView,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::ProductView => "product_view",
            EventType::ProductClick => "product_click",
            EventType::AddToCart => "add_to_cart",
            EventType::RemoveFromCart => "remove_from_cart",
            EventType::Search => "search",
            EventType::FilterApply => "filter_apply",
            EventType::ChatStart => "chat_start",
            EventType::ChatMessage => "chat_message",
            EventType::WishlistAdd => "wishlist_add",
            EventType::WishlistRemove => "wishlist_remove",
            EventType::CheckoutStart => "checkout_start",
            EventType::CheckoutComplete => "checkout_complete",
            EventType::Purchase => "purchase",
            EventType::EmailOpen => "email_open",
            EventType::EmailClick => "email_click",
            EventType::ScrollDepth => "scroll_depth",
            EventType::TimeOnPage => "time_on_page",
            EventType::PageView => "page_view",
        }
    }
}

/// A single timestamped user/session interaction. Immutable once written;
/// anonymous events carry a `session_id` but no `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub id: Uuid,

    /// Owning user, absent for anonymous sessions
    pub user_id: Option<Uuid>,

    /// Browser session, absent for server-side events
    pub session_id: Option<String>,

    #[serde(rename = "type")]
    pub event_type: EventType,

    /// Open attribute map, shape depends on `event_type`
    #[serde(default)]
    pub data: EventData,

    pub timestamp: DateTime<Utc>,
}

impl InteractionEvent {
    pub fn new(user_id: Option<Uuid>, event_type: EventType, data: EventData) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            session_id: None,
            event_type,
            data,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_type_round_trips_as_snake_case() {
        let ty: EventType = serde_json::from_value(json!("add_to_cart")).unwrap();
        assert_eq!(ty, EventType::AddToCart);
        assert_eq!(serde_json::to_value(ty).unwrap(), json!("add_to_cart"));
        assert_eq!(ty.as_str(), "add_to_cart");
    }

    #[test]
    fn event_deserializes_with_missing_data() {
        let event: InteractionEvent = serde_json::from_value(json!({
            "id": "7f8b2f34-2c1a-4b3e-9d6f-0a1b2c3d4e5f",
            "user_id": null,
            "session_id": "sess-1",
            "type": "page_view",
            "timestamp": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(event.event_type, EventType::PageView);
        assert!(event.data.get("category").is_none());
    }
}
