mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use event_schema::InteractionEvent;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Order, OrderStatus};

pub use postgres::{PgEventStore, PgIdentityStore, PgOrderStore};

/// Event-log query: a time-bounded, user-scoped window. When
/// `email_alternative` is set, anonymous events carrying that email in
/// their payload match too.
#[derive(Debug, Clone)]
pub struct EventFilter {
    pub user_id: Uuid,
    pub email_alternative: Option<String>,
    pub from: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct OrderFilter {
    pub user_id: Uuid,
    pub exclude_statuses: Vec<OrderStatus>,
}

/// Current user record fields the report header needs.
#[derive(Debug, Clone, Default)]
pub struct CustomerIdentity {
    pub email: Option<String>,
    pub tier: Option<String>,
    pub tags: Vec<String>,
    pub notes_count: u64,
}

/// Read-only view over the behavioral event log. Results come back in
/// ascending timestamp order.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn query(&self, filter: &EventFilter) -> Result<Vec<InteractionEvent>>;
}

/// Read-only view over transactional order history.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn query(&self, filter: &OrderFilter) -> Result<Vec<Order>>;
}

/// Identity lookup used to enrich the report header and widen anonymous
/// event matching. Absent users are not an error.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<CustomerIdentity>>;
}
