use async_trait::async_trait;
use chrono::{DateTime, Utc};
use event_schema::{EventData, EventType, InteractionEvent};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{CustomerIdentity, EventFilter, EventStore, IdentityStore, OrderFilter, OrderStore};
use crate::error::{IntelligenceError, Result};
use crate::models::{Order, OrderItem, OrderStatus};

/// Payload shape is validated here, at the store boundary: rows whose
/// event type or payload cannot be decoded are skipped with a warning so
/// the analyzers only ever see well-formed events.
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn parse_event_type(raw: &str) -> Option<EventType> {
    serde_json::from_value(serde_json::Value::String(raw.to_string())).ok()
}

fn parse_order_status(raw: &str) -> Option<OrderStatus> {
    serde_json::from_value(serde_json::Value::String(raw.to_string())).ok()
}

fn decode_event(row: &sqlx::postgres::PgRow) -> Result<Option<InteractionEvent>> {
    let raw_type: String = row
        .try_get("event_type")
        .map_err(|e| IntelligenceError::store("event", e))?;

    let Some(event_type) = parse_event_type(&raw_type) else {
        // Instrumentation writes more event kinds than the engine models
        tracing::debug!(event_type = %raw_type, "skipping unmodeled event type");
        return Ok(None);
    };

    let data: serde_json::Value = row
        .try_get("data")
        .map_err(|e| IntelligenceError::store("event", e))?;
    let id: Uuid = row
        .try_get("id")
        .map_err(|e| IntelligenceError::store("event", e))?;
    let user_id: Option<Uuid> = row
        .try_get("user_id")
        .map_err(|e| IntelligenceError::store("event", e))?;
    let session_id: Option<String> = row
        .try_get("session_id")
        .map_err(|e| IntelligenceError::store("event", e))?;
    let timestamp: DateTime<Utc> = row
        .try_get("occurred_at")
        .map_err(|e| IntelligenceError::store("event", e))?;

    Ok(Some(InteractionEvent {
        id,
        user_id,
        session_id,
        event_type,
        data: EventData::from(data),
        timestamp,
    }))
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn query(&self, filter: &EventFilter) -> Result<Vec<InteractionEvent>> {
        let rows = match &filter.email_alternative {
            Some(email) => {
                sqlx::query(
                    r#"
                    SELECT id, user_id, session_id, event_type, data, occurred_at
                    FROM interaction_events
                    WHERE occurred_at >= $1
                      AND (user_id = $2 OR data->>'email' = $3)
                    ORDER BY occurred_at ASC
                    "#,
                )
                .bind(filter.from)
                .bind(filter.user_id)
                .bind(email)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, user_id, session_id, event_type, data, occurred_at
                    FROM interaction_events
                    WHERE occurred_at >= $1 AND user_id = $2
                    ORDER BY occurred_at ASC
                    "#,
                )
                .bind(filter.from)
                .bind(filter.user_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| IntelligenceError::store("event", e))?;

        let mut events = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(event) = decode_event(row)? {
                events.push(event);
            }
        }
        Ok(events)
    }
}

pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn decode_order(row: &sqlx::postgres::PgRow) -> Result<Option<Order>> {
    let raw_status: String = row
        .try_get("status")
        .map_err(|e| IntelligenceError::store("order", e))?;
    let Some(status) = parse_order_status(&raw_status) else {
        tracing::warn!(status = %raw_status, "skipping order with unknown status");
        return Ok(None);
    };

    let items: serde_json::Value = row
        .try_get("items")
        .map_err(|e| IntelligenceError::store("order", e))?;
    let items: Vec<OrderItem> = serde_json::from_value(items).unwrap_or_default();

    Ok(Some(Order {
        id: row
            .try_get("id")
            .map_err(|e| IntelligenceError::store("order", e))?,
        user_id: row
            .try_get("user_id")
            .map_err(|e| IntelligenceError::store("order", e))?,
        status,
        total_price: row
            .try_get("total_price")
            .map_err(|e| IntelligenceError::store("order", e))?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| IntelligenceError::store("order", e))?,
        items,
    }))
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn query(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        let excluded: Vec<String> = filter
            .exclude_statuses
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();

        let rows = sqlx::query(
            r#"
            SELECT id, user_id, status, total_price, created_at, items
            FROM orders
            WHERE user_id = $1 AND NOT (status = ANY($2))
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.user_id)
        .bind(&excluded)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| IntelligenceError::store("order", e))?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(order) = decode_order(row)? {
                orders.push(order);
            }
        }
        Ok(orders)
    }
}

pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<CustomerIdentity>> {
        let row = sqlx::query(
            r#"
            SELECT email, tier, tags, notes_count
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| IntelligenceError::store("identity", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(CustomerIdentity {
            email: row
                .try_get("email")
                .map_err(|e| IntelligenceError::store("identity", e))?,
            tier: row
                .try_get("tier")
                .map_err(|e| IntelligenceError::store("identity", e))?,
            tags: row
                .try_get::<Option<Vec<String>>, _>("tags")
                .map_err(|e| IntelligenceError::store("identity", e))?
                .unwrap_or_default(),
            notes_count: row
                .try_get::<i64, _>("notes_count")
                .map_err(|e| IntelligenceError::store("identity", e))?
                .max(0) as u64,
        }))
    }
}
