// src/models/subscription.rs

use serde::Serialize;
use sqlx::FromRow;

/// Represents the 'subscriptions' table in the database.
/// One row per (subscriber, subscribe_to) pair, unique by schema.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscription {
    pub id: i64,
    pub subscriber_id: i64,
    pub subscribe_to_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Presence/absence of a subscription row, as an explicit state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    Subscribed,
    NotSubscribed,
}

impl SubscriptionState {
    pub fn from_stored(present: bool) -> Self {
        if present {
            SubscriptionState::Subscribed
        } else {
            SubscriptionState::NotSubscribed
        }
    }
}

/// List item for the personal subscriptions page.
#[derive(Debug, Serialize, FromRow)]
pub struct SubscriptionResponse {
    pub id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
