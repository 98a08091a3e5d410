use chrono::{DateTime, Utc};
use serde::Serialize;

/// In-app notice shown in a user's notification tray.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NotificationCreate {
    pub user_id: String,
    pub title: String,
    pub body: String,
}
