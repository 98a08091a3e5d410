use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::domain::{Caller, Notification, NotificationCreate};
use crate::notification_actor::{Channel, Dispatcher, NotificationAction, NotificationError, Outbound};

/// In-app notifications plus outbound delivery through a [`Dispatcher`].
#[derive(Clone)]
pub struct NotificationClient {
    inner: ResourceClient<Notification>,
    dispatcher: Arc<dyn Dispatcher>,
}

impl_client_methods!(NotificationClient, Notification, NotificationError, notification);

impl NotificationClient {
    pub fn new(inner: ResourceClient<Notification>, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self { inner, dispatcher }
    }

    /// Stores an in-app notification and hands a push message to the
    /// dispatcher on a spawned task. Failures are logged, never returned.
    #[instrument(skip(self, body))]
    pub async fn notify(&self, user_id: &str, title: &str, body: String) {
        debug!("Sending request");
        let params = NotificationCreate {
            user_id: user_id.to_string(),
            title: title.to_string(),
            body: body.clone(),
        };
        if let Err(e) = self.inner.create(params).await {
            warn!(%user_id, error = %e, "Failed to store notification");
        }

        let dispatcher = Arc::clone(&self.dispatcher);
        let message = Outbound {
            channel: Channel::Push,
            user_id: user_id.to_string(),
            subject: title.to_string(),
            body,
        };
        tokio::spawn(async move {
            if let Err(e) = dispatcher.dispatch(message).await {
                warn!(error = %e, "Outbound dispatch failed");
            }
        });
    }

    /// The caller's notifications, newest first.
    #[instrument(skip(self))]
    pub async fn mine(&self, caller: &Caller) -> Result<Vec<Notification>, NotificationError> {
        debug!("Sending request");
        let user_id = caller.user_id.clone();
        let mut items = self.inner.list_where(move |n| n.user_id == user_id).await?;
        items.reverse();
        Ok(items)
    }

    #[instrument(skip(self))]
    pub async fn unread_count(&self, caller: &Caller) -> Result<usize, NotificationError> {
        let user_id = caller.user_id.clone();
        let unread = self.inner.list_where(move |n| n.user_id == user_id && !n.read).await?;
        Ok(unread.len())
    }

    #[instrument(skip(self))]
    pub async fn mark_read(&self, caller: &Caller, id: String) -> Result<Notification, NotificationError> {
        let notification = self.require_notification(id.clone()).await?;
        if notification.user_id != caller.user_id {
            return Err(NotificationError::Forbidden(format!("notification {id} belongs to another user")));
        }
        Ok(self.inner.perform_action(id, NotificationAction::MarkRead).await?)
    }

    /// Marks every unread notification of the caller as read. Returns how many changed.
    #[instrument(skip(self))]
    pub async fn mark_all_read(&self, caller: &Caller) -> Result<usize, NotificationError> {
        let user_id = caller.user_id.clone();
        let unread = self.inner.list_where(move |n| n.user_id == user_id && !n.read).await?;
        let count = unread.len();
        for notification in unread {
            self.inner.perform_action(notification.id, NotificationAction::MarkRead).await?;
        }
        Ok(count)
    }
}
