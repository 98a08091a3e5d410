use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{Notification, NotificationCreate};

#[derive(Debug, Clone)]
pub enum NotificationAction {
    MarkRead,
}

impl Entity for Notification {
    type Id = String;
    type CreateParams = NotificationCreate;
    type Patch = ();
    type Action = NotificationAction;
    type ActionResult = Notification;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: NotificationCreate) -> Result<Self, String> {
        if params.title.trim().is_empty() {
            return Err("Notification title must not be empty".to_string());
        }
        Ok(Self {
            id,
            user_id: params.user_id,
            title: params.title,
            body: params.body,
            read: false,
            created_at: Utc::now(),
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Ok(())
    }

    fn handle_action(&mut self, action: NotificationAction) -> Result<Notification, String> {
        match action {
            NotificationAction::MarkRead => {
                self.read = true;
                Ok(self.clone())
            }
        }
    }
}
