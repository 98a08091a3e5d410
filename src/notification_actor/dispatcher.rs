use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use tracing::info;

use super::error::DispatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Sms,
    Push,
    Email,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Sms => "sms",
            Channel::Push => "push",
            Channel::Email => "email",
        };
        f.write_str(name)
    }
}

/// A message leaving the system through a third-party provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outbound {
    pub channel: Channel,
    pub user_id: String,
    pub subject: String,
    pub body: String,
}

/// Outbound delivery for SMS, push and email providers.
///
/// Callers never wait on a dispatcher: deliveries run on a spawned task and
/// failures are only logged.
#[async_trait]
pub trait Dispatcher: Send + Sync + 'static {
    async fn dispatch(&self, message: Outbound) -> Result<(), DispatchError>;
}

/// Default dispatcher: records each outbound message as a structured log line.
#[derive(Debug, Clone, Default)]
pub struct TracingDispatcher;

#[async_trait]
impl Dispatcher for TracingDispatcher {
    async fn dispatch(&self, message: Outbound) -> Result<(), DispatchError> {
        info!(
            channel = %message.channel,
            user_id = %message.user_id,
            subject = %message.subject,
            "Outbound message dispatched"
        );
        Ok(())
    }
}
