//! Best-effort customer notifications.
//!
//! [`Notifier`] subscribes to the [`EventBus`](crate::bus::EventBus),
//! renders each [`LifecycleEvent`] and hands it to a [`Mailer`]. Nothing it
//! does can fail the operation that published the event: rendering gaps,
//! address errors and transport errors are logged and dropped. When a pool
//! is attached every attempt is written to `notification_log`.

use std::sync::Arc;

use hvacdesk_core::lifecycle::LifecycleEvent;
use hvacdesk_db::models::notification_log::NewNotificationLogEntry;
use hvacdesk_db::repositories::NotificationLogRepo;
use hvacdesk_db::DbPool;
use tokio::sync::broadcast;

use crate::delivery::email::{Mailer, OutgoingEmail};
use crate::templates::{render, CompanyProfile};

/// Outcome of handling one event, mostly useful to tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The event carries no customer message.
    Skipped,
    Delivered,
    Failed(String),
}

pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    company: CompanyProfile,
    pool: Option<DbPool>,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>, company: CompanyProfile) -> Self {
        Self {
            mailer,
            company,
            pool: None,
        }
    }

    /// Record every delivery attempt in `notification_log`.
    pub fn with_delivery_log(mut self, pool: DbPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Run the notification loop until the bus is dropped.
    pub async fn run(self, mut receiver: broadcast::Receiver<LifecycleEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    self.dispatch(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notifier lagged, some notifications were not sent");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notifier shutting down");
                    break;
                }
            }
        }
    }

    /// Render and send the message for one event.
    pub async fn dispatch(&self, event: &LifecycleEvent) -> Dispatch {
        let Some(message) = render(event, &self.company) else {
            tracing::debug!(event = event.name(), "No notification for event");
            return Dispatch::Skipped;
        };

        let email = OutgoingEmail {
            to: event.recipient().to_string(),
            subject: message.subject,
            text_body: message.text_body,
            html_body: message.html_body,
        };

        let outcome = match self.mailer.send(&email).await {
            Ok(()) => Dispatch::Delivered,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    event = event.name(),
                    kind = message.kind.as_str(),
                    to = %email.to,
                    "Failed to send notification"
                );
                Dispatch::Failed(e.to_string())
            }
        };

        if let Some(pool) = &self.pool {
            let entry = NewNotificationLogEntry {
                kind: message.kind.as_str().to_string(),
                recipient: email.to.clone(),
                subject: email.subject.clone(),
                delivered: outcome == Dispatch::Delivered,
                error: match &outcome {
                    Dispatch::Failed(e) => Some(e.clone()),
                    _ => None,
                },
            };
            if let Err(e) = NotificationLogRepo::insert(pool, &entry).await {
                tracing::error!(error = %e, "Failed to record notification attempt");
            }
        }

        outcome
    }
}
