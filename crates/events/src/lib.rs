//! Lifecycle event bus and customer notifications.
//!
//! - [`EventBus`]: in-process publish/subscribe hub for
//!   [`LifecycleEvent`](hvacdesk_core::lifecycle::LifecycleEvent)s, backed by
//!   `tokio::sync::broadcast`.
//! - [`templates`]: subject and body rendering per notification kind.
//! - [`Notifier`]: background consumer that renders and sends e-mail and
//!   records every attempt. Failures are logged and never propagated.
//! - [`delivery`]: the [`Mailer`] seam with SMTP and log-only
//!   implementations.

pub mod bus;
pub mod delivery;
pub mod notifier;
pub mod templates;

pub use bus::EventBus;
pub use delivery::email::{EmailConfig, EmailError, LogMailer, Mailer, OutgoingEmail, SmtpMailer};
pub use notifier::Notifier;
pub use templates::{CompanyProfile, NotificationKind, RenderedMessage};
