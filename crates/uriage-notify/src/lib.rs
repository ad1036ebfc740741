//! # uriage-notify: Save Notification Dispatcher
//!
//! Posts a plain-text message to a LINE-style broadcast endpoint. Every
//! failure mode is reported as a [`NotifyOutcome`] rather than an error, so
//! a failed notification can never undo or block a saved record.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use uriage_notify::{Notifier, NotifyConfig};
//!
//! let notifier = Notifier::new(NotifyConfig::from_env()?)?;
//! let outcome = notifier.notify("【本日の売上（税抜）】¥4,855").await;
//! if !outcome.success {
//!     tracing::warn!(message = %outcome.message, "notification failed");
//! }
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod transport;

pub use config::NotifyConfig;
pub use dispatcher::{Notifier, NotifyOutcome};
pub use error::NotifyError;
pub use transport::{ReqwestTransport, Transport, TransportResponse};
