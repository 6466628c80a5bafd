//! Due-dose evaluation and reminder notification engine.
//!
//! The evaluator computes which doses are inside their notification window;
//! the dispatcher filters out doses already announced today and emits
//! `NotificationBatch` values to the presentation layer. The poller drives
//! the dispatcher on a fixed interval for headless deployments; the HTTP
//! poll endpoint drives it for browser clients.

pub mod announced;
pub mod dispatcher;
pub mod evaluator;
pub mod poller;

pub use announced::AnnouncedSet;
pub use dispatcher::{dispatch, DispatchError, NotificationBatch};
pub use evaluator::{due_now, DueDose};
pub use poller::{start_poller, LogSink, NotificationSink, PollerHandle};
