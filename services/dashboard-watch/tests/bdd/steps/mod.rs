//! BDD step definitions for the dashboard client

pub mod dedup_steps;
pub mod events_steps;
pub mod notifier_steps;
pub mod poller_steps;
