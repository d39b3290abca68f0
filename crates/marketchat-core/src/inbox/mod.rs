//! Inbox projection and the coordinator that keeps it in step with the
//! conversation log.

pub mod registry;
pub mod service;

pub use registry::ChatRegistry;
pub use service::InboxService;
