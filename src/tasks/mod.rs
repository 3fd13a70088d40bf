//! Background tasks.
//!
//! Each task owns `Arc`s to the state it writes and a shutdown receiver,
//! and is spawned once at startup. The log flusher lives in
//! `forwarder::flusher`.

pub mod heartbeat;
pub mod mock_errors;

pub use heartbeat::HeartbeatTask;
pub use mock_errors::MockErrorTask;
