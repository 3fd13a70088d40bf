//! Shared application state.
//!
//! Each structure is owned by an `Arc` handed to the tasks and handlers that
//! use it; there are no globals.
//!
//! - heartbeat.rs: swapped snapshots, written only by the heartbeat task
//! - errors.rs: counter and recent history behind one mutex

pub mod errors;
pub mod heartbeat;

pub use errors::{ErrorKind, ErrorLog, ErrorRecord, ErrorSnapshot, RecentErrors};
pub use heartbeat::{Heartbeat, HeartbeatState};
