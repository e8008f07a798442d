//! Background Tasks Module
//!
//! Contains background tasks that run alongside cache callers.
//!
//! # Tasks
//! - Sweeper: Removes expired entries from the least recently used end

mod sweeper;

pub use sweeper::{spawn_sweeper, SweeperGuard};
