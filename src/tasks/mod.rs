//! Tasks Module
//!
//! Background tasks for cache maintenance.

mod cleanup;

pub use cleanup::spawn_cleanup_task;
