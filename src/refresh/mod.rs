//! Periodic refresh of the per-render snapshot: device list, latest
//! readings, status classification, and alert lines.

pub mod alerts;
pub mod cycle;
pub mod meta;
pub mod scheduler;
