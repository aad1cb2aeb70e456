//! Time-series window resolution and downsampling.
//!
//! Pure functions shared by the series endpoint and the refresh engine:
//! bucket-aligned window computation, resolution-tier selection, uniform
//! stride downsampling, and axis label formatting. Nothing here performs
//! I/O; the document store adapter lives in [`crate::store`].

pub mod downsample;
pub mod granularity;
pub mod label;
pub mod window;

pub use downsample::downsample;
pub use granularity::Granularity;
pub use label::{label_for, tooltip_label};
pub use window::{aligned_window, raw_window, Window};
