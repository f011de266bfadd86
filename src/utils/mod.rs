//! Utility Module
//!
//! - [`OrbitControls`]: orbit camera controller driven by [`Input`](crate::input::Input)
//! - [`Timer`]: frame delta / elapsed time

pub mod orbit_control;
pub mod time;

pub use orbit_control::OrbitControls;
pub use time::Timer;
