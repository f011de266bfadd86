//! Windowed host
//!
//! Only the winit frontend lives here; other hosts drive
//! [`Landing`](crate::landing::Landing) directly.

#[cfg(feature = "winit")]
pub mod winit;

#[cfg(feature = "winit")]
pub use self::winit::App;
