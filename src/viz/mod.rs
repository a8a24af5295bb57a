//! Dashboard widgets
//!
//! Each widget renders into a `Rect` of the shared terminal buffer and keeps
//! its own per-frame state.

pub mod globe;
pub mod lanes;
pub mod stream;
