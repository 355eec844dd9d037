//! Terminal UI module using ratatui.
//!
//! - `render`: splash cover and per-screen layouts
//! - `input`: keyboard handling
//! - `styles`: colours, including the shimmer ramp

pub mod input;
pub mod render;
pub mod styles;
