//! A terminal grid with a colored wave sweeping back and forth across it.
//!
//! The wave changes hue every time it bounces off an edge of the grid. [`animation`] holds the
//! terminal independent animation, [`render`] draws it into a terminal and [`app`] ties both
//! together in a frame loop.

pub mod animation;
pub mod app;
pub mod config;
pub mod controls;
pub mod logging;
pub mod render;
