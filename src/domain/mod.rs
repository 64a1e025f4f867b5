//! Domain logic and core data structures
//!
//! This module contains the pure picking logic: entry parsing, wheel
//! geometry, spin planning and group partitioning. Nothing in here knows
//! about rendering, audio, clocks or files.

pub mod entries;
pub mod geometry;
pub mod groups;
pub mod spin;
