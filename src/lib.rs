//! Prize wheel picker and group randomizer
//!
//! Names are parsed into an entry list, a spin picks one uniformly at
//! random and animates the wheel onto it, and the whole list can be split
//! into random near-equal groups. Drawing, sound, dialogs and files are
//! reached through the traits in [`platform`], so the core runs the same
//! under a terminal driver and under test doubles.

pub mod app;
pub mod config;
pub mod domain;
pub mod input;
pub mod platform;
pub mod ui;
