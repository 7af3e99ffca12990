//! # rdv-viewer — headless viewport driver
//!
//! Wires a `ViewportController` to headless collaborators and drives it
//! from a JSON-lines script, printing every event bound for the host as
//! one JSON line on stdout.

pub mod channel;
pub mod config;
pub mod driver;
pub mod headless;
pub mod script;
