//! # Clinic Core
//!
//! Domain types and the appointment booking engine for the clinic scheduling
//! service. Nothing in this crate performs I/O directly: storage is reached
//! through the traits in [`ports`] and the current time through [`clock::Clock`].

pub mod booking;
pub mod clock;
pub mod errors;
pub mod models;
pub mod ports;
