//! # CareBook Core
//!
//! Domain types and the appointment engine of the CareBook booking service:
//! weekly doctor schedules, slot enumeration, and the booking and
//! cancellation rules. Storage is reached only through the traits in
//! [`repository`]; time only through [`clock::Clock`].

pub mod clock;
pub mod errors;
pub mod memory;
pub mod models;
pub mod repository;
pub mod services;
