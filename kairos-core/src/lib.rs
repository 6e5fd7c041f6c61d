//! Board-agnostic core logic for the Kairos weather clock
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Menu state machine (screen registry, transitions, scroll cursor)
//! - Snapshot types published by the clock and weather producers
//! - Wall-time and weather-payload formatting/parsing
//! - City selection list construction
//! - Configuration type definitions
//! - Collaborator traits (time source, weather source)
//!
//! Only the weather payload parser allocates (serde_json); everything else
//! is heapless.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod cities;
pub mod clock;
pub mod config;
pub mod menu;
pub mod traits;
pub mod weather;
